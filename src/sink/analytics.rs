use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub window_size: usize,
    pub rolling_average: f64,
    pub total_metrics: u64,
}

#[derive(Debug)]
struct Window {
    capacity: usize,
    rps: VecDeque<f64>,
    rolling_average: f64,
    total_metrics: u64,
}

/// Rolling average of `rps` over the most recent `capacity` samples
#[derive(Debug)]
pub struct Analytics {
    inner: RwLock<Window>,
}

impl Analytics {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: RwLock::new(Window {
                capacity,
                rps: VecDeque::with_capacity(capacity),
                rolling_average: 0.0,
                total_metrics: 0,
            }),
        }
    }

    /// Push one sample and return the new rolling average.
    pub fn add(&self, rps: f64) -> f64 {
        let mut w = self.inner.write();
        w.total_metrics += 1;
        w.rps.push_back(rps);
        if w.rps.len() > w.capacity {
            w.rps.pop_front();
        }
        w.rolling_average = if w.rps.is_empty() {
            0.0
        } else {
            w.rps.iter().sum::<f64>() / w.rps.len() as f64
        };
        w.rolling_average
    }

    pub fn snapshot(&self) -> AnalyticsSnapshot {
        let w = self.inner.read();
        AnalyticsSnapshot {
            window_size: w.rps.len(),
            rolling_average: w.rolling_average,
            total_metrics: w.total_metrics,
        }
    }
}
