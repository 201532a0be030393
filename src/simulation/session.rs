//! Per-user state carried across transactions as goose session data.

use rand::{rngs::StdRng, SeedableRng};

use crate::domain::{MetricSample, SampleShape};

/// What every user session is started from
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionSettings {
    pub shape: SampleShape,
    /// Base seed, user `i` gets `seed + i`
    pub seed: Option<u64>,
}

impl SessionSettings {
    pub fn start(&self, user_index: usize) -> UserSession {
        let seed = self.seed.map(|seed| seed.wrapping_add(user_index as u64));
        UserSession::new(self.shape, seed)
    }
}

/// State one simulated user owns: its RNG and its submission counter
#[derive(Debug)]
pub struct UserSession {
    rng: StdRng,
    shape: SampleShape,
    total_requests: u64,
}

impl UserSession {
    /// `seed = None` draws the RNG state from OS entropy.
    pub fn new(shape: SampleShape, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            shape,
            total_requests: 0,
        }
    }

    pub fn next_sample(&mut self) -> MetricSample {
        MetricSample::generate(&mut self.rng, &self.shape)
    }

    /// Counted whatever the response, including transport failures.
    pub fn record_submission(&mut self) {
        self.total_requests += 1;
    }

    /// Number of metric submissions since the user started
    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_zero() {
        let session = UserSession::new(SampleShape::default(), Some(1));
        assert_eq!(session.total_requests(), 0);
    }

    #[test]
    fn test_counter_tracks_submissions() {
        let mut session = UserSession::new(SampleShape::default(), Some(1));
        for _ in 0..25 {
            session.next_sample();
            session.record_submission();
        }
        assert_eq!(session.total_requests(), 25);
    }

    #[test]
    fn test_same_seed_same_samples() {
        let mut a = UserSession::new(SampleShape::default(), Some(5));
        let mut b = UserSession::new(SampleShape::default(), Some(5));

        for _ in 0..100 {
            let (x, y) = (a.next_sample(), b.next_sample());
            assert_eq!((x.cpu, x.rps), (y.cpu, y.rps));
        }
    }

    #[test]
    fn test_users_get_offset_seeds() {
        let settings = SessionSettings {
            shape: SampleShape::default(),
            seed: Some(40),
        };
        let mut third = settings.start(2);
        let mut direct = UserSession::new(SampleShape::default(), Some(42));
        let mut first = settings.start(0);

        let sample = third.next_sample();
        let same = direct.next_sample();
        assert_eq!((sample.cpu, sample.rps), (same.cpu, same.rps));
        let other = first.next_sample();
        assert_ne!((sample.cpu, sample.rps), (other.cpu, other.rps));
    }

    #[test]
    fn test_samples_respect_shape() {
        let shape = SampleShape::default();
        let mut session = UserSession::new(shape, None);
        let (cpu_lo, cpu_hi) = shape.cpu_bounds();
        let (rps_lo, rps_hi) = shape.rps_bounds();

        for _ in 0..1_000 {
            let sample = session.next_sample();
            assert!((cpu_lo..=cpu_hi).contains(&sample.cpu));
            assert!((rps_lo..=rps_hi).contains(&sample.rps));
        }
    }
}
