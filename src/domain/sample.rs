//! # Synthetic Metric Samples
//!
//! Builds the JSON payload submitted to `POST /metrics`. Each sample is a
//! baseline value plus uniform noise, floored so it never reports a
//! non-positive CPU load or request rate.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shape of the synthetic signal: baseline, noise amplitude and floor per field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleShape {
    pub base_cpu: f64,
    /// Noise is drawn from `[-cpu_noise, cpu_noise]`
    pub cpu_noise: f64,
    pub cpu_floor: f64,
    pub base_rps: f64,
    /// Noise is drawn from `[-rps_noise, rps_noise]`
    pub rps_noise: f64,
    pub rps_floor: f64,
}

impl Default for SampleShape {
    fn default() -> Self {
        Self {
            base_cpu: 30.0,
            cpu_noise: 5.0,
            cpu_floor: 0.1,
            base_rps: 50.0,
            rps_noise: 10.0,
            rps_floor: 1.0,
        }
    }
}

impl SampleShape {
    /// Inclusive bounds every generated `cpu` value falls into
    pub fn cpu_bounds(&self) -> (f64, f64) {
        (
            self.cpu_floor.max(self.base_cpu - self.cpu_noise),
            self.cpu_floor.max(self.base_cpu + self.cpu_noise),
        )
    }

    /// Inclusive bounds every generated `rps` value falls into
    pub fn rps_bounds(&self) -> (f64, f64) {
        (
            self.rps_floor.max(self.base_rps - self.rps_noise),
            self.rps_floor.max(self.base_rps + self.rps_noise),
        )
    }
}

/// One metric submission as sent on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricSample {
    /// RFC 3339 timestamp with an explicit `+00:00` offset
    pub timestamp: String,
    pub cpu: f64,
    pub rps: f64,
}

impl MetricSample {
    /// Apply the sample formula to already-drawn noise values.
    pub fn with_noise(
        now: DateTime<Utc>,
        cpu_noise: f64,
        rps_noise: f64,
        shape: &SampleShape,
    ) -> Self {
        Self {
            timestamp: encode_timestamp(now),
            cpu: shape.cpu_floor.max(shape.base_cpu + cpu_noise),
            rps: shape.rps_floor.max(shape.base_rps + rps_noise),
        }
    }

    /// Draw a fresh sample stamped with the current wall-clock time.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, shape: &SampleShape) -> Self {
        let cpu_noise = rng.gen_range(-shape.cpu_noise..=shape.cpu_noise);
        let rps_noise = rng.gen_range(-shape.rps_noise..=shape.rps_noise);
        Self::with_noise(Utc::now(), cpu_noise, rps_noise, shape)
    }

    pub fn parsed_timestamp(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.timestamp).map(|ts| ts.with_timezone(&Utc))
    }
}

fn encode_timestamp(now: DateTime<Utc>) -> String {
    // `use_z = false` keeps the numeric "+00:00" offset
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_zero_noise_yields_baseline() {
        let sample = MetricSample::with_noise(Utc::now(), 0.0, 0.0, &SampleShape::default());
        assert_eq!(sample.cpu, 30.0);
        assert_eq!(sample.rps, 50.0);
    }

    #[test]
    fn test_floors_clamp_extreme_noise() {
        let shape = SampleShape::default();
        let sample = MetricSample::with_noise(Utc::now(), -29.95, -49.5, &shape);
        assert_eq!(sample.cpu, 0.1);
        assert_eq!(sample.rps, 1.0);
    }

    #[test]
    fn test_timestamp_has_explicit_utc_offset() {
        let mut rng = StdRng::seed_from_u64(7);
        let before = Utc::now();
        let sample = MetricSample::generate(&mut rng, &SampleShape::default());

        assert!(sample.timestamp.ends_with("+00:00"), "{}", sample.timestamp);

        let parsed = sample.parsed_timestamp().unwrap();
        let drift = (parsed - before).num_milliseconds().abs();
        assert!(drift < 5_000, "timestamp drifted {drift}ms");
    }

    #[test]
    fn test_json_has_exactly_three_fields() {
        let sample = MetricSample::with_noise(Utc::now(), 0.0, 0.0, &SampleShape::default());
        let value = serde_json::to_value(&sample).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["cpu", "rps", "timestamp"]);
        assert!(obj["cpu"].is_number());
        assert!(obj["rps"].is_number());
        assert!(obj["timestamp"].is_string());
    }

    #[test]
    fn test_baseline_sample_survives_json() {
        let sample = MetricSample::with_noise(Utc::now(), 0.0, 0.0, &SampleShape::default());
        let encoded = serde_json::to_vec(&sample).unwrap();
        let decoded: MetricSample = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded, sample);
        assert_eq!(decoded.cpu, 30.0);
        assert_eq!(decoded.rps, 50.0);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let raw = r#"{"timestamp":"2024-06-15T12:00:00+00:00","cpu":1.0,"rps":2.0,"mem":3.0}"#;
        assert!(serde_json::from_str::<MetricSample>(raw).is_err());
    }

    #[test]
    fn test_default_bounds() {
        let shape = SampleShape::default();
        assert_eq!(shape.cpu_bounds(), (25.0, 35.0));
        assert_eq!(shape.rps_bounds(), (40.0, 60.0));
    }

    proptest! {
        #[test]
        fn prop_generated_samples_stay_in_range(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = MetricSample::generate(&mut rng, &SampleShape::default());
            prop_assert!((0.1..=35.0).contains(&sample.cpu));
            prop_assert!((1.0..=60.0).contains(&sample.rps));
        }

        #[test]
        fn prop_formula_never_goes_below_floor(
            cpu_noise in -100.0f64..100.0,
            rps_noise in -100.0f64..100.0,
        ) {
            let shape = SampleShape::default();
            let sample = MetricSample::with_noise(Utc::now(), cpu_noise, rps_noise, &shape);
            prop_assert!(sample.cpu >= 0.1);
            prop_assert!(sample.rps >= 1.0);
        }
    }
}
