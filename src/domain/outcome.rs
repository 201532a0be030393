use serde::Serialize;

/// Success/failure label attached to a single request for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure { reason: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Outcome::Success => None,
            Outcome::Failure { reason } => Some(reason),
        }
    }
}

/// Metric submissions succeed on exactly 200. `status` is 0 when no
/// response arrived.
pub fn classify_submission(status: u16) -> Outcome {
    if status == 200 {
        Outcome::Success
    } else {
        Outcome::Failure {
            reason: format!("Status: {status}"),
        }
    }
}
