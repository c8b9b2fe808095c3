use serde::{
    Deserialize,
    Serialize,
};

/// Outcome of one (credential, target) attempt.
///
/// `Skipped` is the explicit bucket for targets that never produced a
/// network call (unresolvable star/unstar targets). Skips still consume a
/// progress slot and carry an empty display message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Succeeded(String),
    Failed(String),
    Skipped,
}

impl AttemptOutcome {
    pub fn message(&self) -> &str {
        match self {
            AttemptOutcome::Succeeded(msg) | AttemptOutcome::Failed(msg) => msg,
            AttemptOutcome::Skipped => "",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Succeeded(_))
    }
}

/// Aggregate tally of one bulk run. Immutable once produced.
///
/// `attempted` is the flattened planned total (credentials x targets),
/// skips included, so the rendered summary keeps the reference
/// denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn to_message(&self) -> String {
        format!("Completed {}/{} operations", self.succeeded, self.attempted)
    }
}
