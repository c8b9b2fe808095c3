use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};

/// Notifications the core emits for a presentation layer to render.
///
/// For one bulk run, every `BulkProgress` precedes the single
/// `BulkCompleted`, and progress percents are non-decreasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    BulkProgress {
        run_id: u64,
        percent: u8,
        message: String,
    },

    /// `finished` signals "the run finished", never "all operations
    /// succeeded"; it is always `true`.
    BulkCompleted {
        run_id: u64,
        finished: bool,
        summary: String,
    },

    AccountsChanged,
}

impl CoreEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            CoreEvent::BulkProgress { .. } => "bulk-progress",
            CoreEvent::BulkCompleted { .. } => "bulk-completed",
            CoreEvent::AccountsChanged => "accounts-changed",
        }
    }

    pub fn to_json_payload(&self) -> serde_json::Value {
        match self {
            CoreEvent::BulkProgress {
                run_id,
                percent,
                message,
            } => serde_json::json!({
                "run_id": run_id,
                "percent": percent,
                "message": message,
            }),
            CoreEvent::BulkCompleted {
                run_id,
                finished,
                summary,
            } => serde_json::json!({
                "run_id": run_id,
                "finished": finished,
                "summary": summary,
            }),
            CoreEvent::AccountsChanged => serde_json::json!({}),
        }
    }
}

#[async_trait]
pub trait EventBus: Send + Sync {
    async fn emit(&self, event: CoreEvent);
}

pub struct NoOpEventBus;

#[async_trait]
impl EventBus for NoOpEventBus {
    async fn emit(&self, _event: CoreEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let event = CoreEvent::BulkProgress {
            run_id: 1,
            percent: 50,
            message: "Followed alice".to_string(),
        };
        assert_eq!(event.event_name(), "bulk-progress");
        assert_eq!(CoreEvent::AccountsChanged.event_name(), "accounts-changed");
    }

    #[test]
    fn test_event_payload() {
        let event = CoreEvent::BulkCompleted {
            run_id: 7,
            finished: true,
            summary: "Completed 2/2 operations".to_string(),
        };
        let payload = event.to_json_payload();
        assert_eq!(payload["finished"], true);
        assert_eq!(payload["summary"], "Completed 2/2 operations");
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::BulkProgress {
            run_id: 3,
            percent: 100,
            message: String::new(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("BulkProgress"));
        assert!(json.contains("100"));
    }
}
