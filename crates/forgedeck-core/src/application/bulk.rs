use std::sync::atomic::{
    AtomicBool,
    AtomicU64,
    Ordering,
};
use std::sync::Arc;

use forgedeck_client_api::{
    ClientResult,
    ForgeClient,
    ForgeClientFactory,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{
    debug,
    info,
    warn,
};

use crate::domain::{
    Action,
    AttemptOutcome,
    CredentialContext,
    DomainError,
    DomainResult,
    OperationKind,
    RunSummary,
};
use crate::event::{
    CoreEvent,
    EventBus,
};

pub type RunId = u64;

/// Handle to one in-flight bulk run.
pub struct RunHandle {
    id: RunId,
    cancelled: Arc<AtomicBool>,
    join: JoinHandle<RunSummary>,
}

impl RunHandle {
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Cooperative cancellation. Takes effect between attempts; the run
    /// still emits its completion event and resolves with a summary of what
    /// ran. There is no default user-facing cancel control; this exists for
    /// embedders that need one.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub async fn wait(self) -> DomainResult<RunSummary> {
        self.join
            .await
            .map_err(|e| DomainError::InternalError(format!("Bulk worker failed: {e}")))
    }
}

/// Executes one operation kind against every (credential, target) pair.
///
/// Each run is a single background worker; attempts are strictly
/// sequential, credentials-major (all targets for the first account, then
/// the second, ...). One progress event is emitted per attempt, skips
/// included, followed by exactly one completion event. Operation failures
/// never abort a run.
///
/// Starting a run while another started from this service is still in
/// flight is rejected with `DomainError::RunInProgress`.
pub struct BulkService {
    factory: Arc<dyn ForgeClientFactory>,
    event_bus: Arc<dyn EventBus>,
    active: Arc<Mutex<Option<RunId>>>,
    next_run_id: AtomicU64,
}

impl BulkService {
    pub fn new(factory: Arc<dyn ForgeClientFactory>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            factory,
            event_bus,
            active: Arc::new(Mutex::new(None)),
            next_run_id: AtomicU64::new(0),
        }
    }

    /// Single-account variant.
    pub async fn start(
        &self, kind: OperationKind, targets: Vec<String>, credential: CredentialContext,
    ) -> DomainResult<RunHandle> {
        self.start_multi(kind, targets, vec![credential]).await
    }

    /// Multi-account variant. `credentials` must be non-empty.
    pub async fn start_multi(
        &self, kind: OperationKind, targets: Vec<String>, credentials: Vec<CredentialContext>,
    ) -> DomainResult<RunHandle> {
        if credentials.is_empty() {
            return Err(DomainError::InvalidInput(
                "At least one account is required".to_string(),
            ));
        }

        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed) + 1;

        {
            let mut active = self.active.lock().await;
            if active.is_some() {
                return Err(DomainError::RunInProgress);
            }
            *active = Some(run_id);
        }

        let cancelled = Arc::new(AtomicBool::new(false));
        let factory = Arc::clone(&self.factory);
        let event_bus = Arc::clone(&self.event_bus);
        let active = Arc::clone(&self.active);
        let flag = Arc::clone(&cancelled);

        let join = tokio::spawn(async move {
            let summary =
                execute(run_id, kind, targets, credentials, factory, event_bus, flag).await;
            *active.lock().await = None;
            summary
        });

        Ok(RunHandle {
            id: run_id,
            cancelled,
            join,
        })
    }

    pub async fn is_active(&self) -> bool {
        self.active.lock().await.is_some()
    }
}

async fn dispatch(client: &dyn ForgeClient, action: &Action) -> ClientResult<String> {
    match action {
        Action::Follow(login) => client.follow(login).await,
        Action::Unfollow(login) => client.unfollow(login).await,
        Action::Star { owner, repo } => client.star(owner, repo).await,
        Action::Unstar { owner, repo } => client.unstar(owner, repo).await,
    }
}

async fn execute(
    run_id: RunId, kind: OperationKind, targets: Vec<String>,
    credentials: Vec<CredentialContext>, factory: Arc<dyn ForgeClientFactory>,
    event_bus: Arc<dyn EventBus>, cancelled: Arc<AtomicBool>,
) -> RunSummary {
    let total = credentials.len() * targets.len();
    let mut done = 0usize;
    let mut succeeded = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;

    info!(
        run_id,
        operation = kind.as_str(),
        accounts = credentials.len(),
        total,
        "Bulk run started"
    );

    'accounts: for credential in &credentials {
        // A fresh client per credential context; a factory failure turns
        // every attempt for this account into a recorded failure.
        let client = factory.create(&credential.token);
        if let Err(e) = &client {
            warn!(run_id, account = %credential.name, error = %e, "Failed to build forge client");
        }

        for target in &targets {
            if cancelled.load(Ordering::Relaxed) {
                debug!(run_id, "Bulk run cancelled");
                break 'accounts;
            }

            let outcome = match kind.resolve(target) {
                None => AttemptOutcome::Skipped,
                Some(action) => match &client {
                    Ok(client) => match dispatch(client.as_ref(), &action).await {
                        Ok(message) => AttemptOutcome::Succeeded(message),
                        Err(e) => AttemptOutcome::Failed(e.to_string()),
                    },
                    Err(e) => AttemptOutcome::Failed(e.to_string()),
                },
            };

            done += 1;
            match &outcome {
                AttemptOutcome::Succeeded(_) => succeeded += 1,
                AttemptOutcome::Failed(_) => failed += 1,
                AttemptOutcome::Skipped => skipped += 1,
            }

            // Truncation toward zero is the contract, not a rounding bug.
            let percent = ((done * 100) / total) as u8;
            event_bus
                .emit(CoreEvent::BulkProgress {
                    run_id,
                    percent,
                    message: outcome.message().to_string(),
                })
                .await;
        }
    }

    let summary = RunSummary {
        attempted: total,
        succeeded,
        failed,
        skipped,
    };

    info!(run_id, summary = %summary.to_message(), "Bulk run finished");

    event_bus
        .emit(CoreEvent::BulkCompleted {
            run_id,
            finished: true,
            summary: summary.to_message(),
        })
        .await;

    summary
}
