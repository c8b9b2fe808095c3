pub mod credential;
pub mod error;
pub mod operation;
pub mod run;

pub use credential::CredentialContext;
pub use error::{
    DomainError,
    DomainResult,
};
pub use operation::{
    Action,
    OperationKind,
};
pub use run::{
    AttemptOutcome,
    RunSummary,
};
