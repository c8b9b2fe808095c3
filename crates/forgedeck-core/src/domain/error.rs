use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Account not found: {0}")]
    CredentialNotFound(String),

    #[error("Account already exists: {0}")]
    CredentialExists(String),

    #[error("A bulk run is already in progress")]
    RunInProgress,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Credential store error: {0}")]
    StoreError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
