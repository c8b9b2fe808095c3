pub mod credential_store;

pub use credential_store::{
    CredentialStore,
    FileCredentialStore,
    MemoryCredentialStore,
};
