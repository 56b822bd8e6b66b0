//! Credential storage adapters.

pub mod keyring_store;
pub mod memory_store;

pub use keyring_store::KeyringCredentialStore;
pub use memory_store::MemoryCredentialStore;
