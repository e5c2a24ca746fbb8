#![forbid(unsafe_code)]

pub mod file;
pub mod repository;

pub use file::FileCredentialRepository;
pub use repository::{
    CredentialRecord, CredentialRepository, InMemoryCredentialRepository, StorageError,
};
