use thiserror::Error;

pub type Result<T> = std::result::Result<T, DnfError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DnfError {
    #[error("DNF conversion needs {size} evaluation heap entries, but at most {limit} are allowed")]
    HeapLimitExceeded { limit: usize, size: usize },
    #[error(transparent)]
    Core(#[from] cql_core::errors::CqlCoreError),
    #[error(transparent)]
    TomlDeserializer(#[from] toml::de::Error),
}
