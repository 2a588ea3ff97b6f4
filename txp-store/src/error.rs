use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("column family not found: {0}")]
    ColumnFamilyMissing(String),

    #[cfg(feature = "rocksdb")]
    #[error("rocksdb error: {0}")]
    Rocks(#[from] rocksdb::Error),
}

impl From<Box<bincode::ErrorKind>> for StoreError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
