//! The `UtxoStore` contract and the in-memory overlay (`UtxoView`) built on
//! top of it.
//!
//! This crate owns the only durable state in the subsystem. Everything
//! above it (`txp-verify`, `txp-core`) talks to storage exclusively through
//! the `UtxoStore` trait, never through a concrete backend.

pub mod error;
pub mod mem_store;
#[cfg(feature = "rocksdb")]
pub mod rocks_store;
pub mod view;

pub use error::StoreError;
pub use mem_store::InMemoryUtxoStore;
#[cfg(feature = "rocksdb")]
pub use rocks_store::RocksUtxoStore;
pub use view::UtxoView;

use txp_types::{BatchOp, BlockHeaderHash, TxIn, TxOutAux};

/// The durable mapping `TxIn -> TxOutAux`, plus the chain tip, consumed by
/// this subsystem. The persistent key-value engine backing this trait is an
/// external collaborator — this crate only defines the contract and a
/// couple of implementations of it.
pub trait UtxoStore: Send + Sync {
    /// Looks up a single unspent output.
    fn get(&self, key: &TxIn) -> Result<Option<TxOutAux>, StoreError>;

    /// The hash of the most recently committed block.
    fn tip(&self) -> Result<BlockHeaderHash, StoreError>;

    /// Applies a batch of operations atomically. Ordering within `ops` must
    /// not affect the outcome — the same set of keys never collides within
    /// one batch in a valid chain.
    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError>;
}
