//! `txp-core` wires together the UTXO view, mempool, and the admission /
//! block-apply / block-verify / block-rollback / normalize algorithms that
//! make up the transaction-processing core.
//!
//! Everything durable lives behind `txp_store::UtxoStore`; everything this
//! crate touches directly is either the transient `UtxoView` or the
//! in-memory `MemPool` guarded by `TxProcessor`.

pub mod admission;
pub mod block_apply;
pub mod block_rollback;
pub mod block_verify;
pub mod config;
pub mod error;
pub mod mempool;
pub mod normalize;
pub mod processor;
pub mod txpld;

pub use admission::ProcessTxRes;
pub use config::Config;
pub use processor::TxProcessor;
pub use txpld::TxpLD;
