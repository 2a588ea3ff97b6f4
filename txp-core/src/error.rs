//! Error taxonomy. Verification failures are ordinary `Result`s;
//! precondition and invariant violations are fatal and raised as panics,
//! never retried or reconciled.

use thiserror::Error;

/// Errors surfaced by `txVerifyBlocks`/`txApplyBlocks` that are genuine
/// data problems rather than caller-contract breaches.
#[derive(Debug, Error)]
pub enum BlockVerifyError {
    #[error("[block's slot = {slot_id}] {source}")]
    Tx {
        slot_id: u64,
        #[source]
        source: txp_verify::VerifyError,
    },
}
