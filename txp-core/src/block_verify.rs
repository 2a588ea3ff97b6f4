//! Pure verification of a candidate chain against a transient view rooted
//! at the current tip. No `UtxoStore` writes occur here.

use std::sync::Arc;

use tracing::debug;

use txp_store::{UtxoStore, UtxoView};
use txp_types::{AltChain, BlockUndo};
use txp_verify::verify_and_apply_txs;

use crate::error::BlockVerifyError;

/// Verifies `chain` block by block against a fresh view rooted at the
/// store's current tip, returning the per-block undo list in block order
/// (oldest first). Boundary blocks contribute no undo and are skipped.
pub fn verify_blocks(store: Arc<dyn UtxoStore>, chain: &AltChain) -> Result<Vec<BlockUndo>, BlockVerifyError> {
    let mut view = UtxoView::new(store);
    let mut undos = Vec::new();

    for block in chain {
        if block.is_boundary() {
            continue;
        }
        let block_undo =
            verify_and_apply_txs(false, &mut view, &block.transactions).map_err(|e| BlockVerifyError::Tx {
                slot_id: block.slot_id,
                source: e,
            })?;
        debug!(slot_id = block.slot_id, txs = block.transactions.len(), "block verified");
        undos.push(block_undo);
    }

    Ok(undos)
}
