//! Rolls back applied blocks by replaying their undo records. Mempool is
//! left untouched; the caller is responsible for invoking `normalize` once
//! a rollback sequence completes.

use std::sync::Arc;

use tracing::info;

use txp_store::{StoreError, UtxoStore};
use txp_types::{BatchOp, RollbackChain, TxIn};

/// Reverses `chain` (youngest block first), committing one atomic batch
/// per block. Panics if a block's undo list doesn't align with its
/// transaction list, or a tx's undo doesn't align with its inputs — both
/// indicate the caller handed in a malformed undo.
pub fn rollback_blocks(store: &Arc<dyn UtxoStore>, chain: RollbackChain) -> Result<(), StoreError> {
    for (block, block_undo) in chain {
        assert_eq!(
            block_undo.len(),
            block.transactions.len(),
            "BlockUndo length does not match transaction count"
        );

        let mut ops = Vec::new();
        for (tx_aux, tx_undo) in block.transactions.iter().zip(block_undo.iter()) {
            assert_eq!(
                tx_undo.len(),
                tx_aux.tx.inputs.len(),
                "Undo length does not match input count"
            );
            let tx_id = tx_aux.tx.id();
            for (input, restored) in tx_aux.tx.inputs.iter().zip(tx_undo.iter()) {
                ops.push(BatchOp::AddTxOut(*input, restored.clone()));
            }
            for j in 0..tx_aux.tx.outputs.len() {
                ops.push(BatchOp::DelTxIn(TxIn::new(tx_id, j as u32)));
            }
        }
        ops.push(BatchOp::PutTip(block.prev_hash));

        store.write_batch(ops)?;
        info!(header_hash = %block.header_hash, "block rolled back");
    }

    Ok(())
}
