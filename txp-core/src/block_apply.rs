//! Applies a chain of blocks to the store. Precondition violations here are
//! fatal: a caller handing in a chain that doesn't start at the current
//! tip, or that a fresh `tip()` read disagrees with mid-chain, indicates a
//! contract breach upstream and is not recoverable.

use std::sync::Arc;

use tracing::info;

use txp_store::{StoreError, UtxoStore};
use txp_types::{AltChain, BatchOp};

use crate::normalize::normalize;
use crate::txpld::TxpLD;

/// Applies `chain` atop the store's current tip, block by block, then
/// renormalizes the mempool against the new tip. Panics if `chain` is
/// empty or its first block's `prev_hash` doesn't match the committed tip
/// — these are caller-contract violations.
pub fn apply_blocks(store: &Arc<dyn UtxoStore>, ld: &mut TxpLD, chain: AltChain) -> Result<(), StoreError> {
    let oldest = chain.first().expect("AltChain must be non-empty");
    let tip = store.tip()?;
    assert_eq!(
        tip, oldest.prev_hash,
        "CantApplyBlocks: oldest block in AltChain is not based on tip"
    );

    for block in &chain {
        let current_tip = store.tip()?;
        assert_eq!(current_tip, block.prev_hash, "tip mismatch applying block: contract violation");

        let mut ops = vec![BatchOp::PutTip(block.header_hash)];
        for tx_aux in &block.transactions {
            let tx_id = tx_aux.tx.id();
            for input in &tx_aux.tx.inputs {
                ops.push(BatchOp::DelTxIn(*input));
            }
            for (index, output) in tx_aux.tx.outputs.iter().enumerate() {
                let key = txp_types::TxIn::new(tx_id, index as u32);
                let aux = txp_types::TxOutAux::new(output.clone(), tx_aux.distribution[index].clone());
                ops.push(BatchOp::AddTxOut(key, aux));
            }
            ld.mempool.remove(&tx_id);
            ld.undos.remove(&tx_id);
        }

        store.write_batch(ops)?;
        info!(header_hash = %block.header_hash, txs = block.transactions.len(), "block applied");
    }

    normalize(store, ld)
}
