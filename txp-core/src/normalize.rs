//! After the tip moves, topologically sort the mempool and re-validate
//! each tx against the fresh UTXO view, dropping anything that no longer
//! verifies.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use txp_store::{StoreError, UtxoStore, UtxoView};
use txp_types::{TxAux, TxId};
use txp_verify::verify_tx;

use crate::txpld::TxpLD;

/// Orders mempool transactions so that any tx spending another mempool
/// tx's output comes after it, breaking ties by insertion order. Returns
/// `None` if a cycle is detected — impossible for valid UTXO txs, so
/// reaching it is treated as a defensive reset.
fn topsort_txs(mempool_order: &[TxId], entries: &HashMap<TxId, &TxAux>) -> Option<Vec<TxId>> {
    let mut producer: HashMap<TxId, usize> = HashMap::new();
    for (index, id) in mempool_order.iter().enumerate() {
        producer.insert(*id, index);
    }

    let mut indegree: HashMap<TxId, usize> = mempool_order.iter().map(|id| (*id, 0)).collect();
    let mut edges: HashMap<TxId, Vec<TxId>> = mempool_order.iter().map(|id| (*id, Vec::new())).collect();

    for id in mempool_order {
        let aux = entries[id];
        for input in &aux.tx.inputs {
            if producer.contains_key(&input.tx_id) && &input.tx_id != id {
                edges.get_mut(&input.tx_id).unwrap().push(*id);
                *indegree.get_mut(id).unwrap() += 1;
            }
        }
    }

    let mut ready: Vec<TxId> = mempool_order.iter().filter(|id| indegree[*id] == 0).copied().collect();
    let mut sorted = Vec::with_capacity(mempool_order.len());

    while !ready.is_empty() {
        ready.sort_by_key(|id| producer[id]);
        let id = ready.remove(0);
        sorted.push(id);
        for next in &edges[&id] {
            let d = indegree.get_mut(next).unwrap();
            *d -= 1;
            if *d == 0 {
                ready.push(*next);
            }
        }
    }

    if sorted.len() != mempool_order.len() {
        return None;
    }
    Some(sorted)
}

/// Recomputes `ld` against the store's current tip.
pub fn normalize(store: &Arc<dyn UtxoStore>, ld: &mut TxpLD) -> Result<(), StoreError> {
    let new_tip = store.tip()?;

    let mempool_order: Vec<TxId> = ld.mempool.iter().map(|(id, _)| *id).collect();
    let entries: HashMap<TxId, &TxAux> = ld.mempool.iter().map(|(id, aux)| (*id, aux)).collect();

    let Some(sorted) = topsort_txs(&mempool_order, &entries) else {
        warn!("normalize: cycle detected in mempool dependency graph, resetting mempool");
        *ld = TxpLD::new(UtxoView::new(store.clone()), new_tip);
        return Ok(());
    };

    let mut new_view = UtxoView::new(store.clone());
    let mut valid_txs = Vec::new();

    for id in sorted {
        let aux = entries[&id].clone();
        let view_ref = &new_view;
        let resolver = |key: &txp_types::TxIn| -> Option<txp_types::TxOutAux> {
            if view_ref.pending_deletions().contains(key) {
                return None;
            }
            view_ref.pending_additions().get(key).cloned().or_else(|| view_ref.get(key).ok().flatten())
        };

        match verify_tx(false, &resolver, id, &aux.tx, &aux.witness, &aux.distribution) {
            Ok(()) => {
                new_view.apply_tx(id, &aux.tx, &aux.distribution);
                valid_txs.push((id, aux));
            }
            Err(e) => {
                debug!(txid = %id, error = %e, "normalize: dropping invalidated transaction");
            }
        }
    }

    let mut new_mempool = crate::mempool::MemPool::new();
    let mut new_undos = HashMap::new();
    for (id, aux) in valid_txs {
        new_mempool.insert(id, aux);
        if let Some(undo) = ld.undos.get(&id) {
            new_undos.insert(id, undo.clone());
        }
    }

    ld.view = new_view;
    ld.mempool = new_mempool;
    ld.undos = new_undos;
    ld.tip = new_tip;

    Ok(())
}
