//! `UtxoView`: an in-memory overlay over an `UtxoStore` handle — additions
//! plus deletions, read with precedence `del > add > base`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use txp_types::{StakeDistribution, Tx, TxId, TxIn, TxOutAux};

use crate::{StoreError, UtxoStore};

/// In-memory overlay atop an `UtxoStore`. `add` and `del` are always kept
/// disjoint; `apply_tx` is the only mutator and preserves that invariant by
/// construction.
pub struct UtxoView {
    add: HashMap<TxIn, TxOutAux>,
    del: HashSet<TxIn>,
    base: Arc<dyn UtxoStore>,
}

impl UtxoView {
    /// Creates an empty overlay rooted at `base`.
    pub fn new(base: Arc<dyn UtxoStore>) -> Self {
        UtxoView {
            add: HashMap::new(),
            del: HashSet::new(),
            base,
        }
    }

    /// Reads a single key through the overlay: deleted keys are absent
    /// regardless of the base store; added keys shadow the base store;
    /// everything else falls through to `base`.
    pub fn get(&self, key: &TxIn) -> Result<Option<TxOutAux>, StoreError> {
        if self.del.contains(key) {
            return Ok(None);
        }
        if let Some(aux) = self.add.get(key) {
            return Ok(Some(aux.clone()));
        }
        self.base.get(key)
    }

    /// Applies a transaction's effect to the overlay: every input is
    /// marked spent, every output becomes newly available.
    pub fn apply_tx(&mut self, id: TxId, tx: &Tx, distribution: &[StakeDistribution]) {
        for input in &tx.inputs {
            self.del.insert(*input);
            self.add.remove(input);
        }
        for (index, output) in tx.outputs.iter().enumerate() {
            let key = TxIn::new(id, index as u32);
            let aux = TxOutAux::new(output.clone(), distribution[index].clone());
            self.add.insert(key, aux);
            self.del.remove(&key);
        }
    }

    /// Additions pending in this overlay, for invariant checks and tests.
    pub fn pending_additions(&self) -> &HashMap<TxIn, TxOutAux> {
        &self.add
    }

    /// Deletions pending in this overlay, for invariant checks and tests.
    pub fn pending_deletions(&self) -> &HashSet<TxIn> {
        &self.del
    }
}
