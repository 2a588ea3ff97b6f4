//! `MemPool`: an insertion-ordered map of admitted, not-yet-confirmed
//! transactions. Insertion order matters — `normalize` falls back to it as
//! a tie-breaker only after the topological sort.

use indexmap::IndexMap;

use txp_types::{TxAux, TxId};

#[derive(Debug, Default, Clone)]
pub struct MemPool {
    txs: IndexMap<TxId, TxAux>,
}

impl MemPool {
    pub fn new() -> Self {
        MemPool { txs: IndexMap::new() }
    }

    pub fn insert(&mut self, id: TxId, aux: TxAux) {
        self.txs.insert(id, aux);
    }

    pub fn contains(&self, id: &TxId) -> bool {
        self.txs.contains_key(id)
    }

    pub fn remove(&mut self, id: &TxId) -> Option<TxAux> {
        self.txs.shift_remove(id)
    }

    pub fn get(&self, id: &TxId) -> Option<&TxAux> {
        self.txs.get(id)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&TxId, &TxAux)> {
        self.txs.iter()
    }

    pub fn size(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }
}
