//! An in-memory `UtxoStore`, used as the reference implementation in tests
//! and as the test double for `txp-core`'s test suite so it never needs a
//! real RocksDB instance.

use std::collections::HashMap;
use std::sync::RwLock;

use txp_types::{BatchOp, BlockHeaderHash, TxIn, TxOutAux};

use crate::{StoreError, UtxoStore};

pub struct InMemoryUtxoStore {
    inner: RwLock<Inner>,
}

struct Inner {
    utxos: HashMap<TxIn, TxOutAux>,
    tip: BlockHeaderHash,
}

impl InMemoryUtxoStore {
    /// Creates an empty store with the given genesis tip.
    pub fn new(genesis_tip: BlockHeaderHash) -> Self {
        InMemoryUtxoStore {
            inner: RwLock::new(Inner {
                utxos: HashMap::new(),
                tip: genesis_tip,
            }),
        }
    }

    /// Seeds the store with a starting set of outputs, for test setup.
    pub fn seed(&self, outputs: impl IntoIterator<Item = (TxIn, TxOutAux)>) {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.utxos.extend(outputs);
    }
}

impl Default for InMemoryUtxoStore {
    fn default() -> Self {
        InMemoryUtxoStore::new(BlockHeaderHash::GENESIS)
    }
}

impl UtxoStore for InMemoryUtxoStore {
    fn get(&self, key: &TxIn) -> Result<Option<TxOutAux>, StoreError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.utxos.get(key).cloned())
    }

    fn tip(&self) -> Result<BlockHeaderHash, StoreError> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.tip)
    }

    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("lock poisoned");
        for op in ops {
            match op {
                BatchOp::PutTip(hash) => inner.tip = hash,
                BatchOp::AddTxOut(key, aux) => {
                    inner.utxos.insert(key, aux);
                }
                BatchOp::DelTxIn(key) => {
                    inner.utxos.remove(&key);
                }
            }
        }
        Ok(())
    }
}
