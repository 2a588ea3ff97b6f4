//! `TxpLD`: the composite local transaction-processing state. This is
//! process-wide mutable state; the only legal way to mutate it is
//! through the operations in this crate, each of which runs under
//! `TxProcessor`'s lock (see `processor.rs`).

use std::collections::HashMap;

use txp_store::UtxoView;
use txp_types::{BlockHeaderHash, TxId, Undo};

use crate::mempool::MemPool;

pub struct TxpLD {
    pub view: UtxoView,
    pub mempool: MemPool,
    pub undos: HashMap<TxId, Undo>,
    pub tip: BlockHeaderHash,
}

impl TxpLD {
    pub fn new(view: UtxoView, tip: BlockHeaderHash) -> Self {
        TxpLD {
            view,
            mempool: MemPool::new(),
            undos: HashMap::new(),
            tip,
        }
    }
}
