//! `TxProcessor`: the process-wide facade over `TxpLD`, exposing admission,
//! block apply/verify/rollback, and renormalization. The mutex around
//! `TxpLD` serializes these so admission and block operations never
//! interleave.

use std::sync::{Arc, Mutex};

use txp_store::{StoreError, UtxoStore, UtxoView};
use txp_types::{AltChain, BlockUndo, RollbackChain, TxAux, TxId};

use crate::admission::{process_tx, ProcessTxRes};
use crate::block_apply::apply_blocks;
use crate::block_rollback::rollback_blocks;
use crate::block_verify::verify_blocks;
use crate::config::Config;
use crate::error::BlockVerifyError;
use crate::txpld::TxpLD;

pub struct TxProcessor {
    store: Arc<dyn UtxoStore>,
    config: Config,
    ld: Mutex<TxpLD>,
}

impl TxProcessor {
    /// Builds a processor with an empty mempool rooted at the store's
    /// current tip.
    pub fn new(store: Arc<dyn UtxoStore>, config: Config) -> Result<Self, StoreError> {
        let tip = store.tip()?;
        let view = UtxoView::new(store.clone());
        Ok(TxProcessor {
            store,
            config,
            ld: Mutex::new(TxpLD::new(view, tip)),
        })
    }

    /// Admits a single transaction.
    pub fn process_tx(&self, id: TxId, aux: TxAux) -> Result<ProcessTxRes, StoreError> {
        let mut ld = self.ld.lock().expect("TxpLD mutex poisoned");
        process_tx(&*self.store, &self.config, &mut ld, id, aux)
    }

    /// Applies a chain atop the current tip and renormalizes.
    pub fn tx_apply_blocks(&self, chain: AltChain) -> Result<(), StoreError> {
        let mut ld = self.ld.lock().expect("TxpLD mutex poisoned");
        apply_blocks(&self.store, &mut ld, chain)
    }

    /// Pure verification of a candidate chain.
    pub fn tx_verify_blocks(&self, chain: &AltChain) -> Result<Vec<BlockUndo>, BlockVerifyError> {
        verify_blocks(self.store.clone(), chain)
    }

    /// Reverses a rollback chain; does not renormalize — the caller
    /// re-invokes normalize once a rollback sequence completes.
    pub fn tx_rollback_blocks(&self, chain: RollbackChain) -> Result<(), StoreError> {
        rollback_blocks(&self.store, chain)
    }

    /// Re-invokes normalize independent of block apply, e.g. after a
    /// rollback sequence.
    pub fn renormalize(&self) -> Result<(), StoreError> {
        let mut ld = self.ld.lock().expect("TxpLD mutex poisoned");
        crate::normalize::normalize(&self.store, &mut ld)
    }

    pub fn mempool_size(&self) -> usize {
        self.ld.lock().expect("TxpLD mutex poisoned").mempool.size()
    }

    pub fn tip(&self) -> txp_types::BlockHeaderHash {
        self.ld.lock().expect("TxpLD mutex poisoned").tip
    }
}
