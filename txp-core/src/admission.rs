//! Admission of a single transaction into the mempool. Atomic with respect
//! to other `TxpLD` mutators — callers must hold the same lock that guards
//! block apply/rollback (see `processor.rs`).

use std::collections::HashMap;

use tracing::{debug, info};

use txp_store::{StoreError, UtxoStore};
use txp_types::{TxAux, TxId, TxIn};
use txp_verify::{verify_tx, VerifyError};

use crate::config::Config;
use crate::txpld::TxpLD;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessTxRes {
    Added,
    Known,
    Overwhelmed,
    Invalid(String),
}

/// Pre-resolves every input of `aux.tx` against `store`, outside any lock,
/// then atomically admits the transaction into `ld` if the tip hasn't
/// moved in the meantime and capacity allows.
pub fn process_tx(
    store: &dyn UtxoStore,
    config: &Config,
    ld: &mut TxpLD,
    id: TxId,
    aux: TxAux,
) -> Result<ProcessTxRes, StoreError> {
    let tip_before = store.tip()?;

    let mut resolved = HashMap::new();
    for input in &aux.tx.inputs {
        if let Some(out) = store.get(input)? {
            resolved.insert(*input, out);
        }
    }

    if ld.tip != tip_before {
        debug!(txid = %id, "admission rejected: tip moved under the caller");
        return Ok(ProcessTxRes::Invalid("Tips aren't same".to_string()));
    }
    if ld.mempool.size() >= config.max_local_txs {
        return Ok(ProcessTxRes::Overwhelmed);
    }
    if ld.mempool.contains(&id) {
        return Ok(ProcessTxRes::Known);
    }

    let view = &ld.view;
    let resolver = |key: &TxIn| -> Option<txp_types::TxOutAux> {
        if view.pending_deletions().contains(key) {
            return None;
        }
        view.pending_additions()
            .get(key)
            .cloned()
            .or_else(|| resolved.get(key).cloned())
    };

    if let Err(e) = verify_tx(true, &resolver, id, &aux.tx, &aux.witness, &aux.distribution) {
        return Ok(ProcessTxRes::Invalid(format_verify_error(&e)));
    }

    let undo = aux
        .tx
        .inputs
        .iter()
        .map(|input| {
            resolved
                .get(input)
                .cloned()
                .expect("input resolved during verification")
        })
        .collect();

    ld.view.apply_tx(id, &aux.tx, &aux.distribution);
    ld.undos.insert(id, undo);
    ld.mempool.insert(id, aux);

    info!(txid = %id, mempool_size = ld.mempool.size(), "admitted transaction");
    Ok(ProcessTxRes::Added)
}

fn format_verify_error(e: &VerifyError) -> String {
    e.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{prop_assert, prop_assert_eq};
    use std::sync::Arc;
    use txp_crypto::keypair::TxpKeyPair;
    use txp_store::{InMemoryUtxoStore, UtxoView};
    use txp_types::{BlockHeaderHash, StakeDistribution, Tx, TxOut, TxOutAux};

    fn signed_spend(keypair: &TxpKeyPair, spent: TxIn, value: u64) -> TxAux {
        let tx = Tx {
            inputs: vec![spent],
            outputs: vec![TxOut::new(value, vec![9])],
        };
        let id = tx.id();
        let sigs: Vec<[u8; 64]> = vec![keypair.sign(&id.0).to_bytes()];
        TxAux {
            tx,
            witness: txp_types::TxWitness(bincode::serialize(&sigs).unwrap()),
            distribution: vec![StakeDistribution(vec![])],
        }
    }

    fn setup() -> (Arc<InMemoryUtxoStore>, TxpLD, Config) {
        let store = Arc::new(InMemoryUtxoStore::new(BlockHeaderHash::GENESIS));
        let view = UtxoView::new(store.clone());
        let ld = TxpLD::new(view, BlockHeaderHash::GENESIS);
        (store, ld, Config::default())
    }

    /// Fresh admission against an untouched tip.
    #[test]
    fn fresh_admission_succeeds() {
        let (store, mut ld, config) = setup();
        let keypair = TxpKeyPair::generate();
        let spent = TxIn::new(TxId([1; 32]), 0);
        store.seed([(
            spent,
            TxOutAux::new(TxOut::new(100, keypair.public_key().to_bytes().to_vec()), StakeDistribution(vec![])),
        )]);

        let aux = signed_spend(&keypair, spent, 100);
        let id = aux.tx.id();
        let res = process_tx(&*store, &config, &mut ld, id, aux).unwrap();

        assert_eq!(res, ProcessTxRes::Added);
        assert_eq!(ld.mempool.size(), 1);
        let created = TxIn::new(id, 0);
        assert!(ld.view.pending_additions().contains_key(&created));
        assert!(ld.view.pending_deletions().contains(&spent));
    }

    /// Resubmitting an already-admitted tx.
    #[test]
    fn duplicate_submission_is_known() {
        let (store, mut ld, config) = setup();
        let keypair = TxpKeyPair::generate();
        let spent = TxIn::new(TxId([1; 32]), 0);
        store.seed([(
            spent,
            TxOutAux::new(TxOut::new(100, keypair.public_key().to_bytes().to_vec()), StakeDistribution(vec![])),
        )]);

        let aux = signed_spend(&keypair, spent, 100);
        let id = aux.tx.id();
        let first = process_tx(&*store, &config, &mut ld, id, aux.clone()).unwrap();
        assert_eq!(first, ProcessTxRes::Added);

        let second = process_tx(&*store, &config, &mut ld, id, aux).unwrap();
        assert_eq!(second, ProcessTxRes::Known);
        assert_eq!(ld.mempool.size(), 1);
    }

    /// The tip moved between the caller's snapshot and this submission.
    #[test]
    fn tip_mismatch_is_invalid() {
        let (store, mut ld, config) = setup();
        ld.tip = BlockHeaderHash([9; 32]);
        let tx = Tx {
            inputs: vec![],
            outputs: vec![],
        };
        let id = tx.id();
        let aux = TxAux {
            tx,
            witness: txp_types::TxWitness(vec![]),
            distribution: vec![],
        };
        let res = process_tx(&*store, &config, &mut ld, id, aux).unwrap();
        assert_eq!(res, ProcessTxRes::Invalid("Tips aren't same".to_string()));
    }

    #[test]
    fn capacity_is_enforced_strictly() {
        let (store, mut ld, _) = setup();
        let config = Config { max_local_txs: 1 };
        let existing_id = TxId([7; 32]);
        ld.mempool.insert(
            existing_id,
            TxAux {
                tx: Tx {
                    inputs: vec![],
                    outputs: vec![],
                },
                witness: txp_types::TxWitness(vec![]),
                distribution: vec![],
            },
        );

        let keypair = TxpKeyPair::generate();
        let spent = TxIn::new(TxId([1; 32]), 0);
        store.seed([(
            spent,
            TxOutAux::new(TxOut::new(1, keypair.public_key().to_bytes().to_vec()), StakeDistribution(vec![])),
        )]);
        let aux = signed_spend(&keypair, spent, 1);
        let id = aux.tx.id();
        let res = process_tx(&*store, &config, &mut ld, id, aux).unwrap();
        assert_eq!(res, ProcessTxRes::Overwhelmed);
    }

    proptest::proptest! {
        /// P4: after any sequence of admissions, mempool size never exceeds
        /// `max_local_txs`, regardless of how many distinct spends are
        /// offered.
        #[test]
        fn mempool_never_exceeds_capacity(attempts in 0usize..20, max_local_txs in 1usize..5) {
            let (store, mut ld, _) = setup();
            let config = Config { max_local_txs };
            let keypair = TxpKeyPair::generate();

            for i in 0..attempts {
                let spent = TxIn::new(TxId([i as u8 + 1; 32]), 0);
                store.seed([(
                    spent,
                    TxOutAux::new(TxOut::new(1, keypair.public_key().to_bytes().to_vec()), StakeDistribution(vec![])),
                )]);
                let aux = signed_spend(&keypair, spent, 1);
                let id = aux.tx.id();
                process_tx(&*store, &config, &mut ld, id, aux).unwrap();
                prop_assert!(ld.mempool.size() <= max_local_txs);
            }
        }
    }

    proptest::proptest! {
        /// P1/P3: after any sequence of admissions, the local tip tracks the
        /// store's tip, and every undo record has exactly one matching
        /// mempool entry and vice versa.
        #[test]
        fn tip_and_undo_bookkeeping_stay_aligned(attempts in 0usize..15) {
            let (store, mut ld, config) = setup();
            let keypair = TxpKeyPair::generate();

            for i in 0..attempts {
                let spent = TxIn::new(TxId([i as u8 + 1; 32]), 0);
                store.seed([(
                    spent,
                    TxOutAux::new(TxOut::new(1, keypair.public_key().to_bytes().to_vec()), StakeDistribution(vec![])),
                )]);
                let aux = signed_spend(&keypair, spent, 1);
                let id = aux.tx.id();
                process_tx(&*store, &config, &mut ld, id, aux).unwrap();

                prop_assert_eq!(ld.tip, store.tip().unwrap());

                let undo_ids: std::collections::HashSet<_> = ld.undos.keys().copied().collect();
                let mempool_ids: std::collections::HashSet<_> = ld.mempool.iter().map(|(id, _)| *id).collect();
                prop_assert_eq!(undo_ids, mempool_ids);

                for (tx_id, undo) in &ld.undos {
                    let tx = ld.mempool.get(tx_id).expect("every undo has a mempool entry");
                    prop_assert_eq!(undo.len(), tx.tx.inputs.len());
                }
            }
        }
    }
}
