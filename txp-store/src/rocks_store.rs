//! RocksDB-backed `UtxoStore`: a column-family-per-concern handle wrapped in
//! `Arc`, with batched writes built from `WriteBatch`. Two column families
//! are enough for this subsystem: UTXOs and the chain tip.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{ColumnFamilyDescriptor, Options, WriteBatch, DB};
use tracing::{debug, info};

use txp_types::{BatchOp, BlockHeaderHash, TxIn, TxOutAux};

use crate::{StoreError, UtxoStore};

const CF_UTXOS: &str = "utxos";
const CF_META: &str = "meta";
const TIP_KEY: &[u8] = b"tip";

pub struct RocksUtxoStore {
    db: Arc<DB>,
}

impl RocksUtxoStore {
    pub fn open<P: AsRef<Path>>(path: P, genesis_tip: BlockHeaderHash) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf_descriptors(
            &opts,
            path,
            vec![
                ColumnFamilyDescriptor::new(CF_UTXOS, Options::default()),
                ColumnFamilyDescriptor::new(CF_META, Options::default()),
            ],
        )?;

        if db.get_cf(cf_handle(&db, CF_META)?, TIP_KEY)?.is_none() {
            db.put_cf(cf_handle(&db, CF_META)?, TIP_KEY, genesis_tip.0)?;
        }

        info!(path = ?db.path(), "utxo store opened");
        Ok(RocksUtxoStore { db: Arc::new(db) })
    }
}

fn cf_handle<'a>(db: &'a DB, name: &str) -> Result<&'a rocksdb::ColumnFamily, StoreError> {
    db.cf_handle(name)
        .ok_or_else(|| StoreError::ColumnFamilyMissing(name.to_string()))
}

impl UtxoStore for RocksUtxoStore {
    fn get(&self, key: &TxIn) -> Result<Option<TxOutAux>, StoreError> {
        let cf = cf_handle(&self.db, CF_UTXOS)?;
        let raw_key = bincode::serialize(key)?;
        self.db
            .get_cf(cf, raw_key)?
            .map(|bytes| bincode::deserialize(&bytes).map_err(StoreError::from))
            .transpose()
    }

    fn tip(&self) -> Result<BlockHeaderHash, StoreError> {
        let cf = cf_handle(&self.db, CF_META)?;
        let bytes = self
            .db
            .get_cf(cf, TIP_KEY)?
            .expect("tip is always initialized on open");
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        Ok(BlockHeaderHash(hash))
    }

    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        let cf_utxos = cf_handle(&self.db, CF_UTXOS)?;
        let cf_meta = cf_handle(&self.db, CF_META)?;
        let mut batch = WriteBatch::default();
        let op_count = ops.len();

        for op in ops {
            match op {
                BatchOp::PutTip(hash) => batch.put_cf(cf_meta, TIP_KEY, hash.0),
                BatchOp::AddTxOut(key, aux) => {
                    let raw_key = bincode::serialize(&key)?;
                    let raw_value = bincode::serialize(&aux)?;
                    batch.put_cf(cf_utxos, raw_key, raw_value);
                }
                BatchOp::DelTxIn(key) => {
                    let raw_key = bincode::serialize(&key)?;
                    batch.delete_cf(cf_utxos, raw_key);
                }
            }
        }

        self.db.write(batch)?;
        debug!(op_count, "committed utxo store batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txp_types::StakeDistribution;

    fn aux(value: u64) -> TxOutAux {
        TxOutAux::new(txp_types::TxOut::new(value, vec![]), StakeDistribution(vec![]))
    }

    #[test]
    fn fresh_store_has_the_caller_supplied_genesis_tip() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksUtxoStore::open(dir.path(), BlockHeaderHash([3; 32])).unwrap();
        assert_eq!(store.tip().unwrap(), BlockHeaderHash([3; 32]));
    }

    #[test]
    fn reopening_an_existing_store_keeps_its_tip() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = RocksUtxoStore::open(dir.path(), BlockHeaderHash::GENESIS).unwrap();
            store.write_batch(vec![BatchOp::PutTip(BlockHeaderHash([1; 32]))]).unwrap();
        }
        let store = RocksUtxoStore::open(dir.path(), BlockHeaderHash::GENESIS).unwrap();
        assert_eq!(store.tip().unwrap(), BlockHeaderHash([1; 32]));
    }

    #[test]
    fn write_batch_commits_adds_and_deletes_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksUtxoStore::open(dir.path(), BlockHeaderHash::GENESIS).unwrap();
        let key = TxIn::new(txp_types::TxId([1; 32]), 0);

        store.write_batch(vec![BatchOp::AddTxOut(key, aux(10))]).unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(aux(10)));

        store.write_batch(vec![BatchOp::DelTxIn(key)]).unwrap();
        assert_eq!(store.get(&key).unwrap(), None);
    }
}
