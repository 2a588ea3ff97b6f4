//! Domain types for the UTXO transaction-processing core.
//!
//! Nothing in this crate touches storage, verification, or mempool policy —
//! it only describes the shapes those layers pass around.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content hash of a transaction body. Opaque, fixed-width, comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxId(pub [u8; 32]);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for TxId {
    fn from(bytes: [u8; 32]) -> Self {
        TxId(bytes)
    }
}

/// The hash of the most recently committed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHeaderHash(pub [u8; 32]);

impl BlockHeaderHash {
    /// The hash used as the tip of an empty chain before any block has
    /// been committed.
    pub const GENESIS: BlockHeaderHash = BlockHeaderHash([0u8; 32]);
}

impl fmt::Display for BlockHeaderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for BlockHeaderHash {
    fn from(bytes: [u8; 32]) -> Self {
        BlockHeaderHash(bytes)
    }
}

/// A reference to one previously created output: `(sourceTxId, outputIndex)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxIn {
    pub tx_id: TxId,
    pub output_index: u32,
}

impl TxIn {
    pub fn new(tx_id: TxId, output_index: u32) -> Self {
        TxIn { tx_id, output_index }
    }
}

impl fmt::Display for TxIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.output_index)
    }
}

/// Value + destination. The payload is opaque to this subsystem; it is
/// carried verbatim between `UtxoView` and the eventual wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub value: u64,
    pub destination: Vec<u8>,
}

impl TxOut {
    pub fn new(value: u64, destination: Vec<u8>) -> Self {
        TxOut { value, destination }
    }
}

/// Opaque per-output stake-distribution metadata, aligned with a `Tx`'s
/// outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeDistribution(pub Vec<u8>);

/// `TxOut` plus the distribution metadata attached when it was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutAux {
    pub output: TxOut,
    pub distribution: StakeDistribution,
}

impl TxOutAux {
    pub fn new(output: TxOut, distribution: StakeDistribution) -> Self {
        TxOutAux { output, distribution }
    }
}

/// Ordered list aligned with a `Tx`'s outputs, carrying stake metadata for
/// each one.
pub type TxDistribution = Vec<StakeDistribution>;

/// Opaque proof authorizing a transaction's inputs. Verified by the
/// `Verifier` external collaborator (`txp-verify`), never inspected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxWitness(pub Vec<u8>);

/// Ordered inputs, ordered outputs. The `i`-th output of a tx with id `t`
/// is referenced by `TxIn { tx_id: t, output_index: i }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
}

impl Tx {
    pub fn id(&self) -> TxId {
        let bytes = bincode::serialize(self).expect("Tx serialization is infallible");
        TxId(*blake3::hash(&bytes).as_bytes())
    }
}

/// `(Tx, TxWitness, TxDistribution)` — a transaction together with the
/// proof and stake metadata needed to verify and apply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxAux {
    pub tx: Tx,
    pub witness: TxWitness,
    pub distribution: TxDistribution,
}

impl TxAux {
    pub fn id(&self) -> TxId {
        self.tx.id()
    }
}

/// Per-transaction undo record: the resolved output consumed by each of the
/// transaction's inputs, in the same order as `Tx::inputs`. Required length
/// equals the transaction's input count.
pub type Undo = Vec<TxOutAux>;

/// Per-tx undo records for a whole block, aligned with the block's
/// transactions.
pub type BlockUndo = Vec<Undo>;

/// A block as consumed by this subsystem: already structured, header-hashed,
/// and witness-validated by an upstream collaborator. Boundary blocks (epoch
/// markers) carry no transactions and are skipped by verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub prev_hash: BlockHeaderHash,
    pub header_hash: BlockHeaderHash,
    pub slot_id: u64,
    pub transactions: Vec<TxAux>,
}

impl Block {
    pub fn is_boundary(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// A non-empty ordered list of blocks to apply atop the current tip,
/// oldest first.
pub type AltChain = Vec<Block>;

/// A non-empty ordered list of `(Block, BlockUndo)` pairs to roll back,
/// youngest first.
pub type RollbackChain = Vec<(Block, BlockUndo)>;

/// One operation in an atomic `UtxoStore` write batch. Ordering within a
/// batch never matters for correctness: the store commits the whole batch
/// as one atomic transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchOp {
    PutTip(BlockHeaderHash),
    AddTxOut(TxIn, TxOutAux),
    DelTxIn(TxIn),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> Tx {
        Tx {
            inputs: vec![TxIn::new(TxId([1; 32]), 0)],
            outputs: vec![TxOut::new(100, vec![9, 9])],
        }
    }

    #[test]
    fn tx_id_is_stable_and_content_addressed() {
        let a = sample_tx();
        let b = sample_tx();
        assert_eq!(a.id(), b.id());

        let mut c = sample_tx();
        c.outputs[0].value = 101;
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn outpoint_reference_matches_output_index() {
        let tx = sample_tx();
        let id = tx.id();
        let out_ref = TxIn::new(id, 0);
        assert_eq!(out_ref.tx_id, id);
        assert_eq!(out_ref.output_index, 0);
    }

    #[test]
    fn genesis_tip_is_zero_hash() {
        assert_eq!(BlockHeaderHash::GENESIS.0, [0u8; 32]);
    }

    #[test]
    fn boundary_block_has_no_transactions() {
        let block = Block {
            prev_hash: BlockHeaderHash::GENESIS,
            header_hash: BlockHeaderHash([7; 32]),
            slot_id: 3,
            transactions: vec![],
        };
        assert!(block.is_boundary());
    }
}
