//! Pure verification of a single transaction against a resolver function.
//! Nothing in this crate touches `UtxoStore` directly or
//! mutates anything beyond the `UtxoView` it's handed — verification never
//! needs to block on I/O beyond what the caller already resolved.

use std::convert::TryInto;

use ed25519_dalek::{PublicKey, Signature};
use thiserror::Error;
use tracing::debug;

use txp_store::UtxoView;
use txp_types::{StakeDistribution, Tx, TxAux, TxId, TxIn, TxOutAux, TxWitness, Undo};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("input {0} does not resolve to an output")]
    UnresolvedInput(TxIn),

    #[error("output value ({outputs}) exceeds input value ({inputs})")]
    ValueNotConserved { inputs: u128, outputs: u128 },

    #[error("witness for input {0} does not authorize the spend")]
    InvalidWitness(TxIn),

    #[error("witness length ({witness_len}) does not match input count ({input_count})")]
    WitnessArity { witness_len: usize, input_count: usize },

    #[error("distribution length ({distribution_len}) does not match output count ({output_count})")]
    DistributionArity { distribution_len: usize, output_count: usize },

    #[error("a pure transaction must have at least one input")]
    PureTxHasNoInputs,
}

/// A function resolving a `TxIn` to the output it references, if any. The
/// caller builds this once per call, checking the view overlay before a
/// pre-resolved snapshot — `Verifier` never reaches past it.
pub trait Resolver {
    fn resolve(&self, key: &TxIn) -> Option<TxOutAux>;
}

impl<F: Fn(&TxIn) -> Option<TxOutAux>> Resolver for F {
    fn resolve(&self, key: &TxIn) -> Option<TxOutAux> {
        self(key)
    }
}

/// One signature per input, in input order. This is the concrete shape
/// behind the otherwise-opaque `TxWitness` for this reference verifier —
/// real deployments can swap in a richer script/witness format without
/// changing anything in `txp-core`.
fn decode_witness(witness: &TxWitness, input_count: usize) -> Result<Vec<Signature>, VerifyError> {
    let sigs: Vec<[u8; 64]> = bincode::deserialize(&witness.0).map_err(|_| VerifyError::WitnessArity {
        witness_len: 0,
        input_count,
    })?;
    if sigs.len() != input_count {
        return Err(VerifyError::WitnessArity {
            witness_len: sigs.len(),
            input_count,
        });
    }
    sigs.iter()
        .map(|bytes| Signature::from_bytes(bytes).map_err(|_| VerifyError::WitnessArity {
            witness_len: sigs.len(),
            input_count,
        }))
        .collect()
}

/// Verifies `tx` against `resolver`: every input must resolve, value must
/// be conserved, and every input's signature must check out against the
/// public key recorded in the output it spends. When `pure` is set,
/// additionally requires at least one input (coinbase-shaped transactions
/// are only valid inside a block, never in the mempool).
pub fn verify_tx(
    pure: bool,
    resolver: &dyn Resolver,
    id: TxId,
    tx: &Tx,
    witness: &TxWitness,
    distribution: &[StakeDistribution],
) -> Result<(), VerifyError> {
    if pure && tx.inputs.is_empty() {
        return Err(VerifyError::PureTxHasNoInputs);
    }
    if distribution.len() != tx.outputs.len() {
        return Err(VerifyError::DistributionArity {
            distribution_len: distribution.len(),
            output_count: tx.outputs.len(),
        });
    }

    let mut resolved = Vec::with_capacity(tx.inputs.len());
    for input in &tx.inputs {
        let aux = resolver.resolve(input).ok_or(VerifyError::UnresolvedInput(*input))?;
        resolved.push(aux);
    }

    let total_in: u128 = resolved.iter().map(|aux| aux.output.value as u128).sum();
    let total_out: u128 = tx.outputs.iter().map(|out| out.value as u128).sum();
    if total_out > total_in {
        return Err(VerifyError::ValueNotConserved {
            inputs: total_in,
            outputs: total_out,
        });
    }

    let signatures = decode_witness(witness, tx.inputs.len())?;
    let message = id.0;
    for (input, (aux, signature)) in tx.inputs.iter().zip(resolved.iter().zip(signatures.iter())) {
        let pubkey_bytes: [u8; 32] = aux
            .output
            .destination
            .as_slice()
            .try_into()
            .map_err(|_| VerifyError::InvalidWitness(*input))?;
        let pubkey = PublicKey::from_bytes(&pubkey_bytes).map_err(|_| VerifyError::InvalidWitness(*input))?;
        txp_crypto::verify_signature(&pubkey, &message, signature).map_err(|_| VerifyError::InvalidWitness(*input))?;
    }

    debug!(txid = %id, inputs = tx.inputs.len(), outputs = tx.outputs.len(), "transaction verified");
    Ok(())
}

/// Verifies each of `txs` in order against the current contents of `view`,
/// applying each on success before moving to the next, and returns the
/// per-tx `Undo` in the same order as `txs`. Short-circuits on the first
/// failure, leaving `view` reflecting every transaction up to but not
/// including the failing one.
pub fn verify_and_apply_txs(pure: bool, view: &mut UtxoView, txs: &[TxAux]) -> Result<Vec<Undo>, VerifyError> {
    let mut undos = Vec::with_capacity(txs.len());
    for tx_aux in txs {
        let id = tx_aux.id();
        let resolver = |key: &TxIn| view.get(key).ok().flatten();
        verify_tx(pure, &resolver, id, &tx_aux.tx, &tx_aux.witness, &tx_aux.distribution)?;

        let undo: Undo = tx_aux
            .tx
            .inputs
            .iter()
            .map(|input| view.get(input).ok().flatten().expect("just verified as resolvable"))
            .collect();

        view.apply_tx(id, &tx_aux.tx, &tx_aux.distribution);
        undos.push(undo);
    }
    Ok(undos)
}
