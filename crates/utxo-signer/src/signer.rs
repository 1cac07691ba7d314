//! Signing of assembled transactions and the top-level entry point.

use std::ops::Deref;

use serde::Serialize;
use tracing::{debug, trace};
use utxo_transaction::sighash::{
    SighashCache, SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_SINGLE,
};
use utxo_transaction::template::{Signable, Spend};
use utxo_transaction::{Transaction, TransactionFormat};

use crate::assembler::{assemble, UnsignedTransaction};
use crate::config::FeePolicy;
use crate::keys::KeyStore;
use crate::output::{EncodedTransaction, SigningOutput};
use crate::planner::plan;
use crate::request::SigningRequest;
use crate::SignError;

/// A transaction in which every input carries its unlocking data.
///
/// Only [`TransactionSigner`] creates these. Serializes as the transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignedTransaction(Transaction);

impl SignedTransaction {
    pub fn into_inner(self) -> Transaction {
        self.0
    }
}

impl Deref for SignedTransaction {
    type Target = Transaction;

    fn deref(&self) -> &Transaction {
        &self.0
    }
}

/// Signs every input of a transaction with keys from a [`KeyStore`].
pub struct TransactionSigner<'a> {
    keys: &'a KeyStore<'a>,
    format: &'a dyn TransactionFormat,
    sighash_type: u32,
}

impl<'a> TransactionSigner<'a> {
    pub fn new(keys: &'a KeyStore<'a>, format: &'a dyn TransactionFormat, sighash_type: u32) -> Self {
        TransactionSigner {
            keys,
            format,
            sighash_type,
        }
    }

    /// Sign all inputs in order.
    ///
    /// Each input's spend is resolved from its source output; the first
    /// failure aborts and nothing is returned.
    pub fn sign(&self, unsigned: UnsignedTransaction) -> Result<SignedTransaction, SignError> {
        let mut tx = unsigned.into_inner();
        check_sighash_type(self.sighash_type, &tx)?;
        let cache = self.format.sighash_cache(&tx);
        for index in 0..tx.inputs.len() {
            self.sign_input(&mut tx, index, &cache)?;
        }
        Ok(SignedTransaction(tx))
    }

    fn sign_input(
        &self,
        tx: &mut Transaction,
        index: usize,
        cache: &SighashCache,
    ) -> Result<(), SignError> {
        let source = tx.inputs[index]
            .source_output
            .clone()
            .ok_or_else(|| SignError::Internal(format!("input {} has no source output", index)))?;
        let spend = Spend::resolve_with(&source.locking_script, self.keys, |s| self.format.classify(s))?;
        let digest = self.format.signature_hash(
            tx,
            index,
            &spend.script_code,
            source.amount,
            self.sighash_type,
            spend.sig_version(),
            cache,
        )?;

        let items = match &spend.signable {
            Signable::PubKey(pubkey) => {
                let found = self.keys.by_pubkey(pubkey).ok_or_else(|| SignError::KeyNotFound {
                    index,
                    detail: format!("public key {}", hex::encode(pubkey)),
                })?;
                vec![self.signature(found.key, &digest)?]
            }
            Signable::PubKeyHash(hash) => {
                let found = self.keys.by_pubkey_hash(hash).ok_or_else(|| SignError::KeyNotFound {
                    index,
                    detail: format!("public key hash {}", hex::encode(hash)),
                })?;
                vec![self.signature(found.key, &digest)?, found.pubkey]
            }
            Signable::Multisig { required, pubkeys } => {
                let mut items = vec![Vec::new()];
                for pubkey in pubkeys {
                    if items.len() > *required {
                        break;
                    }
                    if let Some(found) = self.keys.by_pubkey(pubkey) {
                        items.push(self.signature(found.key, &digest)?);
                    }
                }
                if items.len() <= *required {
                    return Err(SignError::KeyNotFound {
                        index,
                        detail: format!("{} of {} required multisig keys", items.len() - 1, required),
                    });
                }
                items
            }
        };

        spend.build(items)?.apply_to(&mut tx.inputs[index]);
        trace!(index, path = spend.path.name(), script = spend.signable.name(), "signed input");
        Ok(())
    }

    /// DER signature with the sighash type byte appended.
    fn signature(
        &self,
        key: &utxo_primitives::ec::PrivateKey,
        digest: &[u8; 32],
    ) -> Result<Vec<u8>, SignError> {
        let mut sig = key.sign(digest)?.to_der();
        sig.push(self.sighash_type as u8);
        Ok(sig)
    }
}

/// Reject sighash types whose signatures would not commit to what they sign.
///
/// The type must fit the single byte appended to each signature, with a base
/// of ALL, NONE or SINGLE and no flag other than ANYONECANPAY. SINGLE also
/// needs an output at every input's index.
fn check_sighash_type(sighash_type: u32, tx: &Transaction) -> Result<(), SignError> {
    let invalid = |detail: String| SignError::InvalidSighashType { sighash_type, detail };
    if sighash_type > 0xff {
        return Err(invalid("does not fit the appended type byte".to_string()));
    }
    let base = sighash_type & !SIGHASH_ANYONECANPAY;
    if !(SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base) {
        return Err(invalid(format!("unknown base type {:#x}", base)));
    }
    if base == SIGHASH_SINGLE && tx.inputs.len() > tx.outputs.len() {
        return Err(invalid(format!(
            "input {} has no matching output ({} outputs)",
            tx.outputs.len(),
            tx.outputs.len()
        )));
    }
    Ok(())
}

/// Plan, assemble, sign and encode `request`.
///
/// With a byte-rate fee the signed transaction's virtual size is checked
/// against the planned fee before it is returned.
pub fn sign(
    request: &SigningRequest,
    format: &dyn TransactionFormat,
) -> Result<SigningOutput, SignError> {
    let plan = plan(request, format)?;
    let unsigned = assemble(&plan, request, format);
    let keys = KeyStore::new(&request.private_keys, &request.scripts);
    let signed = TransactionSigner::new(&keys, format, request.sighash_type).sign(unsigned)?;

    if let FeePolicy::ByteRate(_) = request.fee {
        let vsize = signed.vsize();
        let minimum = request.fee.fee_for(vsize);
        if plan.fee < minimum {
            return Err(SignError::Internal(format!(
                "planned fee {} below {} required for {} vbytes",
                plan.fee, minimum, vsize
            )));
        }
    }

    let encoded = EncodedTransaction {
        bytes: format.encode(&signed, true),
        witness_included: signed.has_witness(),
    };
    let transaction_id = format.identifier(&signed);
    debug!(
        chain = format.name(),
        txid = %transaction_id,
        vsize = signed.vsize(),
        fee = plan.fee,
        "signed transaction"
    );

    Ok(SigningOutput {
        transaction: signed,
        encoded,
        transaction_id,
        plan,
    })
}
