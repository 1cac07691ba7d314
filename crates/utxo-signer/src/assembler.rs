//! Turning a plan into an unsigned transaction.

use std::ops::Deref;

use utxo_transaction::{Transaction, TransactionFormat, TransactionInput, TransactionOutput};

use crate::planner::TransactionPlan;
use crate::request::SigningRequest;

/// A transaction whose inputs carry source outputs but no unlocking data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction(Transaction);

impl UnsignedTransaction {
    pub fn into_inner(self) -> Transaction {
        self.0
    }
}

impl Deref for UnsignedTransaction {
    type Target = Transaction;

    fn deref(&self) -> &Transaction {
        &self.0
    }
}

/// Build the unsigned transaction for `plan`.
///
/// Inputs follow the plan's selection order and outputs its output order.
pub fn assemble(
    plan: &TransactionPlan,
    request: &SigningRequest,
    format: &dyn TransactionFormat,
) -> UnsignedTransaction {
    let mut tx = Transaction::new(request.version.unwrap_or_else(|| format.default_version()));
    tx.lock_time = request.lock_time;
    tx.inputs = plan
        .utxos
        .iter()
        .map(|utxo| TransactionInput::new(utxo.out_point, utxo.sequence).with_source_output(utxo.to_output()))
        .collect();
    tx.outputs = plan
        .outputs
        .iter()
        .map(|output| TransactionOutput::new(output.amount, output.script.clone()))
        .collect();
    UnsignedTransaction(tx)
}
