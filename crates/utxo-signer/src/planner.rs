//! Coin selection and fee planning.
//!
//! Candidates are taken in caller order until they cover the amount plus
//! the fee of a transaction paying only the target. A change output is
//! then added if what remains after its own fee is above the dust
//! threshold; otherwise the remainder is left to the fee.

use serde::Serialize;
use tracing::{debug, warn};
use utxo_script::Script;
use utxo_transaction::template::{InputSize, Spend};
use utxo_transaction::TransactionFormat;

use crate::config::OutputOrder;
use crate::fee::estimate_fee;
use crate::request::{SigningRequest, UnspentOutput};
use crate::PlanError;

/// Largest amount a single output may carry.
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Target,
    Change,
}

/// One output of the planned transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlannedOutput {
    pub kind: OutputKind,
    pub amount: u64,
    pub script: Script,
}

/// The result of planning: which coins are spent and where the value goes.
///
/// `available_amount == amount + fee + change` always holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionPlan {
    /// Selected coins, in selection order.
    pub utxos: Vec<UnspentOutput>,
    pub available_amount: u64,
    pub amount: u64,
    pub fee: u64,
    pub change: u64,
    /// Outputs in transaction order.
    pub outputs: Vec<PlannedOutput>,
}

struct Candidate<'a> {
    utxo: &'a UnspentOutput,
    size: InputSize,
}

/// Select coins and compute fee and change for `request`.
///
/// # Returns
/// The plan, or `NoUsableInputs`, `InvalidTargetAmount`, `ValueOverflow`
/// or `InsufficientFunds`.
pub fn plan(
    request: &SigningRequest,
    format: &dyn TransactionFormat,
) -> Result<TransactionPlan, PlanError> {
    if request.utxos.is_empty() {
        return Err(PlanError::NoUsableInputs);
    }
    let candidates = usable_candidates(request, format);
    if candidates.is_empty() {
        return Err(PlanError::NoUsableInputs);
    }

    let plan = if request.use_max_amount {
        plan_max(request, &candidates)?
    } else {
        plan_amount(request, &candidates)?
    };
    debug!(
        chain = format.name(),
        inputs = plan.utxos.len(),
        available = plan.available_amount,
        amount = plan.amount,
        fee = plan.fee,
        change = plan.change,
        "planned transaction"
    );
    Ok(plan)
}

fn usable_candidates<'a>(
    request: &'a SigningRequest,
    format: &dyn TransactionFormat,
) -> Vec<Candidate<'a>> {
    request
        .utxos
        .iter()
        .filter_map(|utxo| {
            if utxo.amount > MAX_AMOUNT {
                warn!(out_point = %utxo.out_point, amount = utxo.amount, "skipping out of range candidate");
                return None;
            }
            let size = Spend::resolve_with(&utxo.script, request.scripts.as_slice(), |s| {
                format.classify(s)
            })
            .and_then(|spend| spend.estimated_size());
            match size {
                Ok(size) => Some(Candidate { utxo, size }),
                Err(e) => {
                    warn!(out_point = %utxo.out_point, error = %e, "skipping unspendable candidate");
                    None
                }
            }
        })
        .collect()
}

fn sizes(candidates: &[Candidate<'_>]) -> Vec<InputSize> {
    candidates.iter().map(|c| c.size).collect()
}

/// Add `amount` to a running input total, which may not exceed `MAX_AMOUNT`.
fn add_amount(total: u64, amount: u64) -> Result<u64, PlanError> {
    total
        .checked_add(amount)
        .filter(|&sum| sum <= MAX_AMOUNT)
        .ok_or_else(|| PlanError::ValueOverflow(format!("inputs total {} + {}", total, amount)))
}

fn total(candidates: &[Candidate<'_>]) -> Result<u64, PlanError> {
    candidates
        .iter()
        .try_fold(0u64, |acc, c| add_amount(acc, c.utxo.amount))
}

fn plan_amount(
    request: &SigningRequest,
    candidates: &[Candidate<'_>],
) -> Result<TransactionPlan, PlanError> {
    let amount = request.amount;
    if amount == 0 || amount > MAX_AMOUNT {
        return Err(PlanError::InvalidTargetAmount(amount));
    }
    let target_only = [&request.to_script];

    let mut selected = 0;
    let mut available = 0u64;
    let mut covered = false;
    let mut inputs = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        selected += 1;
        available = add_amount(available, candidate.utxo.amount)?;
        inputs.push(candidate.size);
        let fee = estimate_fee(&request.fee, &inputs, &target_only);
        if available >= amount.saturating_add(fee) {
            covered = true;
            break;
        }
    }
    if !covered {
        let required = amount.saturating_add(estimate_fee(&request.fee, &sizes(candidates), &target_only));
        return Err(PlanError::InsufficientFunds {
            available,
            required,
            shortfall: required.saturating_sub(available),
        });
    }

    let with_change = [&request.to_script, &request.change_script];
    let change_fee = estimate_fee(&request.fee, &inputs, &with_change);
    let change = available
        .checked_sub(amount)
        .and_then(|rest| rest.checked_sub(change_fee))
        .filter(|&change| change > 0 && change >= request.config.dust_threshold);

    let (fee, change, outputs) = match change {
        Some(change) => {
            let target = planned(OutputKind::Target, amount, &request.to_script);
            let change_out = planned(OutputKind::Change, change, &request.change_script);
            let outputs = match request.config.output_order {
                OutputOrder::TargetFirst => vec![target, change_out],
                OutputOrder::ChangeFirst => vec![change_out, target],
            };
            (change_fee, change, outputs)
        }
        // Change is dust or unaffordable: the remainder goes to the fee.
        None => (
            available - amount,
            0,
            vec![planned(OutputKind::Target, amount, &request.to_script)],
        ),
    };

    Ok(TransactionPlan {
        utxos: candidates[..selected].iter().map(|c| c.utxo.clone()).collect(),
        available_amount: available,
        amount,
        fee,
        change,
        outputs,
    })
}

fn plan_max(
    request: &SigningRequest,
    candidates: &[Candidate<'_>],
) -> Result<TransactionPlan, PlanError> {
    let available = total(candidates)?;
    let fee = estimate_fee(&request.fee, &sizes(candidates), &[&request.to_script]);
    let dust = request.config.dust_threshold;
    let amount = available.saturating_sub(fee);
    if amount == 0 || amount < dust {
        let required = fee.saturating_add(dust.max(1));
        return Err(PlanError::InsufficientFunds {
            available,
            required,
            shortfall: required.saturating_sub(available),
        });
    }
    Ok(TransactionPlan {
        utxos: candidates.iter().map(|c| c.utxo.clone()).collect(),
        available_amount: available,
        amount,
        fee,
        change: 0,
        outputs: vec![planned(OutputKind::Target, amount, &request.to_script)],
    })
}

fn planned(kind: OutputKind, amount: u64, script: &Script) -> PlannedOutput {
    PlannedOutput {
        kind,
        amount,
        script: script.clone(),
    }
}
