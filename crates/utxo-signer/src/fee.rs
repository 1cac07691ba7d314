//! Size and fee estimation for planned transactions.
//!
//! Sizes are computed from the worst-case unlocking data of each input
//! (see [`Spend::estimated_size`](utxo_transaction::template::Spend::estimated_size))
//! and the actual output scripts, so the estimate is never below the
//! virtual size of the transaction the signer produces.

use utxo_primitives::util::VarInt;
use utxo_script::Script;
use utxo_transaction::template::InputSize;
use utxo_transaction::transaction::WITNESS_SCALE_FACTOR;

use crate::config::FeePolicy;

/// Serialized size of an output paying to `script`.
pub fn output_size(script: &Script) -> usize {
    8 + VarInt::from(script.len()).length() + script.len()
}

/// Virtual size of a transaction with these inputs and output scripts.
///
/// When any input is segwit the marker and flag add two witness bytes and
/// every legacy input adds one for its empty stack.
pub fn estimate_vsize(inputs: &[InputSize], outputs: &[&Script]) -> usize {
    let stripped = 4
        + VarInt::from(inputs.len()).length()
        + inputs.iter().map(|i| i.stripped).sum::<usize>()
        + VarInt::from(outputs.len()).length()
        + outputs.iter().map(|s| output_size(s)).sum::<usize>()
        + 4;
    let witness = if inputs.iter().any(|i| i.witness > 0) {
        2 + inputs.iter().map(|i| i.witness.max(1)).sum::<usize>()
    } else {
        0
    };
    (WITNESS_SCALE_FACTOR * stripped + witness).div_ceil(WITNESS_SCALE_FACTOR)
}

/// Fee for a transaction with these inputs and output scripts.
pub fn estimate_fee(policy: &FeePolicy, inputs: &[InputSize], outputs: &[&Script]) -> u64 {
    policy.fee_for(estimate_vsize(inputs, outputs))
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2PKH: InputSize = InputSize { stripped: 148, witness: 0 };
    const P2WPKH: InputSize = InputSize { stripped: 41, witness: 108 };

    #[test]
    fn test_legacy_vsize() {
        let out = Script::p2pkh(&[0u8; 20]);
        assert_eq!(output_size(&out), 34);
        assert_eq!(estimate_vsize(&[P2PKH], &[&out]), 192);
        assert_eq!(estimate_vsize(&[P2PKH], &[&out, &out]), 226);
        assert_eq!(estimate_fee(&FeePolicy::ByteRate(10), &[P2PKH], &[&out, &out]), 2260);
    }

    #[test]
    fn test_segwit_vsize() {
        let out = Script::p2wpkh(&[0u8; 20]);
        assert_eq!(output_size(&out), 31);
        // stripped 4 + 1 + 41 + 1 + 62 + 4 = 113, witness 2 + 108
        assert_eq!(estimate_vsize(&[P2WPKH], &[&out, &out]), (113 * 4 + 110 + 3) / 4);
        // A legacy input next to a segwit one adds one witness byte.
        let mixed = estimate_vsize(&[P2PKH, P2WPKH], &[&out]);
        let stripped = 4 + 1 + 148 + 41 + 1 + 31 + 4;
        assert_eq!(mixed, (stripped * 4 + 2 + 1 + 108 + 3) / 4);
    }

    #[test]
    fn test_no_inputs() {
        let out = Script::p2pkh(&[0u8; 20]);
        assert_eq!(estimate_vsize(&[], &[&out]), 4 + 1 + 1 + 34 + 4);
    }
}
