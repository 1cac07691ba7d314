use utxo_sdk::primitives::ec::PrivateKey;
use utxo_sdk::script::Script;
use utxo_sdk::transaction::{OutPoint, Transaction, TransactionFormat};
use utxo_sdk::{Chain, FeePolicy, SigningRequest, UnspentOutput};

#[test]
fn test_sign_and_decode_on_every_chain() {
    let key = PrivateKey::from_hex("619c335025c7f4012e556c2a58b2506e30b8511b53ade95ea316fd8c3286feb9").unwrap();
    let hash = key.pub_key().hash160();
    let mut request = SigningRequest::new(
        25_000,
        Script::p2pkh(&[0x11; 20]),
        Script::p2wpkh(&hash),
        FeePolicy::ByteRate(2),
    );
    request.utxos = vec![UnspentOutput::new(
        OutPoint::new(Default::default(), 3),
        40_000,
        Script::p2wpkh(&hash),
    )];
    request.private_keys = vec![key];

    for chain in Chain::ALL {
        let id: Chain = chain.to_string().parse().unwrap();
        assert_eq!(id, chain);

        let output = chain.sign(&request).unwrap();
        let decoded = Transaction::from_hex(&output.encoded.to_hex()).unwrap();
        assert_eq!(decoded.outputs.len(), 2);
        assert_eq!(decoded.outputs[0].amount, 25_000);
        assert_eq!(chain.format().identifier(&decoded), output.transaction_id);
    }
}
