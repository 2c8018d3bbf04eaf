//! Envelope and argument decoding against independently encoded fixtures.

mod common;

use common::*;
use move_txn_core::envelope::decode_transaction;
use move_txn_core::error::CodecError;
use move_txn_core::registry::DecoderRegistry;
use move_txn_core::report::decode_report;
use move_txn_types::transaction::{DecodedArgument, TransactionShape};

#[test]
fn test_upgrade_package_with_hint() {
    let (fixture, object, metadata, code) = upgrade_package();
    let bytes = fixture.to_bytes();

    let report = decode_report(
        &bytes,
        Some("upgradePackage"),
        &DecoderRegistry::with_defaults(),
    )
    .unwrap();

    assert_eq!(report.sender, hex_literal(&SENDER));
    assert_eq!(report.sequence_number, "42");
    assert_eq!(report.max_gas_amount, "200000");
    assert_eq!(report.gas_unit_price, "100");
    assert_eq!(report.expiration_timestamp_secs, "1900000000");
    assert_eq!(report.chain_id, 2);
    assert_eq!(report.fee_payer, None);
    assert_eq!(report.payload.function, "0x7::package_manager::upgrade");

    let expected_code: Vec<String> = code.iter().map(|c| hex_literal(c)).collect();
    assert_eq!(
        report.payload.args,
        vec![
            DecodedArgument::Hex(hex_literal(&object)),
            DecodedArgument::Hex(hex_literal(&metadata)),
            DecodedArgument::HexArray(expected_code),
        ]
    );
}

#[test]
fn test_unregistered_function_passes_raw_hex() {
    let (fixture, ..) = upgrade_package();
    let bytes = fixture.to_bytes();
    let raw_args = match &fixture.payload {
        PayloadFixture::EntryFunction(entry) => entry.args.clone(),
        _ => unreachable!(),
    };

    let report = decode_report(&bytes, None, &DecoderRegistry::with_defaults()).unwrap();
    let expected: Vec<DecodedArgument> = raw_args
        .iter()
        .map(|a| DecodedArgument::Hex(hex_literal(a)))
        .collect();
    assert_eq!(report.payload.args, expected);
}

#[test]
fn test_header_fields_match_bcs_fixture() {
    let fixture = transfer(addr(0xb0), 7);
    let txn = decode_transaction(&fixture.to_bytes()).unwrap();

    assert_eq!(txn.header.sender.as_bytes(), &SENDER);
    assert_eq!(txn.header.sequence_number, fixture.sequence_number);
    assert_eq!(txn.header.max_gas_amount, fixture.max_gas_amount);
    assert_eq!(txn.header.gas_unit_price, fixture.gas_unit_price);
    assert_eq!(
        txn.header.expiration_timestamp_secs,
        fixture.expiration_timestamp_secs
    );
    assert_eq!(txn.header.chain_id, fixture.chain_id);
    assert_eq!(txn.payload.module_name, "aptos_account");
    assert_eq!(txn.payload.function_name, "transfer");
    assert_eq!(txn.shape, TransactionShape::Plain);
}

#[test]
fn test_transfer_decoded_without_hint() {
    let bytes = transfer(addr(0xb0), 1_500).to_bytes();
    let report = decode_report(&bytes, None, &DecoderRegistry::with_defaults()).unwrap();
    assert_eq!(
        report.payload.args,
        vec![
            DecodedArgument::Hex(hex_literal(&addr(0xb0))),
            DecodedArgument::Text("1500".to_string()),
        ]
    );
}

#[test]
fn test_type_args_rendered() {
    let coin = TypeTagFixture::Struct(Box::new(StructTagFixture {
        address: addr(0x1),
        module: "aptos_coin".to_string(),
        name: "AptosCoin".to_string(),
        type_params: vec![],
    }));
    let fixture = RawTransactionFixture::entry(
        addr(0x1),
        "coin",
        "transfer",
        vec![coin, TypeTagFixture::Vector(Box::new(TypeTagFixture::U8))],
        vec![bcs::to_bytes(&addr(0x9)).unwrap(), bcs::to_bytes(&5u64).unwrap()],
    );
    let report =
        decode_report(&fixture.to_bytes(), None, &DecoderRegistry::with_defaults()).unwrap();
    assert_eq!(
        report.payload.type_args,
        vec!["0x1::aptos_coin::AptosCoin", "vector<u8>"]
    );
}

#[test]
fn test_fee_payer_reported() {
    let fixture = transfer(addr(0xb0), 1);
    let bytes = fixture.with_fee_payer(Some(FEE_PAYER));
    let report = decode_report(&bytes, None, &DecoderRegistry::with_defaults()).unwrap();
    assert_eq!(report.fee_payer, Some(hex_literal(&FEE_PAYER)));

    let plain = fixture.with_fee_payer(None);
    let txn = decode_transaction(&plain).unwrap();
    assert_eq!(txn.shape, TransactionShape::Plain);
    assert_eq!(txn.raw_transaction_len, fixture.to_bytes().len());
}

#[test]
fn test_secondary_signers_rejected() {
    let mut bytes = transfer(addr(0xb0), 1).with_fee_payer(None);
    bytes.extend(bcs::to_bytes(&vec![addr(0x5)]).unwrap());
    assert!(matches!(
        decode_transaction(&bytes),
        Err(CodecError::UnsupportedTransactionShape { .. })
    ));
}

#[test]
fn test_script_payload_rejected() {
    let mut fixture = transfer(addr(0xb0), 1);
    fixture.payload = PayloadFixture::Script(vec![0xa1, 0x1c]);
    let err = decode_transaction(&fixture.to_bytes()).unwrap_err();
    assert_eq!(err, CodecError::UnsupportedPayloadType { offset: 40, tag: 0 });
}

#[test]
fn test_every_truncation_fails() {
    let (fixture, ..) = upgrade_package();
    let bytes = fixture.to_bytes();
    for len in [0, 1, 31, 40, 41, bytes.len() / 2, bytes.len() - 1] {
        assert!(
            decode_transaction(&bytes[..len]).is_err(),
            "truncated to {} bytes should fail",
            len
        );
    }
}

#[test]
fn test_arity_mismatch_on_hint() {
    let bytes = transfer(addr(0xb0), 1).to_bytes();
    let err = decode_report(
        &bytes,
        Some("publishPackage"),
        &DecoderRegistry::with_defaults(),
    );
    // Two args against two decoders: arity matches, but the address is not a byte vector.
    assert!(err.is_err());

    let err = decode_report(
        &bytes,
        Some("upgradePackage"),
        &DecoderRegistry::with_defaults(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CodecError::ArgumentCountMismatch {
            expected: 3,
            actual: 2,
            ..
        }
    ));
}

#[test]
fn test_decoder_file_overrides_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("decoders.json");
    std::fs::write(
        &path,
        r#"{"functions":{"0x1::aptos_account::transfer":["raw","u64"]}}"#,
    )
    .unwrap();

    let mut registry = DecoderRegistry::with_defaults();
    assert_eq!(registry.extend_from_file(&path).unwrap(), 1);

    let bytes = transfer(addr(0xb0), 9).to_bytes();
    let report = decode_report(&bytes, None, &registry).unwrap();
    assert_eq!(
        report.payload.args[0],
        DecodedArgument::Hex(hex_literal(&addr(0xb0)))
    );
    assert_eq!(report.payload.args[1], DecodedArgument::Text("9".into()));
}
