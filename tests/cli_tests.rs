mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use common::*;

/// A `move-txn` command isolated from the caller's environment.
fn move_txn(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("move-txn").unwrap();
    cmd.env("MOVE_TXN_HOME", home.path())
        .env_remove("MOVE_TXN_DECODERS")
        .env_remove("MOVE_TXN_NODE_URL")
        .env_remove("MOVE_TXN_NETWORK")
        .env_remove("MOVE_TXN_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_decode_writes_report() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("reports/upgrade.json");
    let (fixture, object, _, code) = upgrade_package();

    move_txn(&home)
        .arg("decode")
        .arg("--tx")
        .arg(hex_literal(&fixture.to_bytes()))
        .arg("--function")
        .arg("upgradePackage")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("0x7::package_manager::upgrade"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["sequenceNumber"], "42");
    assert_eq!(json["chainId"], 2);
    assert_eq!(json["payload"]["function"], "0x7::package_manager::upgrade");
    assert_eq!(json["payload"]["args"][0], hex_literal(&object));
    assert_eq!(
        json["payload"]["args"][2].as_array().unwrap().len(),
        code.len()
    );
    assert!(json.get("feePayer").is_none());
}

#[test]
fn test_decode_ignores_network_settings() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("out.json");
    let bytes = transfer(addr(0xb0), 5).to_bytes();

    move_txn(&home)
        .env("MOVE_TXN_NETWORK", "aptos-testnet")
        .env("MOVE_TXN_TIMEOUT_SECS", "soon")
        .arg("decode")
        .arg("--tx")
        .arg(hex_literal(&bytes))
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["payload"]["function"], "0x1::aptos_account::transfer");
}

#[test]
fn test_decode_failure_writes_nothing() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("out.json");
    let bytes = transfer(addr(0xb0), 1).to_bytes();

    move_txn(&home)
        .arg("decode")
        .arg("--tx")
        .arg(hex_literal(&bytes[..bytes.len() - 3]))
        .arg("--out")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode transaction"));

    assert!(!out.exists());
}

#[test]
fn test_decode_uses_decoder_file_from_home() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("decoders.json"),
        r#"{"functions":{"aptos_account::transfer":["address","u64"]}}"#,
    )
    .unwrap();
    let out = home.path().join("out.json");
    let fixture = RawTransactionFixture::entry(
        addr(0x3),
        "aptos_account",
        "transfer",
        vec![],
        vec![
            bcs::to_bytes(&addr(0xb0)).unwrap(),
            bcs::to_bytes(&77u64).unwrap(),
        ],
    );

    move_txn(&home)
        .arg("decode")
        .arg("--tx")
        .arg(hex::encode(fixture.to_bytes()))
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["payload"]["args"][1], "77");
}

#[test]
fn test_execute_without_signature_fails_before_network() {
    let home = TempDir::new().unwrap();
    let bytes = transfer(addr(0xb0), 1).to_bytes();

    // Nothing listens on port 9; any network access would fail differently.
    move_txn(&home)
        .arg("execute")
        .arg("--tx")
        .arg(hex_literal(&bytes))
        .arg("--public-key")
        .arg(hex_literal(&[1u8; 32]))
        .arg("--node-url")
        .arg("http://127.0.0.1:9/v1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("signature is required"));
}

#[test]
fn test_execute_rejects_bad_key_length() {
    let home = TempDir::new().unwrap();
    let bytes = transfer(addr(0xb0), 1).to_bytes();

    move_txn(&home)
        .arg("execute")
        .arg("--tx")
        .arg(hex_literal(&bytes))
        .arg("--public-key")
        .arg(hex_literal(&[1u8; 20]))
        .arg("--dry-run")
        .arg("--node-url")
        .arg("http://127.0.0.1:9/v1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("authenticator length mismatch"));
}

#[test]
fn test_execute_dry_run_against_node() {
    let home = TempDir::new().unwrap();
    let node = serve_json(vec![(
        200,
        r#"[{"type":"user_transaction","success":true,"vm_status":"Executed successfully","gas_used":"9"}]"#,
    )]);
    let bytes = transfer(addr(0xb0), 1).to_bytes();

    let output = move_txn(&home)
        .arg("execute")
        .arg("--tx")
        .arg(hex_literal(&bytes))
        .arg("--public-key")
        .arg(hex_literal(&[1u8; 32]))
        .arg("--dry-run")
        .arg("--node-url")
        .arg(&node)
        .arg("--timeout-secs")
        .arg("10")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["kind"], "simulated");
    assert_eq!(json["success"], true);
    assert_eq!(json["gas_used"], 9);
    assert_eq!(json["function"], "0x1::aptos_account::transfer");
}

#[test]
fn test_execute_failed_vm_status_exits_nonzero() {
    let home = TempDir::new().unwrap();
    let node = serve_json(vec![(
        200,
        r#"[{"type":"user_transaction","success":false,"vm_status":"Move abort in 0x1::coin: EINSUFFICIENT_BALANCE","gas_used":"4"}]"#,
    )]);
    let bytes = transfer(addr(0xb0), 1).to_bytes();

    move_txn(&home)
        .arg("execute")
        .arg("--tx")
        .arg(hex_literal(&bytes))
        .arg("--public-key")
        .arg(hex_literal(&[1u8; 32]))
        .arg("--dry-run")
        .arg("--node-url")
        .arg(&node)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Simulation failed"))
        .stderr(predicate::str::contains("EINSUFFICIENT_BALANCE"));
}

#[test]
fn test_execute_surfaces_http_error() {
    let home = TempDir::new().unwrap();
    let node = serve_json(vec![(400, r#"{"message":"Invalid transaction: bad signature"}"#)]);
    let bytes = transfer(addr(0xb0), 1).to_bytes();

    move_txn(&home)
        .arg("execute")
        .arg("--tx")
        .arg(hex_literal(&bytes))
        .arg("--public-key")
        .arg(hex_literal(&[1u8; 32]))
        .arg("--signature")
        .arg(hex_literal(&[2u8; 64]))
        .arg("--node-url")
        .arg(&node)
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 400"))
        .stderr(predicate::str::contains("bad signature"));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    move_txn(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("execute"));
}
