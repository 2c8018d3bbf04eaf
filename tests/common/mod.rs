#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! Envelopes are built with `bcs` over serde mirrors of the wire types, so
//! the decoder under test is checked against an independent encoder.

use serde::Serialize;

pub const SENDER: [u8; 32] = addr(0xa1);
pub const FEE_PAYER: [u8; 32] = addr(0xfe);

/// A 32-byte address whose last byte is `last`.
pub const fn addr(last: u8) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[31] = last;
    bytes
}

pub fn hex_literal(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[derive(Serialize)]
pub struct ModuleIdFixture {
    pub address: [u8; 32],
    pub name: String,
}

#[derive(Serialize)]
pub struct StructTagFixture {
    pub address: [u8; 32],
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTagFixture>,
}

#[derive(Serialize)]
pub enum TypeTagFixture {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTagFixture>),
    Struct(Box<StructTagFixture>),
}

#[derive(Serialize)]
pub struct EntryFunctionFixture {
    pub module: ModuleIdFixture,
    pub function: String,
    pub ty_args: Vec<TypeTagFixture>,
    pub args: Vec<Vec<u8>>,
}

/// Variant order fixes the BCS discriminant: EntryFunction is 2.
#[derive(Serialize)]
pub enum PayloadFixture {
    Script(Vec<u8>),
    ModuleBundle(Vec<u8>),
    EntryFunction(EntryFunctionFixture),
}

#[derive(Serialize)]
pub struct RawTransactionFixture {
    pub sender: [u8; 32],
    pub sequence_number: u64,
    pub payload: PayloadFixture,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_timestamp_secs: u64,
    pub chain_id: u8,
}

impl RawTransactionFixture {
    pub fn entry(
        module_address: [u8; 32],
        module: &str,
        function: &str,
        ty_args: Vec<TypeTagFixture>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            sender: SENDER,
            sequence_number: 42,
            payload: PayloadFixture::EntryFunction(EntryFunctionFixture {
                module: ModuleIdFixture {
                    address: module_address,
                    name: module.to_string(),
                },
                function: function.to_string(),
                ty_args,
                args,
            }),
            max_gas_amount: 200_000,
            gas_unit_price: 100,
            expiration_timestamp_secs: 1_900_000_000,
            chain_id: 2,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bcs::to_bytes(self).unwrap()
    }

    /// Raw transaction followed by the fee-payer option.
    pub fn with_fee_payer(&self, fee_payer: Option<[u8; 32]>) -> Vec<u8> {
        let mut bytes = self.to_bytes();
        bytes.extend(bcs::to_bytes(&fee_payer).unwrap());
        bytes
    }
}

/// `upgradePackage(address, vector<u8>, vector<vector<u8>>)` with a 32-byte
/// address, 100 metadata bytes and five 100-byte code blobs.
pub fn upgrade_package() -> (RawTransactionFixture, [u8; 32], Vec<u8>, Vec<Vec<u8>>) {
    let object = addr(0x42);
    let metadata = vec![0x11u8; 100];
    let code: Vec<Vec<u8>> = (0..5u8).map(|i| vec![i; 100]).collect();
    let args = vec![
        bcs::to_bytes(&object).unwrap(),
        bcs::to_bytes(&metadata).unwrap(),
        bcs::to_bytes(&code).unwrap(),
    ];
    let fixture = RawTransactionFixture::entry(addr(0x7), "package_manager", "upgrade", vec![], args);
    (fixture, object, metadata, code)
}

/// `0x1::aptos_account::transfer(recipient, amount)`.
pub fn transfer(recipient: [u8; 32], amount: u64) -> RawTransactionFixture {
    RawTransactionFixture::entry(
        addr(0x1),
        "aptos_account",
        "transfer",
        vec![],
        vec![
            bcs::to_bytes(&recipient).unwrap(),
            bcs::to_bytes(&amount).unwrap(),
        ],
    )
}

/// Serve canned `(status, body)` JSON responses on localhost, one per
/// connection, in order. Returns the `/v1` base URL.
pub fn serve_json(responses: Vec<(u16, &'static str)>) -> String {
    use std::io::{BufRead, BufReader, Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        for (status, body) in responses {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                    break;
                }
                if let Some(v) = line.to_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap_or(0);
                }
            }
            let mut payload = vec![0u8; content_length];
            let _ = reader.read_exact(&mut payload);

            let mut stream = stream;
            let _ = write!(
                stream,
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
        }
    });
    format!("http://{}/v1", addr)
}
