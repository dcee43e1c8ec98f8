//! Canonical binary encoding and local signing of XRP Payments.
//!
//! Only the fields a native XRP Payment uses are supported. Fields are
//! written in canonical order (type code, then field code), and anything
//! outside the table is refused rather than silently dropped.

use serde_json::{Map, Value};

use crate::ledger::keys::{decode_address, sha512_half, Keypair};
use crate::ledger::types::{LedgerError, LedgerResult};

/// Prefix of the data a single signer signs ("STX\0").
const SIGNING_PREFIX: [u8; 4] = [0x53, 0x54, 0x58, 0x00];

/// Prefix hashed with a signed blob to get its transaction ID ("TXN\0").
const TRANSACTION_ID_PREFIX: [u8; 4] = [0x54, 0x58, 0x4E, 0x00];

const NATIVE_POSITIVE: u64 = 0x4000_0000_0000_0000;
const MAX_NATIVE_DROPS: u64 = 100_000_000_000_000_000;

#[derive(Clone, Copy)]
enum Kind {
    UInt16,
    UInt32,
    Amount,
    Blob,
    AccountId,
}

struct FieldDef {
    name: &'static str,
    type_code: u8,
    field_code: u8,
    kind: Kind,
    signing: bool,
}

const fn field(name: &'static str, type_code: u8, field_code: u8, kind: Kind) -> FieldDef {
    FieldDef {
        name,
        type_code,
        field_code,
        kind,
        signing: true,
    }
}

/// Supported fields, already in canonical order.
const FIELDS: &[FieldDef] = &[
    field("TransactionType", 1, 2, Kind::UInt16),
    field("Flags", 2, 2, Kind::UInt32),
    field("SourceTag", 2, 3, Kind::UInt32),
    field("Sequence", 2, 4, Kind::UInt32),
    field("DestinationTag", 2, 14, Kind::UInt32),
    field("LastLedgerSequence", 2, 27, Kind::UInt32),
    field("Amount", 6, 1, Kind::Amount),
    field("Fee", 6, 8, Kind::Amount),
    field("SigningPubKey", 7, 3, Kind::Blob),
    FieldDef {
        signing: false,
        ..field("TxnSignature", 7, 4, Kind::Blob)
    },
    field("Account", 8, 1, Kind::AccountId),
    field("Destination", 8, 3, Kind::AccountId),
];

/// Serialize a transaction with every field present.
pub fn encode(tx: &Value) -> LedgerResult<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    write_fields(as_object(tx)?, false, &mut out)?;
    Ok(out)
}

/// Bytes a single signer signs: the prefix plus all signing fields.
pub fn encode_for_signing(tx: &Value) -> LedgerResult<Vec<u8>> {
    let mut out = SIGNING_PREFIX.to_vec();
    write_fields(as_object(tx)?, true, &mut out)?;
    Ok(out)
}

/// Transaction ID of a signed blob.
pub fn transaction_hash(blob: &[u8]) -> String {
    let mut data = TRANSACTION_ID_PREFIX.to_vec();
    data.extend_from_slice(blob);
    hex::encode_upper(sha512_half(&data))
}

/// A transaction signed in-process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Hex blob ready for `submit`.
    pub tx_blob: String,
    pub hash: String,
}

/// Fill in `SigningPubKey` and `TxnSignature` and serialize.
pub fn sign(tx: &mut Value, keypair: &Keypair) -> LedgerResult<SignedTransaction> {
    let public_key = hex::encode_upper(keypair.public_key());
    as_object_mut(tx)?.insert("SigningPubKey".to_string(), Value::String(public_key));

    let signature = keypair.sign(&encode_for_signing(tx)?)?;
    as_object_mut(tx)?.insert(
        "TxnSignature".to_string(),
        Value::String(hex::encode_upper(signature)),
    );

    let blob = encode(tx)?;
    Ok(SignedTransaction {
        hash: transaction_hash(&blob),
        tx_blob: hex::encode_upper(blob),
    })
}

fn as_object(tx: &Value) -> LedgerResult<&Map<String, Value>> {
    tx.as_object()
        .ok_or_else(|| LedgerError::Encoding("transaction is not a JSON object".to_string()))
}

fn as_object_mut(tx: &mut Value) -> LedgerResult<&mut Map<String, Value>> {
    tx.as_object_mut()
        .ok_or_else(|| LedgerError::Encoding("transaction is not a JSON object".to_string()))
}

fn write_fields(tx: &Map<String, Value>, signing_only: bool, out: &mut Vec<u8>) -> LedgerResult<()> {
    if let Some(unknown) = tx
        .keys()
        .find(|key| !FIELDS.iter().any(|def| def.name == key.as_str()) && key.as_str() != "hash")
    {
        return Err(LedgerError::Encoding(format!("unsupported field {}", unknown)));
    }

    for def in FIELDS {
        if signing_only && !def.signing {
            continue;
        }
        let Some(value) = tx.get(def.name) else {
            continue;
        };
        write_field_id(def.type_code, def.field_code, out);
        write_value(def, value, out)?;
    }
    Ok(())
}

fn write_field_id(type_code: u8, field_code: u8, out: &mut Vec<u8>) {
    match (type_code < 16, field_code < 16) {
        (true, true) => out.push(type_code << 4 | field_code),
        (true, false) => out.extend_from_slice(&[type_code << 4, field_code]),
        (false, true) => out.extend_from_slice(&[field_code, type_code]),
        (false, false) => out.extend_from_slice(&[0, type_code, field_code]),
    }
}

fn write_value(def: &FieldDef, value: &Value, out: &mut Vec<u8>) -> LedgerResult<()> {
    let invalid = || LedgerError::Encoding(format!("invalid {}: {}", def.name, value));

    match def.kind {
        Kind::UInt16 => {
            let code = match (def.name, value.as_str()) {
                ("TransactionType", Some("Payment")) => 0u16,
                _ => return Err(invalid()),
            };
            out.extend_from_slice(&code.to_be_bytes());
        }
        Kind::UInt32 => {
            let number = match value {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            };
            let number = number.and_then(|n| u32::try_from(n).ok()).ok_or_else(invalid)?;
            out.extend_from_slice(&number.to_be_bytes());
        }
        Kind::Amount => {
            let drops: u64 = value
                .as_str()
                .and_then(|s| s.parse().ok())
                .filter(|d| *d <= MAX_NATIVE_DROPS)
                .ok_or_else(invalid)?;
            out.extend_from_slice(&(drops | NATIVE_POSITIVE).to_be_bytes());
        }
        Kind::Blob => {
            let bytes = value
                .as_str()
                .and_then(|s| hex::decode(s).ok())
                .ok_or_else(invalid)?;
            write_length(bytes.len(), out)?;
            out.extend_from_slice(&bytes);
        }
        Kind::AccountId => {
            let address = value.as_str().ok_or_else(invalid)?;
            let account_id = decode_address(address)?;
            write_length(account_id.len(), out)?;
            out.extend_from_slice(&account_id);
        }
    }
    Ok(())
}

fn write_length(len: usize, out: &mut Vec<u8>) -> LedgerResult<()> {
    match len {
        0..=192 => out.push(len as u8),
        193..=12_480 => {
            let len = len - 193;
            out.extend_from_slice(&[193 + (len >> 8) as u8, (len & 0xFF) as u8]);
        }
        12_481..=918_744 => {
            let len = len - 12_481;
            out.extend_from_slice(&[
                241 + (len >> 16) as u8,
                ((len >> 8) & 0xFF) as u8,
                (len & 0xFF) as u8,
            ]);
        }
        _ => return Err(LedgerError::Encoding(format!("blob of {} bytes is too long", len))),
    }
    Ok(())
}
