//! XRPL seeds, key pairs and classic addresses.
//!
//! Seeds come in two families: Ed25519 (`sEd...`) and secp256k1 (`s...`).
//! Both derive the account key pair in-process, so seeds never travel to a
//! ledger node.
//!
//! # Security Constraints
//! - Key material is never logged; `Debug` on [`Keypair`] is redacted
//! - New seeds use the thread-local CSPRNG

use ed25519_dalek::Signer;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{NonZeroScalar, PublicKey};
use rand::RngCore;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use thiserror::Error;

const ED25519_SEED_PREFIX: [u8; 3] = [0x01, 0xE1, 0x4B];
const SECP256K1_SEED_PREFIX: u8 = 0x21;
const ACCOUNT_ID_PREFIX: u8 = 0x00;
const ED25519_KEY_PREFIX: u8 = 0xED;
const SEED_ENTROPY_LEN: usize = 16;

/// Errors from seed decoding, address decoding and key derivation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("seed is not valid base58check")]
    InvalidSeedEncoding,

    #[error("seed has an unknown prefix or length")]
    UnknownSeedType,

    #[error("no valid secp256k1 key for seed")]
    DerivationFailed,

    #[error("invalid classic address '{0}'")]
    InvalidAddress(String),

    #[error("signing failed")]
    SigningFailed,
}

/// First half of SHA-512, the hash XRPL uses nearly everywhere.
pub fn sha512_half(data: &[u8]) -> [u8; 32] {
    let digest = Sha512::digest(data);
    let mut half = [0u8; 32];
    half.copy_from_slice(&digest[..32]);
    half
}

/// Generate a fresh Ed25519 seed.
pub fn generate_seed() -> String {
    let mut entropy = [0u8; SEED_ENTROPY_LEN];
    rand::thread_rng().fill_bytes(&mut entropy);

    let mut payload = ED25519_SEED_PREFIX.to_vec();
    payload.extend_from_slice(&entropy);
    encode_check(&payload)
}

/// 20-byte account ID behind a classic address.
pub fn decode_address(address: &str) -> Result<[u8; 20], KeyError> {
    let invalid = || KeyError::InvalidAddress(address.to_string());
    let decoded = decode_check(address).ok_or_else(invalid)?;
    match decoded.split_first() {
        Some((&ACCOUNT_ID_PREFIX, id)) if id.len() == 20 => {
            let mut account_id = [0u8; 20];
            account_id.copy_from_slice(id);
            Ok(account_id)
        }
        _ => Err(invalid()),
    }
}

/// Classic address for a 20-byte account ID.
pub fn encode_address(account_id: &[u8; 20]) -> String {
    let mut payload = vec![ACCOUNT_ID_PREFIX];
    payload.extend_from_slice(account_id);
    encode_check(&payload)
}

fn encode_check(payload: &[u8]) -> String {
    bs58::encode(payload)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check()
        .into_string()
}

fn decode_check(value: &str) -> Option<Vec<u8>> {
    bs58::decode(value)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check(None)
        .into_vec()
        .ok()
}

/// An account key pair derived from a seed.
pub enum Keypair {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
}

impl Keypair {
    /// Derive the account key pair for a base58 seed.
    pub fn from_seed(seed: &str) -> Result<Self, KeyError> {
        let decoded = decode_check(seed.trim()).ok_or(KeyError::InvalidSeedEncoding)?;

        if decoded.len() == ED25519_SEED_PREFIX.len() + SEED_ENTROPY_LEN
            && decoded.starts_with(&ED25519_SEED_PREFIX)
        {
            let secret = sha512_half(&decoded[ED25519_SEED_PREFIX.len()..]);
            return Ok(Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(&secret)));
        }

        if decoded.len() == 1 + SEED_ENTROPY_LEN && decoded[0] == SECP256K1_SEED_PREFIX {
            return derive_secp256k1(&decoded[1..]).map(Self::Secp256k1);
        }

        Err(KeyError::UnknownSeedType)
    }

    /// 33-byte public key as it appears in `SigningPubKey`.
    pub fn public_key(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => {
                let mut public = vec![ED25519_KEY_PREFIX];
                public.extend_from_slice(key.verifying_key().as_bytes());
                public
            }
            Self::Secp256k1(key) => PublicKey::from(key.verifying_key())
                .to_encoded_point(true)
                .as_bytes()
                .to_vec(),
        }
    }

    pub fn account_id(&self) -> [u8; 20] {
        let digest = Ripemd160::digest(Sha256::digest(self.public_key()));
        let mut account_id = [0u8; 20];
        account_id.copy_from_slice(&digest);
        account_id
    }

    pub fn classic_address(&self) -> String {
        encode_address(&self.account_id())
    }

    /// Sign serialized signing data.
    ///
    /// Ed25519 signs the message itself; secp256k1 signs its SHA-512 half
    /// and returns a DER signature with low S.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        match self {
            Self::Ed25519(key) => Ok(key.sign(message).to_bytes().to_vec()),
            Self::Secp256k1(key) => {
                let digest = sha512_half(message);
                let signature: k256::ecdsa::Signature =
                    PrehashSigner::<k256::ecdsa::Signature>::sign_prehash(key, &digest)
                        .map_err(|_| KeyError::SigningFailed)?;
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithm = match self {
            Self::Ed25519(_) => "ed25519",
            Self::Secp256k1(_) => "secp256k1",
        };
        f.debug_struct("Keypair")
            .field("algorithm", &algorithm)
            .field("address", &self.classic_address())
            .finish()
    }
}

/// Root key from the seed, plus the intermediate key for account 0.
fn derive_secp256k1(entropy: &[u8]) -> Result<k256::ecdsa::SigningKey, KeyError> {
    let root = derive_scalar(entropy, None)?;
    let root_public = PublicKey::from_secret_scalar(&root).to_encoded_point(true);
    let intermediate = derive_scalar(root_public.as_bytes(), Some(0))?;

    let account: Option<NonZeroScalar> = NonZeroScalar::new(*root + *intermediate).into();
    account
        .map(k256::ecdsa::SigningKey::from)
        .ok_or(KeyError::DerivationFailed)
}

fn derive_scalar(bytes: &[u8], account_index: Option<u32>) -> Result<NonZeroScalar, KeyError> {
    for sequence in 0..=u32::MAX {
        let mut hasher = Sha512::new();
        hasher.update(bytes);
        if let Some(index) = account_index {
            hasher.update(index.to_be_bytes());
        }
        hasher.update(sequence.to_be_bytes());
        let digest = hasher.finalize();

        let candidate = k256::FieldBytes::clone_from_slice(&digest[..32]);
        let scalar: Option<NonZeroScalar> = NonZeroScalar::from_repr(candidate).into();
        if let Some(scalar) = scalar {
            return Ok(scalar);
        }
    }
    Err(KeyError::DerivationFailed)
}
