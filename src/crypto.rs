use crate::cipher;
use crate::errors;
use crate::fields;
use crate::handshake;
use crate::pack::Pack;
use crate::record::ProtocolVersion;
use crate::transcript::TranscriptDigests;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const MASTER_SECRET_STR: &[u8; 13] = b"master secret";
pub const MASTER_SECRET_LEN: usize = 48;

pub const KEY_BLOCK_STR: &[u8; 13] = b"key expansion";

pub const VERIFY_DATA_LENGTH: usize = 12;
pub const SSL3_VERIFY_DATA_LENGTH: usize = 36;

// SSLv3 MAC/Finished padding: 48 bytes for MD5, 40 for SHA-1
const SSL3_MD5_PAD_LENGTH: usize = 48;
const SSL3_SHA1_PAD_LENGTH: usize = 40;
const SSL3_PAD1: u8 = 0x36;
const SSL3_PAD2: u8 = 0x5c;

/// The 48-byte master secret, wiped when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret(pub [u8; MASTER_SECRET_LEN]);

fn hmac_sign<M: Mac + KeyInit>(key: &[u8], msg: &[u8]) -> Result<Vec<u8>, errors::TLSError> {
    let mut mac = <M as KeyInit>::new_from_slice(key)?;
    mac.update(msg);
    Ok(mac.finalize().into_bytes().as_slice().to_vec())
}

/// HMAC with the hash the negotiated cipher prescribes, over a 64-byte block.
/// This is the TLS record MAC primitive.
pub fn hmac(algorithm: cipher::MACAlgorithm, key: &[u8], msg: &[u8]) -> Result<Vec<u8>, errors::TLSError> {
    match algorithm {
        cipher::MACAlgorithm::HmacMd5 => hmac_sign::<Hmac<Md5>>(key, msg),
        cipher::MACAlgorithm::HmacSha1 => hmac_sign::<Hmac<Sha1>>(key, msg),
        cipher::MACAlgorithm::HmacSha256 => hmac_sign::<Hmac<Sha256>>(key, msg),
        cipher::MACAlgorithm::Null => Err(errors::TLSError::MACAlgorithmNotSupportedError(algorithm)),
    }
}

fn ssl3_mac_digest<D: Digest>(pad_length: usize, key: &[u8], msg: &[u8]) -> Vec<u8> {
    // hash(secret || pad2 || hash(secret || pad1 || msg))
    let inner = D::new()
        .chain_update(key)
        .chain_update(vec![SSL3_PAD1; pad_length])
        .chain_update(msg)
        .finalize();
    D::new()
        .chain_update(key)
        .chain_update(vec![SSL3_PAD2; pad_length])
        .chain_update(inner)
        .finalize()
        .as_slice()
        .to_vec()
}

/// The SSLv3 record MAC, the padded two-pass construction that predates HMAC.
pub fn mac_ssl3(algorithm: cipher::MACAlgorithm, key: &[u8], msg: &[u8]) -> Result<Vec<u8>, errors::TLSError> {
    match algorithm {
        cipher::MACAlgorithm::HmacMd5 => Ok(ssl3_mac_digest::<Md5>(SSL3_MD5_PAD_LENGTH, key, msg)),
        cipher::MACAlgorithm::HmacSha1 => Ok(ssl3_mac_digest::<Sha1>(SSL3_SHA1_PAD_LENGTH, key, msg)),
        _ => Err(errors::TLSError::MACAlgorithmNotSupportedError(algorithm)),
    }
}

// A(0) = seed
// A(i) = HMAC_hash(secret, A(i-1))
// P_hash(secret, seed) = HMAC_hash(secret, A(1) + seed) + HMAC_hash(secret, A(2) + seed) + ...
fn p_hash<M: Mac + KeyInit + Clone>(output_length: usize, secret: &[u8], seed: &[u8]) -> Result<Vec<u8>, errors::TLSError> {
    let key = <M as KeyInit>::new_from_slice(secret)?;

    // A(1)
    let mut a = {
        let mut mac = key.clone();
        mac.update(seed);
        mac.finalize().into_bytes().as_slice().to_vec()
    };

    let mut result = Vec::with_capacity(output_length);
    while result.len() < output_length {
        // HMAC_hash(secret, A(i) + seed)
        let mut mac = key.clone();
        mac.update(&a);
        mac.update(seed);
        result.extend_from_slice(mac.finalize().into_bytes().as_slice());

        // A(i+1)
        let mut mac = key.clone();
        mac.update(&a);
        a = mac.finalize().into_bytes().as_slice().to_vec();
    }
    result.truncate(output_length);
    Ok(result)
}

// Each round contributes MD5(secret || SHA1(salt_i || secret || seed)), where
// salt_i is the round letter repeated: "A", "BB", "CCC", ... The ASCII label of
// the TLS PRF has no SSLv3 counterpart.
fn prf_ssl3(output_length: usize, secret: &[u8], seed: &[u8]) -> Result<Vec<u8>, errors::TLSError> {
    let rounds = (output_length + 15) / 16;
    if rounds > 26 {
        return Err(errors::TLSError::InternalError("prf_ssl3", "output length exceeds the salt alphabet"));
    }

    let mut result = Vec::with_capacity(rounds * 16);
    for i in 0..rounds {
        let salt = vec![b'A' + i as u8; i + 1];
        let inner = Sha1::new().chain_update(&salt).chain_update(secret).chain_update(seed).finalize();
        let chunk = Md5::new().chain_update(secret).chain_update(inner).finalize();
        result.extend_from_slice(chunk.as_slice());
    }
    result.truncate(output_length);
    Ok(result)
}

/// The pseudo-random function of the given protocol version: the SSLv3
/// letter-salt construction, the TLS 1.0/1.1 split-secret MD5 xor SHA-1
/// construction, or the TLS 1.2 SHA-256 P_hash.
pub fn prf(
    version: ProtocolVersion,
    output_length: usize,
    secret: &[u8],
    label: &[u8],
    seed: &[u8],
) -> Result<Vec<u8>, errors::TLSError> {
    match version {
        ProtocolVersion::SSL3 => prf_ssl3(output_length, secret, seed),
        ProtocolVersion::TLS1_0 | ProtocolVersion::TLS1_1 => {
            // S1 is the first half of the secret, S2 the last half; they share
            // the middle byte when the length is odd
            let half = (secret.len() + 1) / 2;
            let label_and_seed = [label, seed].concat();
            let md5_stream = p_hash::<Hmac<Md5>>(output_length, &secret[..half], &label_and_seed)?;
            let sha1_stream = p_hash::<Hmac<Sha1>>(output_length, &secret[secret.len() - half..], &label_and_seed)?;
            Ok(md5_stream.iter().zip(sha1_stream.iter()).map(|(m, s)| m ^ s).collect())
        }
        ProtocolVersion::TLS1_2 => p_hash::<Hmac<Sha256>>(output_length, secret, &[label, seed].concat()),
    }
}

// master_secret = PRF(pre_master_secret, "master secret", ClientHello.random + ServerHello.random)[0..47]
pub fn generate_master_secret(
    version: ProtocolVersion,
    pre_master_secret: &[u8],
    client_random: fields::Random,
    server_random: fields::Random,
) -> Result<MasterSecret, errors::TLSError> {
    let seed = [client_random.pack(), server_random.pack()].concat();
    let result = prf(version, MASTER_SECRET_LEN, pre_master_secret, MASTER_SECRET_STR, &seed)?;

    let mut master_secret = [0; MASTER_SECRET_LEN];
    master_secret.copy_from_slice(&result[..MASTER_SECRET_LEN]);
    Ok(MasterSecret(master_secret))
}

// key_block = PRF(master_secret, "key expansion", server_random + client_random);
// note the randoms swap order relative to the master-secret derivation
pub fn generate_key_block(
    version: ProtocolVersion,
    client_random: fields::Random,
    server_random: fields::Random,
    master_secret: &MasterSecret,
    output_length: usize,
) -> Result<Vec<u8>, errors::TLSError> {
    let seed = [server_random.pack(), client_random.pack()].concat();
    prf(version, output_length, &master_secret.0, KEY_BLOCK_STR, &seed)
}

fn ssl3_finished_digest<D: Digest>(mut context: D, pad_length: usize, sender: &[u8; 4], master_secret: &MasterSecret) -> Vec<u8> {
    // hash(master_secret || pad2 || hash(transcript || sender || master_secret || pad1))
    context.update(sender);
    context.update(&master_secret.0);
    context.update(vec![SSL3_PAD1; pad_length]);
    let inner = context.finalize();

    D::new()
        .chain_update(&master_secret.0)
        .chain_update(vec![SSL3_PAD2; pad_length])
        .chain_update(inner)
        .finalize()
        .as_slice()
        .to_vec()
}

fn generate_finished(
    version: ProtocolVersion,
    master_secret: &MasterSecret,
    transcript: &TranscriptDigests,
    label: &[u8],
    sender: &[u8; 4],
) -> Result<Vec<u8>, errors::TLSError> {
    match version {
        ProtocolVersion::SSL3 => {
            let mut verify_data = ssl3_finished_digest(transcript.md5_context(), SSL3_MD5_PAD_LENGTH, sender, master_secret);
            verify_data.extend_from_slice(&ssl3_finished_digest(
                transcript.sha1_context(),
                SSL3_SHA1_PAD_LENGTH,
                sender,
                master_secret,
            ));
            debug_assert_eq!(verify_data.len(), SSL3_VERIFY_DATA_LENGTH);
            Ok(verify_data)
        }
        ProtocolVersion::TLS1_0 | ProtocolVersion::TLS1_1 => {
            let seed = [transcript.hash_md5(), transcript.hash_sha1()].concat();
            prf(version, VERIFY_DATA_LENGTH, &master_secret.0, label, &seed)
        }
        ProtocolVersion::TLS1_2 => prf(version, VERIFY_DATA_LENGTH, &master_secret.0, label, &transcript.hash_sha256()),
    }
}

/// The verify_data the client sends in its Finished message.
pub fn generate_client_finished(
    version: ProtocolVersion,
    master_secret: &MasterSecret,
    transcript: &TranscriptDigests,
) -> Result<Vec<u8>, errors::TLSError> {
    generate_finished(
        version,
        master_secret,
        transcript,
        handshake::CLIENT_FINISHED_LABEL,
        handshake::SSL3_CLIENT_SENDER,
    )
}

/// The verify_data the server sends in its Finished message.
pub fn generate_server_finished(
    version: ProtocolVersion,
    master_secret: &MasterSecret,
    transcript: &TranscriptDigests,
) -> Result<Vec<u8>, errors::TLSError> {
    generate_finished(
        version,
        master_secret,
        transcript,
        handshake::SERVER_FINISHED_LABEL,
        handshake::SSL3_SERVER_SENDER,
    )
}
