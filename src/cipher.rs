use crate::errors;
use crate::fields;

pub type CipherName = fields::Uint16;

pub const TLS_RSA_WITH_RC4_128_MD5: CipherName = fields::Uint16(0x0004);
pub const TLS_RSA_WITH_RC4_128_SHA: CipherName = fields::Uint16(0x0005);
pub const TLS_RSA_WITH_3DES_EDE_CBC_SHA: CipherName = fields::Uint16(0x000a);
pub const TLS_RSA_WITH_AES_128_CBC_SHA: CipherName = fields::Uint16(0x002f);
pub const TLS_RSA_WITH_AES_256_CBC_SHA: CipherName = fields::Uint16(0x0035);
pub const TLS_RSA_WITH_AES_128_CBC_SHA256: CipherName = fields::Uint16(0x003c);
pub const TLS_RSA_WITH_AES_256_CBC_SHA256: CipherName = fields::Uint16(0x003d);
pub const TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA: CipherName = fields::Uint16(0xc014);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BulkCipherAlgorithm {
    Rc4,
    TripleDes,
    Aes,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CipherType {
    Stream,
    Block,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MACAlgorithm {
    #[allow(dead_code)]
    Null,
    HmacMd5,
    HmacSha1,
    HmacSha256,
}

impl MACAlgorithm {
    /// Digest output length, which for these suites is also the MAC key length.
    pub fn digest_length(self) -> usize {
        match self {
            MACAlgorithm::Null => 0,
            MACAlgorithm::HmacMd5 => 16,
            MACAlgorithm::HmacSha1 => 20,
            MACAlgorithm::HmacSha256 => 32,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CipherParameters {
    pub bulk_cipher_algorithm: BulkCipherAlgorithm,
    pub cipher_type: CipherType,
    pub enc_key_length: usize,
    pub block_length: usize,
    pub fixed_iv_length: usize,
    pub mac_algorithm: MACAlgorithm,
    pub mac_length: usize,
    pub mac_key_length: usize,
}

impl CipherParameters {
    /// Bytes of PRF output the key schedule carves into the six per-direction
    /// pieces: two MAC secrets, two write keys, two write IVs.
    pub fn key_block_length(&self) -> usize {
        2 * self.mac_key_length + 2 * self.enc_key_length + 2 * self.fixed_iv_length
    }
}

fn sha1_cbc_parameters(enc_key_length: usize, bulk_cipher_algorithm: BulkCipherAlgorithm, block_length: usize) -> CipherParameters {
    CipherParameters {
        bulk_cipher_algorithm,
        cipher_type: CipherType::Block,
        enc_key_length,
        block_length,
        fixed_iv_length: block_length,
        mac_algorithm: MACAlgorithm::HmacSha1,
        mac_length: 20,
        mac_key_length: 20,
    }
}

pub fn parameters(cipher: CipherName) -> Result<CipherParameters, errors::TLSError> {
    match cipher {
        TLS_RSA_WITH_RC4_128_MD5 => Ok(CipherParameters {
            bulk_cipher_algorithm: BulkCipherAlgorithm::Rc4,
            cipher_type: CipherType::Stream,
            enc_key_length: 16,
            block_length: 0,
            fixed_iv_length: 0,
            mac_algorithm: MACAlgorithm::HmacMd5,
            mac_length: 16,
            mac_key_length: 16,
        }),
        TLS_RSA_WITH_RC4_128_SHA => Ok(CipherParameters {
            bulk_cipher_algorithm: BulkCipherAlgorithm::Rc4,
            cipher_type: CipherType::Stream,
            enc_key_length: 16,
            block_length: 0,
            fixed_iv_length: 0,
            mac_algorithm: MACAlgorithm::HmacSha1,
            mac_length: 20,
            mac_key_length: 20,
        }),
        TLS_RSA_WITH_3DES_EDE_CBC_SHA => Ok(sha1_cbc_parameters(24, BulkCipherAlgorithm::TripleDes, 8)),
        TLS_RSA_WITH_AES_128_CBC_SHA => Ok(sha1_cbc_parameters(16, BulkCipherAlgorithm::Aes, 16)),
        TLS_RSA_WITH_AES_256_CBC_SHA => Ok(sha1_cbc_parameters(32, BulkCipherAlgorithm::Aes, 16)),
        TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA => Ok(sha1_cbc_parameters(32, BulkCipherAlgorithm::Aes, 16)),
        TLS_RSA_WITH_AES_128_CBC_SHA256 => Ok(CipherParameters {
            bulk_cipher_algorithm: BulkCipherAlgorithm::Aes,
            cipher_type: CipherType::Block,
            enc_key_length: 16,
            block_length: 16,
            fixed_iv_length: 16,
            mac_algorithm: MACAlgorithm::HmacSha256,
            mac_length: 32,
            mac_key_length: 32,
        }),
        TLS_RSA_WITH_AES_256_CBC_SHA256 => Ok(CipherParameters {
            bulk_cipher_algorithm: BulkCipherAlgorithm::Aes,
            cipher_type: CipherType::Block,
            enc_key_length: 32,
            block_length: 16,
            fixed_iv_length: 16,
            mac_algorithm: MACAlgorithm::HmacSha256,
            mac_length: 32,
            mac_key_length: 32,
        }),
        _ => Err(errors::TLSError::CipherNotSupportedError(cipher)),
    }
}
