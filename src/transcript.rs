use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Running hashes over every handshake message exchanged so far.
///
/// MD5 and SHA-1 feed the Finished computation up to TLS 1.1; SHA-256 is kept
/// alongside them so the same transcript serves a TLS 1.2 negotiation. The
/// snapshot accessors clone the live context before finishing, so computing a
/// Finished never consumes the transcript and the peer's Finished can still be
/// hashed in afterwards.
#[derive(Clone)]
pub struct TranscriptDigests {
    md5: Md5,
    sha1: Sha1,
    sha256: Sha256,
}

impl TranscriptDigests {
    pub fn new() -> Self {
        Self {
            md5: Md5::new(),
            sha1: Sha1::new(),
            sha256: Sha256::new(),
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.md5.update(bytes);
        self.sha1.update(bytes);
        self.sha256.update(bytes);
    }

    pub fn hash_md5(&self) -> Vec<u8> {
        self.md5.clone().finalize().as_slice().to_vec()
    }

    pub fn hash_sha1(&self) -> Vec<u8> {
        self.sha1.clone().finalize().as_slice().to_vec()
    }

    pub fn hash_sha256(&self) -> Vec<u8> {
        self.sha256.clone().finalize().as_slice().to_vec()
    }

    pub fn md5_context(&self) -> Md5 {
        self.md5.clone()
    }

    pub fn sha1_context(&self) -> Sha1 {
        self.sha1.clone()
    }
}

impl Default for TranscriptDigests {
    fn default() -> Self {
        Self::new()
    }
}
