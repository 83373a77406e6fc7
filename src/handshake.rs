use crate::errors;
use crate::fields;
use crate::pack::Pack;

use num_traits::FromPrimitive;
use std::convert::TryFrom;

#[derive(Debug, Copy, Clone, Primitive, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HandshakeType {
    HelloRequest = 0,
    ClientHello = 1,
    ServerHello = 2,
    Certificate = 11,
    ServerKeyExchange = 12,
    CertificateRequest = 13,
    ServerHelloDone = 14,
    CertificateVerify = 15,
    ClientKeyExchange = 16,
    Finished = 20,
}
impl Pack for HandshakeType {
    fn empty() -> Self {
        HandshakeType::HelloRequest
    }

    fn pack(&self) -> Vec<u8> {
        let mut v = Vec::new();
        v.push(*self as u8);
        v
    }

    fn unpack(&mut self, v: &mut Vec<u8>) -> Result<Vec<u8>, errors::TLSError> {
        match v.len() {
            0 => Err(errors::TLSError::InvalidLengthError),
            _ => {
                let rest: Vec<u8> = v.drain(1..).collect();
                *self = Self::from_u8(v[0]).ok_or(errors::TLSError::InvalidHandshakeTypeError)?;
                Ok(rest)
            }
        }
    }
}

pub type Length = fields::Uint24;

pub const CLIENT_FINISHED_LABEL: &[u8; 15] = b"client finished";
pub const SERVER_FINISHED_LABEL: &[u8; 15] = b"server finished";

// SSLv3 Finished "sender" constants, CLNT and SRVR
pub const SSL3_CLIENT_SENDER: &[u8; 4] = &[0x43, 0x4c, 0x4e, 0x54];
pub const SSL3_SERVER_SENDER: &[u8; 4] = &[0x53, 0x52, 0x56, 0x52];

/// The 4-byte handshake header: type || 24-bit body length.
pub fn encode_header(msg_type: HandshakeType, body_length: usize) -> Result<Vec<u8>, errors::TLSError> {
    let body_length = u32::try_from(body_length)?;
    if body_length >= 1 << 24 {
        return Err(errors::TLSError::InvalidLengthError);
    }
    let length = fields::uint24_from_u32(body_length);
    let mut v = Vec::new();
    v.extend_from_slice(&msg_type.pack());
    v.extend_from_slice(&length.pack());
    Ok(v)
}

/// Whether a message of this type is hashed into the Finished transcript.
/// HelloRequest never is; CertificateVerify covers the transcript up to
/// itself and is likewise left out.
pub fn is_transcript_material(msg_type: HandshakeType) -> bool {
    match msg_type {
        HandshakeType::HelloRequest | HandshakeType::CertificateVerify => false,
        HandshakeType::ClientHello
        | HandshakeType::ServerHello
        | HandshakeType::Certificate
        | HandshakeType::ServerKeyExchange
        | HandshakeType::CertificateRequest
        | HandshakeType::ServerHelloDone
        | HandshakeType::ClientKeyExchange
        | HandshakeType::Finished => true,
    }
}
