use crate::cipher::MACAlgorithm;
use crate::fields;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TLSError {
    /// A handshake message or ChangeCipherSpec arrived in a status that does not
    /// permit it. The dispatcher turns this into a fatal unexpected_message alert.
    #[error("unexpected packet {} in status {}", _1, _0)]
    UnexpectedPacketError(String, String),

    /// An operation was invoked with its preconditions unmet. Always a bug in the
    /// caller, never a protocol condition.
    #[error("internal error in {}: {}", _0, _1)]
    InternalError(&'static str, &'static str),

    #[error("record sequence number exhausted")]
    SequenceNumberOverflowError,

    #[error("Cipher not supported: {:x?}", _0)]
    CipherNotSupportedError(fields::Uint16),
    #[error("MACAlgorithm not supported: {:x?}", _0)]
    MACAlgorithmNotSupportedError(MACAlgorithm),

    #[error("invalid length")]
    InvalidLengthError,
    #[error("Invalid handshake type.")]
    InvalidHandshakeTypeError,
    #[error("Invalid content type.")]
    InvalidContentTypeError,
    #[error("Invalid protocol version.")]
    InvalidProtocolVersionError,

    #[error("{}", _0)]
    TryFromIntError(#[from] std::num::TryFromIntError),
    #[error("{}", _0)]
    InvalidKeyLengthError(#[from] hmac::digest::InvalidLength),
}
