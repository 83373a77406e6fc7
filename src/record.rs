use crate::errors;
use crate::fields;
use crate::pack::Pack;

use num_traits::FromPrimitive;

#[derive(Debug, Copy, Clone, Primitive, PartialEq)]
#[repr(u8)]
pub enum ContentType {
    ChangeCipherSpec = 20,
    Alert = 21,
    Handshake = 22,
    ApplicationData = 23,
}
impl Pack for ContentType {
    fn empty() -> Self {
        ContentType::Handshake
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
                *self = Self::from_u8(v[0]).ok_or(errors::TLSError::InvalidContentTypeError)?;
                Ok(rest)
            }
        }
    }
}

/// Protocol versions in negotiation order. Version-conditional logic relies on
/// the derived ordering (`version < ProtocolVersion::TLS1_0` selects SSL3
/// behavior).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ProtocolVersion {
    SSL3,
    TLS1_0,
    TLS1_1,
    TLS1_2,
}

impl ProtocolVersion {
    pub fn from_bytes(major: u8, minor: u8) -> Result<Self, errors::TLSError> {
        match (major, minor) {
            (3, 0) => Ok(ProtocolVersion::SSL3),
            (3, 1) => Ok(ProtocolVersion::TLS1_0),
            (3, 2) => Ok(ProtocolVersion::TLS1_1),
            (3, 3) => Ok(ProtocolVersion::TLS1_2),
            _ => Err(errors::TLSError::InvalidProtocolVersionError),
        }
    }
}

impl Pack for ProtocolVersion {
    fn empty() -> Self {
        ProtocolVersion::TLS1_0
    }

    fn pack(&self) -> Vec<u8> {
        match self {
            ProtocolVersion::SSL3 => vec![3, 0],
            ProtocolVersion::TLS1_0 => vec![3, 1],
            ProtocolVersion::TLS1_1 => vec![3, 2],
            ProtocolVersion::TLS1_2 => vec![3, 3],
        }
    }

    fn unpack(&mut self, v: &mut Vec<u8>) -> Result<Vec<u8>, errors::TLSError> {
        match v.len() {
            0..=1 => Err(errors::TLSError::InvalidLengthError),
            _ => {
                let rest: Vec<u8> = v.drain(2..).collect();
                *self = Self::from_bytes(v[0], v[1])?;
                Ok(rest)
            }
        }
    }
}

pub type Length = fields::Uint16;

/// The record-layer header as the MAC input sees it. The surrounding record
/// framing (reading/writing these five bytes on the wire) is external.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordHeader {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    pub length: Length,
}

impl RecordHeader {
    pub fn new(content_type: ContentType, version: ProtocolVersion, length: u16) -> Self {
        Self {
            content_type,
            version,
            length: fields::Uint16(length),
        }
    }

    // SSLv3 MACs over type || length only; the version field postdates it
    pub fn pack_without_version(&self) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&self.content_type.pack());
        v.extend_from_slice(&self.length.pack());
        v
    }
}

impl Pack for RecordHeader {
    fn empty() -> Self {
        Self {
            content_type: ContentType::empty(),
            version: ProtocolVersion::empty(),
            length: Length::empty(),
        }
    }

    fn pack(&self) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&self.content_type.pack());
        v.extend_from_slice(&self.version.pack());
        v.extend_from_slice(&self.length.pack());
        v
    }

    fn unpack(&mut self, v: &mut Vec<u8>) -> Result<Vec<u8>, errors::TLSError> {
        let mut v = self.content_type.unpack(v)?;
        let mut v = self.version.unpack(&mut v)?;
        let v = self.length.unpack(&mut v)?;
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use crate::pack::Pack;
    use crate::pack_unpack_inverse_test;
    use crate::record;

    pack_unpack_inverse_test!(
        record_header_pack_unpack_inverse_test,
        record::RecordHeader::new(record::ContentType::Handshake, record::ProtocolVersion::TLS1_2, 512)
    );

    #[test]
    fn versions_are_totally_ordered() {
        assert!(record::ProtocolVersion::SSL3 < record::ProtocolVersion::TLS1_0);
        assert!(record::ProtocolVersion::TLS1_0 < record::ProtocolVersion::TLS1_1);
        assert!(record::ProtocolVersion::TLS1_1 < record::ProtocolVersion::TLS1_2);
    }

    #[test]
    fn header_without_version_skips_version_bytes() {
        let header = record::RecordHeader::new(record::ContentType::ApplicationData, record::ProtocolVersion::SSL3, 5);
        assert_eq!(header.pack(), vec![23, 3, 0, 0, 5]);
        assert_eq!(header.pack_without_version(), vec![23, 0, 5]);
    }

    #[test]
    fn content_type_unpack_rejects_unknown() {
        let mut content_type = record::ContentType::empty();
        let mut i = [42].to_vec();
        assert!(content_type.unpack(&mut i).is_err());
    }
}
