use crate::errors;
use crate::fields;

use byteorder::{BigEndian, ByteOrder};

pub trait Pack {
    fn empty() -> Self;
    fn len(&self) -> usize {
        self.pack().len()
    }
    fn pack(&self) -> Vec<u8>;
    fn unpack(&mut self, v: &mut Vec<u8>) -> Result<Vec<u8>, errors::TLSError>;
}

impl Pack for fields::Uint16 {
    fn empty() -> Self {
        fields::Uint16(0)
    }

    fn pack(&self) -> Vec<u8> {
        let mut v = Vec::new();
        let mut bytes: [u8; 2] = [0; 2];
        BigEndian::write_u16(&mut bytes, self.0);
        v.extend_from_slice(&bytes);
        v
    }

    fn unpack(&mut self, v: &mut Vec<u8>) -> Result<Vec<u8>, errors::TLSError> {
        match v.len() {
            0..=1 => Err(errors::TLSError::InvalidLengthError),
            _ => {
                let rest: Vec<u8> = v.drain(2..).collect();
                self.0 = u16::from_be_bytes([v[0], v[1]]);
                Ok(rest)
            }
        }
    }
}

impl Pack for fields::Uint24 {
    fn empty() -> Self {
        fields::Uint24([0; 3])
    }

    fn pack(&self) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&self.0);
        v
    }

    fn unpack(&mut self, v: &mut Vec<u8>) -> Result<Vec<u8>, errors::TLSError> {
        match v.len() {
            0..=2 => Err(errors::TLSError::InvalidLengthError),
            _ => {
                let rest: Vec<u8> = v.drain(3..).collect();
                self.0 = fields::uint24_from_be_bytes([v[0], v[1], v[2]]).0;
                Ok(rest)
            }
        }
    }
}

impl Pack for fields::Uint64 {
    fn empty() -> Self {
        fields::Uint64(0)
    }

    fn pack(&self) -> Vec<u8> {
        let mut v = Vec::new();
        let mut bytes: [u8; 8] = [0; 8];
        BigEndian::write_u64(&mut bytes, self.0);
        v.extend_from_slice(&bytes);
        v
    }

    fn unpack(&mut self, v: &mut Vec<u8>) -> Result<Vec<u8>, errors::TLSError> {
        match v.len() {
            0..=7 => Err(errors::TLSError::InvalidLengthError),
            _ => {
                let rest: Vec<u8> = v.drain(8..).collect();
                self.0 = BigEndian::read_u64(&v[..8]);
                Ok(rest)
            }
        }
    }
}

impl Pack for fields::Random {
    fn empty() -> Self {
        fields::Random([0; 32])
    }

    fn pack(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn unpack(&mut self, v: &mut Vec<u8>) -> Result<Vec<u8>, errors::TLSError> {
        match v.len() {
            0..=31 => Err(errors::TLSError::InvalidLengthError),
            _ => {
                let rest: Vec<u8> = v.drain(32..).collect();
                let mut random = [0; 32];
                random.copy_from_slice(&v[..32]);
                self.0 = random;
                Ok(rest)
            }
        }
    }
}
