use byteorder::{BigEndian, ByteOrder};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Uint16(pub u16);

// In network order (Big Endian)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uint24(pub [u8; 3]);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Uint64(pub u64);

/// The 32-byte random of a ClientHello/ServerHello, opaque to the state core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Random(pub [u8; 32]);

pub fn uint24_to_u32(i: Uint24) -> u32 {
    BigEndian::read_u24(&i.0)
}

pub fn uint24_from_u32(i: u32) -> Uint24 {
    let mut buf = [0; 3];
    BigEndian::write_u24(&mut buf, i);
    Uint24(buf)
}

pub fn uint24_from_be_bytes(bytes: [u8; 3]) -> Uint24 {
    Uint24(bytes)
}
