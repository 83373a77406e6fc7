#[macro_use]
extern crate enum_primitive_derive;
extern crate num_traits;

pub mod cipher;
pub mod crypto;
pub mod errors;
pub mod fields;
pub mod handshake;
pub mod pack;
pub mod prng;
pub mod record;
pub mod session;
pub mod state;
pub mod transcript;
