use crate::cipher;
use crate::crypto;
use crate::errors;
use crate::fields;
use crate::handshake;
use crate::pack::Pack;
use crate::prng::Prng;
use crate::record::{ProtocolVersion, RecordHeader};
use crate::state::{self, Status};
use crate::transcript::TranscriptDigests;

use log::{debug, trace};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionEnd {
    Server,
    Client,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Tx,
    Rx,
}

/// The negotiated cipher suite and its derived parameters.
#[derive(Clone, Copy, Debug)]
pub struct Cipher {
    pub name: cipher::CipherName,
    pub parameters: cipher::CipherParameters,
}

/// Per-direction symmetric material carved out of the key block. The record
/// encryptor reads the key and IV; `make_digest` reads the MAC secret. Wiped
/// when replaced or dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CryptState {
    pub key: Vec<u8>,
    pub iv: Vec<u8>,
    pub mac_secret: Vec<u8>,
}

/// Per-direction record counter. Feeds every MAC computation and increments
/// once per successful digest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacState {
    pub sequence: u64,
}

// The server-random -> master-secret progression. Deriving the master secret
// without a server random is unrepresentable rather than asserted.
#[derive(Clone)]
enum SecretsProgress {
    Started,
    WithServerRandom(fields::Random),
    WithMasterSecret {
        server_random: fields::Random,
        master_secret: crypto::MasterSecret,
    },
}

/// Handshake-scoped state, present only between `start_handshake` and
/// `end_handshake`. Dropping it releases the transcript and every ephemeral
/// secret; the negotiated cipher and the installed direction keys survive in
/// the connection itself.
pub struct HandshakeState {
    pub client_version: ProtocolVersion,
    pub client_random: fields::Random,
    secrets: SecretsProgress,
    pub public_key: Option<Vec<u8>>,
    pub private_key: Option<Vec<u8>>,
    transcript: Option<TranscriptDigests>,
}

impl HandshakeState {
    fn new(client_version: ProtocolVersion, client_random: fields::Random) -> Self {
        Self {
            client_version,
            client_random,
            secrets: SecretsProgress::Started,
            public_key: None,
            private_key: None,
            transcript: None,
        }
    }
}

struct DirectionState {
    encrypted: bool,
    crypt_state: Option<CryptState>,
    mac_state: Option<MacState>,
}

impl DirectionState {
    fn new() -> Self {
        Self {
            encrypted: false,
            crypt_state: None,
            mac_state: None,
        }
    }
}

/// All the state the sending and receiving paths of one connection must agree
/// on. Owned by a single record-dispatch loop; operations apply in call order
/// and either complete or leave the state untouched.
pub struct ConnectionState {
    entity: ConnectionEnd,
    version: ProtocolVersion,
    status: Status,
    handshake: Option<HandshakeState>,
    cipher: Option<Cipher>,
    tx: DirectionState,
    rx: DirectionState,
    prng: Prng,
}

impl ConnectionState {
    pub fn new(entity: ConnectionEnd, prng: Prng) -> Self {
        Self {
            entity,
            version: ProtocolVersion::TLS1_0,
            status: Status::Init,
            handshake: None,
            cipher: None,
            tx: DirectionState::new(),
            rx: DirectionState::new(),
            prng,
        }
    }

    pub fn entity(&self) -> ConnectionEnd {
        self.entity
    }

    pub fn is_client(&self) -> bool {
        self.entity == ConnectionEnd::Client
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn cipher(&self) -> Option<&Cipher> {
        self.cipher.as_ref()
    }

    pub fn handshake_in_progress(&self) -> bool {
        self.handshake.is_some()
    }

    pub fn tx_encrypted(&self) -> bool {
        self.tx.encrypted
    }

    pub fn rx_encrypted(&self) -> bool {
        self.rx.encrypted
    }

    pub fn crypt_state(&self, direction: Direction) -> Option<&CryptState> {
        self.direction(direction).crypt_state.as_ref()
    }

    pub fn sequence(&self, direction: Direction) -> Option<u64> {
        self.direction(direction).mac_state.map(|m| m.sequence)
    }

    fn direction(&self, direction: Direction) -> &DirectionState {
        match direction {
            Direction::Tx => &self.tx,
            Direction::Rx => &self.rx,
        }
    }

    /// Advance the status machine on an incoming or outgoing handshake message.
    /// On a relation miss the status is left unchanged and the error carries
    /// what the dispatcher needs for an unexpected_message alert.
    pub fn update_status_hs(&mut self, msg_type: handshake::HandshakeType) -> Result<(), errors::TLSError> {
        match state::next_status(self.status, msg_type) {
            Some(next) => {
                trace!("status {:?} -> {:?} on {:?}", self.status, next, msg_type);
                self.status = next;
                Ok(())
            }
            None => Err(errors::TLSError::UnexpectedPacketError(
                format!("{:?}", self.status),
                format!("handshake:{:?}", msg_type),
            )),
        }
    }

    /// Advance the status machine on a ChangeCipherSpec; `sending` says whether
    /// this side is emitting the CCS or consuming the peer's.
    pub fn update_status_cc(&mut self, sending: bool) -> Result<(), errors::TLSError> {
        match state::next_status_change_cipher(self.is_client(), sending, self.status) {
            Some(next) => {
                trace!("status {:?} -> {:?} on changecipherspec", self.status, next);
                self.status = next;
                Ok(())
            }
            None => Err(errors::TLSError::UnexpectedPacketError(
                format!("{:?}", self.status),
                String::from("changecipherspec"),
            )),
        }
    }

    /// Run `action` for as long as the status satisfies `predicate`; the
    /// driver uses this to pump records until the handshake settles.
    pub fn while_status<P, F>(&mut self, predicate: P, mut action: F) -> Result<(), errors::TLSError>
    where
        P: Fn(Status) -> bool,
        F: FnMut(&mut ConnectionState) -> Result<(), errors::TLSError>,
    {
        while predicate(self.status) {
            action(self)?;
        }
        Ok(())
    }

    pub fn start_handshake(&mut self, client_version: ProtocolVersion, client_random: fields::Random) -> Result<(), errors::TLSError> {
        if self.handshake.is_some() {
            return Err(errors::TLSError::InternalError("start_handshake", "handshake already in progress"));
        }
        debug!("starting handshake, client version {:?}", client_version);
        self.handshake = Some(HandshakeState::new(client_version, client_random));
        Ok(())
    }

    /// Drop the handshake-scoped state. The negotiated cipher and version, the
    /// direction keys, the MAC counters, and the encryption flags all persist.
    pub fn end_handshake(&mut self) {
        debug!("ending handshake");
        self.handshake = None;
    }

    fn handshake_mut(&mut self, site: &'static str) -> Result<&mut HandshakeState, errors::TLSError> {
        self.handshake
            .as_mut()
            .ok_or(errors::TLSError::InternalError(site, "no handshake in progress"))
    }

    fn handshake_ref(&self, site: &'static str) -> Result<&HandshakeState, errors::TLSError> {
        self.handshake
            .as_ref()
            .ok_or(errors::TLSError::InternalError(site, "no handshake in progress"))
    }

    /// Feed raw bytes (handshake header included) into the running transcript.
    pub fn update_handshake_digest(&mut self, bytes: &[u8]) -> Result<(), errors::TLSError> {
        let handshake_state = self.handshake_mut("update_handshake_digest")?;
        handshake_state.transcript.get_or_insert_with(TranscriptDigests::new).update(bytes);
        Ok(())
    }

    /// Feed a parsed message into the transcript, re-encoding the 4-byte header
    /// the receiver no longer holds.
    pub fn update_handshake_digest_split(&mut self, msg_type: handshake::HandshakeType, body: &[u8]) -> Result<(), errors::TLSError> {
        let mut bytes = handshake::encode_header(msg_type, body.len())?;
        bytes.extend_from_slice(body);
        self.update_handshake_digest(&bytes)
    }

    pub fn set_server_random(&mut self, server_random: fields::Random) -> Result<(), errors::TLSError> {
        let handshake_state = self.handshake_mut("set_server_random")?;
        match handshake_state.secrets {
            SecretsProgress::Started => {
                handshake_state.secrets = SecretsProgress::WithServerRandom(server_random);
                Ok(())
            }
            _ => Err(errors::TLSError::InternalError("set_server_random", "server random already set")),
        }
    }

    /// Derive and install the 48-byte master secret from the key-exchange
    /// pre-master secret. Requires the server random.
    pub fn set_master_secret(&mut self, pre_master_secret: &[u8]) -> Result<(), errors::TLSError> {
        let version = self.version;
        let handshake_state = self.handshake_mut("set_master_secret")?;
        match handshake_state.secrets {
            SecretsProgress::WithServerRandom(server_random) => {
                let master_secret =
                    crypto::generate_master_secret(version, pre_master_secret, handshake_state.client_random, server_random)?;
                handshake_state.secrets = SecretsProgress::WithMasterSecret {
                    server_random,
                    master_secret,
                };
                Ok(())
            }
            SecretsProgress::Started => Err(errors::TLSError::InternalError("set_master_secret", "server random not set")),
            SecretsProgress::WithMasterSecret { .. } => {
                Err(errors::TLSError::InternalError("set_master_secret", "master secret already derived"))
            }
        }
    }

    /// Expand the master secret into the key block and carve it into the six
    /// per-direction pieces: client MAC secret, server MAC secret, client write
    /// key, server write key, client write IV, server write IV. Which half
    /// drives tx and which rx follows from this side's role. Both sequence
    /// counters restart at zero.
    pub fn set_key_block(&mut self) -> Result<(), errors::TLSError> {
        let cipher = self
            .cipher
            .ok_or(errors::TLSError::InternalError("set_key_block", "cipher not set"))?;
        let version = self.version;
        let entity = self.entity;
        let handshake_state = self.handshake_ref("set_key_block")?;
        let (server_random, master_secret) = match &handshake_state.secrets {
            SecretsProgress::WithMasterSecret {
                server_random,
                master_secret,
            } => (*server_random, master_secret),
            _ => return Err(errors::TLSError::InternalError("set_key_block", "master secret not derived")),
        };

        let parameters = cipher.parameters;
        let block_length = parameters.key_block_length();
        let mut key_block =
            crypto::generate_key_block(version, handshake_state.client_random, server_random, master_secret, block_length)?;
        if key_block.len() < block_length {
            return Err(errors::TLSError::InternalError("set_key_block", "key block too short to partition"));
        }

        let mut offset = 0;
        let mut take = |count: usize| {
            let piece = key_block[offset..offset + count].to_vec();
            offset += count;
            piece
        };
        let client_write_mac_secret = take(parameters.mac_key_length);
        let server_write_mac_secret = take(parameters.mac_key_length);
        let client_write_key = take(parameters.enc_key_length);
        let server_write_key = take(parameters.enc_key_length);
        let client_write_iv = take(parameters.fixed_iv_length);
        let server_write_iv = take(parameters.fixed_iv_length);

        let cst_client = CryptState {
            key: client_write_key,
            iv: client_write_iv,
            mac_secret: client_write_mac_secret,
        };
        let cst_server = CryptState {
            key: server_write_key,
            iv: server_write_iv,
            mac_secret: server_write_mac_secret,
        };
        let (tx_crypt, rx_crypt) = match entity {
            ConnectionEnd::Client => (cst_client, cst_server),
            ConnectionEnd::Server => (cst_server, cst_client),
        };
        key_block.zeroize();

        self.tx.crypt_state = Some(tx_crypt);
        self.rx.crypt_state = Some(rx_crypt);
        self.tx.mac_state = Some(MacState { sequence: 0 });
        self.rx.mac_state = Some(MacState { sequence: 0 });
        debug!("installed key material, {:?} side, {:?}", entity, version);
        Ok(())
    }

    pub fn set_public_key(&mut self, key: Vec<u8>) -> Result<(), errors::TLSError> {
        let handshake_state = self.handshake_mut("set_public_key")?;
        handshake_state.public_key = Some(key);
        Ok(())
    }

    pub fn set_private_key(&mut self, key: Vec<u8>) -> Result<(), errors::TLSError> {
        let handshake_state = self.handshake_mut("set_private_key")?;
        handshake_state.private_key = Some(key);
        Ok(())
    }

    pub fn set_cipher(&mut self, name: cipher::CipherName) -> Result<(), errors::TLSError> {
        self.cipher = Some(Cipher {
            name,
            parameters: cipher::parameters(name)?,
        });
        Ok(())
    }

    pub fn set_version(&mut self, version: ProtocolVersion) {
        self.version = version;
    }

    /// MAC one record: digest over sequence || header || content with the
    /// direction's secret, then advance the sequence. SSLv3 uses its own MAC
    /// and leaves the version out of the header bytes. A counter one step from
    /// wrapping refuses to run; the connection should already be gone.
    pub fn make_digest(&mut self, direction: Direction, header: &RecordHeader, content: &[u8]) -> Result<Vec<u8>, errors::TLSError> {
        let mac_algorithm = self
            .cipher
            .as_ref()
            .ok_or(errors::TLSError::InternalError("make_digest", "cipher not set"))?
            .parameters
            .mac_algorithm;
        let direction_state = match direction {
            Direction::Tx => &mut self.tx,
            Direction::Rx => &mut self.rx,
        };
        let crypt_state = direction_state
            .crypt_state
            .as_ref()
            .ok_or(errors::TLSError::InternalError("make_digest", "key material not installed"))?;
        let mac_state = direction_state
            .mac_state
            .as_mut()
            .ok_or(errors::TLSError::InternalError("make_digest", "MAC state not installed"))?;
        if mac_state.sequence == u64::MAX {
            return Err(errors::TLSError::SequenceNumberOverflowError);
        }

        let mut msg = fields::Uint64(mac_state.sequence).pack();
        let digest = if self.version < ProtocolVersion::TLS1_0 {
            msg.extend_from_slice(&header.pack_without_version());
            msg.extend_from_slice(content);
            crypto::mac_ssl3(mac_algorithm, &crypt_state.mac_secret, &msg)?
        } else {
            msg.extend_from_slice(&header.pack());
            msg.extend_from_slice(content);
            crypto::hmac(mac_algorithm, &crypt_state.mac_secret, &msg)?
        };
        mac_state.sequence += 1;
        Ok(digest)
    }

    /// Engage encryption on the transmit path. One-way: records sent from here
    /// on are protected, and there is no way back inside this connection.
    pub fn switch_tx_encryption(&mut self) -> Result<(), errors::TLSError> {
        if self.tx.crypt_state.is_none() || self.tx.mac_state.is_none() {
            return Err(errors::TLSError::InternalError("switch_tx_encryption", "key material not installed"));
        }
        self.tx.encrypted = true;
        Ok(())
    }

    pub fn switch_rx_encryption(&mut self) -> Result<(), errors::TLSError> {
        if self.rx.crypt_state.is_none() || self.rx.mac_state.is_none() {
            return Err(errors::TLSError::InternalError("switch_rx_encryption", "key material not installed"));
        }
        self.rx.encrypted = true;
        Ok(())
    }

    /// Finished verify_data for the given side, from a snapshot of the current
    /// transcript. The live digests are untouched, so the peer's Finished can
    /// still be hashed in afterwards.
    pub fn get_handshake_digest(&self, for_client: bool) -> Result<Vec<u8>, errors::TLSError> {
        let handshake_state = self.handshake_ref("get_handshake_digest")?;
        let transcript = handshake_state
            .transcript
            .as_ref()
            .ok_or(errors::TLSError::InternalError("get_handshake_digest", "transcript never updated"))?;
        let master_secret = match &handshake_state.secrets {
            SecretsProgress::WithMasterSecret { master_secret, .. } => master_secret,
            _ => return Err(errors::TLSError::InternalError("get_handshake_digest", "master secret not derived")),
        };
        if for_client {
            crypto::generate_client_finished(self.version, master_secret, transcript)
        } else {
            crypto::generate_server_finished(self.version, master_secret, transcript)
        }
    }

    /// The one path to randomness: hand the current PRNG to `f`, install the
    /// successor it returns, keep the drawn value.
    pub fn with_prng<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(Prng) -> (T, Prng),
    {
        let (value, next) = f(self.prng.clone());
        self.prng = next;
        value
    }
}
