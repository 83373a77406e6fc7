use rusttls::cipher;
use rusttls::crypto;
use rusttls::fields;
use rusttls::handshake::{self, HandshakeType};
use rusttls::prng::Prng;
use rusttls::record::{ContentType, ProtocolVersion, RecordHeader};
use rusttls::session::{ConnectionEnd, ConnectionState, Direction};
use rusttls::state::{HandshakeStep, Status};

const CLIENT_RANDOM: fields::Random = fields::Random([0x11; 32]);
const SERVER_RANDOM: fields::Random = fields::Random([0x22; 32]);
const PRE_MASTER: [u8; 48] = [0x33; 48];

fn connection(entity: ConnectionEnd) -> ConnectionState {
    ConnectionState::new(entity, Prng::from_seed([0x44; 32]))
}

/// Drive a connection through hello exchange and key derivation, feeding the
/// transcript the way a dispatcher would.
fn negotiated(entity: ConnectionEnd, version: ProtocolVersion, cipher_name: cipher::CipherName) -> ConnectionState {
    let mut conn = connection(entity);
    conn.start_handshake(version, CLIENT_RANDOM).expect("start_handshake failed");
    conn.set_version(version);

    conn.update_status_hs(HandshakeType::ClientHello).expect("ClientHello failed");
    conn.update_handshake_digest_split(HandshakeType::ClientHello, b"client hello body")
        .expect("transcript update failed");
    conn.update_status_hs(HandshakeType::ServerHello).expect("ServerHello failed");
    conn.update_handshake_digest_split(HandshakeType::ServerHello, b"server hello body")
        .expect("transcript update failed");
    conn.set_server_random(SERVER_RANDOM).expect("set_server_random failed");
    conn.set_cipher(cipher_name).expect("set_cipher failed");

    conn.update_status_hs(HandshakeType::Certificate).expect("Certificate failed");
    conn.update_handshake_digest_split(HandshakeType::Certificate, b"certificate body")
        .expect("transcript update failed");
    conn.set_public_key(vec![0x55; 64]).expect("set_public_key failed");

    conn.update_status_hs(HandshakeType::ServerHelloDone).expect("ServerHelloDone failed");
    conn.update_handshake_digest_split(HandshakeType::ServerHelloDone, b"")
        .expect("transcript update failed");

    conn.update_status_hs(HandshakeType::ClientKeyExchange).expect("ClientKeyExchange failed");
    conn.update_handshake_digest_split(HandshakeType::ClientKeyExchange, b"client key exchange body")
        .expect("transcript update failed");
    conn.set_master_secret(&PRE_MASTER).expect("set_master_secret failed");
    conn.set_key_block().expect("set_key_block failed");
    conn
}

#[test]
fn client_full_handshake_reaches_established() {
    let mut conn = connection(ConnectionEnd::Client);
    conn.start_handshake(ProtocolVersion::TLS1_0, CLIENT_RANDOM).expect("start_handshake failed");

    conn.update_status_hs(HandshakeType::ClientHello).expect("ClientHello failed");
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ClientHello));

    conn.update_status_hs(HandshakeType::ServerHello).expect("ServerHello failed");
    conn.update_status_hs(HandshakeType::Certificate).expect("Certificate failed");
    conn.update_status_hs(HandshakeType::ServerHelloDone).expect("ServerHelloDone failed");
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ServerHelloDone));

    conn.set_server_random(SERVER_RANDOM).expect("set_server_random failed");
    conn.set_public_key(vec![0x55; 64]).expect("set_public_key failed");
    conn.set_cipher(cipher::TLS_RSA_WITH_AES_128_CBC_SHA).expect("set_cipher failed");

    conn.update_status_hs(HandshakeType::ClientKeyExchange).expect("ClientKeyExchange failed");
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ClientKeyExchange));

    conn.set_master_secret(&PRE_MASTER).expect("set_master_secret failed");
    conn.set_key_block().expect("set_key_block failed");

    // our own ChangeCipherSpec engages the transmit side
    conn.update_status_cc(true).expect("sending ChangeCipherSpec failed");
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ClientChangeCipher));
    conn.switch_tx_encryption().expect("switch_tx_encryption failed");
    assert!(conn.tx_encrypted());
    assert!(!conn.rx_encrypted());

    conn.update_status_hs(HandshakeType::Finished).expect("client Finished failed");
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ClientFinished));

    // the peer's ChangeCipherSpec engages the receive side
    conn.update_status_cc(false).expect("receiving ChangeCipherSpec failed");
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ServerChangeCipher));
    conn.switch_rx_encryption().expect("switch_rx_encryption failed");

    conn.update_status_hs(HandshakeType::Finished).expect("server Finished failed");
    assert_eq!(conn.status(), Status::Established);

    conn.end_handshake();
    assert!(!conn.handshake_in_progress());
    assert!(conn.tx_encrypted() && conn.rx_encrypted());
}

#[test]
fn server_sees_the_mirrored_ccs_timeline() {
    let mut conn = negotiated(ConnectionEnd::Server, ProtocolVersion::TLS1_0, cipher::TLS_RSA_WITH_AES_128_CBC_SHA);
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ClientKeyExchange));

    // the server receives the client's CCS
    conn.update_status_cc(false).expect("receiving client ChangeCipherSpec failed");
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ClientChangeCipher));
    conn.switch_rx_encryption().expect("switch_rx_encryption failed");

    conn.update_status_hs(HandshakeType::Finished).expect("client Finished failed");
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ClientFinished));

    // then sends its own
    conn.update_status_cc(true).expect("sending server ChangeCipherSpec failed");
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ServerChangeCipher));
    conn.switch_tx_encryption().expect("switch_tx_encryption failed");

    conn.update_status_hs(HandshakeType::Finished).expect("server Finished failed");
    assert_eq!(conn.status(), Status::Established);
}

#[test]
fn peers_agree_on_record_macs_across_versions() {
    for version in &[ProtocolVersion::SSL3, ProtocolVersion::TLS1_0, ProtocolVersion::TLS1_2] {
        let mut client = negotiated(ConnectionEnd::Client, *version, cipher::TLS_RSA_WITH_AES_128_CBC_SHA);
        let mut server = negotiated(ConnectionEnd::Server, *version, cipher::TLS_RSA_WITH_AES_128_CBC_SHA);

        let header = RecordHeader::new(ContentType::ApplicationData, *version, 11);
        let content = b"hello world";

        // client->server records: the client MACs on tx, the server checks on rx
        let sent = client.make_digest(Direction::Tx, &header, content).expect("client make_digest failed");
        let checked = server.make_digest(Direction::Rx, &header, content).expect("server make_digest failed");
        assert_eq!(sent, checked, "client->server MAC mismatch under {:?}", version);

        // server->client records use the other half of the key block
        let replied = server.make_digest(Direction::Tx, &header, content).expect("server make_digest failed");
        let verified = client.make_digest(Direction::Rx, &header, content).expect("client make_digest failed");
        assert_eq!(replied, verified, "server->client MAC mismatch under {:?}", version);
        assert_ne!(sent, replied, "directions must not share MAC secrets");

        // and their Finished payloads line up too
        let client_verify = client.get_handshake_digest(true).expect("client verify_data failed");
        let expected_by_server = server.get_handshake_digest(true).expect("server verify_data failed");
        assert_eq!(client_verify, expected_by_server);
        let expected_length = if *version == ProtocolVersion::SSL3 { 36 } else { 12 };
        assert_eq!(client_verify.len(), expected_length);
    }
}

#[test]
fn key_block_halves_follow_the_role() {
    let cipher_name = cipher::TLS_RSA_WITH_AES_128_CBC_SHA;
    let parameters = cipher::parameters(cipher_name).expect("parameters failed");
    assert_eq!(parameters.key_block_length(), 104);

    let master_secret = crypto::generate_master_secret(ProtocolVersion::TLS1_0, &PRE_MASTER, CLIENT_RANDOM, SERVER_RANDOM)
        .expect("master secret failed");
    let key_block = crypto::generate_key_block(ProtocolVersion::TLS1_0, CLIENT_RANDOM, SERVER_RANDOM, &master_secret, 104)
        .expect("key block failed");

    let client = negotiated(ConnectionEnd::Client, ProtocolVersion::TLS1_0, cipher_name);
    let tx = client.crypt_state(Direction::Tx).expect("tx crypt state missing");
    let rx = client.crypt_state(Direction::Rx).expect("rx crypt state missing");
    assert_eq!(tx.mac_secret, &key_block[0..20]);
    assert_eq!(rx.mac_secret, &key_block[20..40]);
    assert_eq!(tx.key, &key_block[40..56]);
    assert_eq!(rx.key, &key_block[56..72]);
    assert_eq!(tx.iv, &key_block[72..88]);
    assert_eq!(rx.iv, &key_block[88..104]);

    // the server reads the same block with tx and rx swapped
    let server = negotiated(ConnectionEnd::Server, ProtocolVersion::TLS1_0, cipher_name);
    let tx = server.crypt_state(Direction::Tx).expect("tx crypt state missing");
    let rx = server.crypt_state(Direction::Rx).expect("rx crypt state missing");
    assert_eq!(tx.mac_secret, &key_block[20..40]);
    assert_eq!(rx.mac_secret, &key_block[0..20]);
    assert_eq!(tx.key, &key_block[56..72]);
    assert_eq!(rx.key, &key_block[40..56]);
}

#[test]
fn split_and_raw_transcript_updates_are_equivalent() {
    let body = b"client hello body";

    let mut split = negotiated(ConnectionEnd::Client, ProtocolVersion::TLS1_0, cipher::TLS_RSA_WITH_AES_128_CBC_SHA);
    split
        .update_handshake_digest_split(HandshakeType::Finished, body)
        .expect("split update failed");

    let mut raw = negotiated(ConnectionEnd::Client, ProtocolVersion::TLS1_0, cipher::TLS_RSA_WITH_AES_128_CBC_SHA);
    let mut bytes = handshake::encode_header(HandshakeType::Finished, body.len()).expect("encoding header failed");
    bytes.extend_from_slice(body);
    raw.update_handshake_digest(&bytes).expect("raw update failed");

    assert_eq!(
        split.get_handshake_digest(true).expect("verify_data failed"),
        raw.get_handshake_digest(true).expect("verify_data failed")
    );
}

#[test]
fn sequence_values_feed_the_mac_input() {
    let mut conn = negotiated(ConnectionEnd::Client, ProtocolVersion::TLS1_0, cipher::TLS_RSA_WITH_AES_128_CBC_SHA);
    let mac_secret = conn.crypt_state(Direction::Tx).expect("tx crypt state missing").mac_secret.clone();
    let header = RecordHeader::new(ContentType::ApplicationData, ProtocolVersion::TLS1_0, 4);
    let content = b"ping";

    for sequence in 0u64..4 {
        let digest = conn.make_digest(Direction::Tx, &header, content).expect("make_digest failed");

        // recompute with the sequence number spelled out
        let mut msg = sequence.to_be_bytes().to_vec();
        msg.extend_from_slice(&[23, 3, 1, 0, 4]); // ApplicationData, version 3.1, length 4
        msg.extend_from_slice(content);
        let expected = crypto::hmac(cipher::MACAlgorithm::HmacSha1, &mac_secret, &msg).expect("HMAC failed");
        assert_eq!(digest, expected, "MAC input did not embed sequence {}", sequence);
    }
}

#[test]
fn while_status_pumps_until_predicate_clears() {
    let mut conn = connection(ConnectionEnd::Client);
    conn.start_handshake(ProtocolVersion::TLS1_0, CLIENT_RANDOM).expect("start_handshake failed");

    let mut pumped = 0;
    conn.while_status(
        |status| status == Status::Init,
        |conn| {
            pumped += 1;
            conn.update_status_hs(HandshakeType::ClientHello)
        },
    )
    .expect("while_status failed");
    assert_eq!(pumped, 1);
    assert_eq!(conn.status(), Status::Handshake(HandshakeStep::ClientHello));
}

#[test]
fn hello_request_is_only_welcome_when_established() {
    let mut conn = connection(ConnectionEnd::Client);
    assert!(conn.update_status_hs(HandshakeType::HelloRequest).is_err());

    let mut conn = negotiated(ConnectionEnd::Client, ProtocolVersion::TLS1_0, cipher::TLS_RSA_WITH_AES_128_CBC_SHA);
    conn.update_status_cc(true).expect("sending ChangeCipherSpec failed");
    conn.update_status_hs(HandshakeType::Finished).expect("client Finished failed");
    conn.update_status_cc(false).expect("receiving ChangeCipherSpec failed");
    conn.update_status_hs(HandshakeType::Finished).expect("server Finished failed");
    conn.end_handshake();

    conn.update_status_hs(HandshakeType::HelloRequest).expect("HelloRequest failed");
    assert_eq!(conn.status(), Status::HandshakeRequested);
}
