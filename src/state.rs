use crate::handshake::HandshakeType;

/// The twelve positions a handshake can occupy between hello and completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandshakeStep {
    ClientHello,
    ServerHello,
    ServerCertificate,
    ServerKeyExchange,
    ServerCertificateRequest,
    ServerHelloDone,
    ClientCertificate,
    ClientKeyExchange,
    ClientCertificateVerify,
    ClientChangeCipher,
    ClientFinished,
    ServerChangeCipher,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Init,
    HandshakeRequested,
    Handshake(HandshakeStep),
    Established,
}

/// One row of the handshake transition relation: an incoming message type, the
/// status it leads to, and the statuses it is permitted from.
pub struct Transition {
    pub message: HandshakeType,
    pub next: Status,
    pub from: &'static [Status],
}

/// The transition relation, in lookup order: the first row matching both the
/// incoming type and the current status wins. Certificate appears twice and is
/// disambiguated by whether the server half of the exchange has completed.
pub static TRANSITIONS: [Transition; 12] = [
    Transition {
        message: HandshakeType::HelloRequest,
        next: Status::HandshakeRequested,
        from: &[Status::Established],
    },
    Transition {
        message: HandshakeType::ClientHello,
        next: Status::Handshake(HandshakeStep::ClientHello),
        from: &[Status::Init, Status::HandshakeRequested],
    },
    Transition {
        message: HandshakeType::ServerHello,
        next: Status::Handshake(HandshakeStep::ServerHello),
        from: &[Status::Handshake(HandshakeStep::ClientHello)],
    },
    Transition {
        message: HandshakeType::Certificate,
        next: Status::Handshake(HandshakeStep::ServerCertificate),
        from: &[Status::Handshake(HandshakeStep::ServerHello)],
    },
    Transition {
        message: HandshakeType::ServerKeyExchange,
        next: Status::Handshake(HandshakeStep::ServerKeyExchange),
        from: &[
            Status::Handshake(HandshakeStep::ServerHello),
            Status::Handshake(HandshakeStep::ServerCertificate),
        ],
    },
    Transition {
        message: HandshakeType::CertificateRequest,
        next: Status::Handshake(HandshakeStep::ServerCertificateRequest),
        from: &[
            Status::Handshake(HandshakeStep::ServerHello),
            Status::Handshake(HandshakeStep::ServerCertificate),
            Status::Handshake(HandshakeStep::ServerKeyExchange),
        ],
    },
    Transition {
        message: HandshakeType::ServerHelloDone,
        next: Status::Handshake(HandshakeStep::ServerHelloDone),
        from: &[
            Status::Handshake(HandshakeStep::ServerHello),
            Status::Handshake(HandshakeStep::ServerCertificate),
            Status::Handshake(HandshakeStep::ServerKeyExchange),
            Status::Handshake(HandshakeStep::ServerCertificateRequest),
        ],
    },
    Transition {
        message: HandshakeType::Certificate,
        next: Status::Handshake(HandshakeStep::ClientCertificate),
        from: &[Status::Handshake(HandshakeStep::ServerHelloDone)],
    },
    Transition {
        message: HandshakeType::ClientKeyExchange,
        next: Status::Handshake(HandshakeStep::ClientKeyExchange),
        from: &[
            Status::Handshake(HandshakeStep::ServerHelloDone),
            Status::Handshake(HandshakeStep::ClientCertificate),
        ],
    },
    Transition {
        message: HandshakeType::CertificateVerify,
        next: Status::Handshake(HandshakeStep::ClientCertificateVerify),
        from: &[Status::Handshake(HandshakeStep::ClientKeyExchange)],
    },
    Transition {
        message: HandshakeType::Finished,
        next: Status::Handshake(HandshakeStep::ClientFinished),
        from: &[Status::Handshake(HandshakeStep::ClientChangeCipher)],
    },
    Transition {
        message: HandshakeType::Finished,
        next: Status::Established,
        from: &[Status::Handshake(HandshakeStep::ServerChangeCipher)],
    },
];

/// Look up the status a handshake message moves the connection to, or `None`
/// when the message is not acceptable from the current status.
pub fn next_status(current: Status, message: HandshakeType) -> Option<Status> {
    TRANSITIONS
        .iter()
        .find(|t| t.message == message && t.from.contains(&current))
        .map(|t| t.next)
}

/// The ChangeCipherSpec transition. The client's CCS (sent by a client, or
/// received by a server) closes the client key exchange; the server's CCS is
/// only valid once the client Finished has been seen.
pub fn next_status_change_cipher(is_client: bool, sending: bool, current: Status) -> Option<Status> {
    match (is_client == sending, current) {
        (true, Status::Handshake(HandshakeStep::ClientKeyExchange)) => Some(Status::Handshake(HandshakeStep::ClientChangeCipher)),
        (true, Status::Handshake(HandshakeStep::ClientCertificateVerify)) => {
            Some(Status::Handshake(HandshakeStep::ClientChangeCipher))
        }
        (false, Status::Handshake(HandshakeStep::ClientFinished)) => Some(Status::Handshake(HandshakeStep::ServerChangeCipher)),
        _ => None,
    }
}
