//! Message schemas exchanged between client and server.

mod messages;

pub use messages::{
    register_messages, AuthRequest, AuthResponse, MessageHeader, PingRequest, PongResponse,
    AUTH_REQUEST, AUTH_RESPONSE, PING_REQUEST, PONG_RESPONSE,
};
