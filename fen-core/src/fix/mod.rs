//! FIX 4.4 wire codec and session engine.
//!
//! [`message`] holds the tag=value frame codec (body length, modulo-256
//! checksum), [`session`] the sequence-numbered logon/logout state machine
//! with type-keyed dispatch, [`convert`] the market-data/trade converters,
//! and [`adapter`] an exchange-facing facade over the session.

pub mod adapter;
pub mod convert;
pub mod message;
pub mod session;

pub use adapter::FixProtocolAdapter;
pub use message::{msg_type, tags, FixMessage, SOH};
pub use session::{FixSession, SessionError};
