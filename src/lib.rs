mod collections;
pub mod config;
pub mod network;
pub mod questions;
pub mod session;
pub mod source;
pub mod storage;
pub mod trivia;
pub mod users;

pub use network::Network;
pub use trivia::Trivia;

/// Connections are told apart by the address of the peer.
pub type ConnId = std::net::SocketAddr;
pub type QuestionId = u32;

mod prelude {
    pub(crate) use crate::collections::*;
    pub(crate) use crate::network::{wire, Inbox, Response};
    pub(crate) use crate::users::UserRecords;
    pub(crate) use crate::{ConnId, QuestionId};
    pub(crate) use std::collections::{BTreeMap, BTreeSet};
    pub(crate) use std::io;
}
