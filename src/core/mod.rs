// src/core/mod.rs

//! The central module containing the shared data model of the batch
//! protocol: attributes and their catalogs, the wire codec, the verifier
//! engine, and the crate-wide error type.

pub mod attrs;
pub mod ecl;
pub mod errors;
pub mod protocol;

pub use attrs::{AttrOp, Attrl, BatchOp, MgrCmd, MgrObj};
pub use errors::{BatchError, ErrCode};
pub use protocol::{BatchReply, BatchRequest, BatchStatus};
