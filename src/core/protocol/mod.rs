// src/core/protocol/mod.rs

pub mod frame;
pub mod reply;
pub mod request;

pub use frame::{ClientCodec, MAX_BODY_SIZE, MAX_LIST_ELEMENTS, ServerCodec};
pub use reply::{BatchReply, BatchStatus, DelJobStatus, PreemptEntry, ReplyBody, sort_status};
pub use request::{
    BatchRequest, MsgFile, PROTOCOL_VERSION, RequestType, RunMode, ShutManner, StatKind,
};
