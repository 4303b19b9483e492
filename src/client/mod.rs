// src/client/mod.rs

//! The client side of the batch protocol: connection management, the
//! swappable dispatch table, and the per-call façade.

pub mod api;
pub mod connection;
pub mod dispatch;
pub mod locate;

pub use api::Ifl;
pub use connection::{
    ConnHandle, attributes_in_error, connect, connect_extend, disconnect, geterrmsg, geterrno,
};
pub use dispatch::{Dispatch, WireDispatch};
