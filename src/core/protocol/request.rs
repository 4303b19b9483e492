// src/core/protocol/request.rs

//! All batch request kinds and their body encoding. One enum variant per
//! request; the façade builds these, the codec frames them.

use crate::core::attrs::{AttrOp, Attrl, BatchOp, MgrCmd, MgrObj};
use crate::core::errors::BatchError;
use crate::core::protocol::frame::{FieldReader, put_opt_str, put_str};
use bitflags::bitflags;
use bytes::{BufMut, BytesMut};
use strum_macros::FromRepr;

/// The protocol revision carried in every request header.
pub const PROTOCOL_VERSION: u16 = 2;

/// Wire tags for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum RequestType {
    Connect = 0,
    Disconnect = 1,
    Manager = 2,
    Status = 3,
    Submit = 4,
    SubmitResv = 5,
    ModifyResv = 6,
    DeleteJob = 7,
    DeleteResv = 8,
    DeleteJobList = 9,
    Signal = 10,
    MessageJob = 11,
    Hold = 12,
    Release = 13,
    RunJob = 14,
    AsyRunJob = 15,
    AsyRunJobAck = 16,
    RerunJob = 17,
    MoveJob = 18,
    LocateJob = 19,
    AlterJob = 20,
    AsyAlterJob = 21,
    OrderJob = 22,
    ReleaseNodes = 23,
    PreemptJobs = 24,
    ConfirmResv = 25,
    RegisterSched = 26,
    Terminate = 27,
}

/// Which object class a Status request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum StatKind {
    Job = 0,
    Queue = 1,
    Node = 2,
    Server = 3,
    Sched = 4,
    Resv = 5,
    Hook = 6,
    Resource = 7,
}

bitflags! {
    /// Destination file(s) of a MessageJob request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MsgFile: u8 {
        const ERR = 1;
        const OUT = 2;
    }
}

/// How a run request behaves: synchronous, fire-and-forget, or asynchronous
/// with a placement acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Sync,
    Async,
    AsyncAck,
}

/// Server shutdown manners for Terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRepr)]
#[repr(u8)]
pub enum ShutManner {
    #[default]
    Immediate = 0,
    Delay = 1,
    Quick = 2,
}

/// One batch request, fully built before the codec sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchRequest {
    Connect {
        user: String,
        extend: Option<String>,
    },
    Disconnect,
    Manager {
        cmd: MgrCmd,
        obj: MgrObj,
        name: String,
        attrs: Vec<AttrOp>,
        extend: Option<String>,
    },
    Status {
        kind: StatKind,
        id: String,
        filter: Vec<Attrl>,
        extend: Option<String>,
    },
    Submit {
        attrs: Vec<AttrOp>,
        script: String,
        extend: Option<String>,
    },
    SubmitResv {
        attrs: Vec<AttrOp>,
        extend: Option<String>,
    },
    ModifyResv {
        id: String,
        attrs: Vec<AttrOp>,
        extend: Option<String>,
    },
    DeleteJob {
        id: String,
        extend: Option<String>,
    },
    DeleteResv {
        id: String,
        extend: Option<String>,
    },
    DeleteJobList {
        ids: Vec<String>,
        extend: Option<String>,
    },
    Signal {
        id: String,
        signal: String,
        extend: Option<String>,
    },
    MessageJob {
        id: String,
        to: MsgFile,
        text: String,
        extend: Option<String>,
    },
    Hold {
        id: String,
        hold_types: String,
        extend: Option<String>,
    },
    Release {
        id: String,
        hold_types: String,
        extend: Option<String>,
    },
    RunJob {
        id: String,
        location: String,
        mode: RunMode,
        extend: Option<String>,
    },
    RerunJob {
        id: String,
        extend: Option<String>,
    },
    MoveJob {
        id: String,
        destination: String,
        extend: Option<String>,
    },
    LocateJob {
        id: String,
        extend: Option<String>,
    },
    AlterJob {
        id: String,
        attrs: Vec<AttrOp>,
        asynchronous: bool,
        extend: Option<String>,
    },
    OrderJob {
        id1: String,
        id2: String,
        extend: Option<String>,
    },
    ReleaseNodes {
        id: String,
        node_list: String,
        extend: Option<String>,
    },
    PreemptJobs {
        ids: Vec<String>,
    },
    ConfirmResv {
        id: String,
        location: String,
        start: u64,
        extend: Option<String>,
    },
    RegisterSched {
        sched_id: String,
    },
    Terminate {
        manner: ShutManner,
        extend: Option<String>,
    },
}

fn put_attrops(dst: &mut BytesMut, attrs: &[AttrOp]) {
    dst.put_u32(attrs.len() as u32);
    for a in attrs {
        put_str(dst, &a.name);
        put_str(dst, a.resource.as_deref().unwrap_or(""));
        put_str(dst, &a.value);
        dst.put_u8(a.op as u8);
    }
}

fn put_attrls(dst: &mut BytesMut, attrs: &[Attrl]) {
    dst.put_u32(attrs.len() as u32);
    for a in attrs {
        put_str(dst, &a.name);
        put_str(dst, a.resource.as_deref().unwrap_or(""));
        put_str(dst, &a.value);
        // Reading nodes carry a zeroed op slot for layout compatibility.
        dst.put_u8(0);
    }
}

fn put_ids(dst: &mut BytesMut, ids: &[String]) {
    dst.put_u32(ids.len() as u32);
    for id in ids {
        put_str(dst, id);
    }
}

pub(crate) fn read_attrops(rd: &mut FieldReader<'_>) -> Result<Vec<AttrOp>, BatchError> {
    let n = rd.count()?;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let name = rd.str_field()?;
        let resource = rd.str_field()?;
        let value = rd.str_field()?;
        let raw_op = rd.u8()?;
        let op = BatchOp::from_repr(raw_op)
            .ok_or_else(|| BatchError::Protocol(format!("bad attribute op {raw_op}")))?;
        out.push(AttrOp {
            name,
            resource: (!resource.is_empty()).then_some(resource),
            value,
            op,
        });
    }
    Ok(out)
}

pub(crate) fn read_attrls(rd: &mut FieldReader<'_>) -> Result<Vec<Attrl>, BatchError> {
    let n = rd.count()?;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let name = rd.str_field()?;
        let resource = rd.str_field()?;
        let value = rd.str_field()?;
        let _op = rd.u8()?;
        out.push(Attrl {
            name,
            resource: (!resource.is_empty()).then_some(resource),
            value,
        });
    }
    Ok(out)
}

fn read_ids(rd: &mut FieldReader<'_>) -> Result<Vec<String>, BatchError> {
    let n = rd.count()?;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(rd.str_field()?);
    }
    Ok(out)
}

impl BatchRequest {
    /// The wire tag for this request.
    pub fn request_type(&self) -> RequestType {
        match self {
            BatchRequest::Connect { .. } => RequestType::Connect,
            BatchRequest::Disconnect => RequestType::Disconnect,
            BatchRequest::Manager { .. } => RequestType::Manager,
            BatchRequest::Status { .. } => RequestType::Status,
            BatchRequest::Submit { .. } => RequestType::Submit,
            BatchRequest::SubmitResv { .. } => RequestType::SubmitResv,
            BatchRequest::ModifyResv { .. } => RequestType::ModifyResv,
            BatchRequest::DeleteJob { .. } => RequestType::DeleteJob,
            BatchRequest::DeleteResv { .. } => RequestType::DeleteResv,
            BatchRequest::DeleteJobList { .. } => RequestType::DeleteJobList,
            BatchRequest::Signal { .. } => RequestType::Signal,
            BatchRequest::MessageJob { .. } => RequestType::MessageJob,
            BatchRequest::Hold { .. } => RequestType::Hold,
            BatchRequest::Release { .. } => RequestType::Release,
            BatchRequest::RunJob { mode, .. } => match mode {
                RunMode::Sync => RequestType::RunJob,
                RunMode::Async => RequestType::AsyRunJob,
                RunMode::AsyncAck => RequestType::AsyRunJobAck,
            },
            BatchRequest::RerunJob { .. } => RequestType::RerunJob,
            BatchRequest::MoveJob { .. } => RequestType::MoveJob,
            BatchRequest::LocateJob { .. } => RequestType::LocateJob,
            BatchRequest::AlterJob { asynchronous, .. } => {
                if *asynchronous {
                    RequestType::AsyAlterJob
                } else {
                    RequestType::AlterJob
                }
            }
            BatchRequest::OrderJob { .. } => RequestType::OrderJob,
            BatchRequest::ReleaseNodes { .. } => RequestType::ReleaseNodes,
            BatchRequest::PreemptJobs { .. } => RequestType::PreemptJobs,
            BatchRequest::ConfirmResv { .. } => RequestType::ConfirmResv,
            BatchRequest::RegisterSched { .. } => RequestType::RegisterSched,
            BatchRequest::Terminate { .. } => RequestType::Terminate,
        }
    }

    /// True when the request changes server state and therefore runs the
    /// pre-flight verifier over its attribute list.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            BatchRequest::Manager { .. }
                | BatchRequest::Submit { .. }
                | BatchRequest::SubmitResv { .. }
                | BatchRequest::ModifyResv { .. }
                | BatchRequest::AlterJob { .. }
        )
    }

    pub(crate) fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_u8(self.request_type() as u8);
        dst.put_u16(PROTOCOL_VERSION);
        match self {
            BatchRequest::Connect { user, extend } => {
                put_str(dst, user);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::Disconnect => {}
            BatchRequest::Manager {
                cmd,
                obj,
                name,
                attrs,
                extend,
            } => {
                dst.put_u8(*cmd as u8);
                dst.put_u8(*obj as u8);
                put_str(dst, name);
                put_attrops(dst, attrs);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::Status {
                kind,
                id,
                filter,
                extend,
            } => {
                dst.put_u8(*kind as u8);
                put_str(dst, id);
                put_attrls(dst, filter);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::Submit {
                attrs,
                script,
                extend,
            } => {
                put_attrops(dst, attrs);
                put_str(dst, script);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::SubmitResv { attrs, extend } => {
                put_attrops(dst, attrs);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::ModifyResv { id, attrs, extend } => {
                put_str(dst, id);
                put_attrops(dst, attrs);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::DeleteJob { id, extend } | BatchRequest::DeleteResv { id, extend } => {
                put_str(dst, id);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::DeleteJobList { ids, extend } => {
                put_ids(dst, ids);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::Signal { id, signal, extend } => {
                put_str(dst, id);
                put_str(dst, signal);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::MessageJob {
                id,
                to,
                text,
                extend,
            } => {
                put_str(dst, id);
                dst.put_u8(to.bits());
                put_str(dst, text);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::Hold {
                id,
                hold_types,
                extend,
            }
            | BatchRequest::Release {
                id,
                hold_types,
                extend,
            } => {
                put_str(dst, id);
                put_str(dst, hold_types);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::RunJob {
                id,
                location,
                extend,
                ..
            } => {
                put_str(dst, id);
                put_str(dst, location);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::RerunJob { id, extend } | BatchRequest::LocateJob { id, extend } => {
                put_str(dst, id);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::MoveJob {
                id,
                destination,
                extend,
            } => {
                put_str(dst, id);
                put_str(dst, destination);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::AlterJob {
                id, attrs, extend, ..
            } => {
                put_str(dst, id);
                put_attrops(dst, attrs);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::OrderJob { id1, id2, extend } => {
                put_str(dst, id1);
                put_str(dst, id2);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::ReleaseNodes {
                id,
                node_list,
                extend,
            } => {
                put_str(dst, id);
                put_str(dst, node_list);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::PreemptJobs { ids } => {
                put_ids(dst, ids);
            }
            BatchRequest::ConfirmResv {
                id,
                location,
                start,
                extend,
            } => {
                put_str(dst, id);
                put_str(dst, location);
                dst.put_u64(*start);
                put_opt_str(dst, extend.as_deref());
            }
            BatchRequest::RegisterSched { sched_id } => {
                put_str(dst, sched_id);
            }
            BatchRequest::Terminate { manner, extend } => {
                dst.put_u8(*manner as u8);
                put_opt_str(dst, extend.as_deref());
            }
        }
    }

    pub(crate) fn decode_body(rd: &mut FieldReader<'_>) -> Result<BatchRequest, BatchError> {
        let raw_tag = rd.u8()?;
        let tag = RequestType::from_repr(raw_tag)
            .ok_or_else(|| BatchError::Protocol(format!("unknown request type {raw_tag}")))?;
        let version = rd.u16()?;
        if version != PROTOCOL_VERSION {
            return Err(BatchError::Protocol(format!(
                "unsupported protocol version {version}"
            )));
        }
        let req = match tag {
            RequestType::Connect => BatchRequest::Connect {
                user: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::Disconnect => BatchRequest::Disconnect,
            RequestType::Manager => {
                let raw_cmd = rd.u8()?;
                let cmd = MgrCmd::from_repr(raw_cmd)
                    .ok_or_else(|| BatchError::Protocol(format!("bad manager cmd {raw_cmd}")))?;
                let raw_obj = rd.u8()?;
                let obj = MgrObj::from_repr(raw_obj)
                    .ok_or_else(|| BatchError::Protocol(format!("bad object class {raw_obj}")))?;
                BatchRequest::Manager {
                    cmd,
                    obj,
                    name: rd.str_field()?,
                    attrs: read_attrops(rd)?,
                    extend: rd.opt_str()?,
                }
            }
            RequestType::Status => {
                let raw_kind = rd.u8()?;
                let kind = StatKind::from_repr(raw_kind)
                    .ok_or_else(|| BatchError::Protocol(format!("bad status kind {raw_kind}")))?;
                BatchRequest::Status {
                    kind,
                    id: rd.str_field()?,
                    filter: read_attrls(rd)?,
                    extend: rd.opt_str()?,
                }
            }
            RequestType::Submit => BatchRequest::Submit {
                attrs: read_attrops(rd)?,
                script: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::SubmitResv => BatchRequest::SubmitResv {
                attrs: read_attrops(rd)?,
                extend: rd.opt_str()?,
            },
            RequestType::ModifyResv => BatchRequest::ModifyResv {
                id: rd.str_field()?,
                attrs: read_attrops(rd)?,
                extend: rd.opt_str()?,
            },
            RequestType::DeleteJob => BatchRequest::DeleteJob {
                id: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::DeleteResv => BatchRequest::DeleteResv {
                id: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::DeleteJobList => BatchRequest::DeleteJobList {
                ids: read_ids(rd)?,
                extend: rd.opt_str()?,
            },
            RequestType::Signal => BatchRequest::Signal {
                id: rd.str_field()?,
                signal: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::MessageJob => {
                let id = rd.str_field()?;
                let bits = rd.u8()?;
                let to = MsgFile::from_bits(bits)
                    .ok_or_else(|| BatchError::Protocol(format!("bad message target {bits}")))?;
                BatchRequest::MessageJob {
                    id,
                    to,
                    text: rd.str_field()?,
                    extend: rd.opt_str()?,
                }
            }
            RequestType::Hold => BatchRequest::Hold {
                id: rd.str_field()?,
                hold_types: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::Release => BatchRequest::Release {
                id: rd.str_field()?,
                hold_types: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::RunJob | RequestType::AsyRunJob | RequestType::AsyRunJobAck => {
                BatchRequest::RunJob {
                    id: rd.str_field()?,
                    location: rd.str_field()?,
                    mode: match tag {
                        RequestType::RunJob => RunMode::Sync,
                        RequestType::AsyRunJob => RunMode::Async,
                        _ => RunMode::AsyncAck,
                    },
                    extend: rd.opt_str()?,
                }
            }
            RequestType::RerunJob => BatchRequest::RerunJob {
                id: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::MoveJob => BatchRequest::MoveJob {
                id: rd.str_field()?,
                destination: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::LocateJob => BatchRequest::LocateJob {
                id: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::AlterJob | RequestType::AsyAlterJob => BatchRequest::AlterJob {
                id: rd.str_field()?,
                attrs: read_attrops(rd)?,
                asynchronous: tag == RequestType::AsyAlterJob,
                extend: rd.opt_str()?,
            },
            RequestType::OrderJob => BatchRequest::OrderJob {
                id1: rd.str_field()?,
                id2: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::ReleaseNodes => BatchRequest::ReleaseNodes {
                id: rd.str_field()?,
                node_list: rd.str_field()?,
                extend: rd.opt_str()?,
            },
            RequestType::PreemptJobs => BatchRequest::PreemptJobs { ids: read_ids(rd)? },
            RequestType::ConfirmResv => BatchRequest::ConfirmResv {
                id: rd.str_field()?,
                location: rd.str_field()?,
                start: rd.u64()?,
                extend: rd.opt_str()?,
            },
            RequestType::RegisterSched => BatchRequest::RegisterSched {
                sched_id: rd.str_field()?,
            },
            RequestType::Terminate => {
                let raw = rd.u8()?;
                let manner = ShutManner::from_repr(raw)
                    .ok_or_else(|| BatchError::Protocol(format!("bad shutdown manner {raw}")))?;
                BatchRequest::Terminate {
                    manner,
                    extend: rd.opt_str()?,
                }
            }
        };
        Ok(req)
    }

    /// The attribute list carried by this request, if any. The pre-flight
    /// verifier walks this.
    pub fn attr_list(&self) -> Option<&[AttrOp]> {
        match self {
            BatchRequest::Manager { attrs, .. }
            | BatchRequest::Submit { attrs, .. }
            | BatchRequest::SubmitResv { attrs, .. }
            | BatchRequest::ModifyResv { attrs, .. }
            | BatchRequest::AlterJob { attrs, .. } => Some(attrs),
            _ => None,
        }
    }
}
