// src/core/protocol/reply.rs

//! Batch reply shapes: the reply frame itself, the batch-status triple, and
//! the helpers the formatters lean on.

use crate::core::attrs::Attrl;
use crate::core::errors::{BatchError, ErrCode};
use crate::core::protocol::frame::{FieldReader, put_str};
use crate::core::protocol::request::read_attrls;
use bytes::{BufMut, BytesMut};
use std::cmp::Ordering;
use strum_macros::FromRepr;

/// Wire tags for reply bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u8)]
enum ReplyTag {
    Null = 0,
    Text = 1,
    Queue = 2,
    Status = 3,
    Locate = 4,
    DeleteList = 5,
    PreemptList = 6,
}

/// One `(object-name, attribute readings, text)` triple of a status reply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchStatus {
    pub name: String,
    pub attribs: Vec<Attrl>,
    pub text: Option<String>,
}

impl BatchStatus {
    /// Linear lookup by attribute name (and optional resource sub-name).
    pub fn find_attr(&self, name: &str, resource: Option<&str>) -> Option<&Attrl> {
        self.attribs.iter().find(|a| {
            a.name.eq_ignore_ascii_case(name)
                && match (resource, a.resource.as_deref()) {
                    (None, None) => true,
                    (Some(want), Some(have)) => want.eq_ignore_ascii_case(have),
                    _ => false,
                }
        })
    }
}

/// Stable sort over a status list; the formatter uses this so that `print`
/// output is deterministic across runs regardless of server emission order.
pub fn sort_status<F>(list: &mut [BatchStatus], cmp: F)
where
    F: FnMut(&BatchStatus, &BatchStatus) -> Ordering,
{
    list.sort_by(cmp);
}

/// Per-id outcome of a DeleteJobList request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelJobStatus {
    pub name: String,
    pub code: ErrCode,
    /// Message for history/unknown jobs; the server interpolates the id
    /// into its `%s` template before sending.
    pub text: Option<String>,
}

/// Per-id outcome of a PreemptJobs request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreemptEntry {
    pub job: String,
    /// Preemption method actually used (`S`uspend, `C`heckpoint, `R`equeue,
    /// `D`elete, or `0` for none).
    pub method: char,
}

/// The decoded body of one reply frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReplyBody {
    #[default]
    Null,
    Text(String),
    /// Newly created object id (job or reservation).
    Queue(String),
    Status(Vec<BatchStatus>),
    /// `server[:port]` owning the located job.
    Locate(String),
    DeleteList(Vec<DelJobStatus>),
    PreemptList(Vec<PreemptEntry>),
}

/// One reply frame: a numeric code, an auxiliary code, and a typed body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReply {
    pub code: ErrCode,
    pub aux: i32,
    pub body: ReplyBody,
}

impl BatchReply {
    pub fn ok() -> BatchReply {
        BatchReply::default()
    }

    pub fn error(code: ErrCode, text: impl Into<String>) -> BatchReply {
        BatchReply {
            code,
            aux: 0,
            body: ReplyBody::Text(text.into()),
        }
    }

    /// The reply's text payload, when it carries one.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ReplyBody::Text(t) => Some(t),
            _ => None,
        }
    }

    fn tag(&self) -> ReplyTag {
        match &self.body {
            ReplyBody::Null => ReplyTag::Null,
            ReplyBody::Text(_) => ReplyTag::Text,
            ReplyBody::Queue(_) => ReplyTag::Queue,
            ReplyBody::Status(_) => ReplyTag::Status,
            ReplyBody::Locate(_) => ReplyTag::Locate,
            ReplyBody::DeleteList(_) => ReplyTag::DeleteList,
            ReplyBody::PreemptList(_) => ReplyTag::PreemptList,
        }
    }

    pub(crate) fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_u8(self.tag() as u8);
        dst.put_i32(self.code as i32);
        dst.put_i32(self.aux);
        match &self.body {
            ReplyBody::Null => {}
            ReplyBody::Text(t) | ReplyBody::Queue(t) | ReplyBody::Locate(t) => {
                put_str(dst, t);
            }
            ReplyBody::Status(list) => {
                dst.put_u32(list.len() as u32);
                for bs in list {
                    put_str(dst, &bs.name);
                    dst.put_u32(bs.attribs.len() as u32);
                    for a in &bs.attribs {
                        put_str(dst, &a.name);
                        put_str(dst, a.resource.as_deref().unwrap_or(""));
                        put_str(dst, &a.value);
                        dst.put_u8(0);
                    }
                    put_str(dst, bs.text.as_deref().unwrap_or(""));
                }
            }
            ReplyBody::DeleteList(list) => {
                dst.put_u32(list.len() as u32);
                for d in list {
                    put_str(dst, &d.name);
                    dst.put_i32(d.code as i32);
                    put_str(dst, d.text.as_deref().unwrap_or(""));
                }
            }
            ReplyBody::PreemptList(list) => {
                dst.put_u32(list.len() as u32);
                for p in list {
                    put_str(dst, &p.job);
                    dst.put_u8(p.method as u8);
                }
            }
        }
    }

    pub(crate) fn decode_body(rd: &mut FieldReader<'_>) -> Result<BatchReply, BatchError> {
        let raw_tag = rd.u8()?;
        let tag = ReplyTag::from_repr(raw_tag)
            .ok_or_else(|| BatchError::Protocol(format!("unknown reply choice {raw_tag}")))?;
        let code = ErrCode::from_wire(rd.i32()?);
        let aux = rd.i32()?;
        let body = match tag {
            ReplyTag::Null => ReplyBody::Null,
            ReplyTag::Text => ReplyBody::Text(rd.str_field()?),
            ReplyTag::Queue => ReplyBody::Queue(rd.str_field()?),
            ReplyTag::Locate => ReplyBody::Locate(rd.str_field()?),
            ReplyTag::Status => {
                let n = rd.count()?;
                let mut list = Vec::with_capacity(n);
                for _ in 0..n {
                    let name = rd.str_field()?;
                    let attribs = read_attrls(rd)?;
                    let text = rd.str_field()?;
                    list.push(BatchStatus {
                        name,
                        attribs,
                        text: (!text.is_empty()).then_some(text),
                    });
                }
                ReplyBody::Status(list)
            }
            ReplyTag::DeleteList => {
                let n = rd.count()?;
                let mut list = Vec::with_capacity(n);
                for _ in 0..n {
                    let name = rd.str_field()?;
                    let code = ErrCode::from_wire(rd.i32()?);
                    let text = rd.str_field()?;
                    list.push(DelJobStatus {
                        name,
                        code,
                        text: (!text.is_empty()).then_some(text),
                    });
                }
                ReplyBody::DeleteList(list)
            }
            ReplyTag::PreemptList => {
                let n = rd.count()?;
                let mut list = Vec::with_capacity(n);
                for _ in 0..n {
                    let job = rd.str_field()?;
                    let method = rd.u8()? as char;
                    list.push(PreemptEntry { job, method });
                }
                ReplyBody::PreemptList(list)
            }
        };
        Ok(BatchReply { code, aux, body })
    }
}
