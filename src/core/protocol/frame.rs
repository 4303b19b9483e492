// src/core/protocol/frame.rs

//! Length-prefixed field primitives and the outer frame codec shared by the
//! client and the test-side server. The codec never interprets semantic
//! attribute types; every value travels as a length-counted byte string.

use crate::core::errors::BatchError;
use crate::core::protocol::reply::BatchReply;
use crate::core::protocol::request::BatchRequest;
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Upper bound on one frame body. A frame above this aborts the connection.
pub const MAX_BODY_SIZE: usize = 64 * 1024 * 1024;
/// Upper bound on any counted list inside a frame.
pub const MAX_LIST_ELEMENTS: usize = 1024 * 1024;

const LEN_PREFIX: usize = 4;

// --- field writers ---

pub(crate) fn put_str(dst: &mut BytesMut, s: &str) {
    dst.put_u32(s.len() as u32);
    dst.put_slice(s.as_bytes());
}

pub(crate) fn put_opt_str(dst: &mut BytesMut, s: Option<&str>) {
    match s {
        Some(s) => {
            dst.put_u8(1);
            put_str(dst, s);
        }
        None => dst.put_u8(0),
    }
}

// --- field reader ---

/// Incremental reader over one frame body. Every accessor fails with
/// [`BatchError::IncompleteData`] on a short body and lets the caller map
/// that to a protocol error (a complete frame must decode completely).
pub(crate) struct FieldReader<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(src: &'a [u8]) -> FieldReader<'a> {
        FieldReader { src, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], BatchError> {
        if self.src.len() - self.pos < n {
            return Err(BatchError::IncompleteData);
        }
        let out = &self.src[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, BatchError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16, BatchError> {
        Ok(u16::from_be_bytes(self.take(2)?.try_into().unwrap()))
    }

    pub(crate) fn u32(&mut self) -> Result<u32, BatchError> {
        Ok(u32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub(crate) fn i32(&mut self) -> Result<i32, BatchError> {
        Ok(i32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub(crate) fn u64(&mut self) -> Result<u64, BatchError> {
        Ok(u64::from_be_bytes(self.take(8)?.try_into().unwrap()))
    }

    /// A counted list length, bounds-checked against [`MAX_LIST_ELEMENTS`].
    pub(crate) fn count(&mut self) -> Result<usize, BatchError> {
        let n = self.u32()? as usize;
        if n > MAX_LIST_ELEMENTS {
            return Err(BatchError::FrameTooLarge);
        }
        Ok(n)
    }

    pub(crate) fn str_field(&mut self) -> Result<String, BatchError> {
        let len = self.u32()? as usize;
        if len > MAX_BODY_SIZE {
            return Err(BatchError::FrameTooLarge);
        }
        Ok(std::str::from_utf8(self.take(len)?)?.to_string())
    }

    pub(crate) fn opt_str(&mut self) -> Result<Option<String>, BatchError> {
        match self.u8()? {
            0 => Ok(None),
            1 => Ok(Some(self.str_field()?)),
            other => Err(BatchError::Protocol(format!(
                "bad optional-field marker {other}"
            ))),
        }
    }

    /// Requires the body to be fully consumed; trailing bytes mean the two
    /// ends disagree about the frame layout.
    pub(crate) fn finish(self) -> Result<(), BatchError> {
        if self.pos == self.src.len() {
            Ok(())
        } else {
            Err(BatchError::Protocol(format!(
                "{} trailing bytes after frame body",
                self.src.len() - self.pos
            )))
        }
    }
}

// --- outer framing ---

fn encode_framed(body: BytesMut, dst: &mut BytesMut) -> Result<(), BatchError> {
    if body.len() > MAX_BODY_SIZE {
        return Err(BatchError::FrameTooLarge);
    }
    dst.reserve(LEN_PREFIX + body.len());
    dst.put_u32(body.len() as u32);
    dst.put_slice(&body);
    Ok(())
}

fn split_frame(src: &mut BytesMut) -> Result<Option<BytesMut>, BatchError> {
    if src.len() < LEN_PREFIX {
        return Ok(None);
    }
    let body_len = u32::from_be_bytes(src[..LEN_PREFIX].try_into().unwrap()) as usize;
    if body_len > MAX_BODY_SIZE {
        // Do not advance: the connection is dead either way, and the caller
        // poisons it on this error.
        return Err(BatchError::FrameTooLarge);
    }
    if src.len() < LEN_PREFIX + body_len {
        return Ok(None);
    }
    src.advance(LEN_PREFIX);
    Ok(Some(src.split_to(body_len)))
}

/// Client side: writes requests, reads replies.
#[derive(Debug, Default)]
pub struct ClientCodec;

impl Encoder<BatchRequest> for ClientCodec {
    type Error = BatchError;

    fn encode(&mut self, item: BatchRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let mut body = BytesMut::new();
        item.encode_body(&mut body);
        encode_framed(body, dst)
    }
}

impl Decoder for ClientCodec {
    type Item = BatchReply;
    type Error = BatchError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match split_frame(src)? {
            None => Ok(None),
            Some(body) => {
                let mut rd = FieldReader::new(&body);
                let reply = BatchReply::decode_body(&mut rd)?;
                rd.finish()?;
                Ok(Some(reply))
            }
        }
    }
}

/// Server side of the same wire layout, used by in-process test servers.
#[derive(Debug, Default)]
pub struct ServerCodec;

impl Encoder<BatchReply> for ServerCodec {
    type Error = BatchError;

    fn encode(&mut self, item: BatchReply, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let mut body = BytesMut::new();
        item.encode_body(&mut body);
        encode_framed(body, dst)
    }
}

impl Decoder for ServerCodec {
    type Item = BatchRequest;
    type Error = BatchError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match split_frame(src)? {
            None => Ok(None),
            Some(body) => {
                let mut rd = FieldReader::new(&body);
                let req = BatchRequest::decode_body(&mut rd)?;
                rd.finish()?;
                Ok(Some(req))
            }
        }
    }
}
