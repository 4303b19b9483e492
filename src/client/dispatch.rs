// src/client/dispatch.rs

//! The swappable call table behind the façade. Every request kind is one
//! trait method; the default implementation talks to the real transport,
//! test harnesses install a mock. Replacements must honor the same
//! pre-flight → critical-section → result contract.

use crate::client::connection::{self, ConnHandle, reply_text};
use crate::core::attrs::{AttrOp, Attrl, MgrCmd, MgrObj};
use crate::core::ecl::{self, VerifyContext};
use crate::core::errors::{BatchError, ErrCode};
use crate::core::protocol::reply::{DelJobStatus, PreemptEntry};
use crate::core::protocol::{
    BatchReply, BatchRequest, BatchStatus, MsgFile, ReplyBody, RunMode, ShutManner, StatKind,
};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::collections::HashSet;
use tracing::{debug, warn};

/// One method per request kind. `extend` strings are free-form server
/// hints (`force`, `nomail`, `deletehist`, …) and are never interpreted
/// client-side.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn manager(
        &self,
        h: ConnHandle,
        cmd: MgrCmd,
        obj: MgrObj,
        name: &str,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn status(
        &self,
        h: ConnHandle,
        kind: StatKind,
        id: &str,
        filter: &[Attrl],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, BatchError>;

    async fn submit(
        &self,
        h: ConnHandle,
        attrs: &[AttrOp],
        script: &str,
        extend: Option<&str>,
    ) -> Result<String, BatchError>;

    async fn submit_resv(
        &self,
        h: ConnHandle,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<String, BatchError>;

    async fn modify_resv(
        &self,
        h: ConnHandle,
        id: &str,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<Option<String>, BatchError>;

    async fn delete_job(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn delete_resv(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn delete_job_list(
        &self,
        h: ConnHandle,
        ids: Vec<String>,
        extend: Option<&str>,
    ) -> Result<Vec<DelJobStatus>, BatchError>;

    async fn signal_job(
        &self,
        h: ConnHandle,
        id: &str,
        signal: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn message_job(
        &self,
        h: ConnHandle,
        id: &str,
        to: MsgFile,
        text: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn hold_job(
        &self,
        h: ConnHandle,
        id: &str,
        hold_types: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn release_job(
        &self,
        h: ConnHandle,
        id: &str,
        hold_types: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn run_job(
        &self,
        h: ConnHandle,
        id: &str,
        location: &str,
        mode: RunMode,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn rerun_job(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn move_job(
        &self,
        h: ConnHandle,
        id: &str,
        destination: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn locate_job(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<String, BatchError>;

    async fn alter_job(
        &self,
        h: ConnHandle,
        id: &str,
        attrs: &[AttrOp],
        asynchronous: bool,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn order_job(
        &self,
        h: ConnHandle,
        id1: &str,
        id2: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn release_nodes(
        &self,
        h: ConnHandle,
        id: &str,
        node_list: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn preempt_jobs(
        &self,
        h: ConnHandle,
        ids: Vec<String>,
    ) -> Result<Vec<PreemptEntry>, BatchError>;

    async fn confirm_resv(
        &self,
        h: ConnHandle,
        id: &str,
        location: &str,
        start: u64,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;

    async fn register_sched(&self, h: ConnHandle, sched_id: &str) -> Result<(), BatchError>;

    async fn terminate(
        &self,
        h: ConnHandle,
        manner: ShutManner,
        extend: Option<&str>,
    ) -> Result<(), BatchError>;
}

/// The default implementation over the real transport.
#[derive(Debug, Default)]
pub struct WireDispatch;

impl WireDispatch {
    /// Pre-flight verification for a mutating request. Every failing node
    /// is recorded on the connection; the first failure becomes the
    /// returned error and nothing is sent.
    fn preflight(
        &self,
        h: ConnHandle,
        ctx: &VerifyContext,
        target: &str,
        attrs: &[AttrOp],
    ) -> Result<(), BatchError> {
        let conn = connection::get(h)?;
        let errs = ecl::verify_request(ctx, target, attrs);
        if errs.is_empty() {
            conn.set_verify_errors(Vec::new());
            return Ok(());
        }
        let first = errs[0].clone();
        conn.set_error(first.code, Some(first.message.clone()));
        conn.set_verify_errors(errs);
        Err(BatchError::VerificationFailed {
            index: first.index,
            message: first.message,
        })
    }

    /// One send + one reply under the connection's I/O lock.
    async fn roundtrip(
        &self,
        h: ConnHandle,
        id_for_err: &str,
        req: BatchRequest,
    ) -> Result<BatchReply, BatchError> {
        let conn = connection::get(h)?;
        if conn.is_poisoned() {
            conn.set_error(ErrCode::Protocol, None);
            return Err(BatchError::ConnectionPoisoned);
        }

        let reply = {
            let mut io = conn.io.lock().await;
            debug!(handle = h, kind = ?req.request_type(), "sending request");
            if let Err(e) = io.framed.send(req).await {
                conn.poison();
                conn.set_error(ErrCode::Protocol, Some(e.to_string()));
                return Err(e);
            }
            let next = match io.read_timeout {
                Some(t) => match tokio::time::timeout(t, io.framed.next()).await {
                    Ok(n) => n,
                    Err(_) => {
                        conn.poison();
                        conn.set_error(ErrCode::Protocol, Some("read timed out".to_string()));
                        return Err(BatchError::Protocol("read timed out".to_string()));
                    }
                },
                None => io.framed.next().await,
            };
            match next {
                Some(Ok(reply)) => reply,
                Some(Err(e)) => {
                    warn!(handle = h, error = %e, "reply decode failed");
                    conn.poison();
                    conn.set_error(ErrCode::Protocol, Some(e.to_string()));
                    return Err(e);
                }
                None => {
                    conn.poison();
                    conn.set_error(ErrCode::Protocol, None);
                    return Err(BatchError::Protocol(
                        "server closed the connection".to_string(),
                    ));
                }
            }
        };

        let text = reply_text(&reply);
        conn.set_error(reply.code, text.clone());
        if reply.code != ErrCode::None {
            return Err(BatchError::from_reply(reply.code, text, id_for_err));
        }
        Ok(reply)
    }

    async fn simple(
        &self,
        h: ConnHandle,
        id_for_err: &str,
        req: BatchRequest,
    ) -> Result<(), BatchError> {
        self.roundtrip(h, id_for_err, req).await.map(|_| ())
    }
}

fn expect_queue(reply: BatchReply) -> Result<String, BatchError> {
    match reply.body {
        ReplyBody::Queue(id) => Ok(id),
        other => Err(BatchError::Protocol(format!(
            "expected object-id reply, got {other:?}"
        ))),
    }
}

/// Removes duplicate ids in place, keeping first occurrences in order. The
/// returned list owns its strings; there is no caller-side bookkeeping.
pub fn dedup_job_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

#[async_trait]
impl Dispatch for WireDispatch {
    async fn manager(
        &self,
        h: ConnHandle,
        cmd: MgrCmd,
        obj: MgrObj,
        name: &str,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        let ctx = VerifyContext {
            request: crate::core::protocol::RequestType::Manager,
            parent: obj,
            cmd: Some(cmd),
        };
        self.preflight(h, &ctx, name, attrs)?;
        self.simple(
            h,
            name,
            BatchRequest::Manager {
                cmd,
                obj,
                name: name.to_string(),
                attrs: attrs.to_vec(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn status(
        &self,
        h: ConnHandle,
        kind: StatKind,
        id: &str,
        filter: &[Attrl],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, BatchError> {
        let reply = self
            .roundtrip(
                h,
                id,
                BatchRequest::Status {
                    kind,
                    id: id.to_string(),
                    filter: filter.to_vec(),
                    extend: extend.map(str::to_string),
                },
            )
            .await?;
        match reply.body {
            ReplyBody::Status(list) => Ok(list),
            // An empty result legitimately arrives as a bare null reply.
            ReplyBody::Null => Ok(Vec::new()),
            other => Err(BatchError::Protocol(format!(
                "expected status reply, got {other:?}"
            ))),
        }
    }

    async fn submit(
        &self,
        h: ConnHandle,
        attrs: &[AttrOp],
        script: &str,
        extend: Option<&str>,
    ) -> Result<String, BatchError> {
        let ctx = VerifyContext {
            request: crate::core::protocol::RequestType::Submit,
            parent: MgrObj::Job,
            cmd: None,
        };
        self.preflight(h, &ctx, "", attrs)?;
        let reply = self
            .roundtrip(
                h,
                "",
                BatchRequest::Submit {
                    attrs: attrs.to_vec(),
                    script: script.to_string(),
                    extend: extend.map(str::to_string),
                },
            )
            .await?;
        expect_queue(reply)
    }

    async fn submit_resv(
        &self,
        h: ConnHandle,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<String, BatchError> {
        let ctx = VerifyContext {
            request: crate::core::protocol::RequestType::SubmitResv,
            parent: MgrObj::Resv,
            cmd: None,
        };
        self.preflight(h, &ctx, "", attrs)?;
        let reply = self
            .roundtrip(
                h,
                "",
                BatchRequest::SubmitResv {
                    attrs: attrs.to_vec(),
                    extend: extend.map(str::to_string),
                },
            )
            .await?;
        expect_queue(reply)
    }

    async fn modify_resv(
        &self,
        h: ConnHandle,
        id: &str,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<Option<String>, BatchError> {
        let ctx = VerifyContext {
            request: crate::core::protocol::RequestType::ModifyResv,
            parent: MgrObj::Resv,
            cmd: None,
        };
        self.preflight(h, &ctx, id, attrs)?;
        let reply = self
            .roundtrip(
                h,
                id,
                BatchRequest::ModifyResv {
                    id: id.to_string(),
                    attrs: attrs.to_vec(),
                    extend: extend.map(str::to_string),
                },
            )
            .await?;
        Ok(reply_text(&reply))
    }

    async fn delete_job(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::DeleteJob {
                id: id.to_string(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn delete_resv(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::DeleteResv {
                id: id.to_string(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn delete_job_list(
        &self,
        h: ConnHandle,
        ids: Vec<String>,
        extend: Option<&str>,
    ) -> Result<Vec<DelJobStatus>, BatchError> {
        let ids = dedup_job_ids(ids);
        if ids.is_empty() {
            return Err(BatchError::InvalidJobId("<empty list>".to_string()));
        }
        let first = ids[0].clone();
        let reply = self
            .roundtrip(
                h,
                &first,
                BatchRequest::DeleteJobList {
                    ids,
                    extend: extend.map(str::to_string),
                },
            )
            .await?;
        match reply.body {
            ReplyBody::DeleteList(list) => Ok(list),
            ReplyBody::Null => Ok(Vec::new()),
            other => Err(BatchError::Protocol(format!(
                "expected delete-list reply, got {other:?}"
            ))),
        }
    }

    async fn signal_job(
        &self,
        h: ConnHandle,
        id: &str,
        signal: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::Signal {
                id: id.to_string(),
                signal: signal.to_string(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn message_job(
        &self,
        h: ConnHandle,
        id: &str,
        to: MsgFile,
        text: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::MessageJob {
                id: id.to_string(),
                to,
                text: text.to_string(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn hold_job(
        &self,
        h: ConnHandle,
        id: &str,
        hold_types: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::Hold {
                id: id.to_string(),
                hold_types: hold_types.to_string(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn release_job(
        &self,
        h: ConnHandle,
        id: &str,
        hold_types: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::Release {
                id: id.to_string(),
                hold_types: hold_types.to_string(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn run_job(
        &self,
        h: ConnHandle,
        id: &str,
        location: &str,
        mode: RunMode,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::RunJob {
                id: id.to_string(),
                location: location.to_string(),
                mode,
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn rerun_job(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::RerunJob {
                id: id.to_string(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn move_job(
        &self,
        h: ConnHandle,
        id: &str,
        destination: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::MoveJob {
                id: id.to_string(),
                destination: destination.to_string(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn locate_job(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<String, BatchError> {
        let reply = self
            .roundtrip(
                h,
                id,
                BatchRequest::LocateJob {
                    id: id.to_string(),
                    extend: extend.map(str::to_string),
                },
            )
            .await?;
        match reply.body {
            ReplyBody::Locate(server) => Ok(server),
            other => Err(BatchError::Protocol(format!(
                "expected locate reply, got {other:?}"
            ))),
        }
    }

    async fn alter_job(
        &self,
        h: ConnHandle,
        id: &str,
        attrs: &[AttrOp],
        asynchronous: bool,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        let ctx = VerifyContext {
            request: crate::core::protocol::RequestType::AlterJob,
            parent: MgrObj::Job,
            cmd: None,
        };
        self.preflight(h, &ctx, id, attrs)?;
        self.simple(
            h,
            id,
            BatchRequest::AlterJob {
                id: id.to_string(),
                attrs: attrs.to_vec(),
                asynchronous,
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn order_job(
        &self,
        h: ConnHandle,
        id1: &str,
        id2: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id1,
            BatchRequest::OrderJob {
                id1: id1.to_string(),
                id2: id2.to_string(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn release_nodes(
        &self,
        h: ConnHandle,
        id: &str,
        node_list: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::ReleaseNodes {
                id: id.to_string(),
                node_list: node_list.to_string(),
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn preempt_jobs(
        &self,
        h: ConnHandle,
        ids: Vec<String>,
    ) -> Result<Vec<PreemptEntry>, BatchError> {
        let first = ids.first().cloned().unwrap_or_default();
        let reply = self
            .roundtrip(h, &first, BatchRequest::PreemptJobs { ids })
            .await?;
        match reply.body {
            ReplyBody::PreemptList(list) => Ok(list),
            other => Err(BatchError::Protocol(format!(
                "expected preempt reply, got {other:?}"
            ))),
        }
    }

    async fn confirm_resv(
        &self,
        h: ConnHandle,
        id: &str,
        location: &str,
        start: u64,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            id,
            BatchRequest::ConfirmResv {
                id: id.to_string(),
                location: location.to_string(),
                start,
                extend: extend.map(str::to_string),
            },
        )
        .await
    }

    async fn register_sched(&self, h: ConnHandle, sched_id: &str) -> Result<(), BatchError> {
        self.simple(
            h,
            sched_id,
            BatchRequest::RegisterSched {
                sched_id: sched_id.to_string(),
            },
        )
        .await
    }

    async fn terminate(
        &self,
        h: ConnHandle,
        manner: ShutManner,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.simple(
            h,
            "",
            BatchRequest::Terminate {
                manner,
                extend: extend.map(str::to_string),
            },
        )
        .await
    }
}
