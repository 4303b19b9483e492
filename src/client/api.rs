// src/client/api.rs

//! The request/reply façade. One method per request kind, dispatched
//! through the swappable call table so applications can layer
//! instrumentation or substitute a mock transport before any call is made.

use crate::client::connection::ConnHandle;
use crate::client::dispatch::{Dispatch, WireDispatch};
use crate::core::attrs::{AttrOp, Attrl, MgrCmd, MgrObj};
use crate::core::errors::BatchError;
use crate::core::protocol::reply::{DelJobStatus, PreemptEntry};
use crate::core::protocol::{BatchStatus, MsgFile, RunMode, ShutManner, StatKind};
use std::sync::Arc;

/// The client API handle. Cloning is cheap; all clones share the dispatch
/// table.
#[derive(Clone)]
pub struct Ifl {
    dispatch: Arc<dyn Dispatch>,
}

impl Default for Ifl {
    fn default() -> Self {
        Ifl::new()
    }
}

impl Ifl {
    /// A façade over the real transport.
    pub fn new() -> Ifl {
        Ifl {
            dispatch: Arc::new(WireDispatch),
        }
    }

    /// A façade over a caller-supplied dispatch table (mock transport,
    /// instrumentation shim, …).
    pub fn with_dispatch(dispatch: Arc<dyn Dispatch>) -> Ifl {
        Ifl { dispatch }
    }

    pub async fn manager(
        &self,
        h: ConnHandle,
        cmd: MgrCmd,
        obj: MgrObj,
        name: &str,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.manager(h, cmd, obj, name, attrs, extend).await
    }

    pub async fn stat_job(
        &self,
        h: ConnHandle,
        id: &str,
        filter: &[Attrl],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, BatchError> {
        self.dispatch.status(h, StatKind::Job, id, filter, extend).await
    }

    pub async fn stat_queue(
        &self,
        h: ConnHandle,
        id: &str,
        filter: &[Attrl],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, BatchError> {
        self.dispatch
            .status(h, StatKind::Queue, id, filter, extend)
            .await
    }

    pub async fn stat_node(
        &self,
        h: ConnHandle,
        id: &str,
        filter: &[Attrl],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, BatchError> {
        self.dispatch
            .status(h, StatKind::Node, id, filter, extend)
            .await
    }

    pub async fn stat_server(
        &self,
        h: ConnHandle,
        filter: &[Attrl],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, BatchError> {
        self.dispatch
            .status(h, StatKind::Server, "", filter, extend)
            .await
    }

    pub async fn stat_sched(
        &self,
        h: ConnHandle,
        filter: &[Attrl],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, BatchError> {
        self.dispatch
            .status(h, StatKind::Sched, "", filter, extend)
            .await
    }

    pub async fn stat_resv(
        &self,
        h: ConnHandle,
        id: &str,
        filter: &[Attrl],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, BatchError> {
        self.dispatch
            .status(h, StatKind::Resv, id, filter, extend)
            .await
    }

    pub async fn stat_hook(
        &self,
        h: ConnHandle,
        id: &str,
        filter: &[Attrl],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, BatchError> {
        self.dispatch
            .status(h, StatKind::Hook, id, filter, extend)
            .await
    }

    pub async fn stat_rsc(
        &self,
        h: ConnHandle,
        id: &str,
        filter: &[Attrl],
        extend: Option<&str>,
    ) -> Result<Vec<BatchStatus>, BatchError> {
        self.dispatch
            .status(h, StatKind::Resource, id, filter, extend)
            .await
    }

    pub async fn submit(
        &self,
        h: ConnHandle,
        attrs: &[AttrOp],
        script: &str,
        extend: Option<&str>,
    ) -> Result<String, BatchError> {
        self.dispatch.submit(h, attrs, script, extend).await
    }

    pub async fn submit_resv(
        &self,
        h: ConnHandle,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<String, BatchError> {
        self.dispatch.submit_resv(h, attrs, extend).await
    }

    pub async fn modify_resv(
        &self,
        h: ConnHandle,
        id: &str,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<Option<String>, BatchError> {
        self.dispatch.modify_resv(h, id, attrs, extend).await
    }

    pub async fn del_job(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.delete_job(h, id, extend).await
    }

    pub async fn del_resv(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.delete_resv(h, id, extend).await
    }

    pub async fn del_job_list(
        &self,
        h: ConnHandle,
        ids: Vec<String>,
        extend: Option<&str>,
    ) -> Result<Vec<DelJobStatus>, BatchError> {
        self.dispatch.delete_job_list(h, ids, extend).await
    }

    pub async fn sig_job(
        &self,
        h: ConnHandle,
        id: &str,
        signal: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.signal_job(h, id, signal, extend).await
    }

    pub async fn msg_job(
        &self,
        h: ConnHandle,
        id: &str,
        to: MsgFile,
        text: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.message_job(h, id, to, text, extend).await
    }

    pub async fn hold_job(
        &self,
        h: ConnHandle,
        id: &str,
        hold_types: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.hold_job(h, id, hold_types, extend).await
    }

    pub async fn rls_job(
        &self,
        h: ConnHandle,
        id: &str,
        hold_types: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.release_job(h, id, hold_types, extend).await
    }

    pub async fn run_job(
        &self,
        h: ConnHandle,
        id: &str,
        location: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch
            .run_job(h, id, location, RunMode::Sync, extend)
            .await
    }

    pub async fn asyrun_job(
        &self,
        h: ConnHandle,
        id: &str,
        location: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch
            .run_job(h, id, location, RunMode::Async, extend)
            .await
    }

    pub async fn asyrun_job_ack(
        &self,
        h: ConnHandle,
        id: &str,
        location: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch
            .run_job(h, id, location, RunMode::AsyncAck, extend)
            .await
    }

    pub async fn rerun_job(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.rerun_job(h, id, extend).await
    }

    pub async fn move_job(
        &self,
        h: ConnHandle,
        id: &str,
        destination: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.move_job(h, id, destination, extend).await
    }

    pub async fn locate_job(
        &self,
        h: ConnHandle,
        id: &str,
        extend: Option<&str>,
    ) -> Result<String, BatchError> {
        self.dispatch.locate_job(h, id, extend).await
    }

    pub async fn alter_job(
        &self,
        h: ConnHandle,
        id: &str,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.alter_job(h, id, attrs, false, extend).await
    }

    pub async fn asyalter_job(
        &self,
        h: ConnHandle,
        id: &str,
        attrs: &[AttrOp],
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.alter_job(h, id, attrs, true, extend).await
    }

    pub async fn order_job(
        &self,
        h: ConnHandle,
        id1: &str,
        id2: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.order_job(h, id1, id2, extend).await
    }

    pub async fn rel_nodes_job(
        &self,
        h: ConnHandle,
        id: &str,
        node_list: &str,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.release_nodes(h, id, node_list, extend).await
    }

    pub async fn preempt_jobs(
        &self,
        h: ConnHandle,
        ids: Vec<String>,
    ) -> Result<Vec<PreemptEntry>, BatchError> {
        self.dispatch.preempt_jobs(h, ids).await
    }

    pub async fn confirm_resv(
        &self,
        h: ConnHandle,
        id: &str,
        location: &str,
        start: u64,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.confirm_resv(h, id, location, start, extend).await
    }

    pub async fn register_sched(&self, h: ConnHandle, sched_id: &str) -> Result<(), BatchError> {
        self.dispatch.register_sched(h, sched_id).await
    }

    pub async fn terminate(
        &self,
        h: ConnHandle,
        manner: ShutManner,
        extend: Option<&str>,
    ) -> Result<(), BatchError> {
        self.dispatch.terminate(h, manner, extend).await
    }
}
