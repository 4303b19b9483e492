// tests/common/mod.rs

//! An in-process batch server speaking the real wire protocol, with just
//! enough semantics to exercise the client stack end to end.

use futures::{SinkExt, StreamExt};
use openbatch::core::attrs::{Attrl, BatchOp, MgrCmd, MgrObj};
use openbatch::core::errors::ErrCode;
use openbatch::core::protocol::reply::DelJobStatus;
use openbatch::core::protocol::{
    BatchReply, BatchRequest, BatchStatus, ReplyBody, ServerCodec, StatKind,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio_util::codec::Framed;

#[derive(Default)]
pub struct ServerBehavior {
    /// Reject every manager request with this code and message.
    pub reject_manager: Option<(ErrCode, String)>,
    /// Job ids this server does not know.
    pub unknown_jobs: HashSet<String>,
    /// Job ids that only exist as history.
    pub history_jobs: HashSet<String>,
    /// Where LocateJob points.
    pub locate_to: Option<String>,
}

#[derive(Default)]
pub struct ServerState {
    pub behavior: ServerBehavior,
    /// queue name -> ordered (attr display name, value) pairs.
    pub queues: HashMap<String, Vec<(String, String)>>,
    pub server_attrs: Vec<(String, String)>,
    pub signaled: Vec<(String, String)>,
    pub messaged: Vec<(String, String)>,
    pub deleted: Vec<String>,
}

pub struct TestServer {
    pub addr: String,
    pub state: Arc<Mutex<ServerState>>,
}

/// Server-side value canonicalization, mirroring how real listings come
/// back (`t` → `True`, `execution` → `Execution`).
fn canonical_value(name: &str, value: &str) -> String {
    let bool_attr = matches!(
        name,
        "enabled" | "started" | "scheduling" | "resv_enable" | "flatuid"
    );
    if bool_attr {
        return match value.to_ascii_lowercase().as_str() {
            "true" | "t" | "y" | "1" => "True".to_string(),
            _ => "False".to_string(),
        };
    }
    if name == "queue_type" {
        let v = value.to_ascii_lowercase();
        if "execution".starts_with(&v) {
            return "Execution".to_string();
        }
        if "route".starts_with(&v) {
            return "Route".to_string();
        }
    }
    value.to_string()
}

fn upsert(pairs: &mut Vec<(String, String)>, key: String, value: String) {
    match pairs.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => pairs.push((key, value)),
    }
}

fn attrs_to_readings(pairs: &[(String, String)]) -> Vec<Attrl> {
    pairs
        .iter()
        .map(|(k, v)| match k.split_once('.') {
            Some((name, resc)) => Attrl {
                name: name.to_string(),
                resource: Some(resc.to_string()),
                value: v.clone(),
            },
            None => Attrl {
                name: k.clone(),
                resource: None,
                value: v.clone(),
            },
        })
        .collect()
}

fn handle_request(state: &Arc<Mutex<ServerState>>, addr: &str, req: BatchRequest) -> BatchReply {
    let mut st = state.lock().unwrap();
    match req {
        BatchRequest::Connect { .. } | BatchRequest::Disconnect => BatchReply::ok(),
        BatchRequest::Manager {
            cmd,
            obj,
            name,
            attrs,
            ..
        } => {
            if let Some((code, msg)) = &st.behavior.reject_manager {
                return BatchReply::error(*code, msg.clone());
            }
            match (cmd, obj) {
                (MgrCmd::Create, MgrObj::Queue) => {
                    let mut pairs = Vec::new();
                    for a in &attrs {
                        upsert(
                            &mut pairs,
                            a.full_name(),
                            canonical_value(&a.name, &a.value),
                        );
                    }
                    st.queues.insert(name, pairs);
                }
                (MgrCmd::Delete, MgrObj::Queue) => {
                    st.queues.remove(&name);
                }
                (MgrCmd::Set, MgrObj::Queue) => {
                    let Some(pairs) = st.queues.get_mut(&name) else {
                        return BatchReply::error(ErrCode::UnkQue, "Unknown queue");
                    };
                    for a in &attrs {
                        upsert(pairs, a.full_name(), canonical_value(&a.name, &a.value));
                    }
                }
                (MgrCmd::Set, MgrObj::Server) => {
                    for a in &attrs {
                        let value = canonical_value(&a.name, &a.value);
                        match a.op {
                            BatchOp::Unset => {
                                st.server_attrs.retain(|(k, _)| *k != a.full_name())
                            }
                            _ => upsert(&mut st.server_attrs, a.full_name(), value),
                        }
                    }
                }
                (MgrCmd::Unset, MgrObj::Server) => {
                    // Unsetting an absent attribute succeeds and changes
                    // nothing.
                    for a in &attrs {
                        st.server_attrs.retain(|(k, _)| *k != a.full_name());
                    }
                }
                _ => {}
            }
            BatchReply::ok()
        }
        BatchRequest::Status { kind, id, .. } => {
            let list = match kind {
                StatKind::Queue => {
                    if id.is_empty() {
                        st.queues
                            .iter()
                            .map(|(name, pairs)| BatchStatus {
                                name: name.clone(),
                                attribs: attrs_to_readings(pairs),
                                text: None,
                            })
                            .collect()
                    } else {
                        match st.queues.get(&id) {
                            None => {
                                return BatchReply::error(ErrCode::UnkQue, "Unknown queue");
                            }
                            Some(pairs) => vec![BatchStatus {
                                name: id.clone(),
                                attribs: attrs_to_readings(pairs),
                                text: None,
                            }],
                        }
                    }
                }
                StatKind::Server => vec![BatchStatus {
                    name: addr.to_string(),
                    attribs: attrs_to_readings(&st.server_attrs),
                    text: None,
                }],
                _ => Vec::new(),
            };
            BatchReply {
                code: ErrCode::None,
                aux: 0,
                body: ReplyBody::Status(list),
            }
        }
        BatchRequest::Signal { id, signal, .. } => {
            if st.behavior.unknown_jobs.contains(&id) {
                return BatchReply::error(ErrCode::UnkJobId, format!("Unknown Job Id {id}"));
            }
            st.signaled.push((id, signal));
            BatchReply::ok()
        }
        BatchRequest::MessageJob { id, text, .. } => {
            if st.behavior.unknown_jobs.contains(&id) {
                return BatchReply::error(ErrCode::UnkJobId, format!("Unknown Job Id {id}"));
            }
            st.messaged.push((id, text));
            BatchReply::ok()
        }
        BatchRequest::LocateJob { .. } => {
            let target = st
                .behavior
                .locate_to
                .clone()
                .unwrap_or_else(|| addr.to_string());
            BatchReply {
                code: ErrCode::None,
                aux: 0,
                body: ReplyBody::Locate(target),
            }
        }
        BatchRequest::DeleteJobList { ids, .. } => {
            let mut results = Vec::new();
            for id in ids {
                if st.behavior.unknown_jobs.contains(&id) {
                    results.push(DelJobStatus {
                        name: id,
                        code: ErrCode::UnkJobId,
                        text: None,
                    });
                } else if st.behavior.history_jobs.contains(&id) {
                    let text = format!("Job {id} has finished");
                    results.push(DelJobStatus {
                        name: id,
                        code: ErrCode::HistJobId,
                        text: Some(text),
                    });
                } else {
                    st.deleted.push(id.clone());
                    results.push(DelJobStatus {
                        name: id,
                        code: ErrCode::None,
                        text: None,
                    });
                }
            }
            BatchReply {
                code: ErrCode::None,
                aux: 0,
                body: ReplyBody::DeleteList(results),
            }
        }
        _ => BatchReply::ok(),
    }
}

impl TestServer {
    pub async fn start() -> TestServer {
        Self::with_behavior(ServerBehavior::default()).await
    }

    pub async fn with_behavior(behavior: ServerBehavior) -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
        let state = Arc::new(Mutex::new(ServerState {
            behavior,
            ..ServerState::default()
        }));

        let state_for_task = Arc::clone(&state);
        let addr_for_task = addr.clone();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let state = Arc::clone(&state_for_task);
                let addr = addr_for_task.clone();
                tokio::spawn(async move {
                    let mut framed = Framed::new(socket, ServerCodec);
                    while let Some(Ok(req)) = framed.next().await {
                        let reply = handle_request(&state, &addr, req);
                        if framed.send(reply).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        TestServer { addr, state }
    }

    pub fn queue_attr(&self, queue: &str, attr: &str) -> Option<String> {
        let st = self.state.lock().unwrap();
        st.queues
            .get(queue)?
            .iter()
            .find(|(k, _)| k == attr)
            .map(|(_, v)| v.clone())
    }

    pub fn server_attr(&self, attr: &str) -> Option<String> {
        let st = self.state.lock().unwrap();
        st.server_attrs
            .iter()
            .find(|(k, _)| k == attr)
            .map(|(_, v)| v.clone())
    }
}
