// src/client/connection.rs

//! The connection/session layer: a bounded process-wide table of handles,
//! each owning a framed transport, a per-connection error slot, and the
//! verifier error list.

use crate::config::PbsConfig;
use crate::core::ecl::EclAttrErr;
use crate::core::errors::{BatchError, ErrCode};
use crate::core::protocol::{BatchReply, BatchRequest, ClientCodec, ReplyBody};
use futures::{SinkExt, StreamExt};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, warn};

/// Index into the process-wide connection table.
pub type ConnHandle = usize;

/// Hard cap on simultaneously open connections.
pub const MAX_CONNECTIONS: usize = 50;

/// Read timeout applied when a connection was opened with the `NOBLK`
/// extension.
pub const NOBLK_TIMEOUT: Duration = Duration::from_secs(2);

/// Extend keyword requesting non-blocking reads.
pub const NOBLK: &str = "NOBLK";

pub(crate) struct ConnIo {
    pub(crate) framed: Framed<TcpStream, ClientCodec>,
    pub(crate) read_timeout: Option<Duration>,
}

#[derive(Default)]
struct ConnState {
    errno: ErrCode,
    errmsg: Option<String>,
    poisoned: bool,
    verify_errors: Vec<EclAttrErr>,
}

/// One open connection. The I/O half is guarded by an async mutex so that a
/// request/reply exchange is one critical section; the error slots use a
/// plain lock and are readable at any time.
pub struct Connection {
    server_name: String,
    endpoint: String,
    pub(crate) io: tokio::sync::Mutex<ConnIo>,
    state: Mutex<ConnState>,
}

impl Connection {
    /// The server spec this connection was opened with (may be empty for
    /// the default server).
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// The `host:port` actually dialed.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn last_errno(&self) -> ErrCode {
        self.state.lock().errno
    }

    pub fn last_errmsg(&self) -> Option<String> {
        self.state.lock().errmsg.clone()
    }

    pub(crate) fn set_error(&self, errno: ErrCode, errmsg: Option<String>) {
        let mut st = self.state.lock();
        st.errno = errno;
        st.errmsg = errmsg;
    }

    pub(crate) fn poison(&self) {
        self.state.lock().poisoned = true;
    }

    pub(crate) fn is_poisoned(&self) -> bool {
        self.state.lock().poisoned
    }

    pub(crate) fn set_verify_errors(&self, errs: Vec<EclAttrErr>) {
        self.state.lock().verify_errors = errs;
    }

    /// The full list of attribute nodes the pre-flight verifier rejected on
    /// the most recent call.
    pub fn verify_errors(&self) -> Vec<EclAttrErr> {
        self.state.lock().verify_errors.clone()
    }
}

struct ConnectionTable {
    slots: Mutex<HashMap<ConnHandle, Arc<Connection>>>,
    next: AtomicUsize,
}

static TABLE: Lazy<ConnectionTable> = Lazy::new(|| ConnectionTable {
    slots: Mutex::new(HashMap::new()),
    next: AtomicUsize::new(1),
});

/// The configured table bound, queryable by applications sizing fan-out.
pub fn max_connections() -> usize {
    MAX_CONNECTIONS
}

/// The identity sent in the Connect handshake.
pub fn current_user() -> String {
    if let Ok(user) = std::env::var("USER") {
        if !user.is_empty() {
            return user;
        }
    }
    if let Ok(user) = std::env::var("LOGNAME") {
        if !user.is_empty() {
            return user;
        }
    }
    // Fall back to the numeric uid when the environment carries nothing.
    format!("uid{}", unsafe { libc::getuid() })
}

/// Opens a connection to `server` (empty means the configured default) and
/// registers it in the table.
pub async fn connect(server: &str, cfg: &PbsConfig) -> Result<ConnHandle, BatchError> {
    connect_extend(server, None, cfg).await
}

/// Like [`connect`] but carries an extend blob in the handshake. `NOBLK`
/// additionally arms the short read timeout on every subsequent reply.
pub async fn connect_extend(
    server: &str,
    extend: Option<&str>,
    cfg: &PbsConfig,
) -> Result<ConnHandle, BatchError> {
    {
        let slots = TABLE.slots.lock();
        if slots.len() >= MAX_CONNECTIONS {
            return Err(BatchError::NoConnects);
        }
    }

    let (host, port) = cfg.resolve_server(server);
    let endpoint = format!("{host}:{port}");
    let stream = TcpStream::connect(&endpoint)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::InvalidInput => {
                BatchError::BadHost(host.clone())
            }
            _ => BatchError::Io(Arc::new(e)),
        })?;
    let mut framed = Framed::new(stream, ClientCodec);

    framed
        .send(BatchRequest::Connect {
            user: current_user(),
            extend: extend.map(str::to_string),
        })
        .await?;
    let reply = match framed.next().await {
        Some(Ok(reply)) => reply,
        Some(Err(e)) => return Err(e),
        None => {
            return Err(BatchError::Protocol(
                "server closed connection during handshake".to_string(),
            ));
        }
    };
    if reply.code != ErrCode::None {
        return Err(BatchError::Rejected {
            code: reply.code,
            text: reply.text().map(str::to_string),
        });
    }

    let read_timeout = extend
        .is_some_and(|e| e.contains(NOBLK))
        .then_some(NOBLK_TIMEOUT);

    let conn = Arc::new(Connection {
        server_name: server.to_string(),
        endpoint: endpoint.clone(),
        io: tokio::sync::Mutex::new(ConnIo {
            framed,
            read_timeout,
        }),
        state: Mutex::new(ConnState::default()),
    });

    let handle = TABLE.next.fetch_add(1, Ordering::SeqCst);
    let mut slots = TABLE.slots.lock();
    if slots.len() >= MAX_CONNECTIONS {
        return Err(BatchError::NoConnects);
    }
    slots.insert(handle, conn);
    debug!(handle, %endpoint, "connection established");
    Ok(handle)
}

/// Looks up a handle. A stale or unknown handle is a hard error, never a
/// silent null.
pub fn get(handle: ConnHandle) -> Result<Arc<Connection>, BatchError> {
    TABLE
        .slots
        .lock()
        .get(&handle)
        .cloned()
        .ok_or(BatchError::NoConnection)
}

/// Releases a connection slot. Idempotent: a second disconnect of the same
/// handle succeeds without effect. The Disconnect frame is best-effort.
pub async fn disconnect(handle: ConnHandle) -> Result<(), BatchError> {
    let conn = {
        let mut slots = TABLE.slots.lock();
        slots.remove(&handle)
    };
    let Some(conn) = conn else {
        return Ok(());
    };
    if !conn.is_poisoned() {
        let mut io = conn.io.lock().await;
        if let Err(e) = io.framed.send(BatchRequest::Disconnect).await {
            warn!(handle, error = %e, "disconnect notification failed");
        }
    }
    debug!(handle, "connection released");
    Ok(())
}

/// The most recent reply text for the handle, the aggregate error channel
/// used after otherwise-successful calls.
pub fn geterrmsg(handle: ConnHandle) -> Option<String> {
    get(handle).ok().and_then(|c| c.last_errmsg())
}

/// The most recent error code for the handle.
pub fn geterrno(handle: ConnHandle) -> ErrCode {
    get(handle).map(|c| c.last_errno()).unwrap_or_default()
}

/// The verifier rejection list for the handle.
pub fn attributes_in_error(handle: ConnHandle) -> Vec<EclAttrErr> {
    get(handle).map(|c| c.verify_errors()).unwrap_or_default()
}

pub(crate) fn reply_text(reply: &BatchReply) -> Option<String> {
    match &reply.body {
        ReplyBody::Text(t) if !t.is_empty() => Some(t.clone()),
        _ => None,
    }
}
