// src/qmgr/executor.rs

//! Directive execution: active-object sets, multi-server fan-out, the
//! formatted `list`/`print` output, and hook import/export staging.

use crate::client::connection::{self, ConnHandle};
use crate::client::{Ifl, disconnect};
use crate::config::PbsConfig;
use crate::core::attrs::{AttrOp, Attrl, MgrCmd, MgrObj, catalog};
use crate::core::attrs::catalog::{AttrFlags, AttrType};
use crate::core::errors::{BatchError, ErrCode};
use crate::core::protocol::BatchStatus;
use crate::qmgr::hooks::{HookStage, dump_file, emit_base64};
use crate::qmgr::parser::{
    CONTENT_ENCODING_PARAM, CONTENT_TYPE_PARAM, HOOKSTR_BASE64, HOOKSTR_CONFIG, HOOKSTR_CONTENT,
    INPUT_FILE_PARAM, ManageDirective, OUTPUT_FILE_PARAM, ObjName, ServerRef,
};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Idle limit: a connection silent this long is reported as an idle
/// timeout rather than a protocol failure.
pub const QMGR_TIMEOUT_SECS: u64 = 900;

/// Name the server substitutes for an unnamed scheduler.
pub const DFLT_SCHED_NAME: &str = "default";

/// Command-line behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct QmgrOpts {
    /// `-a`: abort on the first error.
    pub abort: bool,
    /// `-e`: echo each directive before running it.
    pub echo: bool,
    /// `-n`: parse only, execute nothing.
    pub noexec: bool,
    /// `-z`: suppress stderr output.
    pub silent: bool,
}

/// Exit-code classes of the `qmgr` process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitClass {
    Ok = 0,
    Parse = 1,
    Execute = 2,
    Connect = 3,
    Active = 4,
    Oom = 5,
}

/// What one directive produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveOutcome {
    Ok,
    Error(ExitClass),
    /// Protocol failure or idle disconnect: message already printed, the
    /// session must end with exit 1.
    Fatal,
}

pub struct Qmgr {
    cfg: PbsConfig,
    api: Ifl,
    pub opts: QmgrOpts,
    /// Open connections keyed by server spec ("" is the default server).
    servers: HashMap<String, ConnHandle>,
    active_servers: Vec<String>,
    active_scheds: Vec<String>,
    active_queues: Vec<ObjName>,
    active_nodes: Vec<ObjName>,
    hooks: HookStage,
    interactive: bool,
    last_read: Instant,
}

impl Qmgr {
    pub fn new(cfg: PbsConfig, api: Ifl, opts: QmgrOpts, interactive: bool) -> Qmgr {
        let hooks = HookStage::new(&cfg);
        Qmgr {
            cfg,
            api,
            opts,
            servers: HashMap::new(),
            active_servers: Vec::new(),
            active_scheds: Vec::new(),
            active_queues: Vec::new(),
            active_nodes: Vec::new(),
            hooks,
            interactive,
            last_read: Instant::now(),
        }
    }

    /// stderr honoring `-z`.
    pub fn pstderr(&self, msg: &str) {
        if !self.opts.silent {
            eprint!("{msg}");
        }
    }

    /// Echoes the request and the caret line for a syntax error.
    pub fn caret_err(&self, request: &str, offset: usize) {
        self.pstderr(&format!("{request}\n"));
        let mut line = String::with_capacity(offset + 2);
        for _ in 0..offset.min(request.len()) {
            line.push(' ');
        }
        line.push('^');
        line.push('\n');
        self.pstderr(&line);
    }

    /// Marks the start of a read so protocol failures can tell an idle
    /// disconnect from a live one.
    pub fn touch_read_time(&mut self) {
        self.last_read = Instant::now();
    }

    fn svr_display<'a>(&'a self, spec: &'a str) -> &'a str {
        if spec.is_empty() {
            &self.cfg.pbs_server
        } else {
            spec
        }
    }

    /// Connects the initial server list; any failure is fatal to startup.
    pub async fn connect_initial(&mut self, specs: &[String]) -> Result<(), ExitClass> {
        let specs: Vec<String> = if specs.is_empty() {
            vec![String::new()]
        } else {
            specs.to_vec()
        };
        let mut failed = false;
        for spec in &specs {
            if self.server_handle(spec).await.is_err() {
                failed = true;
            }
        }
        if failed || self.servers.is_empty() {
            return Err(ExitClass::Connect);
        }
        self.active_servers = specs;
        Ok(())
    }

    /// Number of open server connections.
    pub fn open_servers(&self) -> usize {
        self.servers.len()
    }

    pub async fn shutdown(&mut self) {
        for (_, h) in self.servers.drain() {
            let _ = disconnect(h).await;
        }
        self.hooks.cleanup();
    }

    async fn server_handle(&mut self, spec: &str) -> Result<ConnHandle, ExitClass> {
        if let Some(&h) = self.servers.get(spec) {
            return Ok(h);
        }
        match connection::connect(spec, &self.cfg).await {
            Ok(h) => {
                self.servers.insert(spec.to_string(), h);
                Ok(h)
            }
            Err(e) => {
                self.pstderr(&format!(
                    "qmgr: cannot connect to server {} (errno={})\n",
                    self.svr_display(spec),
                    e.code() as i32
                ));
                Err(ExitClass::Connect)
            }
        }
    }

    /// Runs one parsed manage directive and reports its outcome.
    pub async fn execute(&mut self, d: &ManageDirective) -> DirectiveOutcome {
        if d.cmd == MgrCmd::Active {
            return self.set_active(d).await;
        }

        let targets = match self.targets_for(d) {
            Some(t) => t,
            None => return DirectiveOutcome::Ok,
        };

        let mut error: Option<ExitClass> = None;
        for name in &targets {
            let specs: Vec<String> = match &name.server {
                Some(ServerRef::Named(s)) => vec![s.clone()],
                Some(ServerRef::Default) => vec![String::new()],
                Some(ServerRef::Active) | None => self.active_servers.clone(),
            };
            for spec in &specs {
                let h = match self.server_handle(spec).await {
                    Ok(h) => h,
                    Err(class) => {
                        if self.opts.abort {
                            return DirectiveOutcome::Error(class);
                        }
                        error = Some(class);
                        continue;
                    }
                };
                match self.run_one(d, name, spec, h).await {
                    Ok(()) => {}
                    Err(RunError::Fatal) => return DirectiveOutcome::Fatal,
                    Err(RunError::Failed(class)) => {
                        if self.opts.abort {
                            return DirectiveOutcome::Error(class);
                        }
                        error = Some(class);
                    }
                }
            }
        }
        match error {
            None => DirectiveOutcome::Ok,
            Some(class) => DirectiveOutcome::Error(class),
        }
    }

    /// The name list a directive fans out over when it names nothing.
    fn targets_for(&self, d: &ManageDirective) -> Option<Vec<ObjName>> {
        if !d.names.is_empty() {
            return Some(d.names.clone());
        }
        match d.obj {
            MgrObj::Server
            | MgrObj::Sched
            | MgrObj::SiteHook
            | MgrObj::PbsHook
            | MgrObj::Resource
            | MgrObj::Job
            | MgrObj::Resv => Some(vec![ObjName::bare("")]),
            MgrObj::Queue => {
                if self.active_queues.is_empty() {
                    self.pstderr("No Active Queues, nothing done.\n");
                    None
                } else {
                    Some(self.active_queues.clone())
                }
            }
            MgrObj::Node => {
                if self.active_nodes.is_empty() {
                    self.pstderr("No Active Nodes, nothing done.\n");
                    None
                } else {
                    Some(self.active_nodes.clone())
                }
            }
        }
    }

    async fn set_active(&mut self, d: &ManageDirective) -> DirectiveOutcome {
        if d.names.is_empty() {
            // Report the current sets.
            match d.obj {
                MgrObj::Server => {
                    println!("Active servers:");
                    for s in &self.active_servers {
                        println!("{}", self.svr_display(s));
                    }
                }
                MgrObj::Sched => {
                    println!("Active schedulers:");
                    for s in &self.active_scheds {
                        println!("{}", self.svr_display(s));
                    }
                }
                MgrObj::Queue => {
                    println!("Active queues:");
                    for q in &self.active_queues {
                        println!("{}@{}", q.name, self.active_target_server(q));
                    }
                }
                MgrObj::Node => {
                    println!("Active nodes:");
                    for n in &self.active_nodes {
                        println!("{}@{}", n.name, self.active_target_server(n));
                    }
                }
                _ => return DirectiveOutcome::Error(ExitClass::Active),
            }
            return DirectiveOutcome::Ok;
        }

        match d.obj {
            MgrObj::Server | MgrObj::Sched => {
                // Names are server hosts; connect to each eagerly.
                let mut specs = Vec::new();
                for name in &d.names {
                    let spec = name.name.clone();
                    if self.server_handle(&spec).await.is_err() {
                        return DirectiveOutcome::Error(ExitClass::Active);
                    }
                    specs.push(spec);
                }
                if d.obj == MgrObj::Server {
                    self.active_servers = specs;
                } else {
                    self.active_scheds = specs;
                }
                DirectiveOutcome::Ok
            }
            MgrObj::Queue | MgrObj::Node => {
                for name in &d.names {
                    let spec = match &name.server {
                        Some(ServerRef::Named(s)) => s.clone(),
                        _ => self
                            .active_servers
                            .first()
                            .cloned()
                            .unwrap_or_default(),
                    };
                    let Ok(h) = self.server_handle(&spec).await else {
                        return DirectiveOutcome::Error(ExitClass::Active);
                    };
                    let exists = match d.obj {
                        MgrObj::Queue => self
                            .api
                            .stat_queue(h, &name.name, &[], None)
                            .await
                            .map(|l| !l.is_empty())
                            .unwrap_or(false),
                        _ => self
                            .api
                            .stat_node(h, &name.name, &[], None)
                            .await
                            .map(|l| !l.is_empty())
                            .unwrap_or(false),
                    };
                    if !exists {
                        let what = if d.obj == MgrObj::Queue { "Queue" } else { "Node" };
                        self.pstderr(&format!("{what} does not exist: {}.\n", name.name));
                        return DirectiveOutcome::Error(ExitClass::Active);
                    }
                }
                if d.obj == MgrObj::Queue {
                    self.active_queues = d.names.clone();
                } else {
                    self.active_nodes = d.names.clone();
                }
                DirectiveOutcome::Ok
            }
            _ => DirectiveOutcome::Error(ExitClass::Active),
        }
    }

    fn active_target_server<'a>(&'a self, obj: &'a ObjName) -> &'a str {
        match &obj.server {
            Some(ServerRef::Named(s)) => s,
            _ => self
                .active_servers
                .first()
                .map(|s| self.svr_display(s))
                .unwrap_or(&self.cfg.pbs_server),
        }
    }

    async fn run_one(
        &mut self,
        d: &ManageDirective,
        name: &ObjName,
        spec: &str,
        h: ConnHandle,
    ) -> Result<(), RunError> {
        debug!(cmd = %d.cmd, obj = %d.obj, name = %name.name, server = spec, "executing");
        let result = match d.cmd {
            MgrCmd::List => self.run_list(d, name, h).await,
            MgrCmd::Print => self.run_print(d, name, spec, h).await,
            _ => self.run_manage(d, name, spec, h).await,
        };

        match result {
            Ok(()) => {
                // Reply code was zero but the server attached a message.
                if let Some(msg) = connection::geterrmsg(h) {
                    self.pstderr(&format!("{msg}\n"));
                }
                Ok(())
            }
            Err(e) => {
                self.report_call_error(d, name, spec, h, &e)?;
                Err(RunError::Failed(ExitClass::Execute))
            }
        }
    }

    /// The shared error reporting of the original execute loop, including
    /// the non-tty read-only suppression for replayed node dumps.
    fn report_call_error(
        &self,
        d: &ManageDirective,
        name: &ObjName,
        spec: &str,
        h: ConnHandle,
        e: &BatchError,
    ) -> Result<(), RunError> {
        let errno = e.code();
        let suppress = !self.interactive
            && d.cmd == MgrCmd::Set
            && d.obj == MgrObj::Node
            && errno == ErrCode::AttrRo;
        if !suppress {
            if let Some(errmsg) = connection::geterrmsg(h) {
                let svr = self.svr_display(spec);
                let line = format!("qmgr obj={} svr={}: {}\n", name.name, svr, errmsg);
                if line.len() < 256 {
                    self.pstderr(&line);
                } else {
                    self.pstderr(&format!("qmgr obj={}\n", name.name));
                    self.pstderr(&format!("svr={}\n", svr));
                    self.pstderr(&format!("{errmsg}\n"));
                }
            }
            if errno == ErrCode::Protocol {
                if self.last_read.elapsed().as_secs() >= QMGR_TIMEOUT_SECS {
                    self.pstderr("qmgr: Server disconnected due to idle connection timeout\n");
                } else {
                    self.pstderr("qmgr: Protocol error, server disconnected\n");
                }
                return Err(RunError::Fatal);
            } else if errno == ErrCode::HookError {
                self.pstderr("qmgr: hook error returned from server\n");
            } else if errno != ErrCode::None {
                self.pstderr(&format!("qmgr: Error ({}) returned from server\n", errno as i32));
            }
        }
        Ok(())
    }

    async fn run_list(
        &mut self,
        d: &ManageDirective,
        name: &ObjName,
        h: ConnHandle,
    ) -> Result<(), BatchError> {
        let filter: Vec<Attrl> = d.attrs.iter().map(Attrl::from).collect();
        let list = match d.obj {
            MgrObj::Server => self.api.stat_server(h, &filter, None).await?,
            MgrObj::Queue => self.api.stat_queue(h, &name.name, &filter, None).await?,
            MgrObj::Node => self.api.stat_node(h, &name.name, &filter, None).await?,
            MgrObj::Sched => self.api.stat_sched(h, &filter, None).await?,
            MgrObj::SiteHook | MgrObj::PbsHook => {
                self.api.stat_hook(h, &name.name, &filter, None).await?
            }
            MgrObj::Resource => self.api.stat_rsc(h, &name.name, &filter, Some("p")).await?,
            MgrObj::Job | MgrObj::Resv => {
                return Err(BatchError::Rejected {
                    code: ErrCode::IvalReq,
                    text: Some("object not listable here".to_string()),
                });
            }
        };
        self.display_list(d.obj, &name.name, &list);
        Ok(())
    }

    async fn run_print(
        &mut self,
        d: &ManageDirective,
        name: &ObjName,
        spec: &str,
        h: ConnHandle,
    ) -> Result<(), BatchError> {
        let filter: Vec<Attrl> = d.attrs.iter().map(Attrl::from).collect();
        match d.obj {
            MgrObj::Server => {
                if filter.is_empty() {
                    // Custom resources first, then queues, then the server
                    // itself; the output replays in that order.
                    let resources = self.api.stat_rsc(h, "", &[], Some("p")).await?;
                    self.display_print(MgrObj::Resource, MgrObj::Server, "", &resources, spec, h)
                        .await?;
                    let queues = self.api.stat_queue(h, "", &[], None).await?;
                    self.display_print(MgrObj::Queue, MgrObj::Server, "", &queues, spec, h)
                        .await?;
                }
                let server = self.api.stat_server(h, &filter, None).await?;
                self.display_print(MgrObj::Server, MgrObj::Server, "", &server, spec, h)
                    .await
            }
            MgrObj::Queue => {
                let list = self.api.stat_queue(h, &name.name, &filter, None).await?;
                self.display_print(MgrObj::Queue, MgrObj::Queue, &name.name, &list, spec, h)
                    .await
            }
            MgrObj::Node => {
                let list = self.api.stat_node(h, &name.name, &filter, None).await?;
                self.display_print(MgrObj::Node, MgrObj::Node, &name.name, &list, spec, h)
                    .await
            }
            MgrObj::Sched => {
                let list = self.api.stat_sched(h, &filter, None).await?;
                self.display_print(MgrObj::Sched, MgrObj::Sched, &name.name, &list, spec, h)
                    .await
            }
            MgrObj::SiteHook => {
                let list = self.api.stat_hook(h, &name.name, &filter, None).await?;
                self.display_print(MgrObj::SiteHook, MgrObj::SiteHook, &name.name, &list, spec, h)
                    .await
            }
            MgrObj::Resource => {
                let list = self.api.stat_rsc(h, &name.name, &filter, Some("p")).await?;
                self.display_print(MgrObj::Resource, MgrObj::Resource, &name.name, &list, spec, h)
                    .await
            }
            MgrObj::PbsHook | MgrObj::Job | MgrObj::Resv => Err(BatchError::Rejected {
                code: ErrCode::IvalReq,
                text: Some("object not printable here".to_string()),
            }),
        }
    }

    async fn run_manage(
        &mut self,
        d: &ManageDirective,
        name: &ObjName,
        spec: &str,
        h: ConnHandle,
    ) -> Result<(), BatchError> {
        let mut attrs = d.attrs.clone();

        if d.cmd == MgrCmd::Import {
            self.stage_import(&mut attrs, spec)
                .map_err(|msg| self.hook_stage_error(msg, spec))?;
        } else if d.cmd == MgrCmd::Export {
            self.prepare_export(&mut attrs, spec)
                .map_err(|msg| self.hook_stage_error(msg, spec))?;
        }

        let target = if d.obj == MgrObj::Sched && name.name.is_empty() && d.cmd != MgrCmd::Delete {
            DFLT_SCHED_NAME
        } else {
            &name.name
        };

        if d.obj == MgrObj::Sched {
            for a in &attrs {
                if a.name.eq_ignore_ascii_case("throughput_mode") {
                    tracing::warn!(
                        "throughput_mode is deprecated; use job_run_wait instead"
                    );
                }
            }
        }

        // The destination the user asked for, before the staged basename
        // replaced it on the wire copy.
        let outfile = (d.cmd == MgrCmd::Export)
            .then(|| {
                d.attrs
                    .iter()
                    .find(|a| a.name == OUTPUT_FILE_PARAM)
                    .map(|a| a.value.clone())
                    .unwrap_or_default()
            });
        let encoding = attrs
            .iter()
            .find(|a| a.name == CONTENT_ENCODING_PARAM)
            .map(|a| a.value.clone());

        self.api
            .manager(h, d.cmd, d.obj, target, &attrs, None)
            .await?;

        if d.obj == MgrObj::PbsHook && d.cmd == MgrCmd::Set {
            for a in &attrs {
                if a.name == "enabled"
                    && matches!(a.value.to_ascii_lowercase().as_str(), "false" | "f" | "n" | "0")
                {
                    self.pstderr(
                        "WARNING: Disabling a PBS hook results in an unsupported configuration!\n",
                    );
                }
            }
        }

        if d.cmd == MgrCmd::Export {
            // Server wrote the staged file; deliver it to its destination.
            let staged = self
                .hooks
                .tempfile()
                .map_err(|msg| self.hook_stage_error(msg, spec))?
                .to_path_buf();
            let out = outfile.unwrap_or_default();
            let out_path = (!out.is_empty()).then(|| Path::new(&out).to_path_buf());
            dump_file(
                Some(&staged),
                out_path.as_deref(),
                encoding.as_deref().unwrap_or(HOOKSTR_BASE64),
            )
            .map_err(|msg| {
                self.pstderr(&format!("{msg}\n"));
                BatchError::Internal(msg)
            })?;
        }
        Ok(())
    }

    /// Copies import content into the staging file and rewrites the
    /// `input-file` parameter to the staged basename.
    fn stage_import(&mut self, attrs: &mut [AttrOp], _spec: &str) -> Result<(), String> {
        let mut infile = None;
        let mut encoding = None;
        let mut content_type = None;
        for a in attrs.iter() {
            match a.name.as_str() {
                INPUT_FILE_PARAM => infile = Some(a.value.clone()),
                CONTENT_ENCODING_PARAM => encoding = Some(a.value.clone()),
                CONTENT_TYPE_PARAM => content_type = Some(a.value.clone()),
                _ => {}
            }
        }
        let infile = infile.ok_or("hook import command has no <input-file> argument")?;
        let encoding = encoding.ok_or("hook import command has no <content-encoding> argument")?;
        let content_type =
            content_type.ok_or("hook import command has no <content-type> argument")?;

        // Config content keeps the input file's suffix so the server can
        // validate by type.
        let staged = if content_type == HOOKSTR_CONFIG {
            match Path::new(&infile).extension() {
                Some(ext) => self.hooks.tempfile_with_suffix(&format!(".{}", ext.to_string_lossy()))?,
                None => self.hooks.tempfile()?.to_path_buf(),
            }
        } else {
            self.hooks.tempfile()?.to_path_buf()
        };

        let source = (infile != "-" && !infile.is_empty())
            .then(|| Path::new(&infile).to_path_buf());
        dump_file(source.as_deref(), Some(&staged), &encoding)?;

        let basename = staged
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        for a in attrs.iter_mut() {
            if a.name == INPUT_FILE_PARAM {
                a.value = basename.clone();
            }
        }
        Ok(())
    }

    /// Rewrites the `output-file` parameter to the staged basename; the
    /// caller delivers the content after the server writes it.
    fn prepare_export(&mut self, attrs: &mut [AttrOp], _spec: &str) -> Result<(), String> {
        let staged = self.hooks.tempfile()?;
        let basename = staged
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        for a in attrs.iter_mut() {
            if a.name == OUTPUT_FILE_PARAM {
                a.value = basename.clone();
            }
        }
        Ok(())
    }

    /// Staging failures: an unreadable workdir is an authorization problem
    /// and names who was refused by which server.
    fn hook_stage_error(&self, msg: String, spec: &str) -> BatchError {
        if self.hooks.workdir_inaccessible() {
            let user = connection::current_user();
            let host = hostname::get()
                .map(|h| h.to_string_lossy().to_string())
                .unwrap_or_default();
            let server = if spec.is_empty() {
                self.cfg.pbs_server.clone()
            } else {
                spec.to_string()
            };
            self.pstderr(&format!(
                "{user}@{host} is unauthorized to access hooks data from server {server}\n"
            ));
        } else {
            self.pstderr(&format!("{msg}\n"));
        }
        BatchError::Internal(msg)
    }

    // --- formatted output ---

    fn display_list(&self, obj: MgrObj, _oname: &str, list: &[BatchStatus]) {
        for bs in list {
            let label = match obj {
                MgrObj::Server => "Server",
                MgrObj::Queue => "Queue",
                MgrObj::Node => "Node",
                MgrObj::Sched => "Sched",
                MgrObj::SiteHook | MgrObj::PbsHook => "Hook",
                MgrObj::Resource => "Resource",
                MgrObj::Job => "Job",
                MgrObj::Resv => "Resv",
            };
            println!("{label} {}", bs.name);
            for attr in &bs.attribs {
                let mut lhs = format!("    {}", attr.name);
                if let Some(r) = &attr.resource {
                    lhs.push('.');
                    lhs.push_str(r);
                }
                print!("{lhs} = ");
                // Wrap long comma-separated values the way interactive
                // listings always have.
                let mut width = lhs.len() + 3;
                let mut first = true;
                let pieces: Vec<&str> = attr.value.split(',').collect();
                let last = pieces.len() - 1;
                for (i, piece) in pieces.iter().enumerate() {
                    let piece_trimmed = if first { piece } else { piece.trim_start() };
                    width += piece_trimmed.len() + 1;
                    if !first && width >= 80 {
                        print!("\n\t");
                        width = 8 + piece_trimmed.len();
                    }
                    print!("{piece_trimmed}");
                    if i != last {
                        print!(",");
                    }
                    first = false;
                }
                println!();
            }
            println!();
        }
    }

    async fn display_print(
        &mut self,
        obj: MgrObj,
        parent: MgrObj,
        oname: &str,
        list: &[BatchStatus],
        spec: &str,
        h: ConnHandle,
    ) -> Result<(), BatchError> {
        if !list.is_empty() {
            match obj {
                MgrObj::Server => println!("#\n# Set server attributes.\n#"),
                MgrObj::Queue if parent == MgrObj::Server => {
                    println!("#\n# Create queues and set their attributes.\n#")
                }
                MgrObj::Resource if parent == MgrObj::Server => {
                    println!("#\n# Create resources and set their properties.\n#")
                }
                MgrObj::Node => println!("#\n# Create nodes and set their properties.\n#"),
                MgrObj::SiteHook => println!("#\n# Create hooks and set their properties.\n#"),
                MgrObj::PbsHook => println!("#\n# Set PBS hooks properties.\n#"),
                _ => {}
            }
        }

        // Reservation-backed queues never replay: recreating them on a
        // fresh server would corrupt the reservation state.
        let resv_queues: Vec<String> = if obj == MgrObj::Queue && parent == MgrObj::Server {
            self.reservation_queues(h).await
        } else {
            Vec::new()
        };

        for bs in list {
            if obj == MgrObj::Sched && !oname.is_empty() && oname != bs.name {
                continue;
            }
            if obj == MgrObj::Queue && resv_queues.contains(&bs.name) {
                continue;
            }

            match obj {
                MgrObj::Sched => {
                    println!("#\n# Create and define scheduler {}\n#", bs.name);
                    println!("create sched {}", bs.name);
                }
                MgrObj::Queue => {
                    println!("#\n# Create and define queue {}\n#", bs.name);
                    println!("create queue {}", bs.name);
                }
                MgrObj::Resource => {
                    println!("#\n# Create and define resource {}\n#", bs.name);
                    println!("create resource {}", bs.name);
                }
                MgrObj::Node => self.print_node_create(bs),
                MgrObj::SiteHook => {
                    println!("#\n# Create and define hook {}\n#", bs.name);
                    println!("create hook {}", bs.name);
                }
                MgrObj::PbsHook => println!("#\n# Set pbshook {}\n#", bs.name),
                MgrObj::Server | MgrObj::Job | MgrObj::Resv => {}
            }

            for attr in &bs.attribs {
                self.print_set_lines(obj, bs, attr);
            }

            if obj == MgrObj::SiteHook || obj == MgrObj::PbsHook {
                self.print_hook_content(obj, &bs.name, spec, h).await?;
            }
        }
        Ok(())
    }

    fn print_node_create(&self, bs: &BatchStatus) {
        print!("#\n# Create and define node {}\n#\n", bs.name);
        print!("create node {}", bs.name);
        let mut first = true;
        if let Some(mom) = bs.find_attr("Mom", None) {
            if mom.value != bs.name {
                if mom.value.contains(',') {
                    print!(" Mom=\"{}\"", mom.value);
                } else {
                    print!(" Mom={}", mom.value);
                }
                first = false;
            }
        }
        if let Some(port) = bs.find_attr("Port", None) {
            if port.value != "15002" {
                print!("{}Port={}", if first { " " } else { "," }, port.value);
            }
        }
        println!();
    }

    /// Emits the `set obj name attr = value` lines for one attribute,
    /// re-parseable by the directive parser.
    fn print_set_lines(&self, obj: MgrObj, bs: &BatchStatus, attr: &Attrl) {
        let def = catalog::find(obj, &attr.name);
        let is_hook = obj.is_hook();
        if !is_hook {
            // Only attributes a replay could set are worth emitting.
            match def {
                None => return,
                Some(d) if d.flags.contains(AttrFlags::READ_ONLY) => return,
                Some(_) => {}
            }
            if obj == MgrObj::Node {
                if matches!(attr.name.as_str(), "Mom" | "Port" | "Host") {
                    return;
                }
                if attr.name == "state"
                    && (attr.value.starts_with("state-unknown") || attr.value == "down")
                {
                    return;
                }
            }
        }

        let prefix = match obj {
            MgrObj::Server => "set server ".to_string(),
            MgrObj::Sched => {
                if bs.name == DFLT_SCHED_NAME {
                    "set sched ".to_string()
                } else {
                    format!("set sched {} ", bs.name)
                }
            }
            MgrObj::Queue => format!("set queue {} ", bs.name),
            MgrObj::Node => format!("set node {} ", bs.name),
            MgrObj::SiteHook => format!("set hook {} ", bs.name),
            MgrObj::PbsHook => format!("set pbshook {} ", bs.name),
            MgrObj::Resource => format!("set resource {} ", bs.name),
            MgrObj::Job => format!("set job {} ", bs.name),
            MgrObj::Resv => format!("set resv {} ", bs.name),
        };

        let lhs = match &attr.resource {
            Some(r) => format!("{}.{}", attr.name, r),
            None => attr.name.clone(),
        };

        // Plain-string attributes print whole; resource entries whose
        // resource is itself string-typed also never split on commas.
        let whole_string = def.map(|d| d.ty == AttrType::Str).unwrap_or(false);
        let resc_is_string = attr
            .resource
            .as_deref()
            .and_then(catalog::find_resc)
            .map(|d| d.ty == AttrType::Str)
            .unwrap_or(false);

        if whole_string {
            println!("{prefix}{lhs} = {}", quote_if_needed(&attr.value));
            return;
        }

        let pieces: Vec<&str> = if resc_is_string {
            vec![attr.value.as_str()]
        } else {
            attr.value.split(',').collect()
        };
        for (i, piece) in pieces.iter().enumerate() {
            let piece = if i == 0 { *piece } else { piece.trim_start() };
            let op = if i == 0 { "=" } else { "+=" };
            println!("{prefix}{lhs} {op} {}", quote_if_needed(piece));
        }
    }

    /// Embeds a hook's content (and config file, when present) into the
    /// print stream as `import` directives with base64 bodies.
    async fn print_hook_content(
        &mut self,
        obj: MgrObj,
        hook_name: &str,
        spec: &str,
        h: ConnHandle,
    ) -> Result<(), BatchError> {
        let staged = match self.hooks.tempfile() {
            Ok(p) => p.to_path_buf(),
            Err(msg) => {
                self.pstderr(&format!("{msg}\n"));
                self.pstderr("can't display hooks data - no hook_tempfile!\n");
                return Ok(());
            }
        };
        let basename = staged
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let word = if obj == MgrObj::SiteHook { "hook" } else { "pbshook" };
        let content_types: &[&str] = if obj == MgrObj::SiteHook {
            &[HOOKSTR_CONTENT, HOOKSTR_CONFIG]
        } else {
            &[HOOKSTR_CONFIG]
        };

        for &content_type in content_types {
            let attrs = vec![
                AttrOp::set(CONTENT_TYPE_PARAM, content_type),
                AttrOp::set(CONTENT_ENCODING_PARAM, HOOKSTR_BASE64),
                AttrOp::set(OUTPUT_FILE_PARAM, basename.clone()),
            ];
            let export = self
                .api
                .manager(h, MgrCmd::Export, obj, hook_name, &attrs, None)
                .await;
            if export.is_ok() {
                println!("import {word} {hook_name} {content_type} {HOOKSTR_BASE64} -");
                let mut out = std::io::stdout();
                if let Err(msg) = emit_base64(&staged, &mut out) {
                    self.pstderr(&format!("{msg}\n"));
                }
            } else {
                debug!(hook = hook_name, server = spec, content_type, "hook content not present");
            }
        }
        Ok(())
    }

    async fn reservation_queues(&mut self, h: ConnHandle) -> Vec<String> {
        let filter = [Attrl::new("queue")];
        match self.api.stat_resv(h, "", &filter, None).await {
            Ok(list) => list
                .iter()
                .filter_map(|bs| bs.attribs.first().map(|a| a.value.clone()))
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

enum RunError {
    Failed(ExitClass),
    Fatal,
}

/// Quotes a value for replayable output when it carries quotes, spaces, or
/// commas; prefers double quotes, switching when the value contains them.
fn quote_if_needed(value: &str) -> String {
    if value.contains(['"', '\'', ' ', ',']) {
        if value.contains('"') {
            format!("'{value}'")
        } else {
            format!("\"{value}\"")
        }
    } else {
        value.to_string()
    }
}
