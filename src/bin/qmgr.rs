// src/bin/qmgr.rs

//! The administrative command interpreter.

use anyhow::Result;
use clap::Parser;
use openbatch::client::Ifl;
use openbatch::config::PbsConfig;
use openbatch::qmgr::history::{History, history_path};
use openbatch::qmgr::lexer::{BufLineSource, LineSource, RequestReader};
use openbatch::qmgr::{ExitClass, Qmgr, QmgrOpts, run_command, run_session};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "qmgr",
    version,
    about = "Administrative interface to the batch server",
    override_usage = "qmgr [-a] [-c command] [-e] [-n] [-z] [server...]"
)]
struct Args {
    /// Abort on the first syntax or execution error.
    #[arg(short = 'a')]
    abort: bool,

    /// Execute a single command and exit.
    #[arg(short = 'c', value_name = "command")]
    command: Option<String>,

    /// Echo each command before running it.
    #[arg(short = 'e')]
    echo: bool,

    /// Check syntax only; execute nothing.
    #[arg(short = 'n')]
    noexec: bool,

    /// Suppress error output.
    #[arg(short = 'z')]
    silent: bool,

    /// Servers to administer; defaults to the configured server.
    servers: Vec<String>,
}

/// Interactive line source over the line editor.
struct EditorSource {
    rl: DefaultEditor,
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        match self.rl.readline(prompt) {
            Ok(line) => {
                let _ = self.rl.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(std::io::Error::other(e.to_string())),
        }
    }
}

fn stdin_is_tty() -> bool {
    unsafe { libc::isatty(0) == 1 && libc::isatty(1) == 1 }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let args = Args::parse();

    let cfg = match PbsConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load pbs.conf: {e}");
            std::process::exit(2);
        }
    };

    let opts = QmgrOpts {
        abort: args.abort,
        echo: args.echo,
        noexec: args.noexec,
        silent: args.silent,
    };
    let interactive = args.command.is_none() && stdin_is_tty();
    let mut qmgr = Qmgr::new(cfg.clone(), Ifl::new(), opts, interactive);

    if let Err(class) = qmgr.connect_initial(&args.servers).await {
        qmgr.shutdown().await;
        std::process::exit(class as i32);
    }

    let exit_class = if let Some(command) = &args.command {
        let class = run_command(&mut qmgr, command).await;
        if args.abort && class != ExitClass::Ok {
            qmgr.shutdown().await;
            std::process::exit(class as i32);
        }
        class
    } else if interactive {
        println!("Max open servers: {}", openbatch::client::connection::max_connections());
        let mut history = History::load(history_path(&cfg));
        let rl = DefaultEditor::new().map_err(|e| anyhow::anyhow!("line editor: {e}"))?;
        let mut source = EditorSource { rl };
        for line in history.iter() {
            let _ = source.rl.add_history_entry(line);
        }
        let mut reader = RequestReader::new(source);
        run_session(&mut qmgr, &mut reader, Some(&mut history)).await
    } else {
        let mut reader =
            RequestReader::new(BufLineSource::new(std::io::BufReader::new(std::io::stdin())));
        run_session(&mut qmgr, &mut reader, None).await
    };

    qmgr.shutdown().await;
    std::process::exit(exit_class as i32);
}
