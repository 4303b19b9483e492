// src/bin/qstop.rs

//! Stop scheduling on destinations: sets the queue's `started` attribute
//! to false through a manager request.

use clap::Parser;
use openbatch::client::locate::parse_destination;
use openbatch::client::{Ifl, connection, disconnect};
use openbatch::config::PbsConfig;
use openbatch::core::attrs::{AttrOp, MgrCmd, MgrObj};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "qstop",
    version,
    about = "Stop batch queues",
    override_usage = "qstop [queue][@server] ..."
)]
struct Args {
    /// Destinations to stop.
    #[arg(required = true, value_name = "destination")]
    destinations: Vec<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let args = Args::parse();
    let cfg = PbsConfig::load().unwrap_or_default();
    let api = Ifl::new();
    let mut exitstatus = 0;

    for dest in &args.destinations {
        let (queue, server) = match parse_destination(dest) {
            Ok(parts) => parts,
            Err(_) => {
                eprintln!("qstop: illegally formed destination: {dest}");
                exitstatus = 1;
                continue;
            }
        };
        let server = server.unwrap_or_default();
        let queue = queue.unwrap_or_default();

        let h = match connection::connect(&server, &cfg).await {
            Ok(h) => h,
            Err(e) => {
                eprintln!(
                    "qstop: could not connect to server {} ({})",
                    if server.is_empty() { &cfg.pbs_server } else { &server },
                    e.code() as i32
                );
                exitstatus = 2;
                continue;
            }
        };

        let attr = [AttrOp::set("started", "FALSE")];
        if let Err(e) = api
            .manager(h, MgrCmd::Set, MgrObj::Queue, &queue, &attr, None)
            .await
        {
            match connection::geterrmsg(h) {
                Some(msg) => eprint!("qstop: {msg} "),
                None => eprint!("qstop: Error ({}) disabling queue ", e.code() as i32),
            }
            if !queue.is_empty() {
                eprint!("{queue}");
            }
            if !server.is_empty() {
                eprint!("@{server}");
            }
            eprintln!();
            exitstatus = 2;
        }
        let _ = disconnect(h).await;
    }

    std::process::exit(exitstatus);
}
