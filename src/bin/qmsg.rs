// src/bin/qmsg.rs

//! Write a message into the output and/or error file of running jobs.

use clap::Parser;
use openbatch::client::locate::{parse_job_id, should_locate};
use openbatch::client::{Ifl, connection, disconnect};
use openbatch::config::PbsConfig;
use openbatch::core::protocol::MsgFile;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "qmsg",
    version,
    about = "Send a message to batch jobs",
    override_usage = "qmsg [-O] [-E] msg_string job_identifier..."
)]
struct Args {
    /// Write to the job's standard error file.
    #[arg(short = 'E')]
    to_err: bool,

    /// Write to the job's standard output file.
    #[arg(short = 'O')]
    to_out: bool,

    /// The message text.
    #[arg(value_name = "msg_string")]
    message: String,

    /// Jobs to message.
    #[arg(required = true, value_name = "job_identifier")]
    jobs: Vec<String>,
}

fn prt_job_err(cmd: &str, h: connection::ConnHandle, code: i32, job: &str) {
    match connection::geterrmsg(h) {
        Some(msg) => eprintln!("{cmd}: {msg} {job}"),
        None => eprintln!("{cmd}: Error ({code}) {job}"),
    }
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

    let mut to = MsgFile::empty();
    if args.to_err {
        to |= MsgFile::ERR;
    }
    if args.to_out {
        to |= MsgFile::OUT;
    }
    if to.is_empty() {
        to = MsgFile::ERR;
    }

    let mut any_failed: i32 = 0;

    for job in &args.jobs {
        let (job_id, job_server) = match parse_job_id(job) {
            Ok(parts) => parts,
            Err(_) => {
                eprintln!("qmsg: illegally formed job identifier: {job}");
                any_failed = 1;
                continue;
            }
        };

        let mut server = job_server.unwrap_or_default();
        let mut located = false;
        loop {
            let h = match connection::connect(&server, &cfg).await {
                Ok(h) => h,
                Err(e) => {
                    eprintln!(
                        "qmsg: cannot connect to server {} (errno={})",
                        if server.is_empty() { &cfg.pbs_server } else { &server },
                        e.code() as i32
                    );
                    any_failed = e.code() as i32;
                    break;
                }
            };

            match api.msg_job(h, &job_id, to, &args.message, None).await {
                Ok(()) => {
                    let _ = disconnect(h).await;
                    break;
                }
                Err(e) if should_locate(&e) && !located => {
                    located = true;
                    match api.locate_job(h, &job_id, None).await {
                        Ok(remote) => {
                            let _ = disconnect(h).await;
                            server = remote;
                            continue;
                        }
                        Err(_) => {
                            prt_job_err("qmsg", h, e.code() as i32, &job_id);
                            any_failed = e.code() as i32;
                            let _ = disconnect(h).await;
                            break;
                        }
                    }
                }
                Err(e) => {
                    prt_job_err("qmsg", h, e.code() as i32, &job_id);
                    any_failed = e.code() as i32;
                    let _ = disconnect(h).await;
                    break;
                }
            }
        }
    }

    std::process::exit(any_failed);
}
