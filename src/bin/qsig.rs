// src/bin/qsig.rs

//! Send a signal to one or more batch jobs.

use clap::Parser;
use openbatch::client::locate::{parse_job_id, should_locate};
use openbatch::client::{Ifl, connection, disconnect};
use openbatch::config::PbsConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "qsig",
    version,
    about = "Signal batch jobs",
    override_usage = "qsig [-s signal] job_identifier..."
)]
struct Args {
    /// Signal name or number to deliver.
    #[arg(short = 's', value_name = "signal", default_value = "SIGTERM")]
    signal: String,

    /// Jobs to signal.
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
    let mut any_failed: i32 = 0;

    for job in &args.jobs {
        let (job_id, job_server) = match parse_job_id(job) {
            Ok(parts) => parts,
            Err(_) => {
                eprintln!("qsig: illegally formed job identifier: {job}");
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
                        "qsig: cannot connect to server {} (errno={})",
                        if server.is_empty() { &cfg.pbs_server } else { &server },
                        e.code() as i32
                    );
                    any_failed = e.code() as i32;
                    break;
                }
            };

            match api.sig_job(h, &job_id, &args.signal, None).await {
                Ok(()) => {
                    let _ = disconnect(h).await;
                    break;
                }
                Err(e) if should_locate(&e) && !located => {
                    located = true;
                    // One relocation attempt: ask where the job lives,
                    // reconnect there, retry the signal.
                    match api.locate_job(h, &job_id, None).await {
                        Ok(remote) => {
                            let _ = disconnect(h).await;
                            server = remote;
                            continue;
                        }
                        Err(_) => {
                            prt_job_err("qsig", h, e.code() as i32, &job_id);
                            any_failed = e.code() as i32;
                            let _ = disconnect(h).await;
                            break;
                        }
                    }
                }
                Err(e) => {
                    prt_job_err("qsig", h, e.code() as i32, &job_id);
                    any_failed = e.code() as i32;
                    let _ = disconnect(h).await;
                    break;
                }
            }
        }
    }

    std::process::exit(any_failed);
}
