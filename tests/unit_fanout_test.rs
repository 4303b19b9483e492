mod common;

use common::{ServerBehavior, TestServer};
use openbatch::client::locate::should_locate;
use openbatch::client::{Ifl, connection, disconnect};
use openbatch::config::PbsConfig;
use openbatch::core::attrs::{AttrOp, MgrCmd, MgrObj};
use openbatch::core::errors::ErrCode;
use openbatch::qmgr::parser::{Directive, parse_directive};
use openbatch::qmgr::{DirectiveOutcome, ExitClass, Qmgr, QmgrOpts};

fn cfg() -> PbsConfig {
    PbsConfig::default()
}

async fn qmgr_for(servers: &[&str]) -> Qmgr {
    let mut q = Qmgr::new(cfg(), Ifl::new(), QmgrOpts::default(), false);
    let specs: Vec<String> = servers.iter().map(|s| s.to_string()).collect();
    q.connect_initial(&specs).await.expect("initial connect");
    q
}

fn directive(text: &str) -> openbatch::qmgr::ManageDirective {
    match parse_directive(text).unwrap().unwrap() {
        Directive::Manage(m) => m,
        other => panic!("expected manage directive, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_queue_and_list_it_back() {
    let server = TestServer::start().await;
    let mut qmgr = qmgr_for(&[&server.addr]).await;

    let create = directive("create queue workq queue_type=execution,enabled=t,started=t");
    assert_eq!(qmgr.execute(&create).await, DirectiveOutcome::Ok);

    assert_eq!(server.queue_attr("workq", "queue_type").as_deref(), Some("Execution"));
    assert_eq!(server.queue_attr("workq", "enabled").as_deref(), Some("True"));
    assert_eq!(server.queue_attr("workq", "started").as_deref(), Some("True"));

    let list = directive("list queue workq");
    assert_eq!(qmgr.execute(&list).await, DirectiveOutcome::Ok);

    qmgr.shutdown().await;
}

#[tokio::test]
async fn test_multi_server_partial_failure_without_abort() {
    let server_a = TestServer::start().await;
    let server_b = TestServer::with_behavior(ServerBehavior {
        reject_manager: Some((ErrCode::Perm, "Unauthorized Request".to_string())),
        ..ServerBehavior::default()
    })
    .await;

    let mut qmgr = qmgr_for(&[&server_a.addr, &server_b.addr]).await;
    let set = directive("set server max_running = 10");
    let outcome = qmgr.execute(&set).await;

    // Execution continued past B's rejection and reported the failure.
    assert_eq!(outcome, DirectiveOutcome::Error(ExitClass::Execute));
    assert_eq!(server_a.server_attr("max_running").as_deref(), Some("10"));
    assert_eq!(server_b.server_attr("max_running"), None);

    qmgr.shutdown().await;
}

#[tokio::test]
async fn test_multi_server_abort_stops_at_first_error() {
    let server_a = TestServer::with_behavior(ServerBehavior {
        reject_manager: Some((ErrCode::Perm, "Unauthorized Request".to_string())),
        ..ServerBehavior::default()
    })
    .await;
    let server_b = TestServer::start().await;

    let mut qmgr = Qmgr::new(
        cfg(),
        Ifl::new(),
        QmgrOpts {
            abort: true,
            ..QmgrOpts::default()
        },
        false,
    );
    qmgr.connect_initial(&[server_a.addr.clone(), server_b.addr.clone()])
        .await
        .unwrap();

    let set = directive("set server max_running = 10");
    assert_eq!(
        qmgr.execute(&set).await,
        DirectiveOutcome::Error(ExitClass::Execute)
    );
    // B was never touched.
    assert_eq!(server_b.server_attr("max_running"), None);

    qmgr.shutdown().await;
}

#[tokio::test]
async fn test_name_pinned_to_one_server() {
    let server_a = TestServer::start().await;
    let server_b = TestServer::start().await;
    let mut qmgr = qmgr_for(&[&server_a.addr, &server_b.addr]).await;

    let create = directive(&format!("create queue only@{} enabled=t", server_b.addr));
    assert_eq!(qmgr.execute(&create).await, DirectiveOutcome::Ok);

    assert!(server_a.state.lock().unwrap().queues.is_empty());
    assert_eq!(server_b.queue_attr("only", "enabled").as_deref(), Some("True"));

    qmgr.shutdown().await;
}

#[tokio::test]
async fn test_set_unset_idempotence() {
    let server = TestServer::start().await;
    let mut qmgr = qmgr_for(&[&server.addr]).await;

    let set = directive("set server max_running = 10");
    assert_eq!(qmgr.execute(&set).await, DirectiveOutcome::Ok);
    assert_eq!(qmgr.execute(&set).await, DirectiveOutcome::Ok);
    assert_eq!(server.server_attr("max_running").as_deref(), Some("10"));

    let unset = directive("unset server max_running");
    assert_eq!(qmgr.execute(&unset).await, DirectiveOutcome::Ok);
    assert_eq!(server.server_attr("max_running"), None);
    // Unsetting the already-unset attribute still succeeds.
    assert_eq!(qmgr.execute(&unset).await, DirectiveOutcome::Ok);

    qmgr.shutdown().await;
}

#[tokio::test]
async fn test_verification_failure_sends_nothing() {
    let server = TestServer::start().await;
    let mut qmgr = qmgr_for(&[&server.addr]).await;

    let bad = directive("set server total_jobs = 7");
    assert_eq!(
        qmgr.execute(&bad).await,
        DirectiveOutcome::Error(ExitClass::Execute)
    );
    assert_eq!(server.server_attr("total_jobs"), None);

    qmgr.shutdown().await;
}

/// The locate-and-retry idiom, driven exactly the way `qsig` drives it.
#[tokio::test]
async fn test_signal_with_relocation() {
    let server_b = TestServer::start().await;
    let server_a = TestServer::with_behavior(ServerBehavior {
        unknown_jobs: ["123.old".to_string()].into_iter().collect(),
        locate_to: Some(server_b.addr.clone()),
        ..ServerBehavior::default()
    })
    .await;

    let api = Ifl::new();
    let cfg = cfg();
    let mut server = server_a.addr.clone();
    let mut located = false;
    let mut result = None;

    loop {
        let h = connection::connect(&server, &cfg).await.unwrap();
        match api.sig_job(h, "123.old", "SIGTERM", None).await {
            Ok(()) => {
                result = Some(Ok::<(), ErrCode>(()));
                let _ = disconnect(h).await;
                break;
            }
            Err(e) if should_locate(&e) && !located => {
                located = true;
                let remote = api.locate_job(h, "123.old", None).await.unwrap();
                let _ = disconnect(h).await;
                server = remote;
            }
            Err(e) => {
                result = Some(Err(e.code()));
                let _ = disconnect(h).await;
                break;
            }
        }
    }

    assert_eq!(result, Some(Ok(())));
    let signaled = server_b.state.lock().unwrap().signaled.clone();
    assert_eq!(signaled, vec![("123.old".to_string(), "SIGTERM".to_string())]);
    assert!(server_a.state.lock().unwrap().signaled.is_empty());
}

#[tokio::test]
async fn test_stale_handle_is_a_hard_error() {
    let server = TestServer::start().await;
    let cfg = cfg();
    let h = connection::connect(&server.addr, &cfg).await.unwrap();
    disconnect(h).await.unwrap();
    // Second disconnect is an idempotent success.
    disconnect(h).await.unwrap();

    let api = Ifl::new();
    let err = api
        .manager(h, MgrCmd::Set, MgrObj::Server, "", &[AttrOp::set("scheduling", "true")], None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrCode::NoConnection);
}
