mod common;

use common::{ServerBehavior, TestServer};
use openbatch::client::dispatch::dedup_job_ids;
use openbatch::client::{Ifl, connection, disconnect};
use openbatch::config::PbsConfig;
use openbatch::core::errors::ErrCode;

#[test]
fn test_dedup_keeps_first_occurrence_order() {
    let ids = vec![
        "1".to_string(),
        "2".to_string(),
        "2".to_string(),
        "3".to_string(),
        "1".to_string(),
    ];
    assert_eq!(dedup_job_ids(ids), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_mixed_outcomes() {
    let server = TestServer::with_behavior(ServerBehavior {
        unknown_jobs: ["2".to_string()].into_iter().collect(),
        history_jobs: ["3".to_string()].into_iter().collect(),
        ..ServerBehavior::default()
    })
    .await;

    let cfg = PbsConfig::default();
    let api = Ifl::new();
    let h = connection::connect(&server.addr, &cfg).await.unwrap();

    let ids = vec![
        "1".to_string(),
        "2".to_string(),
        "2".to_string(),
        "3".to_string(),
    ];
    let results = api.del_job_list(h, ids, None).await.unwrap();

    // The duplicate collapsed before the wire.
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].name, "1");
    assert_eq!(results[0].code, ErrCode::None);
    assert_eq!(results[1].name, "2");
    assert_eq!(results[1].code, ErrCode::UnkJobId);
    assert_eq!(results[2].name, "3");
    assert_eq!(results[2].code, ErrCode::HistJobId);
    // The history message interpolates the job id.
    assert_eq!(results[2].text.as_deref(), Some("Job 3 has finished"));

    // Only the deletable job was deleted.
    assert_eq!(server.state.lock().unwrap().deleted, vec!["1"]);

    disconnect(h).await.unwrap();
}

#[tokio::test]
async fn test_empty_list_rejected_locally() {
    let server = TestServer::start().await;
    let cfg = PbsConfig::default();
    let api = Ifl::new();
    let h = connection::connect(&server.addr, &cfg).await.unwrap();

    let err = api.del_job_list(h, Vec::new(), None).await.unwrap_err();
    assert_eq!(err.code(), ErrCode::IvalReq);

    disconnect(h).await.unwrap();
}
