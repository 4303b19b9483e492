use openbatch::config::{DEFAULT_BATCH_PORT, PbsConfig};
use std::fs;

#[test]
fn test_defaults_when_file_missing() {
    let cfg = PbsConfig::from_file("/nonexistent/pbs.conf").unwrap();
    assert_eq!(cfg.pbs_batch_service_port, DEFAULT_BATCH_PORT);
    assert!(!cfg.pbs_server.is_empty());
}

/// File parsing and environment override live in one test: the override
/// mutates process-wide environment and must not race the file assertions.
#[test]
fn test_file_values_and_environment_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pbs.conf");
    fs::write(
        &path,
        "PBS_SERVER=headnode01\nPBS_BATCH_SERVICE_PORT=16001\nPBS_HOME=/var/spool/testpbs\n",
    )
    .unwrap();

    let cfg = PbsConfig::from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.pbs_server, "headnode01");
    assert_eq!(cfg.pbs_batch_service_port, 16001);
    assert_eq!(cfg.pbs_home, "/var/spool/testpbs");
    assert_eq!(
        cfg.hooks_workdir(),
        std::path::Path::new("/var/spool/testpbs/server_priv/hooks")
    );
    assert_eq!(
        cfg.spool_dir(),
        std::path::Path::new("/var/spool/testpbs/spool")
    );

    unsafe {
        std::env::set_var("PBS_SERVER", "from_env");
    }
    let overridden = PbsConfig::from_file(path.to_str().unwrap()).unwrap();
    unsafe {
        std::env::remove_var("PBS_SERVER");
    }
    assert_eq!(overridden.pbs_server, "from_env");
    // Values the environment does not name still come from the file.
    assert_eq!(overridden.pbs_batch_service_port, 16001);
}

#[test]
fn test_resolve_server_spec() {
    let cfg = PbsConfig::default();
    let (host, port) = cfg.resolve_server("svr2:1700");
    assert_eq!(host, "svr2");
    assert_eq!(port, 1700);

    let (host, port) = cfg.resolve_server("svr2");
    assert_eq!(host, "svr2");
    assert_eq!(port, cfg.pbs_batch_service_port);

    let (host, _) = cfg.resolve_server("");
    assert_eq!(host, cfg.pbs_server);
}
