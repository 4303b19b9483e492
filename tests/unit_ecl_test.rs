use openbatch::core::attrs::{AttrOp, BatchOp, MgrCmd, MgrObj};
use openbatch::core::ecl::{VerifyContext, verify_request};
use openbatch::core::errors::ErrCode;
use openbatch::core::protocol::RequestType;

fn ctx(parent: MgrObj, cmd: Option<MgrCmd>) -> VerifyContext {
    VerifyContext {
        request: RequestType::Manager,
        parent,
        cmd,
    }
}

fn set(name: &str, value: &str) -> AttrOp {
    AttrOp::set(name, value)
}

fn verify_one(parent: MgrObj, attr: AttrOp) -> Vec<openbatch::core::ecl::EclAttrErr> {
    verify_request(&ctx(parent, Some(MgrCmd::Set)), "", &[attr])
}

#[test]
fn test_clean_set_passes() {
    let attrs = vec![
        set("scheduling", "true"),
        set("max_running", "10"),
        set("comment", "hello world"),
    ];
    assert!(verify_request(&ctx(MgrObj::Server, Some(MgrCmd::Set)), "", &attrs).is_empty());
}

#[test]
fn test_unknown_attribute() {
    let errs = verify_one(MgrObj::Server, set("no_such_thing", "1"));
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].code, ErrCode::NoAttr);
    assert_eq!(errs[0].index, 0);
}

#[test]
fn test_read_only_rejected_for_every_mutating_op() {
    for op in [BatchOp::Set, BatchOp::Unset, BatchOp::Incr, BatchOp::Decr] {
        let attr = AttrOp {
            name: "total_jobs".to_string(),
            resource: None,
            value: "1".to_string(),
            op,
        };
        let errs = verify_one(MgrObj::Server, attr);
        assert_eq!(errs.len(), 1, "op {op:?}");
        assert_eq!(errs[0].code, ErrCode::AttrRo);
    }
}

#[test]
fn test_long_boundaries() {
    let max = i64::MAX.to_string();
    assert!(verify_one(MgrObj::Server, set("max_running", &max)).is_empty());

    let over = "9223372036854775808"; // LONG_MAX + 1
    let errs = verify_one(MgrObj::Server, set("max_running", over));
    assert_eq!(errs[0].code, ErrCode::BadAtVal);
}

#[test]
fn test_bool_forms() {
    for v in ["true", "FALSE", "t", "f", "y", "n", "1", "0"] {
        assert!(
            verify_one(MgrObj::Server, set("scheduling", v)).is_empty(),
            "{v}"
        );
    }
    assert!(!verify_one(MgrObj::Server, set("scheduling", "maybe")).is_empty());
}

#[test]
fn test_size_grid() {
    for v in ["1gb", "1GB", "1024mb", "1w"] {
        assert!(
            verify_one(MgrObj::Server, set("jobscript_max_size", v)).is_empty(),
            "{v}"
        );
    }
    let errs = verify_one(MgrObj::Server, set("jobscript_max_size", "1gp"));
    assert_eq!(errs[0].code, ErrCode::BadAtVal);
}

#[test]
fn test_time_forms() {
    assert!(verify_one(MgrObj::Server, set("job_history_duration", "24:00:00")).is_empty());
    assert!(verify_one(MgrObj::Server, set("job_history_duration", "3600")).is_empty());
    assert!(!verify_one(MgrObj::Server, set("job_history_duration", "10:99:00")).is_empty());
}

#[test]
fn test_resource_entries() {
    // Known resource with its own datatype.
    let good = AttrOp::set_resource("resources_default", "mem", "2gb");
    assert!(verify_one(MgrObj::Queue, good).is_empty());

    let bad = AttrOp::set_resource("resources_default", "mem", "lots");
    let errs = verify_one(MgrObj::Queue, bad);
    assert_eq!(errs[0].code, ErrCode::BadAtVal);

    // Unknown resources pass; the server owns custom definitions.
    let custom = AttrOp::set_resource("resources_default", "sitelicense", "4");
    assert!(verify_one(MgrObj::Queue, custom).is_empty());

    // A resource entry on a non-resource attribute never flies.
    let wrong = AttrOp::set_resource("enabled", "ncpus", "1");
    let errs = verify_one(MgrObj::Queue, wrong);
    assert_eq!(errs[0].code, ErrCode::AttrType);
}

#[test]
fn test_hold_types() {
    for v in ["u", "o", "s", "p", "uo", "usp", "n"] {
        assert!(verify_one(MgrObj::Job, set("Hold_Types", v)).is_empty(), "{v}");
    }
    assert!(!verify_one(MgrObj::Job, set("Hold_Types", "x")).is_empty());
}

#[test]
fn test_jrange() {
    assert!(verify_one(MgrObj::Job, set("array_indices_submitted", "0-10:3")).is_empty());
    assert!(!verify_one(MgrObj::Job, set("array_indices_submitted", "10-0")).is_empty());
    let huge = format!("0-{}", i64::MAX);
    assert!(!verify_one(MgrObj::Job, set("array_indices_submitted", &huge)).is_empty());
}

#[test]
fn test_preempt_order() {
    assert!(verify_one(MgrObj::Sched, set("preempt_order", "SCR 70 SC 30 S")).is_empty());
    assert!(!verify_one(MgrObj::Sched, set("preempt_order", "SCR 70")).is_empty());
    assert!(!verify_one(MgrObj::Sched, set("preempt_order", "QQ")).is_empty());
}

#[test]
fn test_manager_acl_shape() {
    assert!(verify_one(MgrObj::Server, set("managers", "root@hostA,admin@hostB")).is_empty());
    let errs = verify_one(MgrObj::Server, set("managers", "root"));
    assert_eq!(errs[0].code, ErrCode::BadAtVal);
}

#[test]
fn test_entlim_values() {
    assert!(verify_one(MgrObj::Server, set("max_run", "[u:alice=3, g:staff=5]")).is_empty());
    let errs = verify_one(MgrObj::Server, set("max_run", "[u:alice=3, u:alice=5]"));
    assert!(!errs.is_empty());
}

#[test]
fn test_create_object_name() {
    let errs = verify_request(&ctx(MgrObj::Queue, Some(MgrCmd::Create)), "work q", &[]);
    assert_eq!(errs[0].code, ErrCode::BadName);
    assert!(verify_request(&ctx(MgrObj::Queue, Some(MgrCmd::Create)), "workq", &[]).is_empty());
}

#[test]
fn test_multiple_failures_accumulate_in_order() {
    let attrs = vec![
        set("scheduling", "perhaps"),
        set("max_running", "10"),
        set("bogus", "1"),
    ];
    let errs = verify_request(&ctx(MgrObj::Server, Some(MgrCmd::Set)), "", &attrs);
    assert_eq!(errs.len(), 2);
    assert_eq!(errs[0].index, 0);
    assert_eq!(errs[1].index, 2);
}

#[test]
fn test_hooks_skip_client_side_verification() {
    let attrs = vec![set("anything_at_all", "whatever")];
    assert!(verify_request(&ctx(MgrObj::SiteHook, Some(MgrCmd::Set)), "h", &attrs).is_empty());
}
