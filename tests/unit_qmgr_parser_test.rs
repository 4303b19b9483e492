use openbatch::core::attrs::{BatchOp, MgrCmd, MgrObj};
use openbatch::qmgr::parser::{
    Directive, ObjName, ServerRef, check_list, parse_directive, parse_name_list,
};

fn manage(req: &str) -> openbatch::qmgr::parser::ManageDirective {
    match parse_directive(req).unwrap().unwrap() {
        Directive::Manage(m) => m,
        other => panic!("expected manage directive, got {other:?}"),
    }
}

#[test]
fn test_create_queue_with_attributes() {
    let m = manage("create queue workq queue_type=execution,enabled=t,started=t");
    assert_eq!(m.cmd, MgrCmd::Create);
    assert_eq!(m.obj, MgrObj::Queue);
    assert_eq!(m.names, vec![ObjName::bare("workq")]);
    let kv: Vec<(&str, &str)> = m
        .attrs
        .iter()
        .map(|a| (a.name.as_str(), a.value.as_str()))
        .collect();
    assert_eq!(
        kv,
        vec![
            ("queue_type", "execution"),
            ("enabled", "t"),
            ("started", "t")
        ]
    );
}

#[test]
fn test_name_list_boundary_offsets() {
    // a,b@svr,@svr are all fine; name@ fails.
    assert!(check_list("a,b@svr,@svr", MgrObj::Queue).is_ok());
    assert_eq!(check_list("name@", MgrObj::Queue).unwrap_err(), 5);
    // Adjacent @s.
    assert!(check_list("a@b@c", MgrObj::Queue).is_err());
    // Trailing comma.
    assert!(check_list("a,b,", MgrObj::Queue).is_err());
    // Queue names need an alphabetic lead; node names may be numeric.
    assert!(check_list("9q", MgrObj::Queue).is_err());
    assert!(check_list("9node", MgrObj::Node).is_ok());
}

#[test]
fn test_name_server_shapes() {
    let names = parse_name_list("q1,q2@svr,@svr,q3@default,q4@active");
    assert_eq!(names[0], ObjName::bare("q1"));
    assert_eq!(
        names[1].server,
        Some(ServerRef::Named("svr".to_string()))
    );
    assert_eq!(names[2].name, "");
    assert_eq!(names[3].server, Some(ServerRef::Default));
    assert_eq!(names[4].server, Some(ServerRef::Active));
}

#[test]
fn test_operators() {
    let m = manage("set server max_running = 10, resources_default.ncpus += 2, acl_hosts -= h1@x");
    assert_eq!(m.attrs[0].op, BatchOp::Set);
    assert_eq!(m.attrs[1].op, BatchOp::Incr);
    assert_eq!(m.attrs[1].resource.as_deref(), Some("ncpus"));
    assert_eq!(m.attrs[2].op, BatchOp::Decr);
}

#[test]
fn test_quoted_values_survive() {
    let m = manage("set server comment = \"all work, no play\"");
    assert_eq!(m.attrs[0].value, "all work, no play");
}

#[test]
fn test_entlim_whitespace_value() {
    let m = manage("set server max_run = [u:alice = 3, g:staff = 5]");
    assert_eq!(m.attrs.len(), 1);
    assert_eq!(m.attrs[0].name, "max_run");
    assert_eq!(m.attrs[0].value, "[u:alice = 3, g:staff = 5]");
}

#[test]
fn test_entlim_duplicate_rejected_at_parse() {
    assert!(parse_directive("set server max_run = [u:a=1, u:a=2]").is_err());
}

#[test]
fn test_caret_offset_points_into_request() {
    let err = parse_directive("set server =5").unwrap_err();
    let caret = err.caret.expect("syntax errors carry a caret");
    assert!(caret >= "set server ".len() - 1);
    assert!(caret < "set server =5".len());
}

#[test]
fn test_unset_shapes() {
    let m = manage("unset queue workq resources_max.walltime,enabled");
    assert_eq!(m.cmd, MgrCmd::Unset);
    assert_eq!(m.attrs.len(), 2);
    assert_eq!(m.attrs[0].resource.as_deref(), Some("walltime"));
    assert!(parse_directive("unset queue workq enabled=true").is_err());
}

#[test]
fn test_command_prefixes() {
    assert_eq!(manage("c q x").cmd, MgrCmd::Create);
    assert_eq!(manage("d q x").cmd, MgrCmd::Delete);
    assert_eq!(manage("s s scheduling=1").cmd, MgrCmd::Set);
    assert_eq!(manage("u s scheduling").cmd, MgrCmd::Unset);
    assert_eq!(manage("l s").cmd, MgrCmd::List);
    assert_eq!(manage("p s").cmd, MgrCmd::Print);
    // "e" resolves to export before exit.
    assert!(parse_directive("e hook h application/x-python base64 out").is_ok());
    assert_eq!(parse_directive("quit").unwrap().unwrap(), Directive::Quit);
}

#[test]
fn test_objects_and_plurals() {
    assert_eq!(manage("l server").obj, MgrObj::Server);
    assert_eq!(manage("l queues").obj, MgrObj::Queue);
    assert_eq!(manage("l nodes").obj, MgrObj::Node);
    assert_eq!(manage("l sched").obj, MgrObj::Sched);
    assert_eq!(manage("l resource").obj, MgrObj::Resource);
    assert_eq!(manage("l hook h").obj, MgrObj::SiteHook);
    assert_eq!(manage("l pbshook h").obj, MgrObj::PbsHook);
}

#[test]
fn test_attribute_name_in_name_slot() {
    let m = manage("list queue enabled");
    assert!(m.names.is_empty());
    assert_eq!(m.attrs[0].name, "enabled");

    // Hooks never take the shortcut: the token is a hook name.
    let m = manage("list hook enabled");
    assert_eq!(m.names, vec![ObjName::bare("enabled")]);
}

#[test]
fn test_illegal_operation_and_object() {
    let err = parse_directive("frobnicate server").unwrap_err();
    assert!(err.message.contains("Illegal operation"));
    let err = parse_directive("list gadget").unwrap_err();
    assert!(err.message.contains("Illegal object type"));
    let err = parse_directive("list").unwrap_err();
    assert!(err.message.contains("No object type"));
}

#[test]
fn test_import_directive() {
    let m = manage("import hook myhook application/x-python base64 data.b64");
    assert_eq!(m.cmd, MgrCmd::Import);
    assert_eq!(m.obj, MgrObj::SiteHook);
    assert_eq!(m.names, vec![ObjName::bare("myhook")]);
    assert_eq!(m.attrs.len(), 3);
    assert_eq!(m.attrs[2].value, "data.b64");

    // stdin marker parses as a value.
    let m = manage("import hook myhook application/x-python default -");
    assert_eq!(m.attrs[2].value, "-");
}

#[test]
fn test_export_directive_optional_file() {
    let m = manage("export hook myhook application/x-python base64");
    assert_eq!(m.cmd, MgrCmd::Export);
    assert_eq!(m.attrs[2].value, "");
}
