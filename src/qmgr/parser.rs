// src/qmgr/parser.rs

//! The directive parser: command and object words matched by prefix,
//! name-list validation with byte-accurate caret offsets, and the
//! attribute-list grammar `attr[.resource] OP value`.

use crate::core::attrs::{AttrOp, BatchOp, MgrCmd, MgrObj, catalog};
use crate::core::attrs::entlim::parse_entlim;
use crate::qmgr::lexer::{AllowWhite, quote_parse};

/// Parameter names of the hook import/export directives.
pub const CONTENT_TYPE_PARAM: &str = "content-type";
pub const CONTENT_ENCODING_PARAM: &str = "content-encoding";
pub const INPUT_FILE_PARAM: &str = "input-file";
pub const OUTPUT_FILE_PARAM: &str = "output-file";

/// Hook content encodings.
pub const HOOKSTR_BASE64: &str = "base64";
pub const HOOKSTR_DEFAULT: &str = "default";
/// Hook content types. A config file's name suffix travels to the server.
pub const HOOKSTR_CONTENT: &str = "application/x-python";
pub const HOOKSTR_CONFIG: &str = "application/x-config";

/// Which server a name is pinned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerRef {
    Named(String),
    /// `name@default` — the configured default server.
    Default,
    /// `name@active` — every active server.
    Active,
}

/// One entry of a directive's name list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjName {
    pub name: String,
    pub server: Option<ServerRef>,
}

impl ObjName {
    pub fn bare(name: impl Into<String>) -> ObjName {
        ObjName {
            name: name.into(),
            server: None,
        }
    }
}

/// A fully parsed manage directive.
#[derive(Debug, Clone, PartialEq)]
pub struct ManageDirective {
    pub cmd: MgrCmd,
    pub obj: MgrObj,
    pub names: Vec<ObjName>,
    pub attrs: Vec<AttrOp>,
}

/// Everything a request line can turn into.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Manage(ManageDirective),
    Help(Option<String>),
    Quit,
    History(Option<usize>),
}

/// Which stage of parsing failed; drives the exit-code class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePhase {
    Command,
    Object,
    NameList,
    AttrList,
}

/// A parse failure with the caret offset into the original request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveError {
    pub phase: ParsePhase,
    pub message: String,
    pub caret: Option<usize>,
}

impl DirectiveError {
    fn syntax(phase: ParsePhase, caret: usize) -> DirectiveError {
        DirectiveError {
            phase,
            message: "qmgr: Syntax error\n".to_string(),
            caret: Some(caret),
        }
    }
}

struct Word<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

fn next_word(input: &str, from: usize) -> Option<Word<'_>> {
    let bytes = input.as_bytes();
    let mut start = from;
    while start < bytes.len() && (bytes[start] as char).is_ascii_whitespace() {
        start += 1;
    }
    if start >= bytes.len() {
        return None;
    }
    let mut end = start;
    while end < bytes.len() && !(bytes[end] as char).is_ascii_whitespace() {
        end += 1;
    }
    Some(Word {
        text: &input[start..end],
        start,
        end,
    })
}

fn match_command(word: &str) -> Option<MgrCmd> {
    // Order matters: an ambiguous prefix resolves to the first match, the
    // way the original table did.
    const COMMANDS: &[(&str, MgrCmd)] = &[
        ("create", MgrCmd::Create),
        ("delete", MgrCmd::Delete),
        ("set", MgrCmd::Set),
        ("unset", MgrCmd::Unset),
        ("list", MgrCmd::List),
        ("print", MgrCmd::Print),
        ("active", MgrCmd::Active),
        ("import", MgrCmd::Import),
        ("export", MgrCmd::Export),
    ];
    if word.is_empty() {
        return None;
    }
    COMMANDS
        .iter()
        .find(|(full, _)| full.starts_with(word))
        .map(|(_, cmd)| *cmd)
}

fn match_object(word: &str) -> Option<MgrObj> {
    const OBJECTS: &[(&str, MgrObj)] = &[
        ("server", MgrObj::Server),
        ("queue", MgrObj::Queue),
        ("queues", MgrObj::Queue),
        ("node", MgrObj::Node),
        ("nodes", MgrObj::Node),
        ("resource", MgrObj::Resource),
        ("sched", MgrObj::Sched),
        ("hook", MgrObj::SiteHook),
        ("pbshook", MgrObj::PbsHook),
    ];
    if word.is_empty() {
        return None;
    }
    OBJECTS
        .iter()
        .find(|(full, _)| full.starts_with(word))
        .map(|(_, obj)| *obj)
}

/// Validates a comma-separated name list, returning the byte offset of the
/// first invalid character on failure. Node names may start with a digit;
/// everything else needs an alphabetic.
pub fn check_list(list: &str, obj: MgrObj) -> Result<(), usize> {
    let bytes = list.as_bytes();
    let mut back = 0usize;

    while back < bytes.len() {
        let lead = bytes[back] as char;
        let lead_ok = if obj == MgrObj::Node {
            lead.is_ascii_alphanumeric() || lead == '@'
        } else {
            lead.is_ascii_alphabetic() || lead == '@'
        };
        if !lead_ok {
            return Err(if back == 0 { 1 } else { back });
        }

        let mut fore = back;
        while fore < bytes.len() && bytes[fore] != b',' && bytes[fore] != b'@' {
            fore += 1;
        }

        if fore < bytes.len() && bytes[fore] == b'@' {
            fore += 1;
            // Reject "name@" and "name@,".
            if fore >= bytes.len() || bytes[fore] == b',' {
                return Err(fore);
            }
            while fore < bytes.len() && bytes[fore] != b',' && bytes[fore] != b'@' {
                fore += 1;
            }
            // Reject "name@svr@blah".
            if fore < bytes.len() && bytes[fore] == b'@' {
                return Err(fore);
            }
        }

        if fore < bytes.len() && bytes[fore] == b',' {
            fore += 1;
            // Reject a trailing comma.
            if fore >= bytes.len() {
                return Err(fore);
            }
        }
        back = fore;
    }
    Ok(())
}

/// Splits a validated name list into object names.
pub fn parse_name_list(list: &str) -> Vec<ObjName> {
    list.split(',')
        .filter(|tok| !tok.is_empty())
        .map(|tok| match tok.split_once('@') {
            None => ObjName::bare(tok),
            Some((name, server)) => ObjName {
                name: name.to_string(),
                server: Some(match server {
                    "default" => ServerRef::Default,
                    "active" => ServerRef::Active,
                    other => ServerRef::Named(other.to_string()),
                }),
            },
        })
        .collect()
}

fn is_op_start(bytes: &[u8], i: usize) -> bool {
    match bytes.get(i) {
        Some(b'=') => true,
        Some(b'+') | Some(b'-') => bytes.get(i + 1) == Some(&b'='),
        _ => false,
    }
}

/// Parses the attribute list `a1 = v1, a2.r2 += v2, a3 -= v3`. Returns
/// failure as the byte offset into `attrs` where the error sits.
pub fn parse_attributes(attrs: &str, obj: MgrObj, cmd: MgrCmd) -> Result<Vec<AttrOp>, usize> {
    let bytes = attrs.as_bytes();
    let mut out: Vec<AttrOp> = Vec::new();
    let mut c = 0usize;

    let skip_white = |c: &mut usize| {
        while *c < bytes.len() && (bytes[*c] as char).is_ascii_whitespace() {
            *c += 1;
        }
    };

    skip_white(&mut c);
    if c >= bytes.len() {
        return Ok(out);
    }

    loop {
        skip_white(&mut c);
        if c >= bytes.len() {
            return Err(c);
        }

        // Attribute name.
        let start = c;
        while c < bytes.len()
            && bytes[c] != b'.'
            && bytes[c] != b','
            && !is_op_start(bytes, c)
            && !(bytes[c] as char).is_ascii_whitespace()
        {
            c += 1;
        }
        if c == start {
            return Err(if start == 0 { 1 } else { start });
        }
        let name = attrs[start..c].to_string();

        // Optional resource sub-name.
        let mut resource = None;
        if c < bytes.len() && bytes[c] == b'.' {
            c += 1;
            let rstart = c;
            let stop_on_comma =
                matches!(cmd, MgrCmd::Unset | MgrCmd::List | MgrCmd::Print);
            while c < bytes.len()
                && !(bytes[c] as char).is_ascii_whitespace()
                && !is_op_start(bytes, c)
                && !(stop_on_comma && bytes[c] == b',')
            {
                c += 1;
            }
            if c == rstart {
                return Err(rstart);
            }
            resource = Some(attrs[rstart..c].to_string());
        }

        let default_op = if cmd == MgrCmd::Unset {
            BatchOp::Unset
        } else {
            BatchOp::Set
        };

        // Operator.
        skip_white(&mut c);
        let op;
        if c < bytes.len() {
            match bytes[c] {
                b'=' => {
                    op = BatchOp::Set;
                    c += 1;
                }
                b'+' if bytes.get(c + 1) == Some(&b'=') => {
                    op = BatchOp::Incr;
                    c += 2;
                }
                b'-' if bytes.get(c + 1) == Some(&b'=') => {
                    op = BatchOp::Decr;
                    c += 2;
                }
                b',' => {
                    // Attribute with no value (list/print filter, unset).
                    out.push(AttrOp {
                        name,
                        resource,
                        value: String::new(),
                        op: default_op,
                    });
                    c += 1;
                    skip_white(&mut c);
                    if c >= bytes.len() {
                        return Err(c);
                    }
                    continue;
                }
                _ => return Err(c),
            }
            // Unset takes bare names only.
            if cmd == MgrCmd::Unset {
                return Err(c - 1);
            }
        } else {
            if cmd == MgrCmd::Create || cmd == MgrCmd::Set {
                return Err(c);
            }
            out.push(AttrOp {
                name,
                resource,
                value: String::new(),
                op: default_op,
            });
            return Ok(out);
        }

        // Value.
        skip_white(&mut c);
        if c >= bytes.len() {
            return Err(c);
        }
        let allow = if catalog::is_entlim_attr(obj, &name) {
            AllowWhite::Yes
        } else {
            AllowWhite::No
        };
        let (value, used) = quote_parse(&attrs[c..], allow).map_err(|e| c + e.offset)?;

        // Entity-limit values get their grammar checked at parse time.
        if allow == AllowWhite::Yes {
            let counts = {
                let lname = name.to_ascii_lowercase();
                !lname.ends_with("_res") && !lname.ends_with("_res_soft")
            };
            parse_entlim(&value, counts).map_err(|_| c)?;
        }

        out.push(AttrOp {
            name,
            resource,
            value,
            op,
        });
        c += used;

        // Another pair?
        skip_white(&mut c);
        if c >= bytes.len() {
            return Ok(out);
        }
        if bytes[c] == b',' {
            c += 1;
        } else {
            return Err(c);
        }
    }
}

/// Parses `import` parameters: `<content-type> <content-encoding> <file|->`.
pub fn parse_import_params(params: &str) -> Result<Vec<AttrOp>, usize> {
    parse_hook_params(params, INPUT_FILE_PARAM, false)
}

/// Parses `export` parameters: `<content-type> <content-encoding> [file]`.
pub fn parse_export_params(params: &str) -> Result<Vec<AttrOp>, usize> {
    parse_hook_params(params, OUTPUT_FILE_PARAM, true)
}

fn parse_hook_params(params: &str, file_param: &str, file_optional: bool) -> Result<Vec<AttrOp>, usize> {
    let bytes = params.as_bytes();
    let mut out = Vec::new();
    let mut c = 0usize;

    let mut word = |c: &mut usize| -> Option<(usize, usize)> {
        while *c < bytes.len() && (bytes[*c] as char).is_ascii_whitespace() {
            *c += 1;
        }
        if *c >= bytes.len() {
            return None;
        }
        let start = *c;
        while *c < bytes.len() && !(bytes[*c] as char).is_ascii_whitespace() {
            *c += 1;
        }
        Some((start, *c))
    };

    let Some((ts, te)) = word(&mut c) else {
        return Err(1);
    };
    out.push(AttrOp::set(CONTENT_TYPE_PARAM, &params[ts..te]));

    let Some((es, ee)) = word(&mut c) else {
        return Err(c.max(1));
    };
    out.push(AttrOp::set(CONTENT_ENCODING_PARAM, &params[es..ee]));

    while c < bytes.len() && (bytes[c] as char).is_ascii_whitespace() {
        c += 1;
    }
    if c >= bytes.len() {
        if file_optional {
            out.push(AttrOp::set(file_param, ""));
            return Ok(out);
        }
        return Err(c.max(1));
    }
    let (value, used) = quote_parse(&params[c..], AllowWhite::No).map_err(|e| c + e.offset)?;
    out.push(AttrOp::set(file_param, value));
    c += used;

    while c < bytes.len() && (bytes[c] as char).is_ascii_whitespace() {
        c += 1;
    }
    if c < bytes.len() {
        return Err(c);
    }
    Ok(out)
}

/// Parses one request line into a directive. `Ok(None)` means the line was
/// empty. Caret offsets refer to bytes of `request`.
pub fn parse_directive(request: &str) -> Result<Option<Directive>, DirectiveError> {
    let Some(cmd_word) = next_word(request, 0) else {
        return Ok(None);
    };

    // The manage commands win ambiguous prefixes; the session commands are
    // only consulted when none of them matches.
    let Some(cmd) = match_command(cmd_word.text) else {
        let arg = next_word(request, cmd_word.end);
        if cmd_word.text == "?" || "help".starts_with(cmd_word.text) {
            return Ok(Some(Directive::Help(arg.map(|w| w.text.to_string()))));
        }
        if "quit".starts_with(cmd_word.text) || "exit".starts_with(cmd_word.text) {
            return Ok(Some(Directive::Quit));
        }
        if "history".starts_with(cmd_word.text) {
            let n = arg.and_then(|w| w.text.parse::<usize>().ok());
            return Ok(Some(Directive::History(n)));
        }
        return Err(DirectiveError {
            phase: ParsePhase::Command,
            message: format!(
                "qmgr: Illegal operation: {}\nTry 'help' if you are having trouble.\n",
                cmd_word.text
            ),
            caret: None,
        });
    };

    let Some(obj_word) = next_word(request, cmd_word.end) else {
        return Err(DirectiveError {
            phase: ParsePhase::Object,
            message: "qmgr: No object type given\n".to_string(),
            caret: None,
        });
    };
    let Some(obj) = match_object(obj_word.text) else {
        return Err(DirectiveError {
            phase: ParsePhase::Object,
            message: format!("qmgr: Illegal object type: {}.\n", obj_word.text),
            caret: None,
        });
    };

    let mut names = Vec::new();
    let mut rest_start = obj_word.end;

    if let Some(name_word) = next_word(request, obj_word.end) {
        let treat_as_attr = !obj.is_hook()
            && obj != MgrObj::Resource
            && catalog::is_attr(obj, name_word.text, catalog::Visibility::All);
        if !treat_as_attr {
            if let Err(offset) = check_list(name_word.text, obj) {
                return Err(DirectiveError::syntax(
                    ParsePhase::NameList,
                    name_word.start + offset.saturating_sub(1),
                ));
            }
            names = parse_name_list(name_word.text);
            rest_start = name_word.end;
        }
    }

    let rest = &request[rest_start.min(request.len())..];

    let attrs = match cmd {
        MgrCmd::Import => parse_import_params(rest).map_err(|off| {
            DirectiveError::syntax(ParsePhase::AttrList, rest_start + off)
        })?,
        MgrCmd::Export => parse_export_params(rest).map_err(|off| {
            DirectiveError::syntax(ParsePhase::AttrList, rest_start + off)
        })?,
        _ => parse_attributes(rest, obj, cmd).map_err(|off| {
            DirectiveError::syntax(ParsePhase::AttrList, rest_start + off)
        })?,
    };

    if matches!(cmd, MgrCmd::Set | MgrCmd::Unset) && attrs.is_empty() {
        return Err(DirectiveError::syntax(ParsePhase::AttrList, rest_start));
    }
    if cmd == MgrCmd::Active && !attrs.is_empty() {
        return Err(DirectiveError::syntax(ParsePhase::AttrList, rest_start));
    }

    Ok(Some(Directive::Manage(ManageDirective {
        cmd,
        obj,
        names,
        attrs,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manage(req: &str) -> ManageDirective {
        match parse_directive(req).unwrap().unwrap() {
            Directive::Manage(m) => m,
            other => panic!("expected manage directive, got {other:?}"),
        }
    }

    #[test]
    fn parses_create_queue() {
        let m = manage("create queue workq queue_type=execution,enabled=t,started=t");
        assert_eq!(m.cmd, MgrCmd::Create);
        assert_eq!(m.obj, MgrObj::Queue);
        assert_eq!(m.names, vec![ObjName::bare("workq")]);
        assert_eq!(m.attrs.len(), 3);
        assert_eq!(m.attrs[0].name, "queue_type");
        assert_eq!(m.attrs[0].value, "execution");
        assert_eq!(m.attrs[2].value, "t");
    }

    #[test]
    fn prefix_commands_and_plural_objects() {
        let m = manage("p q workq");
        assert_eq!(m.cmd, MgrCmd::Print);
        assert_eq!(m.obj, MgrObj::Queue);
        let m = manage("l queues");
        assert_eq!(m.cmd, MgrCmd::List);
        assert_eq!(m.obj, MgrObj::Queue);
    }

    #[test]
    fn attribute_ops_and_resources() {
        let m = manage("set queue workq resources_default.ncpus += 4, comment = hi");
        assert_eq!(m.attrs.len(), 2);
        assert_eq!(m.attrs[0].resource.as_deref(), Some("ncpus"));
        assert_eq!(m.attrs[0].op, BatchOp::Incr);
        assert_eq!(m.attrs[1].op, BatchOp::Set);
    }

    #[test]
    fn unset_takes_bare_names() {
        let m = manage("unset server max_running,comment");
        assert_eq!(m.attrs.len(), 2);
        assert!(m.attrs.iter().all(|a| a.op == BatchOp::Unset));
        assert!(parse_directive("unset server max_running = 5").is_err());
    }

    #[test]
    fn name_that_is_an_attribute_starts_attr_list() {
        let m = manage("list server max_running");
        assert!(m.names.is_empty());
        assert_eq!(m.attrs.len(), 1);
        assert_eq!(m.attrs[0].name, "max_running");
    }

    #[test]
    fn name_list_shapes() {
        assert!(check_list("a,b@svr,@svr", MgrObj::Queue).is_ok());
        // "name@" fails just past the '@'.
        assert_eq!(check_list("name@", MgrObj::Queue).unwrap_err(), 5);
        assert!(check_list("1q", MgrObj::Queue).is_err());
        assert!(check_list("1node", MgrObj::Node).is_ok());
        assert!(check_list("a@b@c", MgrObj::Queue).is_err());
        assert!(check_list("a,", MgrObj::Queue).is_err());
    }

    #[test]
    fn entlim_value_keeps_whitespace() {
        let m = manage("set server max_run = [u:alice = 3, g:staff = 5]");
        assert_eq!(m.attrs.len(), 1);
        assert_eq!(m.attrs[0].value, "[u:alice = 3, g:staff = 5]");
    }

    #[test]
    fn bad_entlim_value_is_a_parse_error() {
        assert!(parse_directive("set server max_run = [u:alice=1, u:alice=2]").is_err());
    }

    #[test]
    fn active_takes_no_attrs_and_set_requires_them() {
        assert!(parse_directive("active server a=1").is_err());
        assert!(parse_directive("set server").is_err());
        assert!(parse_directive("active server svr1").is_ok());
    }

    #[test]
    fn import_export_params() {
        let attrs = parse_import_params("application/x-python base64 data.b64").unwrap();
        assert_eq!(attrs[0].value, "application/x-python");
        assert_eq!(attrs[1].value, "base64");
        assert_eq!(attrs[2].name, INPUT_FILE_PARAM);
        assert_eq!(attrs[2].value, "data.b64");

        let attrs = parse_export_params("application/x-python default").unwrap();
        assert_eq!(attrs[2].name, OUTPUT_FILE_PARAM);
        assert_eq!(attrs[2].value, "");
    }

    #[test]
    fn non_manage_directives() {
        assert_eq!(parse_directive("quit").unwrap().unwrap(), Directive::Quit);
        assert_eq!(parse_directive("exit").unwrap().unwrap(), Directive::Quit);
        assert!(matches!(
            parse_directive("help set").unwrap().unwrap(),
            Directive::Help(Some(_))
        ));
        assert!(matches!(
            parse_directive("history 20").unwrap().unwrap(),
            Directive::History(Some(20))
        ));
    }

    #[test]
    fn empty_line_is_none() {
        assert!(parse_directive("   ").unwrap().is_none());
    }
}
