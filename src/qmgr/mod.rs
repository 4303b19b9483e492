// src/qmgr/mod.rs

//! The administrative interpreter: a line-oriented REPL over the manager
//! protocol, with multi-server fan-out and re-parseable `print` output.

pub mod executor;
pub mod history;
pub mod hooks;
pub mod lexer;
pub mod parser;

pub use executor::{DirectiveOutcome, ExitClass, Qmgr, QmgrOpts};
pub use parser::{Directive, ManageDirective, ObjName, ServerRef};

use crate::qmgr::history::{HIST_SIZE, History};
use crate::qmgr::lexer::{LineSource, RequestReader};
use crate::qmgr::parser::parse_directive;

const HELP_MAIN: &str = "\
Commands:
    create, delete, set, unset, list, print, active, import, export,
    quit, exit, help, history
Syntax:
    command object [name][,name...] [attribute[.resource] OP value][,...]
Objects:
    server, queue, node, sched, resource, hook, pbshook
Operators:
    =    set the value
    +=   add to or append the value
    -=   remove from the value
A name may carry an explicit server as name@server. Directives without a
name run against every active object of the type (see 'active').
";

fn show_help(topic: Option<&str>) {
    match topic {
        None => print!("{HELP_MAIN}"),
        Some(t) => match t {
            "create" => println!("create object name[,name...] [attr=value,...]\n    Create an object with the given attributes."),
            "delete" => println!("delete object name[,name...]\n    Delete the named objects."),
            "set" => println!("set object [name] attr[.resource] OP value[,...]\n    Set attribute values on the named objects."),
            "unset" => println!("unset object [name] attr[,attr...]\n    Clear the named attributes."),
            "list" => println!("list object [name][,name...] [attr,...]\n    Show attributes of the named objects."),
            "print" => println!("print object [name][,name...]\n    Emit the objects as re-runnable qmgr directives."),
            "active" => println!("active object [name][,name...]\n    Set the default targets for later directives."),
            "import" => println!("import hook name <content-type> <content-encoding> <input-file|->\n    Install hook content from a file or stdin."),
            "export" => println!("export hook name <content-type> <content-encoding> [output-file]\n    Write hook content to a file or stdout."),
            _ => print!("{HELP_MAIN}"),
        },
    }
}

/// Drives one session: read, parse, execute, repeat. Returns the exit
/// class of the last failing directive, or `Ok` when everything passed.
pub async fn run_session<S: LineSource>(
    qmgr: &mut Qmgr,
    reader: &mut RequestReader<S>,
    history: Option<&mut History>,
) -> ExitClass {
    let mut history = history;
    let mut last_error = ExitClass::Ok;

    loop {
        qmgr.touch_read_time();
        let request = match reader.get_request() {
            Ok(Some(req)) => req,
            Ok(None) => break,
            Err(e) => {
                qmgr.pstderr(&format!("qmgr: read error: {e}\n"));
                return ExitClass::Parse;
            }
        };

        if qmgr.opts.echo {
            println!("{request}");
        }
        if let Some(h) = history.as_deref_mut() {
            h.add(&request);
        }

        let directive = match parse_directive(&request) {
            Ok(Some(d)) => d,
            Ok(None) => continue,
            Err(e) => {
                qmgr.pstderr(&e.message);
                if let Some(caret) = e.caret {
                    qmgr.caret_err(&request, caret);
                }
                if qmgr.opts.abort {
                    return ExitClass::Parse;
                }
                last_error = ExitClass::Parse;
                continue;
            }
        };

        match directive {
            Directive::Quit => return ExitClass::Ok,
            Directive::Help(topic) => show_help(topic.as_deref()),
            Directive::History(n) => {
                if let Some(h) = history.as_deref_mut() {
                    for line in h.list(n.unwrap_or(HIST_SIZE)) {
                        println!("{line}");
                    }
                }
            }
            Directive::Manage(m) => {
                if qmgr.opts.noexec {
                    continue;
                }
                match qmgr.execute(&m).await {
                    DirectiveOutcome::Ok => {}
                    DirectiveOutcome::Fatal => return ExitClass::Parse,
                    DirectiveOutcome::Error(class) => {
                        if qmgr.opts.abort {
                            return class;
                        }
                        last_error = class;
                    }
                }
            }
        }
    }
    last_error
}

/// Runs a single `-c` command string through the same pipeline.
pub async fn run_command(qmgr: &mut Qmgr, command: &str) -> ExitClass {
    if qmgr.opts.echo {
        println!("{command}");
    }
    let directive = match parse_directive(command) {
        Ok(Some(d)) => d,
        Ok(None) => return ExitClass::Ok,
        Err(e) => {
            qmgr.pstderr(&e.message);
            if let Some(caret) = e.caret {
                qmgr.caret_err(command, caret);
            }
            return ExitClass::Parse;
        }
    };
    match directive {
        Directive::Quit => ExitClass::Ok,
        Directive::Help(topic) => {
            show_help(topic.as_deref());
            ExitClass::Ok
        }
        Directive::History(_) => ExitClass::Ok,
        Directive::Manage(m) => {
            if qmgr.opts.noexec {
                return ExitClass::Ok;
            }
            match qmgr.execute(&m).await {
                DirectiveOutcome::Ok => ExitClass::Ok,
                DirectiveOutcome::Fatal => ExitClass::Parse,
                DirectiveOutcome::Error(class) => class,
            }
        }
    }
}

// RequestReader is re-exported so binaries can build one over stdin.
pub use lexer::BufLineSource;
pub type StdinReader = RequestReader<BufLineSource<std::io::BufReader<std::io::Stdin>>>;
