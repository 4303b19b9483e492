// src/core/ecl/mod.rs

//! The client-side verifier engine. Every mutating request runs its
//! attribute list through here before any bytes leave the process; failures
//! accumulate on the connection so callers can retrieve the complete list.

pub mod datatypes;
pub mod values;

use crate::core::attrs::{AttrOp, AttrType, MgrCmd, MgrObj, catalog};
use crate::core::errors::ErrCode;
use crate::core::protocol::RequestType;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

pub use values::verify_object_name;

/// One verification failure, tied back to its position in the original
/// attribute list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EclAttrErr {
    pub index: usize,
    pub name: String,
    pub resource: Option<String>,
    pub value: String,
    pub code: ErrCode,
    pub message: String,
}

/// The request context a value verifier may consult.
#[derive(Debug, Clone, Copy)]
pub struct VerifyContext {
    pub request: RequestType,
    pub parent: MgrObj,
    pub cmd: Option<MgrCmd>,
}

type VerifierFn = fn(&VerifyContext, &str, &[AttrOp]) -> Vec<EclAttrErr>;

static NO_VERIFY: AtomicBool = AtomicBool::new(false);
static VERIFIER: RwLock<VerifierFn> = RwLock::new(default_verify);

/// Process-wide switch: turn the engine into a no-op and let the server be
/// the sole authority.
pub fn set_no_attribute_verification() {
    NO_VERIFY.store(true, Ordering::SeqCst);
}

/// Replaces the verifier implementation; the replacement must honor the
/// accumulate-then-reject contract.
pub fn set_attribute_verifier(f: VerifierFn) {
    *VERIFIER.write() = f;
}

/// Entry point used by the dispatch layer. `target` is the object name the
/// request addresses (checked on create).
pub fn verify_request(ctx: &VerifyContext, target: &str, attrs: &[AttrOp]) -> Vec<EclAttrErr> {
    if NO_VERIFY.load(Ordering::SeqCst) {
        return Vec::new();
    }
    (*VERIFIER.read())(ctx, target, attrs)
}

fn err_for(index: usize, node: &AttrOp, code: ErrCode, message: String) -> EclAttrErr {
    EclAttrErr {
        index,
        name: node.name.clone(),
        resource: node.resource.clone(),
        value: node.value.clone(),
        code,
        message,
    }
}

fn default_verify(ctx: &VerifyContext, target: &str, attrs: &[AttrOp]) -> Vec<EclAttrErr> {
    let mut errs = Vec::new();

    // Hook attributes have no client-side catalog; the server validates.
    if ctx.parent.is_hook() {
        return errs;
    }

    if ctx.cmd == Some(MgrCmd::Create) {
        if let Err(reason) = verify_object_name(target) {
            errs.push(EclAttrErr {
                index: 0,
                name: String::new(),
                resource: None,
                value: target.to_string(),
                code: ErrCode::BadName,
                message: reason,
            });
        }
    }

    for (index, node) in attrs.iter().enumerate() {
        let Some(def) = catalog::find(ctx.parent, &node.name) else {
            errs.push(err_for(
                index,
                node,
                ErrCode::NoAttr,
                format!("Unknown attribute '{}'", node.name),
            ));
            continue;
        };

        if node.op.mutates() && def.flags.contains(catalog::AttrFlags::READ_ONLY) {
            errs.push(err_for(
                index,
                node,
                ErrCode::AttrRo,
                format!("Cannot set read-only attribute '{}'", node.name),
            ));
            continue;
        }

        if node.resource.is_some() && def.ty != AttrType::ResourceList {
            errs.push(err_for(
                index,
                node,
                ErrCode::AttrType,
                format!("Attribute '{}' does not take a resource", node.name),
            ));
            continue;
        }

        // Unset carries no value to check.
        if !node.op.mutates() || node.op == crate::core::attrs::BatchOp::Unset {
            continue;
        }

        if let Some(dt) = def.datatype {
            if let Err(reason) = datatypes::verify(dt, &node.value) {
                errs.push(err_for(index, node, ErrCode::BadAtVal, reason));
                continue;
            }
        }

        if let Some(vv) = def.value {
            if let Err(reason) = values::verify(vv, node) {
                errs.push(err_for(index, node, ErrCode::BadAtVal, reason));
            }
        }
    }

    errs
}
