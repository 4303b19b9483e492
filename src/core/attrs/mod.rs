// src/core/attrs/mod.rs

//! The attribute-centric data model: everything the protocol carries is a
//! list of attribute operations or attribute readings, typed against a
//! static per-class catalog.

pub mod catalog;
pub mod defs_job;
pub mod defs_node;
pub mod defs_queue;
pub mod defs_resc;
pub mod defs_resv;
pub mod defs_sched;
pub mod defs_server;
pub mod entlim;

pub use catalog::{AttrDef, AttrFlags, AttrType, DatatypeVerifier, ValueVerifier, Visibility};
pub use entlim::{EntLimit, LimitClass};

use strum_macros::{Display, EnumString, FromRepr};

/// The operation attached to one attribute node in a request.
///
/// Comparison operators are only meaningful in select-style filters; the
/// manager path uses `Set`/`Unset`/`Incr`/`Decr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr)]
#[repr(u8)]
pub enum BatchOp {
    #[default]
    Set = 0,
    Unset = 1,
    Incr = 2,
    Decr = 3,
    Eq = 4,
    Ne = 5,
    Ge = 6,
    Gt = 7,
    Le = 8,
    Lt = 9,
    Dflt = 10,
    Internal = 11,
}

impl BatchOp {
    /// True for the operations that change state and therefore pass through
    /// the pre-flight verifier.
    pub fn mutates(self) -> bool {
        matches!(
            self,
            BatchOp::Set | BatchOp::Unset | BatchOp::Incr | BatchOp::Decr
        )
    }

    /// The `qmgr` surface form (`=`, `+=`, `-=`).
    pub fn symbol(self) -> &'static str {
        match self {
            BatchOp::Incr => "+=",
            BatchOp::Decr => "-=",
            _ => "=",
        }
    }
}

/// One attribute operation (`attropl` in the wire vocabulary).
///
/// `resource` is only meaningful when the attribute is of resource-list
/// type; two nodes with the same `name` but different `resource` are
/// distinct entries. Lists are plain vectors appended at tail; the codec
/// preserves the order as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttrOp {
    pub name: String,
    pub resource: Option<String>,
    pub value: String,
    pub op: BatchOp,
}

impl AttrOp {
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> AttrOp {
        AttrOp {
            name: name.into(),
            resource: None,
            value: value.into(),
            op: BatchOp::Set,
        }
    }

    pub fn set_resource(
        name: impl Into<String>,
        resource: impl Into<String>,
        value: impl Into<String>,
    ) -> AttrOp {
        AttrOp {
            name: name.into(),
            resource: Some(resource.into()),
            value: value.into(),
            op: BatchOp::Set,
        }
    }

    pub fn unset(name: impl Into<String>) -> AttrOp {
        AttrOp {
            name: name.into(),
            resource: None,
            value: String::new(),
            op: BatchOp::Unset,
        }
    }

    /// The display form `name[.resource]`.
    pub fn full_name(&self) -> String {
        match &self.resource {
            Some(r) => format!("{}.{}", self.name, r),
            None => self.name.clone(),
        }
    }
}

/// One attribute reading (`attrl`): layout-compatible with [`AttrOp`] but
/// the operation slot is unused. Replies and stat filters carry these.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attrl {
    pub name: String,
    pub resource: Option<String>,
    pub value: String,
}

impl Attrl {
    pub fn new(name: impl Into<String>) -> Attrl {
        Attrl {
            name: name.into(),
            resource: None,
            value: String::new(),
        }
    }

    pub fn full_name(&self) -> String {
        match &self.resource {
            Some(r) => format!("{}.{}", self.name, r),
            None => self.name.clone(),
        }
    }
}

impl From<&AttrOp> for Attrl {
    fn from(op: &AttrOp) -> Attrl {
        Attrl {
            name: op.name.clone(),
            resource: op.resource.clone(),
            value: op.value.clone(),
        }
    }
}

/// Manager directive verbs carried in a Manager request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, Display, EnumString)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum MgrCmd {
    Create = 0,
    Delete = 1,
    Set = 2,
    Unset = 3,
    List = 4,
    Print = 5,
    Active = 6,
    Import = 7,
    Export = 8,
}

/// Object classes the manager protocol addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, Display, EnumString)]
#[repr(u8)]
pub enum MgrObj {
    #[strum(serialize = "server", serialize = "Server")]
    Server = 0,
    #[strum(serialize = "queue", serialize = "Queue")]
    Queue = 1,
    #[strum(serialize = "job", serialize = "Job")]
    Job = 2,
    #[strum(serialize = "node", serialize = "Node")]
    Node = 3,
    #[strum(serialize = "resv", serialize = "Resv")]
    Resv = 4,
    #[strum(serialize = "sched", serialize = "Sched")]
    Sched = 5,
    #[strum(serialize = "hook", serialize = "Hook")]
    SiteHook = 6,
    #[strum(serialize = "pbshook", serialize = "PbsHook")]
    PbsHook = 7,
    #[strum(serialize = "resource", serialize = "Resource")]
    Resource = 8,
}

impl MgrObj {
    /// True for the hook classes, which bypass the attribute catalog and the
    /// name-is-attribute parsing shortcut.
    pub fn is_hook(self) -> bool {
        matches!(self, MgrObj::SiteHook | MgrObj::PbsHook)
    }
}
