// src/core/attrs/catalog.rs

//! The static attribute catalog: one immutable table per object class,
//! shared by the codec, the verifier engine, and the formatters so that all
//! three agree on every attribute's type and flags.

use super::MgrObj;
use bitflags::bitflags;
use once_cell::sync::Lazy;
use std::collections::HashMap;

bitflags! {
    /// Per-attribute property bits consulted by the verifier and the
    /// display layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct AttrFlags: u32 {
        /// The attribute can never be written by a client.
        const READ_ONLY    = 1 << 0;
        /// Settable only through a manager-class connection.
        const MGR_ONLY_SET = 1 << 1;
        /// Settable by operators and managers but not plain users.
        const NO_USER_SET  = 1 << 2;
        /// Alterable while the job is running.
        const ALTRUN       = 1 << 3;
        /// Usable as a select predicate.
        const SELEQ        = 1 << 4;
        /// Not persisted by the server.
        const NOSAVM       = 1 << 5;
        /// The value shown is the compiled-in default.
        const DEFLT        = 1 << 6;
        /// Visible to the execution agent only.
        const MOM          = 1 << 7;
        /// Visible to the scheduler only.
        const SCHED        = 1 << 8;
    }
}

/// Semantic type of an attribute value. The codec carries every value as a
/// counted byte string; this type drives re-parsing and verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrType {
    Bool,
    Short,
    Long,
    LongLong,
    Float,
    /// Integer with a unit suffix (`kb`, `mw`, …).
    Size,
    /// `HH:MM:SS` or bare seconds.
    Time,
    Char,
    Str,
    ArrayStr,
    /// Access-control list (`user@host` entries).
    Acl,
    /// Entity-limit grammar `[u:name=limit …]`.
    Entity,
    /// Container of per-resource sub-entries.
    ResourceList,
    /// Opaque job-info reference.
    JobInfo,
    Other,
}

/// Pure syntactic verifiers. Which one applies is part of the catalog row;
/// the engine matches on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatatypeVerifier {
    Bool,
    Short,
    Long,
    LongLong,
    Float,
    Size,
    Time,
    Char,
}

/// Context-dependent value verifiers; these receive the request context and
/// may consult the catalog (e.g. the resource verifier re-checks the named
/// resource's own datatype).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueVerifier {
    Resc,
    Hold,
    JoinPath,
    KeepFiles,
    RemoveFiles,
    MailPoints,
    Jrange,
    PreemptOrder,
    QueueType,
    MgrOprAcl,
    ZeroOrPositive,
    NonZeroPositive,
    Priority,
    EntLimit,
    State,
}

/// Visibility mask for [`is_attr`]-style membership queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Any attribute of the class, regardless of flags.
    All,
    /// Attributes a non-privileged client may read.
    User,
    /// Attributes only managers/operators interact with.
    Admin,
}

/// One catalog row.
#[derive(Debug, Clone, Copy)]
pub struct AttrDef {
    pub name: &'static str,
    pub flags: AttrFlags,
    pub ty: AttrType,
    pub datatype: Option<DatatypeVerifier>,
    pub value: Option<ValueVerifier>,
}

impl AttrDef {
    pub const fn new(
        name: &'static str,
        flags: AttrFlags,
        ty: AttrType,
        datatype: Option<DatatypeVerifier>,
        value: Option<ValueVerifier>,
    ) -> AttrDef {
        AttrDef {
            name,
            flags,
            ty,
            datatype,
            value,
        }
    }
}

fn index_of(table: &'static [AttrDef]) -> HashMap<String, usize> {
    table
        .iter()
        .enumerate()
        .map(|(i, d)| (d.name.to_ascii_lowercase(), i))
        .collect()
}

struct ClassCatalog {
    table: &'static [AttrDef],
    by_name: HashMap<String, usize>,
}

impl ClassCatalog {
    fn new(table: &'static [AttrDef]) -> ClassCatalog {
        ClassCatalog {
            table,
            by_name: index_of(table),
        }
    }

    fn find(&self, name: &str) -> Option<&'static AttrDef> {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.table[i])
    }
}

static SERVER: Lazy<ClassCatalog> = Lazy::new(|| ClassCatalog::new(super::defs_server::DEFS));
static QUEUE: Lazy<ClassCatalog> = Lazy::new(|| ClassCatalog::new(super::defs_queue::DEFS));
static JOB: Lazy<ClassCatalog> = Lazy::new(|| ClassCatalog::new(super::defs_job::DEFS));
static NODE: Lazy<ClassCatalog> = Lazy::new(|| ClassCatalog::new(super::defs_node::DEFS));
static RESV: Lazy<ClassCatalog> = Lazy::new(|| ClassCatalog::new(super::defs_resv::DEFS));
static SCHED: Lazy<ClassCatalog> = Lazy::new(|| ClassCatalog::new(super::defs_sched::DEFS));
static RESC: Lazy<ClassCatalog> = Lazy::new(|| ClassCatalog::new(super::defs_resc::DEFS));
static RESOURCES: Lazy<ClassCatalog> = Lazy::new(|| ClassCatalog::new(super::defs_resc::RESOURCES));

fn class_catalog(class: MgrObj) -> Option<&'static ClassCatalog> {
    match class {
        MgrObj::Server => Some(&SERVER),
        MgrObj::Queue => Some(&QUEUE),
        MgrObj::Job => Some(&JOB),
        MgrObj::Node => Some(&NODE),
        MgrObj::Resv => Some(&RESV),
        MgrObj::Sched => Some(&SCHED),
        MgrObj::Resource => Some(&RESC),
        // Hook attributes are validated server-side only.
        MgrObj::SiteHook | MgrObj::PbsHook => None,
    }
}

/// Looks up an attribute definition by class and name (case-insensitive, the
/// wire names are the canonical spellings).
pub fn find(class: MgrObj, name: &str) -> Option<&'static AttrDef> {
    class_catalog(class)?.find(name)
}

/// Membership test masked by visibility.
pub fn is_attr(class: MgrObj, name: &str, vis: Visibility) -> bool {
    match find(class, name) {
        None => false,
        Some(def) => match vis {
            Visibility::All => true,
            Visibility::User => !def
                .flags
                .intersects(AttrFlags::MGR_ONLY_SET | AttrFlags::MOM | AttrFlags::SCHED),
            Visibility::Admin => def
                .flags
                .intersects(AttrFlags::MGR_ONLY_SET | AttrFlags::NO_USER_SET),
        },
    }
}

/// Looks up a resource definition in the built-in resource sub-catalog.
/// Consulted when decoding or verifying resource-list entries.
pub fn find_resc(name: &str) -> Option<&'static AttrDef> {
    RESOURCES.find(name)
}

/// True when the named attribute of the class carries entity-limit values,
/// which changes how the `qmgr` value lexer treats unquoted whitespace.
pub fn is_entlim_attr(class: MgrObj, name: &str) -> bool {
    find(class, name).is_some_and(|d| d.ty == AttrType::Entity)
}
