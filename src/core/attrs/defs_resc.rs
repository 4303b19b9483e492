// src/core/attrs/defs_resc.rs

//! Resource definitions, in two tables: the attributes of a
//! resource-definition object itself (`type`, `flag`, as manipulated by
//! `qmgr create resource`), and the built-in resource catalog consulted when
//! a resource-list entry is decoded or verified.

use super::catalog::{AttrDef, AttrFlags as F, AttrType as T, DatatypeVerifier as D};

const NONE: F = F::empty();

/// Attributes of a resource-definition object.
pub const DEFS: &[AttrDef] = &[
    AttrDef::new("type", F::MGR_ONLY_SET, T::Str, None, None),
    AttrDef::new("flag", F::MGR_ONLY_SET, T::Str, None, None),
];

/// The built-in resource catalog. Custom resources created at runtime are
/// known only to the server; the client verifier passes unknown names
/// through and lets the server be the authority.
pub const RESOURCES: &[AttrDef] = &[
    AttrDef::new("cput", F::SELEQ, T::Time, Some(D::Time), None),
    AttrDef::new("pcput", NONE, T::Time, Some(D::Time), None),
    AttrDef::new("walltime", F::SELEQ, T::Time, Some(D::Time), None),
    AttrDef::new("min_walltime", NONE, T::Time, Some(D::Time), None),
    AttrDef::new("max_walltime", NONE, T::Time, Some(D::Time), None),
    AttrDef::new("soft_walltime", NONE, T::Time, Some(D::Time), None),
    AttrDef::new("mem", F::SELEQ, T::Size, Some(D::Size), None),
    AttrDef::new("pmem", NONE, T::Size, Some(D::Size), None),
    AttrDef::new("vmem", F::SELEQ, T::Size, Some(D::Size), None),
    AttrDef::new("pvmem", NONE, T::Size, Some(D::Size), None),
    AttrDef::new("file", NONE, T::Size, Some(D::Size), None),
    AttrDef::new("ncpus", F::SELEQ, T::Long, Some(D::Long), None),
    AttrDef::new("nodect", F::READ_ONLY, T::Long, Some(D::Long), None),
    AttrDef::new("nice", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("cpupercent", F::READ_ONLY, T::Long, Some(D::Long), None),
    AttrDef::new("arch", F::SELEQ, T::Str, None, None),
    AttrDef::new("host", F::SELEQ, T::Str, None, None),
    AttrDef::new("vnode", F::SELEQ, T::Str, None, None),
    AttrDef::new("aoe", NONE, T::Str, None, None),
    AttrDef::new("eoe", NONE, T::Str, None, None),
    AttrDef::new("select", NONE, T::Str, None, None),
    AttrDef::new("place", NONE, T::Str, None, None),
    AttrDef::new("nodes", NONE, T::Str, None, None),
    AttrDef::new("mpiprocs", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("ompthreads", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("software", NONE, T::Str, None, None),
    AttrDef::new("site", NONE, T::Str, None, None),
    AttrDef::new("partition", NONE, T::Str, None, None),
    AttrDef::new("preempt_targets", NONE, T::ArrayStr, None, None),
    AttrDef::new("mppwidth", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("mppdepth", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("mppnppn", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("mppmem", NONE, T::Size, Some(D::Size), None),
    AttrDef::new("mpphost", NONE, T::Str, None, None),
    AttrDef::new("mpparch", NONE, T::Str, None, None),
    AttrDef::new("mppnodes", NONE, T::Str, None, None),
    AttrDef::new("mpplabels", NONE, T::Str, None, None),
    AttrDef::new("mppt", NONE, T::Time, Some(D::Time), None),
    AttrDef::new("ssinodes", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("nodemask", NONE, T::Str, None, None),
    AttrDef::new("hpm", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("netwins", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("pe_mask", NONE, T::Str, None, None),
    AttrDef::new("resc", NONE, T::Str, None, None),
];
