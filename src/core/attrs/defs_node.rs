// src/core/attrs/defs_node.rs

//! Node (vnode) attribute definitions.

use super::catalog::{
    AttrDef, AttrFlags as F, AttrType as T, DatatypeVerifier as D, ValueVerifier as V,
};

pub const DEFS: &[AttrDef] = &[
    AttrDef::new("Mom", F::NO_USER_SET, T::ArrayStr, None, None),
    AttrDef::new("Port", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("state", F::NO_USER_SET, T::Str, None, Some(V::State)),
    AttrDef::new("ntype", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("jobs", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("resv", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("resv_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("pcpus", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("Priority", F::NO_USER_SET, T::Long, Some(D::Long), Some(V::Priority)),
    AttrDef::new("comment", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("no_multinode_jobs", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("no_tasks", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("sharing", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("provision_enable", F::MGR_ONLY_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("current_aoe", F::MGR_ONLY_SET, T::Str, None, None),
    AttrDef::new("current_eoe", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("in_multivnode_host", F::MGR_ONLY_SET, T::Long, Some(D::Long), None),
    AttrDef::new("resources_available", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("resources_assigned", F::READ_ONLY, T::ResourceList, None, None),
    AttrDef::new("max_running", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_user_run", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_group_run", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("queue", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("pnames", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("license", F::READ_ONLY, T::Char, None, None),
    AttrDef::new("license_info", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("topology_info", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("vnode_pool", F::MGR_ONLY_SET, T::Long, Some(D::Long), None),
    AttrDef::new("power_provisioning", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("poweroff_eligible", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("last_state_change_time", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("last_used_time", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("maintenance_jobs", F::READ_ONLY, T::ArrayStr, None, None),
];
