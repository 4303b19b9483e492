// src/core/attrs/defs_queue.rs

//! Queue-class attribute definitions.

use super::catalog::{
    AttrDef, AttrFlags as F, AttrType as T, DatatypeVerifier as D, ValueVerifier as V,
};

pub const DEFS: &[AttrDef] = &[
    AttrDef::new("queue_type", F::NO_USER_SET, T::Str, None, Some(V::QueueType)),
    AttrDef::new("Priority", F::NO_USER_SET, T::Long, Some(D::Long), Some(V::Priority)),
    AttrDef::new("max_queuable", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("total_jobs", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("state_count", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("max_running", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_queued", F::NO_USER_SET, T::Entity, None, Some(V::EntLimit)),
    AttrDef::new("max_queued_res", F::NO_USER_SET, T::Entity, None, Some(V::EntLimit)),
    AttrDef::new("max_run", F::NO_USER_SET, T::Entity, None, Some(V::EntLimit)),
    AttrDef::new("max_run_res", F::NO_USER_SET, T::Entity, None, Some(V::EntLimit)),
    AttrDef::new("max_run_soft", F::NO_USER_SET, T::Entity, None, Some(V::EntLimit)),
    AttrDef::new("max_run_res_soft", F::NO_USER_SET, T::Entity, None, Some(V::EntLimit)),
    AttrDef::new("queued_jobs_threshold", F::NO_USER_SET, T::Entity, None, Some(V::EntLimit)),
    AttrDef::new(
        "queued_jobs_threshold_res",
        F::NO_USER_SET,
        T::Entity,
        None,
        Some(V::EntLimit),
    ),
    AttrDef::new("acl_host_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("acl_hosts", F::NO_USER_SET, T::Acl, None, None),
    AttrDef::new("acl_user_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("acl_users", F::NO_USER_SET, T::Acl, None, None),
    AttrDef::new("acl_group_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("acl_groups", F::NO_USER_SET, T::Acl, None, None),
    AttrDef::new("from_route_only", F::MGR_ONLY_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("resources_max", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("resources_min", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("resources_default", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("resources_available", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("resources_assigned", F::READ_ONLY, T::ResourceList, None, None),
    AttrDef::new("default_chunk", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("max_user_run", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_user_run_soft", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_group_run", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_group_run_soft", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_user_res", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("max_user_res_soft", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("max_group_res", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("max_group_res_soft", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("max_array_size", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("enabled", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("started", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("checkpoint_min", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("kill_delay", F::NO_USER_SET, T::Long, Some(D::Long), Some(V::ZeroOrPositive)),
    AttrDef::new("route_destinations", F::MGR_ONLY_SET, T::ArrayStr, None, None),
    AttrDef::new("route_held_jobs", F::MGR_ONLY_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("route_waiting_jobs", F::MGR_ONLY_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("route_retry_time", F::MGR_ONLY_SET, T::Long, Some(D::Long), None),
    AttrDef::new("route_lifetime", F::MGR_ONLY_SET, T::Long, Some(D::Long), None),
    AttrDef::new("alt_router", F::MGR_ONLY_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("backfill_depth", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("node_group_key", F::NO_USER_SET, T::ArrayStr, None, None),
    AttrDef::new("hasnodes", F::READ_ONLY, T::Bool, None, None),
    AttrDef::new("partition", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("require_cred_enable", F::MGR_ONLY_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("require_cred", F::MGR_ONLY_SET, T::Str, None, None),
];
