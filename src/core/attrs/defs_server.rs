// src/core/attrs/defs_server.rs

//! Server-class attribute definitions.

use super::catalog::{
    AttrDef, AttrFlags as F, AttrType as T, DatatypeVerifier as D, ValueVerifier as V,
};

const NONE: F = F::empty();

pub const DEFS: &[AttrDef] = &[
    AttrDef::new("scheduling", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("scheduler_iteration", F::NO_USER_SET, T::Long, Some(D::Long), None),
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
    AttrDef::new("max_user_run", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_user_run_soft", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_group_run", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_group_run_soft", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("max_user_res", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("max_user_res_soft", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("max_group_res", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("max_group_res_soft", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("max_array_size", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("acl_host_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("acl_hosts", F::NO_USER_SET, T::Acl, None, None),
    AttrDef::new("acl_user_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("acl_users", F::NO_USER_SET, T::Acl, None, None),
    AttrDef::new("acl_roots", F::NO_USER_SET, T::Acl, None, None),
    AttrDef::new("acl_resv_group_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("acl_resv_groups", F::NO_USER_SET, T::Acl, None, None),
    AttrDef::new("acl_resv_host_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("acl_resv_hosts", F::NO_USER_SET, T::Acl, None, None),
    AttrDef::new("acl_resv_user_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("acl_resv_users", F::NO_USER_SET, T::Acl, None, None),
    AttrDef::new("managers", F::MGR_ONLY_SET, T::Acl, None, Some(V::MgrOprAcl)),
    AttrDef::new("operators", F::MGR_ONLY_SET, T::Acl, None, Some(V::MgrOprAcl)),
    AttrDef::new("default_queue", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("default_node", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("default_chunk", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("default_qsub_arguments", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("default_qdel_arguments", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("log_events", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("mail_from", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("node_fail_requeue", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("node_group_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("node_group_key", F::NO_USER_SET, T::ArrayStr, None, None),
    AttrDef::new("node_pack", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("query_other_jobs", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("resources_available", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("resources_cost", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("resources_default", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("resources_max", F::NO_USER_SET, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("resources_assigned", F::READ_ONLY, T::ResourceList, None, None),
    AttrDef::new("server_state", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("server_host", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("total_jobs", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("state_count", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("pbs_version", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("license_count", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("FLicenses", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("flatuid", F::MGR_ONLY_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("resv_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("job_sort_formula", F::MGR_ONLY_SET, T::Str, None, None),
    AttrDef::new("backfill_depth", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("job_history_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("job_history_duration", F::NO_USER_SET, T::Time, Some(D::Time), None),
    AttrDef::new("job_requeue_timeout", F::NO_USER_SET, T::Time, Some(D::Time), None),
    AttrDef::new("jobscript_max_size", F::NO_USER_SET, T::Size, Some(D::Size), None),
    AttrDef::new("eligible_time_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new(
        "max_concurrent_provision",
        F::NO_USER_SET,
        T::Long,
        Some(D::Long),
        Some(V::NonZeroPositive),
    ),
    AttrDef::new("max_job_sequence_id", F::NO_USER_SET, T::LongLong, Some(D::LongLong), None),
    AttrDef::new("power_provisioning", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("pbs_license_info", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("pbs_license_min", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("pbs_license_max", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new(
        "pbs_license_linger_time",
        F::NO_USER_SET,
        T::Long,
        Some(D::Long),
        Some(V::NonZeroPositive),
    ),
    AttrDef::new("comment", F::NOSAVM, T::Str, None, None),
    AttrDef::new("default_qmove_arguments", NONE, T::Str, None, None),
];
