// src/core/attrs/defs_sched.rs

//! Scheduler-object attribute definitions.

use super::catalog::{
    AttrDef, AttrFlags as F, AttrType as T, DatatypeVerifier as D, ValueVerifier as V,
};

pub const DEFS: &[AttrDef] = &[
    AttrDef::new("sched_host", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("pbs_version", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("sched_cycle_length", F::NO_USER_SET, T::Time, Some(D::Time), None),
    AttrDef::new("do_not_span_psets", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("only_explicit_psets", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new(
        "sched_preempt_enforce_resumption",
        F::NO_USER_SET,
        T::Bool,
        Some(D::Bool),
        None,
    ),
    AttrDef::new("preempt_targets_enable", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new(
        "job_sort_formula_threshold",
        F::NO_USER_SET,
        T::Float,
        Some(D::Float),
        None,
    ),
    // Deprecated alias of job_run_wait; both stay in the catalog so either
    // spelling round-trips through print/list.
    AttrDef::new("throughput_mode", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("job_run_wait", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("opt_backfill_fuzzy", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("partition", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("sched_priv", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("sched_log", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("sched_user", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("state", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("scheduling", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("scheduler_iteration", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("preempt_queue_prio", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("preempt_prio", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("preempt_order", F::NO_USER_SET, T::Str, None, Some(V::PreemptOrder)),
    AttrDef::new("preempt_sort", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new(
        "server_dyn_res_alarm",
        F::NO_USER_SET,
        T::Long,
        Some(D::Long),
        Some(V::ZeroOrPositive),
    ),
    AttrDef::new("log_events", F::NO_USER_SET, T::Long, Some(D::Long), None),
    AttrDef::new("comment", F::NO_USER_SET, T::Str, None, None),
];
