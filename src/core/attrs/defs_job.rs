// src/core/attrs/defs_job.rs

//! Job-class attribute definitions. Jobs carry both the user-settable
//! submit/alter surface and a large read-only status surface.

use super::catalog::{
    AttrDef, AttrFlags as F, AttrType as T, DatatypeVerifier as D, ValueVerifier as V,
};

const NONE: F = F::empty();

pub const DEFS: &[AttrDef] = &[
    AttrDef::new("Execution_Time", F::ALTRUN, T::Time, Some(D::Time), None),
    AttrDef::new("Account_Name", NONE, T::Str, None, None),
    AttrDef::new("Checkpoint", NONE, T::Str, None, None),
    AttrDef::new("Error_Path", NONE, T::Str, None, None),
    AttrDef::new("group_list", NONE, T::ArrayStr, None, None),
    AttrDef::new("Hold_Types", F::ALTRUN, T::Str, None, Some(V::Hold)),
    AttrDef::new("Join_Path", NONE, T::Str, None, Some(V::JoinPath)),
    AttrDef::new("Keep_Files", NONE, T::Str, None, Some(V::KeepFiles)),
    AttrDef::new("Remove_Files", NONE, T::Str, None, Some(V::RemoveFiles)),
    AttrDef::new("Mail_Points", NONE, T::Str, None, Some(V::MailPoints)),
    AttrDef::new("Mail_Users", NONE, T::ArrayStr, None, None),
    AttrDef::new("Job_Name", F::ALTRUN, T::Str, None, None),
    AttrDef::new("Output_Path", NONE, T::Str, None, None),
    AttrDef::new("Priority", F::ALTRUN, T::Long, Some(D::Long), Some(V::Priority)),
    AttrDef::new("destination", NONE, T::Str, None, None),
    AttrDef::new("Rerunable", NONE, T::Bool, Some(D::Bool), None),
    AttrDef::new("Resource_List", F::SELEQ, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("Shell_Path_List", NONE, T::ArrayStr, None, None),
    AttrDef::new("User_List", NONE, T::ArrayStr, None, None),
    AttrDef::new("Variable_List", NONE, T::ArrayStr, None, None),
    AttrDef::new("Submit_Host", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("Submit_arguments", F::READ_ONLY, T::Str, None, None),
    AttrDef::new(
        "array_indices_submitted",
        NONE,
        T::Str,
        None,
        Some(V::Jrange),
    ),
    AttrDef::new("array_indices_remaining", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("array_state_count", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("depend", NONE, T::ArrayStr, None, None),
    AttrDef::new("stagein", NONE, T::ArrayStr, None, None),
    AttrDef::new("stageout", NONE, T::ArrayStr, None, None),
    AttrDef::new("sandbox", NONE, T::Str, None, None),
    AttrDef::new("umask", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("block", NONE, T::Bool, Some(D::Bool), None),
    AttrDef::new("interactive", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("project", F::ALTRUN, T::Str, None, None),
    AttrDef::new("run_count", F::NO_USER_SET, T::Long, Some(D::Long), Some(V::ZeroOrPositive)),
    AttrDef::new("comment", F::NO_USER_SET, T::Str, None, None),
    AttrDef::new("topjob_ineligible", F::NO_USER_SET, T::Bool, Some(D::Bool), None),
    AttrDef::new("job_state", F::READ_ONLY, T::Char, None, None),
    AttrDef::new("queue", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("server", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("euser", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("egroup", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("ctime", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("mtime", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("qtime", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("etime", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("stime", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("session_id", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("exec_host", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("exec_vnode", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("resources_used", F::READ_ONLY, T::ResourceList, None, None),
    AttrDef::new("accounting_id", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("alt_id", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("accrue_type", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("eligible_time", F::READ_ONLY, T::Time, None, None),
    AttrDef::new("Exit_status", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("Stageout_status", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("history_timestamp", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("queue_rank", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("schedselect", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("executable", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("argument_list", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("jobdir", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("create_resv_from_job", NONE, T::Bool, Some(D::Bool), None),
    AttrDef::new("max_run_subjobs", F::ALTRUN, T::Long, Some(D::Long), None),
    AttrDef::new(
        "resource_released_list",
        F::READ_ONLY,
        T::ResourceList,
        None,
        None,
    ),
    AttrDef::new("run_version", F::READ_ONLY, T::Long, None, None),
];
