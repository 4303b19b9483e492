// src/core/attrs/defs_resv.rs

//! Reservation-class attribute definitions.

use super::catalog::{
    AttrDef, AttrFlags as F, AttrType as T, DatatypeVerifier as D, ValueVerifier as V,
};

const NONE: F = F::empty();

pub const DEFS: &[AttrDef] = &[
    AttrDef::new("Reserve_Name", NONE, T::Str, None, None),
    AttrDef::new("Reserve_Owner", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("reserve_ID", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("reserve_start", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("reserve_end", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("reserve_duration", NONE, T::Time, Some(D::Time), None),
    AttrDef::new("reserve_state", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("reserve_substate", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("reserve_job", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("reserve_retry", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("reserve_rrule", NONE, T::Str, None, None),
    AttrDef::new("reserve_timezone", NONE, T::Str, None, None),
    AttrDef::new("reserve_standing", F::READ_ONLY, T::Bool, None, None),
    AttrDef::new("reserve_count", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("reserve_index", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("queue", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("Resource_List", F::SELEQ, T::ResourceList, None, Some(V::Resc)),
    AttrDef::new("resv_nodes", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("Authorized_Users", NONE, T::Acl, None, None),
    AttrDef::new("Authorized_Groups", NONE, T::Acl, None, None),
    AttrDef::new("Authorized_Hosts", NONE, T::Acl, None, None),
    AttrDef::new("server", F::READ_ONLY, T::Str, None, None),
    AttrDef::new("ctime", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("mtime", F::READ_ONLY, T::Long, None, None),
    AttrDef::new("interactive", NONE, T::Long, Some(D::Long), None),
    AttrDef::new("delete_idle_time", NONE, T::Time, Some(D::Time), None),
    AttrDef::new("Mail_Points", NONE, T::Str, None, Some(V::MailPoints)),
    AttrDef::new("Mail_Users", NONE, T::ArrayStr, None, None),
    AttrDef::new("User_List", NONE, T::ArrayStr, None, None),
    AttrDef::new("group_list", NONE, T::ArrayStr, None, None),
    AttrDef::new("Variable_List", NONE, T::ArrayStr, None, None),
    AttrDef::new("partition", F::READ_ONLY, T::Str, None, None),
];
