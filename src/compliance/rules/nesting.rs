//! Parent/child role relations (PDF/UA-2).
//!
//! Derived from the containment rules of ISO 32000-2:2020 Annex L. Only the
//! combinations listed here are restricted; everything else is allowed.

use super::RuleContext;
use crate::compliance::types::{CheckResult, UaProfile, ViolationCode};
use crate::error::Result;
use crate::structure::StandardRole;

/// Whether `child` may appear directly inside `parent`.
pub fn is_allowed(parent: StandardRole, child: StandardRole) -> bool {
    use StandardRole::*;

    if child == Artifact || parent == MathMl {
        return true;
    }

    // what the child requires of its parent
    let parent_ok = match child {
        TH | TD => parent == TR,
        TR => matches!(parent, Table | THead | TBody | TFoot),
        THead | TBody | TFoot => parent == Table,
        LI => parent == L,
        LBody => parent == LI,
        _ => true,
    };
    if !parent_ok {
        return false;
    }

    // what the parent accepts
    match parent {
        H | Hn(_) | P | Lbl | Caption | Span | Em | Strong | Sub => child.is_inline(),
        TR => matches!(child, TH | TD),
        THead | TBody | TFoot => child == TR,
        Table => matches!(child, Caption | THead | TBody | TFoot | TR),
        L => matches!(child, LI | Caption | L),
        LI => matches!(child, Lbl | LBody),
        _ => true,
    }
}

/// Report every disallowed parent/child pair (PDF/UA-2 only).
pub fn check_role_nesting(ctx: &RuleContext<'_>, result: &mut CheckResult) -> Result<()> {
    if ctx.profile != UaProfile::Ua2 {
        return Ok(());
    }
    for node in ctx.tree().nodes() {
        let (Some(parent_id), Some(child_role)) = (node.parent, ctx.role(node.handle)) else {
            continue;
        };
        let Some(parent_role) = ctx.role(parent_id) else {
            continue;
        };
        if !is_allowed(parent_role, child_role) {
            result.add_violation(ctx.violation_at(
                node.handle,
                ViolationCode::RoleNestingNotAllowed,
                vec![
                    ("parent", parent_role.to_string()),
                    ("child", child_role.to_string()),
                ],
            ));
        }
    }
    Ok(())
}
