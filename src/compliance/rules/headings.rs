//! Heading rules.
//!
//! PDF/UA-1 (ISO 14289-1, 7.4): a document uses either one generic `H` or
//! numbered headings, and numbered headings do not skip levels in logical
//! order. PDF/UA-2 forbids `H` outright and lets levels jump; containment of
//! one heading in another is left to the nesting rule.

use super::RuleContext;
use crate::compliance::types::{CheckResult, UaProfile, ViolationCode};
use crate::error::Result;
use crate::structure::{traverse_structure_tree, StandardRole};

/// Check heading usage and sequencing.
pub fn check_headings(ctx: &RuleContext<'_>, result: &mut CheckResult) -> Result<()> {
    log::debug!("Checking headings ({})", ctx.profile);

    let mut generic = Vec::new();
    let mut numbered = 0usize;
    let mut last_level = 0u32;

    for visit in traverse_structure_tree(ctx.tree()) {
        let id = visit.node.handle;
        match ctx.role(id) {
            Some(StandardRole::H) => {
                result.stats.headings_checked += 1;
                if ctx.profile == UaProfile::Ua2 {
                    result.add_violation(ctx.violation_at(
                        id,
                        ViolationCode::GenericHeadingForbidden,
                        Vec::new(),
                    ));
                }
                generic.push(id);
            },
            Some(StandardRole::Hn(level)) => {
                result.stats.headings_checked += 1;
                numbered += 1;
                if ctx.profile == UaProfile::Ua1 && level > last_level + 1 {
                    result.add_violation(ctx.violation_at(
                        id,
                        ViolationCode::HeadingLevelSkipped,
                        vec![
                            ("level", (last_level + 1).to_string()),
                            ("found", level.to_string()),
                        ],
                    ));
                }
                last_level = level;
            },
            _ => {},
        }
    }

    if ctx.profile == UaProfile::Ua1 {
        if !generic.is_empty() && numbered > 0 {
            result.add_violation(ctx.violation_at(generic[0], ViolationCode::MixedHeadings, Vec::new()));
        }
        if generic.len() > 1 {
            result.add_violation(ctx.violation_at(
                generic[1],
                ViolationCode::MultipleGenericHeadings,
                Vec::new(),
            ));
        }
    }
    Ok(())
}
