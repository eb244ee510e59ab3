//! Structure destination rule (ISO 14289-2, 8.8).

use super::RuleContext;
use crate::annotation_types::AnnotationSubtype;
use crate::annotations::{Destination, LinkTarget};
use crate::compliance::types::{CheckResult, UaProfile, ViolationCode};
use crate::error::Result;
use crate::outline::flatten_outline;

/// Links and outline items must lead to structure destinations.
///
/// Named destinations are followed through one level of the Dests name tree,
/// where `/SD` wins over `/D`. PDF/UA-1 has no such requirement.
pub fn check_destinations(ctx: &RuleContext<'_>, result: &mut CheckResult) -> Result<()> {
    if ctx.profile != UaProfile::Ua2 {
        return Ok(());
    }

    for (id, annot) in ctx.document.annotations() {
        if annot.subtype != AnnotationSubtype::Link {
            continue;
        }
        if let Some(target) = &annot.target {
            let location = format!("Link annotation {} on page {}", id, annot.page);
            check_target(ctx, target, location, result);
        }
    }

    for item in flatten_outline(&ctx.document.outlines) {
        if let Some(target) = &item.target {
            let location = format!("outline item '{}'", item.title);
            check_target(ctx, target, location, result);
        }
    }
    Ok(())
}

fn check_target(
    ctx: &RuleContext<'_>,
    target: &LinkTarget,
    location: String,
    result: &mut CheckResult,
) {
    result.stats.destinations_checked += 1;
    let dest = match target {
        LinkTarget::Explicit(dest) => dest,
        LinkTarget::Named(name) => {
            match ctx.document.named_destinations.get(name).and_then(|nd| nd.effective()) {
                Some(dest) => dest,
                None => {
                    result.add_violation(
                        ctx.violation(
                            ViolationCode::DestinationUnresolved,
                            vec![("name", name.clone())],
                        )
                        .with_location(location),
                    );
                    return;
                },
            }
        },
    };

    if !matches!(dest, Destination::Structure(_)) {
        result.add_violation(
            ctx.violation(
                ViolationCode::NotStructureDestination,
                vec![("target", dest.to_string())],
            )
            .with_location(location),
        );
    }
}
