//! Annotation tagging rules (ISO 14289-1, 7.18.1-7.18.8; ISO 14289-2, 8.9.2).

use super::RuleContext;
use crate::annotation_types::AnnotationSubtype;
use crate::annotations::{Annotation, AnnotationId};
use crate::compliance::rich_text::textually_equivalent;
use crate::compliance::types::{CheckResult, UaProfile, ViolationCode};
use crate::error::Result;
use crate::structure::{StandardRole, StructNode};

/// Check every annotation in the document.
pub fn check_annotations(ctx: &RuleContext<'_>, result: &mut CheckResult) -> Result<()> {
    log::debug!("Checking {} annotations ({})", ctx.document.annotations.len(), ctx.profile);
    for (id, annot) in ctx.document.annotations() {
        result.stats.annotations_checked += 1;
        check_annotation(ctx, id, annot, result);
    }
    Ok(())
}

fn check_annotation(
    ctx: &RuleContext<'_>,
    id: AnnotationId,
    annot: &Annotation,
    result: &mut CheckResult,
) {
    let location = format!("{} annotation {} on page {}", annot.subtype.pdf_name(), id, annot.page);
    let subtype = annot.subtype.pdf_name().to_string();
    let owner = ctx.tree().owner_of_annotation(id).found();
    let owner_role = owner.and_then(|o| ctx.role(o.handle));
    let is_artifact = owner_role == Some(StandardRole::Artifact);

    if annot.subtype == AnnotationSubtype::TrapNet {
        result.add_violation(
            ctx.violation(
                ViolationCode::TrapNetNotAllowed,
                vec![("page", annot.page.to_string())],
            )
            .with_location(location),
        );
        return;
    }

    if annot.subtype == AnnotationSubtype::Popup {
        if owner.is_some() && !is_artifact {
            result.add_violation(
                ctx.violation(ViolationCode::PopupTagged, Vec::new())
                    .with_location(location),
            );
        }
        return;
    }

    if annot.subtype.is_decorative() {
        if let Some(owner) = owner.filter(|_| !is_artifact) {
            result.add_violation(
                ctx.violation(
                    ViolationCode::DecorativeAnnotationNotArtifact,
                    vec![("subtype", subtype), ("role", owner.role.name())],
                )
                .with_location(location),
            );
        }
        return;
    }

    let rich = (annot.contents.as_deref(), annot.rich_contents.as_deref());
    if let (Some(contents), Some(rc)) = rich {
        if !textually_equivalent(contents, rc) {
            result.add_violation(
                ctx.violation(
                    ViolationCode::AnnotationContentsMismatch,
                    vec![("subtype", subtype.clone())],
                )
                .with_location(location.clone()),
            );
        }
    }

    if annot.subtype == AnnotationSubtype::Link && !annot.has_contents() {
        result.add_violation(
            ctx.violation(
                ViolationCode::LinkMissingContents,
                vec![("page", annot.page.to_string())],
            )
            .with_location(location.clone()),
        );
    }

    let Some(owner) = owner else {
        if annot.is_visible() {
            result.add_violation(
                ctx.violation(
                    ViolationCode::AnnotationNotTagged,
                    vec![("subtype", subtype), ("page", annot.page.to_string())],
                )
                .with_location(location),
            );
        }
        return;
    };

    if is_artifact && ctx.profile == UaProfile::Ua2 {
        return;
    }
    check_owner_role(ctx, annot, owner, owner_role, result);
}

fn check_owner_role(
    ctx: &RuleContext<'_>,
    annot: &Annotation,
    owner: &StructNode,
    role: Option<StandardRole>,
    result: &mut CheckResult,
) {
    let (allowed, expected): (&[StandardRole], &str) = match (annot.subtype, ctx.profile) {
        (AnnotationSubtype::Link, UaProfile::Ua1) => (&[StandardRole::Link], "Link"),
        (AnnotationSubtype::Link, UaProfile::Ua2) => {
            (&[StandardRole::Link, StandardRole::Reference], "Link or Reference")
        },
        (s, _) if s.is_markup() => (&[StandardRole::Annot], "Annot"),
        // widgets are checked by the form rules
        _ => return,
    };
    if !role.is_some_and(|r| allowed.contains(&r)) {
        result.add_violation(ctx.violation_at(
            owner.handle,
            ViolationCode::AnnotationRoleInvalid,
            vec![
                ("subtype", annot.subtype.pdf_name().to_string()),
                ("expected", expected.to_string()),
                ("role", owner.role.name()),
            ],
        ));
    }
}
