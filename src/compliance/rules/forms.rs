//! Form field and widget rules (ISO 14289-1, 7.18.4; ISO 14289-2, 8.9.3).

use super::RuleContext;
use crate::annotation_types::AnnotationSubtype;
use crate::annotations::AnnotationId;
use crate::compliance::rich_text::textually_equivalent;
use crate::compliance::types::{CheckResult, UaProfile, ViolationCode};
use crate::error::Result;
use crate::form_fields::{FieldKind, FormField};
use crate::structure::{owners, StandardRole, StructNode};

/// Check widget tagging, Form element contents and field labels.
pub fn check_forms(ctx: &RuleContext<'_>, result: &mut CheckResult) -> Result<()> {
    log::debug!("Checking form fields ({})", ctx.profile);
    check_widget_owners(ctx, result);
    check_form_elements(ctx, result);
    for field in &ctx.document.fields {
        result.stats.form_fields_checked += 1;
        check_field(ctx, field, result);
    }
    Ok(())
}

fn widget_owner<'a>(ctx: &RuleContext<'a>, widget: AnnotationId) -> Option<&'a StructNode> {
    ctx.tree().owner_of_annotation(widget).found()
}

/// Widgets must be tagged Form or Artifact.
fn check_widget_owners(ctx: &RuleContext<'_>, result: &mut CheckResult) {
    for (id, annot) in ctx.document.annotations() {
        if annot.subtype != AnnotationSubtype::Widget {
            continue;
        }
        // untagged widgets are reported by the annotation rule
        let Some(owner) = widget_owner(ctx, id) else {
            continue;
        };
        if !matches!(ctx.role(owner.handle), Some(StandardRole::Form | StandardRole::Artifact)) {
            result.add_violation(ctx.violation_at(
                owner.handle,
                ViolationCode::WidgetRoleInvalid,
                vec![("role", owner.role.name())],
            ));
        }
    }
}

/// Number of widgets a Form element may hold.
fn check_form_elements(ctx: &RuleContext<'_>, result: &mut CheckResult) {
    for node in ctx.tree().nodes() {
        if !ctx.is(node.handle, StandardRole::Form) {
            continue;
        }
        let widgets = node
            .annotations()
            .filter(|a| {
                ctx.document
                    .annotation(*a)
                    .is_some_and(|annot| annot.subtype == AnnotationSubtype::Widget)
            })
            .count();
        let ok = match ctx.profile {
            UaProfile::Ua2 => widgets <= 1,
            UaProfile::Ua1 => {
                node.attribute_of(owners::PRINT_FIELD, "Role").is_some() || widgets == 1
            },
        };
        if !ok {
            result.add_violation(ctx.violation_at(
                node.handle,
                ViolationCode::FormWidgetCount,
                vec![("count", widgets.to_string())],
            ));
        }
    }
}

fn check_field(ctx: &RuleContext<'_>, field: &FormField, result: &mut CheckResult) {
    let widgets: Vec<_> = field
        .widgets
        .iter()
        .filter_map(|w| ctx.document.annotation(*w).map(|a| (*w, a)))
        .collect();

    // fields whose every widget is an artifact are not presented to users
    let all_artifacts = !widgets.is_empty()
        && widgets.iter().all(|(id, _)| {
            widget_owner(ctx, *id).is_some_and(|o| ctx.is(o.handle, StandardRole::Artifact))
        });
    if all_artifacts {
        return;
    }

    let location = format!("field '{}'", field.name);
    let labelled = field.has_tooltip()
        || match ctx.profile {
            UaProfile::Ua1 => widgets.iter().any(|(_, a)| a.has_contents()),
            UaProfile::Ua2 => widgets.iter().any(|(id, _)| {
                widget_owner(ctx, *id).is_some_and(|o| {
                    o.alt.as_deref().is_some_and(|alt| !alt.trim().is_empty())
                })
            }),
        };
    if !labelled {
        result.add_violation(
            ctx.violation(
                ViolationCode::FormFieldMissingLabel,
                vec![("field", field.name.clone())],
            )
            .with_location(location.clone()),
        );
    }

    if !field.additional_actions.is_empty() && !widgets.iter().any(|(_, a)| a.has_contents()) {
        result.add_violation(
            ctx.violation(
                ViolationCode::AdditionalActionsWithoutContents,
                vec![("field", field.name.clone())],
            )
            .with_location(location.clone()),
        );
    }

    if ctx.profile == UaProfile::Ua2 && field.kind == FieldKind::Text && field.is_rich_text() {
        if let (Some(v), Some(rv)) = (field.value.as_deref(), field.rich_value.as_deref()) {
            if !textually_equivalent(v, rv) {
                result.add_violation(
                    ctx.violation(
                        ViolationCode::RichValueMismatch,
                        vec![("field", field.name.clone())],
                    )
                    .with_location(location),
                );
            }
        }
    }
}
