//! Footnote and endnote rules.

use super::RuleContext;
use crate::compliance::types::{CheckResult, UaProfile, ViolationCode};
use crate::error::Result;
use crate::structure::{StandardRole, StructNode};

const NOTE_TYPES: &[&str] = &["Footnote", "Endnote", "None"];

fn label(node: &StructNode) -> String {
    match node.id.as_deref() {
        Some(id) => format!("'{}'", id),
        None => node.handle.to_string(),
    }
}

/// Check Note (PDF 1.7) and FENote (PDF 2.0) elements.
///
/// PDF/UA-1 requires every Note to carry an ID. PDF/UA-2 instead requires the
/// note and the content it belongs to to reference each other through /Ref.
pub fn check_notes(ctx: &RuleContext<'_>, result: &mut CheckResult) -> Result<()> {
    let tree = ctx.tree();
    for note in tree.nodes() {
        let Some(role) = ctx.role(note.handle) else {
            continue;
        };
        if !role.is_note() {
            continue;
        }
        result.stats.notes_checked += 1;

        match ctx.profile {
            UaProfile::Ua1 => {
                if role == StandardRole::Note && note.id.as_deref().map_or(true, str::is_empty) {
                    result.add_violation(ctx.violation_at(
                        note.handle,
                        ViolationCode::NoteMissingId,
                        Vec::new(),
                    ));
                }
            },
            UaProfile::Ua2 => {
                if role == StandardRole::FENote {
                    check_fe_note(ctx, note, result);
                }
            },
        }
    }
    Ok(())
}

fn check_fe_note(ctx: &RuleContext<'_>, note: &StructNode, result: &mut CheckResult) {
    if let Some(value) = note.attribute("NoteType").and_then(|v| v.as_str()) {
        if !NOTE_TYPES.contains(&value) {
            result.add_violation(ctx.violation_at(
                note.handle,
                ViolationCode::IncorrectNoteType,
                vec![("value", value.to_string())],
            ));
        }
    }

    let references_back = |content: &StructNode| content.refs.contains(&note.handle);
    let one_way = note
        .refs
        .iter()
        .filter_map(|r| ctx.node(*r))
        .any(|content| !references_back(content));
    let no_inbound = ctx.tree().referrers(note.handle).next().is_none();
    if no_inbound || one_way {
        result.add_violation(ctx.violation_at(
            note.handle,
            ViolationCode::ContentNotReferencingNote,
            vec![("note", label(note))],
        ));
    }

    for content in ctx.tree().referrers(note.handle) {
        if !note.refs.contains(&content.handle) {
            result.add_violation(ctx.violation_at(
                content.handle,
                ViolationCode::NoteNotReferencingContent,
                vec![("note", label(note)), ("content", label(content))],
            ));
        }
    }
}
