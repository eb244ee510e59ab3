//! Message templates for violations.
//!
//! Templates use `{name}` placeholders filled from named parameters, so the two
//! profiles can word the same defect differently while sharing a code.

use super::types::{UaProfile, ViolationCode};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([a-z_]+)\}").unwrap();
}

/// Template for a code under a profile.
pub fn template(code: ViolationCode, profile: UaProfile) -> &'static str {
    use ViolationCode::*;
    match (code, profile) {
        (DuplicateId, _) => "Structure element id '{id}' is not unique",
        (TableGridIrregular, _) => {
            "Table rows are not balanced: row {row} spans {actual} column(s), expected {expected}"
        },
        (RoleNestingNotAllowed, _) => {
            "Parent/child role relation not allowed: {parent} -> {child}"
        },

        (RoleNotMapped, _) => {
            "Role '{role}' in namespace '{namespace}' is not mapped to any standard role"
        },
        (SameNamespaceRemap, _) => {
            "Structure type '{role}' is role-mapped to another structure type in the same namespace '{namespace}'"
        },
        (StandardRoleRemapped, _) => "Standard structure type '{role}' is remapped to '{target}'",

        (TagNotAdded, _) => "Tag has not been added before content adding",
        (RealContentInsideArtifact, _) => {
            "Real content cannot be inside artifact or vice versa ({nesting})"
        },
        (ContentNotTagged, _) => "Content is not real content and not artifact",
        (McidNotFound, _) => {
            "Content with mcid {mcid} on page {page} not found in the structure tree"
        },
        (RealContentInArtifactElement, _) => {
            "Real content is tagged with '{role}' which is role-mapped to Artifact"
        },
        (PopupContent, _) => "Popup annotation content shall not be real content",
        (PuaWithoutAlternate, _) => {
            "Private-use-area content without alternate text (U+{codepoint})"
        },
        (FontNotEmbedded, _) => "Font '{font}' should be embedded",

        (MixedHeadings, _) => "Document uses both H and Hn structure elements",
        (MultipleGenericHeadings, _) => "Document contains more than one H structure element",
        (HeadingLevelSkipped, _) => "Heading level skipped: H{level} is missing before H{found}",
        (GenericHeadingForbidden, _) => {
            "Generic heading H is not allowed, numbered headings Hn shall be used"
        },

        (TableHeaderIdNotFound, _) => {
            "Table cell references header id '{id}' that is not a TH cell of the same table"
        },
        (TableHeaderScopeMissing, UaProfile::Ua1) => {
            "TH cell in a table without Headers shall have Scope Row, Column or Both (found {scope})"
        },
        (TableHeaderScopeMissing, UaProfile::Ua2) => {
            "TH cell has Scope {scope} and cannot be associated with data cells"
        },
        (TableCellWithoutHeader, _) => {
            "Table data cell at row {row}, column {column} is not associated with any header cell"
        },

        (NoteMissingId, _) => "Note tag shall have ID entry",
        (ContentNotReferencingNote, _) => "Content not referencing FE-note {note}",
        (NoteNotReferencingContent, _) => "FE-note {note} not referencing content {content}",
        (IncorrectNoteType, _) => {
            "Incorrect note type value '{value}': expected Footnote, Endnote or None"
        },

        (WidgetRoleInvalid, _) => {
            "Widget annotation shall be tagged with a Form or Artifact structure element, found '{role}'"
        },
        (FormWidgetCount, UaProfile::Ua1) => {
            "Form structure element without a Role attribute shall contain exactly one widget annotation, found {count}"
        },
        (FormWidgetCount, UaProfile::Ua2) => {
            "Form structure element shall contain at most one widget annotation, found {count}"
        },
        (FormFieldMissingLabel, UaProfile::Ua1) => {
            "Form field '{field}' shall have a TU entry or its widget a Contents entry"
        },
        (FormFieldMissingLabel, UaProfile::Ua2) => {
            "Form field '{field}' shall have a TU entry or an alternate description on its Form structure element"
        },
        (AdditionalActionsWithoutContents, _) => {
            "Form field '{field}' has additional actions and shall have a non-empty Contents entry"
        },
        (RichValueMismatch, _) => "V and RV must be textually equivalent (field '{field}')",

        (AnnotationNotTagged, _) => {
            "{subtype} annotation on page {page} is not included in the structure tree"
        },
        (AnnotationRoleInvalid, _) => {
            "{subtype} annotation shall be tagged with {expected}, found '{role}'"
        },
        (DecorativeAnnotationNotArtifact, _) => {
            "{subtype} annotation shall be an artifact, found '{role}'"
        },
        (TrapNetNotAllowed, _) => "TrapNet annotation on page {page} is not permitted",
        (PopupTagged, _) => "Popup annotation shall not be included in the structure tree",
        (AnnotationContentsMismatch, _) => {
            "Contents and RC of {subtype} annotation must be textually equivalent"
        },
        (LinkMissingContents, _) => {
            "Link annotation on page {page} shall have an alternate description in its Contents entry"
        },

        (NotStructureDestination, _) => "Destination is not a structure destination: {target}",
        (DestinationUnresolved, _) => "Destination '{name}' cannot be resolved",
    }
}

/// Fill `{name}` placeholders from `params`. Unknown placeholders are kept.
pub fn render(template: &str, params: &[(&'static str, String)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            params
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
