//! PDF/UA conformance types: profiles, violation codes, records and results.

use super::messages;
use serde::{Deserialize, Serialize};
use std::fmt;

/// PDF/UA conformance profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UaProfile {
    /// PDF/UA-1 (ISO 14289-1:2014)
    #[serde(rename = "UA-1")]
    Ua1,
    /// PDF/UA-2 (ISO 14289-2:2024, based on PDF 2.0)
    #[serde(rename = "UA-2")]
    Ua2,
}

impl fmt::Display for UaProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UaProfile::Ua1 => write!(f, "PDF/UA-1"),
            UaProfile::Ua2 => write!(f, "PDF/UA-2"),
        }
    }
}

impl UaProfile {
    /// Short prefix used to qualify violation codes.
    pub fn code_prefix(&self) -> &'static str {
        match self {
            UaProfile::Ua1 => "UA1",
            UaProfile::Ua2 => "UA2",
        }
    }
}

/// Broad class of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationClass {
    /// Tree shape problems: duplicate ids, irregular table grids, bad nesting
    Structural,
    /// Marked-content tagging problems found while content is authored
    Tagging,
    /// Role-map resolution failures
    Resolution,
    /// Heading, table, note, form, annotation and destination rules
    Semantic,
}

/// Violation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationCode {
    // Structural
    /// Structure element id used more than once
    DuplicateId,
    /// Table rows do not form a regular grid
    TableGridIrregular,
    /// Parent/child role combination not allowed
    RoleNestingNotAllowed,

    // Resolution
    /// Role does not resolve to a standard structure type
    RoleNotMapped,
    /// Role is remapped into its own namespace
    SameNamespaceRemap,
    /// A standard structure type is remapped through the role map
    StandardRoleRemapped,

    // Tagging
    /// Content drawn with no marked content open
    TagNotAdded,
    /// Real content and artifact nested inside each other
    RealContentInsideArtifact,
    /// Content neither real content nor artifact
    ContentNotTagged,
    /// MCID not owned by the referenced structure element
    McidNotFound,
    /// Real content owned by an element that resolves to Artifact
    RealContentInArtifactElement,
    /// Real content drawn inside a popup annotation appearance
    PopupContent,
    /// Private use area glyphs without alternate text
    PuaWithoutAlternate,
    /// Font used for real content is not embedded
    FontNotEmbedded,

    // Headings
    /// Both H and Hn used in one document
    MixedHeadings,
    /// More than one H element
    MultipleGenericHeadings,
    /// Numbered heading level skipped
    HeadingLevelSkipped,
    /// Generic H used where numbered headings are required
    GenericHeadingForbidden,

    // Tables
    /// Headers attribute references an unknown id
    TableHeaderIdNotFound,
    /// TH without a usable Scope
    TableHeaderScopeMissing,
    /// TD not associated with any header
    TableCellWithoutHeader,

    // Notes
    /// Note element without ID
    NoteMissingId,
    /// FENote not referenced by the content that it references
    ContentNotReferencingNote,
    /// Content references an FENote that does not reference it back
    NoteNotReferencingContent,
    /// NoteType attribute with an unknown value
    IncorrectNoteType,

    // Forms
    /// Widget tagged with a role other than Form (or Artifact)
    WidgetRoleInvalid,
    /// Wrong number of widgets inside a Form element
    FormWidgetCount,
    /// Form field without an accessible label
    FormFieldMissingLabel,
    /// Field with additional actions but no description
    AdditionalActionsWithoutContents,
    /// Text field V and RV differ
    RichValueMismatch,

    // Annotations
    /// Visible annotation missing from the structure tree
    AnnotationNotTagged,
    /// Annotation tagged with the wrong role
    AnnotationRoleInvalid,
    /// Decorative annotation not tagged as artifact
    DecorativeAnnotationNotArtifact,
    /// TrapNet annotation present
    TrapNetNotAllowed,
    /// Popup annotation in the structure tree
    PopupTagged,
    /// Contents and RC differ
    AnnotationContentsMismatch,
    /// Link annotation without Contents
    LinkMissingContents,

    // Destinations
    /// Destination does not target a structure element
    NotStructureDestination,
    /// Named destination does not exist
    DestinationUnresolved,
}

impl ViolationCode {
    /// Class this code belongs to.
    pub fn class(&self) -> ViolationClass {
        use ViolationCode::*;
        match self {
            DuplicateId | TableGridIrregular | RoleNestingNotAllowed => ViolationClass::Structural,
            RoleNotMapped | SameNamespaceRemap | StandardRoleRemapped => {
                ViolationClass::Resolution
            },
            TagNotAdded
            | RealContentInsideArtifact
            | ContentNotTagged
            | McidNotFound
            | RealContentInArtifactElement
            | PopupContent
            | PuaWithoutAlternate
            | FontNotEmbedded => ViolationClass::Tagging,
            _ => ViolationClass::Semantic,
        }
    }

    /// ISO 14289 clause most closely associated with the code.
    pub fn clause(&self, profile: UaProfile) -> &'static str {
        use ViolationCode::*;
        match (profile, self) {
            (UaProfile::Ua1, DuplicateId) => "7.1",
            (UaProfile::Ua1, TableGridIrregular) => "7.5",
            (UaProfile::Ua1, RoleNotMapped | SameNamespaceRemap | StandardRoleRemapped) => "7.1",
            (UaProfile::Ua1, FontNotEmbedded) => "7.21.4.1",
            (UaProfile::Ua1, PuaWithoutAlternate) => "7.21.7",
            (UaProfile::Ua1, c) if c.class() == ViolationClass::Tagging => "7.1",
            (UaProfile::Ua1, MixedHeadings | MultipleGenericHeadings | HeadingLevelSkipped) => {
                "7.4"
            },
            (UaProfile::Ua1, GenericHeadingForbidden) => "7.4.4",
            (UaProfile::Ua1, TableHeaderIdNotFound | TableHeaderScopeMissing) => "7.5",
            (UaProfile::Ua1, TableCellWithoutHeader) => "7.5",
            (UaProfile::Ua1, NoteMissingId) => "7.9",
            (UaProfile::Ua1, WidgetRoleInvalid | FormWidgetCount | FormFieldMissingLabel) => {
                "7.18.4"
            },
            (UaProfile::Ua1, AdditionalActionsWithoutContents) => "7.18.4",
            (UaProfile::Ua1, LinkMissingContents) => "7.18.5",
            (UaProfile::Ua1, TrapNetNotAllowed) => "7.18.2",
            (UaProfile::Ua1, PopupTagged | DecorativeAnnotationNotArtifact) => "7.18.1",
            (UaProfile::Ua1, _) => "7.18.1",

            (UaProfile::Ua2, DuplicateId) => "8.2.1",
            (UaProfile::Ua2, TableGridIrregular) => "8.2.5.26",
            (UaProfile::Ua2, RoleNestingNotAllowed) => "8.2.3",
            (UaProfile::Ua2, RoleNotMapped | SameNamespaceRemap | StandardRoleRemapped) => "8.2.2",
            (UaProfile::Ua2, FontNotEmbedded) => "8.4.4",
            (UaProfile::Ua2, PuaWithoutAlternate) => "8.4.5",
            (UaProfile::Ua2, c) if c.class() == ViolationClass::Tagging => "8.2.2",
            (UaProfile::Ua2, MixedHeadings | MultipleGenericHeadings | HeadingLevelSkipped) => {
                "8.2.5.3"
            },
            (UaProfile::Ua2, GenericHeadingForbidden) => "8.2.5.3",
            (UaProfile::Ua2, TableHeaderIdNotFound | TableHeaderScopeMissing) => "8.2.5.26",
            (UaProfile::Ua2, TableCellWithoutHeader) => "8.2.5.26",
            (UaProfile::Ua2, NoteMissingId | IncorrectNoteType) => "8.2.5.11",
            (UaProfile::Ua2, ContentNotReferencingNote | NoteNotReferencingContent) => "8.2.5.11",
            (UaProfile::Ua2, WidgetRoleInvalid | FormWidgetCount | FormFieldMissingLabel) => {
                "8.9.3"
            },
            (UaProfile::Ua2, AdditionalActionsWithoutContents | RichValueMismatch) => "8.9.3",
            (UaProfile::Ua2, NotStructureDestination | DestinationUnresolved) => "8.8",
            (UaProfile::Ua2, _) => "8.9.2",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ViolationCode::*;
        let code = match self {
            DuplicateId => "STRUCT-001",
            TableGridIrregular => "STRUCT-002",
            RoleNestingNotAllowed => "STRUCT-003",

            RoleNotMapped => "ROLE-001",
            SameNamespaceRemap => "ROLE-002",
            StandardRoleRemapped => "ROLE-003",

            TagNotAdded => "TAG-001",
            RealContentInsideArtifact => "TAG-002",
            ContentNotTagged => "TAG-003",
            McidNotFound => "TAG-004",
            RealContentInArtifactElement => "TAG-005",
            PopupContent => "TAG-006",
            PuaWithoutAlternate => "TEXT-001",
            FontNotEmbedded => "TEXT-002",

            MixedHeadings => "HEAD-001",
            MultipleGenericHeadings => "HEAD-002",
            HeadingLevelSkipped => "HEAD-003",
            GenericHeadingForbidden => "HEAD-004",

            TableHeaderIdNotFound => "TBL-001",
            TableHeaderScopeMissing => "TBL-002",
            TableCellWithoutHeader => "TBL-003",

            NoteMissingId => "NOTE-001",
            ContentNotReferencingNote => "NOTE-002",
            NoteNotReferencingContent => "NOTE-003",
            IncorrectNoteType => "NOTE-004",

            WidgetRoleInvalid => "FORM-001",
            FormWidgetCount => "FORM-002",
            FormFieldMissingLabel => "FORM-003",
            AdditionalActionsWithoutContents => "FORM-004",
            RichValueMismatch => "FORM-005",

            AnnotationNotTagged => "ANNOT-001",
            AnnotationRoleInvalid => "ANNOT-002",
            DecorativeAnnotationNotArtifact => "ANNOT-003",
            TrapNetNotAllowed => "ANNOT-004",
            PopupTagged => "ANNOT-005",
            AnnotationContentsMismatch => "ANNOT-006",
            LinkMissingContents => "ANNOT-007",

            NotStructureDestination => "DEST-001",
            DestinationUnresolved => "DEST-002",
        };
        write!(f, "{}", code)
    }
}

/// A single conformance violation.
///
/// Records are created once and never mutated afterwards; the message is
/// rendered from the profile-specific template at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Violation code.
    pub code: ViolationCode,
    /// Class of the violation.
    pub class: ViolationClass,
    /// Profile the violation was reported under.
    pub profile: UaProfile,
    /// Human-readable message.
    pub message: String,
    /// Location in the document (if applicable).
    pub location: Option<String>,
    /// ISO 14289 clause reference.
    pub clause: String,
}

impl ViolationRecord {
    /// Create a record, rendering the message template for `profile` with `params`.
    pub fn new(code: ViolationCode, profile: UaProfile, params: Vec<(&'static str, String)>) -> Self {
        Self {
            code,
            class: code.class(),
            profile,
            message: messages::render(messages::template(code, profile), &params),
            location: None,
            clause: code.clause(profile).to_string(),
        }
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Profile-qualified code, e.g. `UA1-TAG-001`.
    pub fn qualified_code(&self) -> String {
        format!("{}-{}", self.profile.code_prefix(), self.code)
    }
}

impl fmt::Display for ViolationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.qualified_code(), self.message)?;
        if let Some(ref loc) = self.location {
            write!(f, " (at {})", loc)?;
        }
        Ok(())
    }
}

/// Result of a conformance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the document is compliant with the target profile.
    pub is_compliant: bool,
    /// The profile checked against.
    pub profile: UaProfile,
    /// Violations in the order they were found.
    pub violations: Vec<ViolationRecord>,
    /// Summary statistics.
    pub stats: CheckStats,
}

impl CheckResult {
    /// Create an empty (compliant) result for a profile.
    pub fn new(profile: UaProfile) -> Self {
        Self {
            is_compliant: true,
            profile,
            violations: Vec::new(),
            stats: CheckStats::default(),
        }
    }

    /// Add a violation to the result.
    pub fn add_violation(&mut self, violation: ViolationRecord) {
        log::warn!("{}", violation);
        self.violations.push(violation);
        self.is_compliant = false;
    }

    /// Add several violations.
    pub fn extend(&mut self, violations: impl IntoIterator<Item = ViolationRecord>) {
        for v in violations {
            self.add_violation(v);
        }
    }

    /// Fold the report of a finished content stream into this result.
    pub fn absorb(&mut self, report: super::tagging::StreamReport) {
        self.stats.streams_checked += 1;
        self.stats.drawing_operations_checked += report.drawing_operations;
        // already logged by the tracker
        self.violations.extend(report.violations);
        self.is_compliant = self.violations.is_empty();
    }

    /// Check if there are any violations.
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// First violation found, if any.
    pub fn first(&self) -> Option<&ViolationRecord> {
        self.violations.first()
    }

    /// Whether a violation with `code` was reported.
    pub fn contains(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }

    /// Violations of one class.
    pub fn of_class(&self, class: ViolationClass) -> impl Iterator<Item = &ViolationRecord> {
        self.violations.iter().filter(move |v| v.class == class)
    }

    /// Serialize the result as pretty-printed JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Check statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckStats {
    /// Number of structure elements checked.
    pub structure_elements_checked: usize,
    /// Number of distinct (role, namespace) pairs resolved.
    pub roles_resolved: usize,
    /// Number of headings checked.
    pub headings_checked: usize,
    /// Number of tables checked.
    pub tables_checked: usize,
    /// Number of notes checked.
    pub notes_checked: usize,
    /// Number of form fields checked.
    pub form_fields_checked: usize,
    /// Number of annotations checked.
    pub annotations_checked: usize,
    /// Number of link/outline destinations checked.
    pub destinations_checked: usize,
    /// Number of content streams folded in.
    pub streams_checked: usize,
    /// Number of drawing operations seen by the tagging trackers.
    pub drawing_operations_checked: usize,
}
