//! Interactive form fields (AcroForm) as seen by the conformance rules.
//!
//! Implements field flags per ISO 32000-1:2008 Section 12.7.3 (Field Flags).
//! A field owns one or more widget annotations; the structure tree refers to
//! the widgets, never to the field itself.

use crate::annotations::AnnotationId;
use bitflags::bitflags;
use std::fmt;

/// Index of a form field in its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub usize);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field#{}", self.0)
    }
}

bitflags! {
    /// Field flags (/Ff).
    ///
    /// Per ISO 32000-1 Table 221 (common) and Table 228 (text fields).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldFlags: u32 {
        /// Bit 1: Field is read-only; user cannot change the value
        const READ_ONLY = 1 << 0;

        /// Bit 2: Field is required; must have a value before submit
        const REQUIRED = 1 << 1;

        /// Bit 3: Field should not be exported by submit-form action
        const NO_EXPORT = 1 << 2;

        /// Bit 13: Text may include multiple lines
        const MULTILINE = 1 << 12;

        /// Bit 14: Text should be displayed as asterisks (password)
        const PASSWORD = 1 << 13;

        /// Bit 26: Field contains rich text (RV is meaningful)
        const RICH_TEXT = 1 << 25;
    }
}

/// Field type (/FT plus the button/choice flags that refine it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Text field (Tx)
    Text,
    /// Push button (Btn with PushButton flag)
    PushButton,
    /// Check box (Btn)
    CheckBox,
    /// Radio button group (Btn with Radio flag)
    RadioButton,
    /// Combo or list box (Ch)
    Choice,
    /// Signature field (Sig)
    Signature,
}

/// A terminal form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Fully qualified field name (/T chain)
    pub name: String,

    /// Field type
    pub kind: FieldKind,

    /// Field flags
    pub flags: FieldFlags,

    /// Alternate field name used as accessible label (/TU)
    pub tooltip: Option<String>,

    /// Triggers present in the additional-actions dictionary (/AA), e.g. "K", "F"
    pub additional_actions: Vec<String>,

    /// Field value (/V)
    pub value: Option<String>,

    /// Rich text value as XHTML (/RV)
    pub rich_value: Option<String>,

    /// Widget annotations of this field
    pub widgets: Vec<AnnotationId>,
}

impl FormField {
    /// Create a field with no optional entries.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            flags: FieldFlags::empty(),
            tooltip: None,
            additional_actions: Vec::new(),
            value: None,
            rich_value: None,
            widgets: Vec::new(),
        }
    }

    /// Set the TU entry.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Set the field flags.
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Add an additional-action trigger.
    pub fn with_action(mut self, trigger: impl Into<String>) -> Self {
        self.additional_actions.push(trigger.into());
        self
    }

    /// Set V and, optionally, RV. An RV marks the field as rich text.
    pub fn with_value(mut self, value: impl Into<String>, rich_value: Option<String>) -> Self {
        self.value = Some(value.into());
        self.flags.set(FieldFlags::RICH_TEXT, rich_value.is_some());
        self.rich_value = rich_value;
        self
    }

    /// RichText flag set, so RV carries the value.
    pub fn is_rich_text(&self) -> bool {
        self.flags.contains(FieldFlags::RICH_TEXT)
    }

    /// Non-empty TU entry.
    pub fn has_tooltip(&self) -> bool {
        self.tooltip
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }
}
