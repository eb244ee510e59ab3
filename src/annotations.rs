//! PDF annotations as seen by the conformance rules.
//!
//! Only the entries that accessibility rules read are modelled: subtype, page,
//! flags, the Contents/RC pair, the form field a widget belongs to and the
//! target of a link. Owners in the structure tree are discovered through
//! object-reference children (see [`StructureTree::owner_of_annotation`]).
//!
//! Reference: ISO 32000-1:2008, Section 12.5 (annotations), 12.3.2 (destinations)
//!
//! [`StructureTree::owner_of_annotation`]: crate::structure::StructureTree::owner_of_annotation

use crate::annotation_types::{AnnotationFlags, AnnotationSubtype};
use crate::form_fields::FieldId;
use crate::structure::NodeId;
use std::fmt;

/// Index of an annotation in its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub usize);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "annot#{}", self.0)
    }
}

/// A PDF annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Annotation subtype (/Subtype)
    pub subtype: AnnotationSubtype,

    /// Page the annotation is placed on (0-indexed)
    pub page: u32,

    /// Annotation flags (/F)
    pub flags: AnnotationFlags,

    /// Text contents or alternate description (/Contents)
    pub contents: Option<String>,

    /// Rich text contents as XHTML (/RC)
    pub rich_contents: Option<String>,

    /// Form field this widget belongs to
    pub field: Option<FieldId>,

    /// Where a link goes (/Dest or GoTo action)
    pub target: Option<LinkTarget>,
}

impl Annotation {
    /// Create an annotation with no optional entries.
    pub fn new(subtype: AnnotationSubtype, page: u32) -> Self {
        Self {
            subtype,
            page,
            flags: AnnotationFlags::PRINT,
            contents: None,
            rich_contents: None,
            field: None,
            target: None,
        }
    }

    /// Set the Contents entry.
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Set the RC entry.
    pub fn with_rich_contents(mut self, rc: impl Into<String>) -> Self {
        self.rich_contents = Some(rc.into());
        self
    }

    /// Set the annotation flags.
    pub fn with_flags(mut self, flags: AnnotationFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Attach the widget to a form field.
    pub fn with_field(mut self, field: FieldId) -> Self {
        self.field = Some(field);
        self
    }

    /// Set the link target.
    pub fn with_target(mut self, target: LinkTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Non-empty Contents entry.
    pub fn has_contents(&self) -> bool {
        self.contents
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }

    /// Whether the annotation is shown or printed at all.
    pub fn is_visible(&self) -> bool {
        !self.flags.is_hidden()
    }
}

/// An explicit destination.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// Structure destination (PDF 2.0): targets a structure element
    Structure(NodeId),
    /// Page destination: [page /Fit ...]
    Page {
        /// Target page (0-indexed)
        page: u32,
        /// Fit type (XYZ, Fit, FitH, FitV, FitR, FitB, FitBH, FitBV)
        fit: String,
    },
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Structure(node) => write!(f, "structure element {}", node),
            Destination::Page { page, fit } => write!(f, "page {} /{}", page, fit),
        }
    }
}

/// Target of a link annotation or outline item.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    /// Explicit destination array
    Explicit(Destination),
    /// Named destination looked up in the Dests name tree
    Named(String),
}

/// Entry of the Dests name tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NamedDestination {
    /// The name maps straight to a destination array
    Direct(Destination),
    /// The name maps to a dictionary with /SD (structure destination) and /D
    Dictionary {
        /// Structure destination
        sd: Option<Destination>,
        /// Regular destination
        d: Option<Destination>,
    },
}

impl NamedDestination {
    /// The destination a viewer would use: SD takes precedence over D.
    pub fn effective(&self) -> Option<&Destination> {
        match self {
            NamedDestination::Direct(dest) => Some(dest),
            NamedDestination::Dictionary { sd, d } => sd.as_ref().or(d.as_ref()),
        }
    }
}
