//! Types for tagged PDF structure trees.
//!
//! Structure elements live in an arena owned by [`StructureTree`](super::StructureTree)
//! and refer to each other through [`NodeId`] handles, so parent links and
//! note/content cross references never form ownership cycles.

use super::namespace::NamespaceId;
use crate::annotations::AnnotationId;
use phf::phf_map;
use std::fmt;

/// Handle of a structure element inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Standard structure types of PDF 1.7 (ISO 32000-1 14.8.4) and PDF 2.0
/// (ISO 32000-2 14.8.4), plus MathML.
///
/// Which names count as standard depends on the namespace a role is read in;
/// see [`StandardRole::from_pdf_1_7`] and [`StandardRole::from_pdf_2_0`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardRole {
    // Grouping
    /// Document root
    Document,
    /// Document fragment (PDF 2.0)
    DocumentFragment,
    /// Part (major division)
    Part,
    /// Article (PDF 1.7)
    Art,
    /// Section
    Sect,
    /// Division
    Div,
    /// Aside (PDF 2.0)
    Aside,
    /// Block quotation (PDF 1.7)
    BlockQuote,
    /// Caption
    Caption,
    /// Table of contents (PDF 1.7)
    TOC,
    /// Table of contents item (PDF 1.7)
    TOCI,
    /// Index (PDF 1.7)
    Index,
    /// Non-structural grouping
    NonStruct,
    /// Private (PDF 1.7)
    Private,

    // Block level
    /// Title (PDF 2.0)
    Title,
    /// Footnote or endnote (PDF 2.0)
    FENote,
    /// Sub-division of a block (PDF 2.0)
    Sub,
    /// Paragraph
    P,
    /// Generic heading
    H,
    /// Numbered heading (H1..H6 in PDF 1.7, any level in PDF 2.0)
    Hn(u32),

    // Lists
    /// List
    L,
    /// List item
    LI,
    /// Label
    Lbl,
    /// List body
    LBody,

    // Tables
    /// Table
    Table,
    /// Table row
    TR,
    /// Table header cell
    TH,
    /// Table data cell
    TD,
    /// Table header row group
    THead,
    /// Table body row group
    TBody,
    /// Table footer row group
    TFoot,

    // Inline
    /// Span
    Span,
    /// Inline quotation (PDF 1.7)
    Quote,
    /// Note (PDF 1.7)
    Note,
    /// Reference (PDF 1.7)
    Reference,
    /// Bibliography entry (PDF 1.7)
    BibEntry,
    /// Computer code (PDF 1.7)
    Code,
    /// Emphasis (PDF 2.0)
    Em,
    /// Strong importance (PDF 2.0)
    Strong,
    /// Link
    Link,
    /// Annotation
    Annot,
    /// Ruby
    Ruby,
    /// Ruby base text
    RB,
    /// Ruby annotation text
    RT,
    /// Ruby punctuation
    RP,
    /// Warichu
    Warichu,
    /// Warichu text
    WT,
    /// Warichu punctuation
    WP,

    // Illustrations
    /// Figure
    Figure,
    /// Formula
    Formula,
    /// Form widget
    Form,

    /// Artifact (PDF 2.0 role-map target)
    Artifact,
    /// Any element of the MathML namespace
    MathMl,
}

static PDF_1_7_ROLES: phf::Map<&'static str, StandardRole> = phf_map! {
    "Document" => StandardRole::Document,
    "Part" => StandardRole::Part,
    "Art" => StandardRole::Art,
    "Sect" => StandardRole::Sect,
    "Div" => StandardRole::Div,
    "BlockQuote" => StandardRole::BlockQuote,
    "Caption" => StandardRole::Caption,
    "TOC" => StandardRole::TOC,
    "TOCI" => StandardRole::TOCI,
    "Index" => StandardRole::Index,
    "NonStruct" => StandardRole::NonStruct,
    "Private" => StandardRole::Private,
    "P" => StandardRole::P,
    "H" => StandardRole::H,
    "H1" => StandardRole::Hn(1),
    "H2" => StandardRole::Hn(2),
    "H3" => StandardRole::Hn(3),
    "H4" => StandardRole::Hn(4),
    "H5" => StandardRole::Hn(5),
    "H6" => StandardRole::Hn(6),
    "L" => StandardRole::L,
    "LI" => StandardRole::LI,
    "Lbl" => StandardRole::Lbl,
    "LBody" => StandardRole::LBody,
    "Table" => StandardRole::Table,
    "TR" => StandardRole::TR,
    "TH" => StandardRole::TH,
    "TD" => StandardRole::TD,
    "THead" => StandardRole::THead,
    "TBody" => StandardRole::TBody,
    "TFoot" => StandardRole::TFoot,
    "Span" => StandardRole::Span,
    "Quote" => StandardRole::Quote,
    "Note" => StandardRole::Note,
    "Reference" => StandardRole::Reference,
    "BibEntry" => StandardRole::BibEntry,
    "Code" => StandardRole::Code,
    "Link" => StandardRole::Link,
    "Annot" => StandardRole::Annot,
    "Ruby" => StandardRole::Ruby,
    "RB" => StandardRole::RB,
    "RT" => StandardRole::RT,
    "RP" => StandardRole::RP,
    "Warichu" => StandardRole::Warichu,
    "WT" => StandardRole::WT,
    "WP" => StandardRole::WP,
    "Figure" => StandardRole::Figure,
    "Formula" => StandardRole::Formula,
    "Form" => StandardRole::Form,
};

// Hn is not listed: PDF 2.0 allows any positive level and is parsed separately.
static PDF_2_0_ROLES: phf::Map<&'static str, StandardRole> = phf_map! {
    "Document" => StandardRole::Document,
    "DocumentFragment" => StandardRole::DocumentFragment,
    "Part" => StandardRole::Part,
    "Sect" => StandardRole::Sect,
    "Div" => StandardRole::Div,
    "Aside" => StandardRole::Aside,
    "NonStruct" => StandardRole::NonStruct,
    "P" => StandardRole::P,
    "H" => StandardRole::H,
    "Title" => StandardRole::Title,
    "FENote" => StandardRole::FENote,
    "Sub" => StandardRole::Sub,
    "Lbl" => StandardRole::Lbl,
    "Span" => StandardRole::Span,
    "Em" => StandardRole::Em,
    "Strong" => StandardRole::Strong,
    "Link" => StandardRole::Link,
    "Annot" => StandardRole::Annot,
    "Form" => StandardRole::Form,
    "Ruby" => StandardRole::Ruby,
    "RB" => StandardRole::RB,
    "RT" => StandardRole::RT,
    "RP" => StandardRole::RP,
    "Warichu" => StandardRole::Warichu,
    "WT" => StandardRole::WT,
    "WP" => StandardRole::WP,
    "L" => StandardRole::L,
    "LI" => StandardRole::LI,
    "LBody" => StandardRole::LBody,
    "Table" => StandardRole::Table,
    "TR" => StandardRole::TR,
    "TH" => StandardRole::TH,
    "TD" => StandardRole::TD,
    "THead" => StandardRole::THead,
    "TBody" => StandardRole::TBody,
    "TFoot" => StandardRole::TFoot,
    "Caption" => StandardRole::Caption,
    "Figure" => StandardRole::Figure,
    "Formula" => StandardRole::Formula,
    "Artifact" => StandardRole::Artifact,
};

impl StandardRole {
    /// Parse a PDF 1.7 standard structure type name.
    pub fn from_pdf_1_7(name: &str) -> Option<Self> {
        PDF_1_7_ROLES.get(name).copied()
    }

    /// Parse a PDF 2.0 standard structure type name.
    pub fn from_pdf_2_0(name: &str) -> Option<Self> {
        PDF_2_0_ROLES
            .get(name)
            .copied()
            .or_else(|| parse_numbered_heading(name).map(StandardRole::Hn))
    }

    /// Parse a name standard in either vocabulary.
    pub fn from_any(name: &str) -> Option<Self> {
        Self::from_pdf_2_0(name).or_else(|| Self::from_pdf_1_7(name))
    }

    /// Numbered heading level, if this is `Hn`.
    pub fn heading_level(&self) -> Option<u32> {
        match self {
            Self::Hn(level) => Some(*level),
            _ => None,
        }
    }

    /// Check if this is a heading type (H, Hn)
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::H | Self::Hn(_))
    }

    /// Check if this is a footnote/endnote type.
    pub fn is_note(&self) -> bool {
        matches!(self, Self::Note | Self::FENote)
    }

    /// Grouping elements that accept block-level children.
    pub fn is_grouping(&self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::DocumentFragment
                | Self::Part
                | Self::Art
                | Self::Sect
                | Self::Div
                | Self::Aside
                | Self::BlockQuote
                | Self::NonStruct
                | Self::Private
                | Self::TOC
                | Self::TOCI
                | Self::Index
        )
    }

    /// Check if this is an inline-level element
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Self::Span
                | Self::Quote
                | Self::Note
                | Self::FENote
                | Self::Reference
                | Self::BibEntry
                | Self::Code
                | Self::Em
                | Self::Strong
                | Self::Link
                | Self::Annot
                | Self::Ruby
                | Self::Warichu
                | Self::Figure
                | Self::Formula
                | Self::Form
                | Self::Lbl
                | Self::Sub
                | Self::MathMl
                | Self::Artifact
        )
    }

    /// Table cell (TH or TD).
    pub fn is_table_cell(&self) -> bool {
        matches!(self, Self::TH | Self::TD)
    }

    /// Table row group (THead, TBody, TFoot).
    pub fn is_row_group(&self) -> bool {
        matches!(self, Self::THead | Self::TBody | Self::TFoot)
    }
}

impl fmt::Display for StandardRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hn(level) => write!(f, "H{}", level),
            Self::MathMl => write!(f, "math"),
            // every other variant is named after its PDF name
            other => write!(f, "{:?}", other),
        }
    }
}

/// Parse `H<n>` with `n >= 1` and no leading zero.
fn parse_numbered_heading(name: &str) -> Option<u32> {
    let digits = name.strip_prefix('H')?;
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

/// Structure type of an element as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleRef {
    /// A name that is a standard structure type in some vocabulary
    Standard(StandardRole),
    /// A custom name that needs role mapping
    Custom(String),
}

impl RoleRef {
    /// Parse a structure type name.
    pub fn parse(name: &str) -> Self {
        match StandardRole::from_any(name) {
            Some(role) if role.to_string() == name => Self::Standard(role),
            _ => Self::Custom(name.to_string()),
        }
    }

    /// The name as written.
    pub fn name(&self) -> String {
        match self {
            Self::Standard(role) => role.to_string(),
            Self::Custom(name) => name.clone(),
        }
    }
}

impl From<&str> for RoleRef {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<StandardRole> for RoleRef {
    fn from(role: StandardRole) -> Self {
        Self::Standard(role)
    }
}

impl fmt::Display for RoleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(role) => write!(f, "{}", role),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Standard attribute owners used by the rules.
pub mod owners {
    /// Table attributes (Scope, Headers, RowSpan, ColSpan)
    pub const TABLE: &str = "Table";
    /// PrintField attributes (Role, checked, Desc)
    pub const PRINT_FIELD: &str = "PrintField";
    /// Layout attributes
    pub const LAYOUT: &str = "Layout";
    /// List attributes
    pub const LIST: &str = "List";
}

/// Value of a structure attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// PDF name
    Name(String),
    /// Text string
    Text(String),
    /// Integer
    Integer(i64),
    /// Real number
    Number(f64),
    /// Array of strings (e.g. the Headers id list)
    List(Vec<String>),
}

impl AttributeValue {
    /// Name or text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Name(s) | Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            _ => None,
        }
    }

    /// List value; a single string is treated as a one-element list.
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            Self::List(items) => items.iter().map(String::as_str).collect(),
            Self::Name(s) | Self::Text(s) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }
}

/// A structure attribute: (owner, key, value).
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute owner (e.g. "Table", "Layout", or a namespace URI)
    pub owner: String,
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: AttributeValue,
}

/// Child of a structure element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructChild {
    /// Another structure element
    Node(NodeId),

    /// Marked content on a page, identified by MCID
    MarkedContent {
        /// Page number containing this marked content
        page: u32,
        /// Marked Content ID
        mcid: u32,
    },

    /// Object reference to an annotation (OBJR)
    Annotation(AnnotationId),
}

/// A structure element (StructElem).
#[derive(Debug, Clone, PartialEq)]
pub struct StructNode {
    /// Handle of this node
    pub handle: NodeId,
    /// Structure type (/S)
    pub role: RoleRef,
    /// Explicit namespace (/NS); inherited when `None`
    pub namespace: Option<NamespaceId>,
    /// Element identifier (/ID)
    pub id: Option<String>,
    /// Attributes (/A)
    pub attributes: Vec<Attribute>,
    /// Alternate description (/Alt)
    pub alt: Option<String>,
    /// Replacement text (/ActualText)
    pub actual_text: Option<String>,
    /// Language (/Lang)
    pub lang: Option<String>,
    /// Title (/T)
    pub title: Option<String>,
    /// Parent element (/P); `None` for roots
    pub parent: Option<NodeId>,
    /// Children in logical order (/K)
    pub children: Vec<StructChild>,
    /// Non-owning cross references (/Ref)
    pub refs: Vec<NodeId>,
}

impl StructNode {
    /// Create a new structure element
    pub fn new(handle: NodeId, role: RoleRef) -> Self {
        Self {
            handle,
            role,
            namespace: None,
            id: None,
            attributes: Vec::new(),
            alt: None,
            actual_text: None,
            lang: None,
            title: None,
            parent: None,
            children: Vec::new(),
            refs: Vec::new(),
        }
    }

    /// First attribute with `key`, regardless of owner.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| &a.value)
    }

    /// Attribute with `key` from a specific owner.
    pub fn attribute_of(&self, owner: &str, key: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.owner == owner && a.key == key)
            .map(|a| &a.value)
    }

    /// Child structure elements in order.
    pub fn child_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().filter_map(|c| match c {
            StructChild::Node(id) => Some(*id),
            _ => None,
        })
    }

    /// Marked content owned directly by this element.
    pub fn marked_content(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.children.iter().filter_map(|c| match c {
            StructChild::MarkedContent { page, mcid } => Some((*page, *mcid)),
            _ => None,
        })
    }

    /// Annotations referenced directly by this element.
    pub fn annotations(&self) -> impl Iterator<Item = AnnotationId> + '_ {
        self.children.iter().filter_map(|c| match c {
            StructChild::Annotation(id) => Some(*id),
            _ => None,
        })
    }

    /// Whether this element owns the given marked content.
    pub fn owns_mcid(&self, page: u32, mcid: u32) -> bool {
        self.marked_content().any(|mc| mc == (page, mcid))
    }

    /// Non-empty Alt or ActualText.
    pub fn has_alternate(&self) -> bool {
        let non_empty = |s: &Option<String>| s.as_deref().is_some_and(|t| !t.trim().is_empty());
        non_empty(&self.alt) || non_empty(&self.actual_text)
    }
}
