//! Marked-content tagging state tracker.
//!
//! One tracker per content stream follows the BDC/BMC ... EMC nesting while
//! content is authored and checks each drawing operation against the open
//! marked-content sequences (ISO 32000-1:2008, 14.6 and 14.8.2.2).
//!
//! Every drawing operation must be either real content, owned by a structure
//! element through its MCID, or an artifact. Real content and artifacts never
//! nest inside each other; pure grouping sequences (e.g. `/Span` with an
//! ActualText) may appear anywhere and do not classify content.

use super::role_resolver::RoleResolver;
use super::types::{UaProfile, ViolationCode, ViolationRecord};
use crate::annotation_types::AnnotationSubtype;
use crate::error::{Error, Result};
use crate::structure::{Lookup, NodeId, StandardRole};
use indexmap::IndexSet;

/// Marked-content sequence as opened by BDC/BMC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkedContentTag {
    /// Real content owned by a structure element
    RealContent {
        /// Owning structure element
        node: NodeId,
        /// Marked content id
        mcid: u32,
    },
    /// /Artifact sequence
    Artifact,
    /// A tag with neither an MCID nor the Artifact role
    Unassociated(String),
    /// Pure grouping sequence that does not classify its content
    Grouping(String),
}

impl MarkedContentTag {
    fn describe(&self) -> String {
        match self {
            MarkedContentTag::RealContent { node, mcid } => format!("mcid {} of {}", mcid, node),
            MarkedContentTag::Artifact => "Artifact".to_string(),
            MarkedContentTag::Unassociated(tag) | MarkedContentTag::Grouping(tag) => tag.clone(),
        }
    }
}

/// Font used by a glyph run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontRef {
    /// Base font name
    pub name: String,
    /// Whether the font program is embedded
    pub embedded: bool,
}

/// Text shown by one text-showing operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRun {
    /// Font in use
    pub font: FontRef,
    /// Unicode text of the glyphs
    pub text: String,
}

/// Event reported by the content producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEvent {
    /// BDC/BMC
    OpenTag {
        /// The sequence being opened
        tag: MarkedContentTag,
        /// ActualText property of the sequence, if any
        actual_text: Option<String>,
    },
    /// EMC
    CloseTag,
    /// A painting operator that is not text (path, image, shading, XObject)
    Draw,
    /// A text-showing operator
    ShowGlyphs(GlyphRun),
}

impl ContentEvent {
    /// Open a sequence without properties.
    pub fn open(tag: MarkedContentTag) -> Self {
        ContentEvent::OpenTag {
            tag,
            actual_text: None,
        }
    }

    /// Open a sequence carrying ActualText.
    pub fn open_with_actual_text(tag: MarkedContentTag, actual_text: impl Into<String>) -> Self {
        ContentEvent::OpenTag {
            tag,
            actual_text: Some(actual_text.into()),
        }
    }

    /// Show `text` in `font`.
    pub fn glyphs(font: &str, embedded: bool, text: impl Into<String>) -> Self {
        ContentEvent::ShowGlyphs(GlyphRun {
            font: FontRef {
                name: font.to_string(),
                embedded,
            },
            text: text.into(),
        })
    }
}

/// What the content stream belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Page content stream
    Page,
    /// Form XObject painted on the page
    FormXObject,
    /// Appearance stream of an annotation
    AnnotationAppearance(AnnotationSubtype),
}

impl StreamKind {
    fn is_popup(&self) -> bool {
        matches!(self, StreamKind::AnnotationAppearance(AnnotationSubtype::Popup))
    }
}

/// Summary of a finished content stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamReport {
    /// Page the stream belongs to
    pub page: u32,
    /// Stream kind
    pub kind: StreamKind,
    /// Violations in the order they occurred
    pub violations: Vec<ViolationRecord>,
    /// Drawing and text operations seen
    pub drawing_operations: usize,
}

#[derive(Debug)]
struct Frame {
    tag: MarkedContentTag,
    actual_text: Option<String>,
    validated: bool,
    pua_reported: bool,
}

enum Classification {
    Artifact,
    Real(usize),
    Untagged,
    Unclassified,
}

/// Validates marked-content tagging of one content stream as it is produced.
#[derive(Debug)]
pub struct TaggingStateTracker {
    page: u32,
    kind: StreamKind,
    fail_fast: bool,
    stack: Vec<Frame>,
    violations: Vec<ViolationRecord>,
    unembedded_fonts: IndexSet<String>,
    drawing_operations: usize,
    untagged_reported: bool,
}

impl TaggingStateTracker {
    /// Tracker for a page content stream.
    pub fn new(page: u32) -> Self {
        Self::for_stream(page, StreamKind::Page)
    }

    /// Tracker for any kind of content stream.
    pub fn for_stream(page: u32, kind: StreamKind) -> Self {
        Self {
            page,
            kind,
            fail_fast: false,
            stack: Vec::new(),
            violations: Vec::new(),
            unembedded_fonts: IndexSet::new(),
            drawing_operations: 0,
            untagged_reported: false,
        }
    }

    /// Return the first violation from [`notify`](Self::notify) as an error.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Violations recorded so far.
    pub fn violations(&self) -> &[ViolationRecord] {
        &self.violations
    }

    /// Feed one content event.
    ///
    /// Returns `Err` for caller misuse (unbalanced close) and, in fail-fast
    /// mode, for the first violation.
    pub fn notify(&mut self, resolver: &RoleResolver<'_>, event: ContentEvent) -> Result<()> {
        match event {
            ContentEvent::OpenTag { tag, actual_text } => self.open_tag(resolver, tag, actual_text),
            ContentEvent::CloseTag => self.close_tag(),
            ContentEvent::Draw => self.draw(resolver).map(|_| ()),
            ContentEvent::ShowGlyphs(run) => self.show_glyphs(resolver, run),
        }
    }

    /// Finish the stream and collect its report.
    pub fn finish(mut self, resolver: &RoleResolver<'_>) -> Result<StreamReport> {
        if !self.stack.is_empty() {
            return Err(Error::UnclosedMarkedContent {
                page: self.page,
                open: self.stack.len(),
            });
        }
        let profile = resolver.profile();
        let fonts: Vec<String> = self.unembedded_fonts.drain(..).collect();
        for font in fonts {
            let v = ViolationRecord::new(ViolationCode::FontNotEmbedded, profile, vec![("font", font)])
                .with_location(format!("page {}", self.page));
            self.record(v)?;
        }
        log::debug!(
            "Content stream on page {} finished: {} operations, {} violations",
            self.page,
            self.drawing_operations,
            self.violations.len()
        );
        Ok(StreamReport {
            page: self.page,
            kind: self.kind,
            violations: self.violations,
            drawing_operations: self.drawing_operations,
        })
    }

    fn open_tag(
        &mut self,
        resolver: &RoleResolver<'_>,
        tag: MarkedContentTag,
        actual_text: Option<String>,
    ) -> Result<()> {
        let inside_artifact = self.stack.iter().any(|f| f.tag == MarkedContentTag::Artifact);
        let inside_real = self
            .stack
            .iter()
            .any(|f| matches!(f.tag, MarkedContentTag::RealContent { .. }));
        let nesting = match tag {
            MarkedContentTag::Artifact if inside_real => Some("artifact inside real content"),
            MarkedContentTag::RealContent { .. } if inside_artifact => {
                Some("real content inside artifact")
            },
            _ => None,
        };

        self.untagged_reported = false;
        self.stack.push(Frame {
            tag,
            actual_text,
            validated: false,
            pua_reported: false,
        });

        if let Some(nesting) = nesting {
            let v = ViolationRecord::new(
                ViolationCode::RealContentInsideArtifact,
                resolver.profile(),
                vec![("nesting", nesting.to_string())],
            )
            .with_location(format!("page {}", self.page));
            self.record(v)?;
        }
        Ok(())
    }

    fn close_tag(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(_) => Ok(()),
            None => Err(Error::UnbalancedMarkedContent { page: self.page }),
        }
    }

    fn classify(&self) -> Classification {
        if self.stack.is_empty() {
            return Classification::Untagged;
        }
        if self.stack.iter().any(|f| f.tag == MarkedContentTag::Artifact) {
            return Classification::Artifact;
        }
        match self
            .stack
            .iter()
            .rposition(|f| !matches!(f.tag, MarkedContentTag::Grouping(_)))
        {
            Some(i) if matches!(self.stack[i].tag, MarkedContentTag::RealContent { .. }) => {
                Classification::Real(i)
            },
            _ => Classification::Unclassified,
        }
    }

    /// Check a drawing operation; returns the real-content frame it belongs to.
    fn draw(&mut self, resolver: &RoleResolver<'_>) -> Result<Option<usize>> {
        self.drawing_operations += 1;
        let profile = resolver.profile();

        match self.classify() {
            Classification::Artifact => Ok(None),
            Classification::Untagged => {
                if !self.untagged_reported {
                    self.untagged_reported = true;
                    let v = ViolationRecord::new(ViolationCode::TagNotAdded, profile, Vec::new())
                        .with_location(format!("page {}", self.page));
                    self.record(v)?;
                }
                Ok(None)
            },
            Classification::Unclassified => {
                let top = self.stack.len() - 1;
                if !self.stack[top].validated {
                    self.stack[top].validated = true;
                    let v = ViolationRecord::new(ViolationCode::ContentNotTagged, profile, Vec::new())
                        .with_location(format!(
                            "page {}, tag {}",
                            self.page,
                            self.stack[top].tag.describe()
                        ));
                    self.record(v)?;
                }
                Ok(None)
            },
            Classification::Real(i) => {
                if !self.stack[i].validated {
                    self.stack[i].validated = true;
                    if let MarkedContentTag::RealContent { node, mcid } = self.stack[i].tag {
                        for v in self.validate_real_content(resolver, node, mcid)? {
                            self.record(v)?;
                        }
                    }
                }
                Ok(Some(i))
            },
        }
    }

    fn validate_real_content(
        &self,
        resolver: &RoleResolver<'_>,
        node: NodeId,
        mcid: u32,
    ) -> Result<Vec<ViolationRecord>> {
        let profile = resolver.profile();
        let location = format!("page {}, mcid {}", self.page, mcid);
        let mut found = Vec::new();

        let owner = match resolver.tree().node(node) {
            Lookup::Found(n) if n.owns_mcid(self.page, mcid) => n,
            _ => {
                found.push(
                    ViolationRecord::new(
                        ViolationCode::McidNotFound,
                        profile,
                        vec![("mcid", mcid.to_string()), ("page", self.page.to_string())],
                    )
                    .with_location(location),
                );
                return Ok(found);
            },
        };

        if let Ok(StandardRole::Artifact) = resolver.resolve_node(node)? {
            found.push(
                ViolationRecord::new(
                    ViolationCode::RealContentInArtifactElement,
                    profile,
                    vec![("role", owner.role.name())],
                )
                .with_location(location.clone()),
            );
        }

        if self.kind.is_popup() {
            found.push(
                ViolationRecord::new(ViolationCode::PopupContent, profile, Vec::new())
                    .with_location(location),
            );
        }
        Ok(found)
    }

    fn show_glyphs(&mut self, resolver: &RoleResolver<'_>, run: GlyphRun) -> Result<()> {
        let frame = match self.draw(resolver)? {
            Some(i) => i,
            None => return Ok(()),
        };

        if !run.font.embedded {
            self.unembedded_fonts.insert(run.font.name.clone());
        }

        if resolver.profile() != UaProfile::Ua2 || self.stack[frame].pua_reported {
            return Ok(());
        }
        let Some(codepoint) = run.text.chars().find(|c| is_private_use(*c)) else {
            return Ok(());
        };
        if self.has_alternate(resolver, frame) {
            return Ok(());
        }

        self.stack[frame].pua_reported = true;
        let v = ViolationRecord::new(
            ViolationCode::PuaWithoutAlternate,
            resolver.profile(),
            vec![("codepoint", format!("{:04X}", codepoint as u32))],
        )
        .with_location(format!("page {}, font {}", self.page, run.font.name));
        self.record(v)
    }

    /// Alt/ActualText on the owning element, or ActualText on any open sequence.
    fn has_alternate(&self, resolver: &RoleResolver<'_>, frame: usize) -> bool {
        let on_frames = self
            .stack
            .iter()
            .any(|f| f.actual_text.as_deref().is_some_and(|t| !t.is_empty()));
        if on_frames {
            return true;
        }
        match self.stack[frame].tag {
            MarkedContentTag::RealContent { node, .. } => resolver
                .tree()
                .node(node)
                .found()
                .is_some_and(|n| n.has_alternate()),
            _ => false,
        }
    }

    fn record(&mut self, violation: ViolationRecord) -> Result<()> {
        if self.fail_fast {
            return Err(Error::Conformance(Box::new(violation)));
        }
        log::warn!("{}", violation);
        self.violations.push(violation);
        Ok(())
    }
}

/// Unicode private use areas (BMP and planes 15-16).
pub fn is_private_use(c: char) -> bool {
    matches!(c as u32, 0xE000..=0xF8FF | 0xF0000..=0xFFFFD | 0x100000..=0x10FFFD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{StructureTree, StructureTreeBuilder};

    fn paragraph_tree() -> (StructureTree, NodeId) {
        let mut b = StructureTreeBuilder::new();
        let doc = b.add_root("Document");
        let p = b.add_child(doc, "P").unwrap();
        b.mark_content(p, 0).unwrap();
        (b.freeze(), p)
    }

    fn real(node: NodeId, mcid: u32) -> ContentEvent {
        ContentEvent::open(MarkedContentTag::RealContent { node, mcid })
    }

    #[test]
    fn test_well_formed_stream_has_no_violations() {
        let (tree, p) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::new(0);
        t.notify(&resolver, real(p, 0)).unwrap();
        t.notify(&resolver, ContentEvent::glyphs("Helvetica", true, "Hello"))
            .unwrap();
        t.notify(&resolver, ContentEvent::CloseTag).unwrap();
        t.notify(&resolver, ContentEvent::open(MarkedContentTag::Artifact))
            .unwrap();
        t.notify(&resolver, ContentEvent::Draw).unwrap();
        t.notify(&resolver, ContentEvent::CloseTag).unwrap();
        let report = t.finish(&resolver).unwrap();
        assert!(report.violations.is_empty());
        assert_eq!(report.drawing_operations, 2);
    }

    #[test]
    fn test_draw_before_tag() {
        let (tree, _) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::new(0);
        t.notify(&resolver, ContentEvent::Draw).unwrap();
        t.notify(&resolver, ContentEvent::Draw).unwrap();
        assert_eq!(t.violations().len(), 1);
        assert_eq!(t.violations()[0].code, ViolationCode::TagNotAdded);
        assert!(t.violations()[0]
            .message
            .contains("Tag has not been added before content adding"));
    }

    #[test]
    fn test_artifact_inside_real_content() {
        let (tree, p) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua2);
        let mut t = TaggingStateTracker::new(0);
        t.notify(&resolver, real(p, 0)).unwrap();
        t.notify(&resolver, ContentEvent::open(MarkedContentTag::Artifact))
            .unwrap();
        assert_eq!(t.violations()[0].code, ViolationCode::RealContentInsideArtifact);
        assert!(t.violations()[0]
            .message
            .contains("Real content cannot be inside artifact"));
    }

    #[test]
    fn test_grouping_inside_artifact_is_fine() {
        let (tree, _) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::new(0);
        t.notify(&resolver, ContentEvent::open(MarkedContentTag::Artifact))
            .unwrap();
        t.notify(&resolver, ContentEvent::open(MarkedContentTag::Grouping("Span".into())))
            .unwrap();
        t.notify(&resolver, ContentEvent::Draw).unwrap();
        t.notify(&resolver, ContentEvent::CloseTag).unwrap();
        t.notify(&resolver, ContentEvent::CloseTag).unwrap();
        assert!(t.finish(&resolver).unwrap().violations.is_empty());
    }

    #[test]
    fn test_unassociated_reported_once_per_frame() {
        let (tree, _) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::new(0);
        t.notify(&resolver, ContentEvent::open(MarkedContentTag::Unassociated("Tx".into())))
            .unwrap();
        t.notify(&resolver, ContentEvent::Draw).unwrap();
        t.notify(&resolver, ContentEvent::Draw).unwrap();
        assert_eq!(t.violations().len(), 1);
        assert_eq!(t.violations()[0].code, ViolationCode::ContentNotTagged);
    }

    #[test]
    fn test_mcid_not_owned() {
        let (tree, p) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::new(0);
        t.notify(&resolver, real(p, 5)).unwrap();
        t.notify(&resolver, ContentEvent::Draw).unwrap();
        assert_eq!(t.violations()[0].code, ViolationCode::McidNotFound);
        assert!(t.violations()[0].message.contains("mcid 5"));
    }

    #[test]
    fn test_close_without_open_is_engine_error() {
        let (tree, _) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::new(2);
        assert!(matches!(
            t.notify(&resolver, ContentEvent::CloseTag),
            Err(Error::UnbalancedMarkedContent { page: 2 })
        ));
    }

    #[test]
    fn test_unclosed_stream_is_engine_error() {
        let (tree, _) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::new(0);
        t.notify(&resolver, ContentEvent::open(MarkedContentTag::Artifact))
            .unwrap();
        assert!(matches!(
            t.finish(&resolver),
            Err(Error::UnclosedMarkedContent { open: 1, .. })
        ));
    }

    #[test]
    fn test_fail_fast_returns_violation() {
        let (tree, _) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::new(0).fail_fast(true);
        let err = t.notify(&resolver, ContentEvent::Draw).unwrap_err();
        assert_eq!(err.violation().map(|v| v.code), Some(ViolationCode::TagNotAdded));
    }

    #[test]
    fn test_private_use_glyphs_need_alternate_in_ua2() {
        let (tree, p) = paragraph_tree();
        let pua = "\u{E001}";

        let resolver = RoleResolver::new(&tree, UaProfile::Ua2);
        let mut t = TaggingStateTracker::new(0);
        t.notify(&resolver, real(p, 0)).unwrap();
        t.notify(&resolver, ContentEvent::glyphs("Icons", true, pua)).unwrap();
        t.notify(&resolver, ContentEvent::glyphs("Icons", true, pua)).unwrap();
        assert_eq!(t.violations().len(), 1);
        assert_eq!(t.violations()[0].code, ViolationCode::PuaWithoutAlternate);
        assert!(t.violations()[0].message.contains("U+E001"));

        let mut t = TaggingStateTracker::new(0);
        t.notify(
            &resolver,
            ContentEvent::open_with_actual_text(
                MarkedContentTag::RealContent { node: p, mcid: 0 },
                "check mark",
            ),
        )
        .unwrap();
        t.notify(&resolver, ContentEvent::glyphs("Icons", true, pua)).unwrap();
        assert!(t.violations().is_empty());

        let ua1 = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::new(0);
        t.notify(&ua1, real(p, 0)).unwrap();
        t.notify(&ua1, ContentEvent::glyphs("Icons", true, pua)).unwrap();
        assert!(t.violations().is_empty());
    }

    #[test]
    fn test_private_use_reported_per_frame() {
        let (tree, p) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua2);
        let mut t = TaggingStateTracker::new(0);
        for _ in 0..2 {
            t.notify(&resolver, real(p, 0)).unwrap();
            t.notify(&resolver, ContentEvent::glyphs("Icons", true, "\u{E001}")).unwrap();
            t.notify(&resolver, ContentEvent::glyphs("Icons", true, "\u{F8FF}")).unwrap();
            t.notify(&resolver, ContentEvent::CloseTag).unwrap();
        }
        assert_eq!(t.violations().len(), 2);
    }

    #[test]
    fn test_unembedded_font_reported_once_at_finish() {
        let (tree, p) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::new(0);
        t.notify(&resolver, real(p, 0)).unwrap();
        t.notify(&resolver, ContentEvent::glyphs("Arial", false, "a")).unwrap();
        t.notify(&resolver, ContentEvent::glyphs("Arial", false, "b")).unwrap();
        t.notify(&resolver, ContentEvent::CloseTag).unwrap();
        assert!(t.violations().is_empty());
        let report = t.finish(&resolver).unwrap();
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].code, ViolationCode::FontNotEmbedded);
        assert!(report.violations[0].message.contains("'Arial'"));
    }

    #[test]
    fn test_popup_appearance_cannot_hold_real_content() {
        let (tree, p) = paragraph_tree();
        let resolver = RoleResolver::new(&tree, UaProfile::Ua1);
        let mut t = TaggingStateTracker::for_stream(
            0,
            StreamKind::AnnotationAppearance(AnnotationSubtype::Popup),
        );
        t.notify(&resolver, real(p, 0)).unwrap();
        t.notify(&resolver, ContentEvent::Draw).unwrap();
        assert_eq!(t.violations()[0].code, ViolationCode::PopupContent);
    }

    #[test]
    fn test_private_use_ranges() {
        assert!(is_private_use('\u{E000}'));
        assert!(is_private_use('\u{F8FF}'));
        assert!(is_private_use('\u{F0000}'));
        assert!(!is_private_use('A'));
        assert!(!is_private_use('\u{F900}'));
    }
}
