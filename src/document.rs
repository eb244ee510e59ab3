//! Frozen tagged document handed to the checker.
//!
//! Bundles the structure tree with the interactive objects the rules need:
//! annotations, form fields, the outline and the Dests name tree. Nothing here
//! is parsed from bytes; the authoring layer fills it in.

use crate::annotations::{Annotation, AnnotationId, Destination, LinkTarget, NamedDestination};
use crate::error::{Error, Result};
use crate::form_fields::{FieldId, FormField};
use crate::outline::{flatten_outline, OutlineItem};
use crate::structure::StructureTree;
use indexmap::IndexMap;

/// A tagged document ready to be checked.
#[derive(Debug, Clone, Default)]
pub struct TaggedDocument {
    /// Logical structure
    pub tree: StructureTree,

    /// All annotations, indexed by [`AnnotationId`]
    pub annotations: Vec<Annotation>,

    /// All terminal form fields, indexed by [`FieldId`]
    pub fields: Vec<FormField>,

    /// Document outline
    pub outlines: Vec<OutlineItem>,

    /// Dests name tree, in document order
    pub named_destinations: IndexMap<String, NamedDestination>,
}

impl TaggedDocument {
    /// Wrap a structure tree with no interactive objects.
    pub fn new(tree: StructureTree) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }

    /// Add an annotation and return its id.
    pub fn add_annotation(&mut self, annotation: Annotation) -> AnnotationId {
        self.annotations.push(annotation);
        AnnotationId(self.annotations.len() - 1)
    }

    /// Add a form field and return its id.
    pub fn add_field(&mut self, field: FormField) -> FieldId {
        self.fields.push(field);
        FieldId(self.fields.len() - 1)
    }

    /// Add a widget annotation for `field`, linking both ways.
    pub fn add_widget(&mut self, field: FieldId, widget: Annotation) -> Result<AnnotationId> {
        if field.0 >= self.fields.len() {
            return Err(Error::Config(format!("unknown form field {}", field)));
        }
        let id = self.add_annotation(widget.with_field(field));
        self.fields[field.0].widgets.push(id);
        Ok(id)
    }

    /// Add an outline item at the top level.
    pub fn add_outline(&mut self, item: OutlineItem) {
        self.outlines.push(item);
    }

    /// Add an entry to the Dests name tree.
    pub fn add_named_destination(&mut self, name: impl Into<String>, dest: NamedDestination) {
        self.named_destinations.insert(name.into(), dest);
    }

    /// Annotation by id.
    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(id.0)
    }

    /// Form field by id.
    pub fn field(&self, id: FieldId) -> Option<&FormField> {
        self.fields.get(id.0)
    }

    /// Annotations with their ids.
    pub fn annotations(&self) -> impl Iterator<Item = (AnnotationId, &Annotation)> {
        self.annotations
            .iter()
            .enumerate()
            .map(|(i, a)| (AnnotationId(i), a))
    }

    /// Verify that every handle in the document resolves.
    pub fn check_references(&self) -> Result<()> {
        self.tree.check_references(self.annotations.len())?;
        for field in &self.fields {
            if let Some(bad) = field.widgets.iter().find(|w| w.0 >= self.annotations.len()) {
                return Err(Error::DanglingAnnotation(bad.0));
            }
        }
        for dest in self.explicit_destinations() {
            if let Destination::Structure(node) = dest {
                if node.0 >= self.tree.len() {
                    return Err(Error::DanglingNode(*node));
                }
            }
        }
        Ok(())
    }

    /// Every explicit destination reachable from links, outlines and the name tree.
    fn explicit_destinations(&self) -> impl Iterator<Item = &Destination> {
        let from_links = self.annotations.iter().filter_map(|a| a.target.as_ref());
        let from_outline = flatten_outline(&self.outlines)
            .into_iter()
            .filter_map(|item| item.target.as_ref());
        let targets = from_links.chain(from_outline).filter_map(|t| match t {
            LinkTarget::Explicit(dest) => Some(dest),
            LinkTarget::Named(_) => None,
        });
        let named = self.named_destinations.values().flat_map(|nd| match nd {
            NamedDestination::Direct(dest) => vec![dest],
            NamedDestination::Dictionary { sd, d } => sd.iter().chain(d.iter()).collect(),
        });
        targets.chain(named)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation_types::AnnotationSubtype;
    use crate::form_fields::FieldKind;
    use crate::structure::NodeId;

    #[test]
    fn test_widget_links_field_and_annotation() {
        let mut doc = TaggedDocument::default();
        let field = doc.add_field(FormField::new("email", FieldKind::Text));
        let widget = doc
            .add_widget(field, Annotation::new(AnnotationSubtype::Widget, 0))
            .unwrap();
        assert_eq!(doc.annotation(widget).unwrap().field, Some(field));
        assert_eq!(doc.field(field).unwrap().widgets, vec![widget]);
        assert!(doc.check_references().is_ok());
    }

    #[test]
    fn test_widget_for_unknown_field_fails() {
        let mut doc = TaggedDocument::default();
        let result = doc.add_widget(FieldId(4), Annotation::new(AnnotationSubtype::Widget, 0));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_dangling_widget_detected() {
        let mut doc = TaggedDocument::default();
        let field = doc.add_field(FormField::new("x", FieldKind::CheckBox));
        doc.fields[field.0].widgets.push(AnnotationId(9));
        assert!(matches!(doc.check_references(), Err(Error::DanglingAnnotation(9))));
    }

    #[test]
    fn test_dangling_structure_destination_detected() {
        let mut doc = TaggedDocument::default();
        doc.add_named_destination(
            "intro",
            NamedDestination::Dictionary {
                sd: Some(Destination::Structure(NodeId(3))),
                d: None,
            },
        );
        assert!(matches!(doc.check_references(), Err(Error::DanglingNode(NodeId(3)))));
    }
}
