//! Structure tree builder used by the authoring layer.
//!
//! Elements are created in document order, marked content is assigned MCIDs
//! per page and recorded in the parent tree, and [`freeze`](StructureTreeBuilder::freeze)
//! hands the finished [`StructureTree`] to the checker.
//!
//! Reference: ISO 32000-1:2008, Section 14.7-14.8; ISO 32000-2:2020, 14.7.4 (namespaces)

use super::namespace::{Namespace, NamespaceId, RoleMapTarget, StandardNamespace};
use super::tree::{Lookup, StructureTree};
use super::types::{Attribute, AttributeValue, NodeId, RoleRef, StructChild, StructNode};
use crate::annotations::AnnotationId;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Builds a [`StructureTree`] incrementally.
#[derive(Debug, Default)]
pub struct StructureTreeBuilder {
    tree: StructureTree,

    /// Next MCID per page
    mcid_counters: HashMap<u32, u64>,
}

impl StructureTreeBuilder {
    /// Create a new structure tree builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace, reusing an existing one with the same name.
    pub fn add_namespace(&mut self, name: &str) -> NamespaceId {
        if let Some(id) = self.tree.namespace_by_name(name) {
            return id;
        }
        self.tree.namespaces.push(Namespace::new(name));
        NamespaceId(self.tree.namespaces.len() - 1)
    }

    /// Register one of the standard namespaces, reusing it if already present.
    pub fn standard_namespace(&mut self, ns: StandardNamespace) -> NamespaceId {
        match self.tree.namespace_by_name(ns.uri()) {
            Some(id) => id,
            None => self.add_namespace(ns.uri()),
        }
    }

    /// Set the namespace used by elements that neither have one nor inherit one.
    pub fn set_default_namespace(&mut self, ns: NamespaceId) -> Result<()> {
        self.check_namespace(ns)?;
        self.tree.default_namespace = Some(ns);
        Ok(())
    }

    /// Add `role` → (`target_role`, `target_ns`) to the role map of `ns`.
    pub fn map_role(
        &mut self,
        ns: NamespaceId,
        role: &str,
        target_role: &str,
        target_ns: NamespaceId,
    ) -> Result<()> {
        self.check_namespace(target_ns)?;
        let namespace = self
            .tree
            .namespaces
            .get_mut(ns.0)
            .ok_or(Error::DanglingNamespace(ns))?;
        namespace.role_map.insert(
            role.to_string(),
            RoleMapTarget {
                role: target_role.to_string(),
                namespace: target_ns,
            },
        );
        Ok(())
    }

    /// Add an entry to the flat role map used when no namespace applies.
    pub fn map_legacy_role(&mut self, role: &str, target: &str) {
        self.tree
            .role_map
            .insert(role.to_string(), target.to_string());
    }

    /// Add a root element.
    pub fn add_root(&mut self, role: impl Into<RoleRef>) -> NodeId {
        let id = self.push_node(role.into(), None);
        self.tree.roots.push(id);
        id
    }

    /// Add an element as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, role: impl Into<RoleRef>) -> Result<NodeId> {
        self.check_node(parent)?;
        let id = self.push_node(role.into(), Some(parent));
        self.tree.nodes[parent.0].children.push(StructChild::Node(id));
        Ok(id)
    }

    /// Mutable access to an element's properties.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut StructNode> {
        self.tree.nodes.get_mut(id.0).ok_or(Error::DanglingNode(id))
    }

    /// Set the element identifier.
    pub fn set_id(&mut self, node: NodeId, id: &str) -> Result<()> {
        self.node_mut(node)?.id = Some(id.to_string());
        Ok(())
    }

    /// Add an attribute (owner, key, value).
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        owner: &str,
        key: &str,
        value: AttributeValue,
    ) -> Result<()> {
        self.node_mut(node)?.attributes.push(Attribute {
            owner: owner.to_string(),
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    /// Add `to` to the /Ref array of `from`.
    pub fn add_ref(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        self.check_node(to)?;
        let node = self.node_mut(from)?;
        if !node.refs.contains(&to) {
            node.refs.push(to);
        }
        Ok(())
    }

    /// Assign the next MCID on `page` to `node` and return it.
    pub fn mark_content(&mut self, node: NodeId, page: u32) -> Result<u32> {
        self.check_node(node)?;
        let counter = self.mcid_counters.entry(page).or_insert(0);
        let mcid = u32::try_from(*counter).map_err(|_| Error::McidExhausted { page })?;
        *counter += 1;
        self.attach_mcid(node, page, mcid);
        Ok(mcid)
    }

    /// Attach an explicit MCID to `node`.
    pub fn add_marked_content(&mut self, node: NodeId, page: u32, mcid: u32) -> Result<()> {
        self.check_node(node)?;
        let counter = self.mcid_counters.entry(page).or_insert(0);
        *counter = (*counter).max(u64::from(mcid) + 1);
        self.attach_mcid(node, page, mcid);
        Ok(())
    }

    /// Reference an annotation from `node` (OBJR).
    pub fn add_annotation_ref(&mut self, node: NodeId, annotation: AnnotationId) -> Result<()> {
        self.check_node(node)?;
        if let Some(first) = self.tree.annotation_owners.get(&annotation) {
            if *first != node {
                return Err(Error::AnnotationOwnedTwice {
                    annotation: annotation.0,
                    first: *first,
                    second: node,
                });
            }
        }
        self.tree.nodes[node.0]
            .children
            .push(StructChild::Annotation(annotation));
        self.tree.annotation_owners.insert(annotation, node);
        Ok(())
    }

    /// Read-only view of the tree built so far.
    pub fn tree(&self) -> &StructureTree {
        &self.tree
    }

    /// Finish building.
    pub fn freeze(self) -> StructureTree {
        log::debug!(
            "Freezing structure tree: {} elements, {} namespaces, {} marked content entries",
            self.tree.nodes.len(),
            self.tree.namespaces.len(),
            self.tree.parent_tree.len()
        );
        self.tree
    }

    fn push_node(&mut self, role: RoleRef, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.tree.nodes.len());
        let mut node = StructNode::new(id, role);
        node.parent = parent;
        self.tree.nodes.push(node);
        id
    }

    fn attach_mcid(&mut self, node: NodeId, page: u32, mcid: u32) {
        self.tree.nodes[node.0]
            .children
            .push(StructChild::MarkedContent { page, mcid });
        if let Some(previous) = self.tree.parent_tree.insert((page, mcid), node) {
            if previous != node {
                log::warn!(
                    "MCID {} on page {} reassigned from {} to {}",
                    mcid,
                    page,
                    previous,
                    node
                );
            }
        }
    }

    fn check_node(&self, id: NodeId) -> Result<()> {
        match self.tree.node(id) {
            Lookup::Found(_) => Ok(()),
            _ => Err(Error::DanglingNode(id)),
        }
    }

    fn check_namespace(&self, id: NamespaceId) -> Result<()> {
        match self.tree.namespace(id) {
            Some(_) => Ok(()),
            None => Err(Error::DanglingNamespace(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_mcids_per_page() {
        let mut b = StructureTreeBuilder::new();
        let doc = b.add_root("Document");
        let p1 = b.add_child(doc, "P").unwrap();
        let p2 = b.add_child(doc, "P").unwrap();
        assert_eq!(b.mark_content(p1, 0).unwrap(), 0);
        assert_eq!(b.mark_content(p2, 0).unwrap(), 1);
        assert_eq!(b.mark_content(p2, 1).unwrap(), 0);
        b.add_marked_content(p1, 1, 5).unwrap();
        assert_eq!(b.mark_content(p1, 1).unwrap(), 6);

        let tree = b.freeze();
        assert_eq!(tree.node_for_mcid(0, 1).found().map(|n| n.handle), Some(p2));
        assert!(tree.node(p1).found().unwrap().owns_mcid(1, 5));
    }

    #[test]
    fn test_builder_mcid_space_runs_out() {
        let mut b = StructureTreeBuilder::new();
        let doc = b.add_root("Document");
        let p = b.add_child(doc, "P").unwrap();
        b.add_marked_content(p, 0, u32::MAX).unwrap();
        assert!(matches!(b.mark_content(p, 0), Err(Error::McidExhausted { page: 0 })));
        assert_eq!(b.mark_content(p, 1).unwrap(), 0);
    }

    #[test]
    fn test_builder_namespaces_are_deduplicated() {
        let mut b = StructureTreeBuilder::new();
        let a = b.add_namespace("urn:a");
        let again = b.add_namespace("urn:a");
        let pdf2 = b.standard_namespace(StandardNamespace::Pdf20);
        assert_eq!(a, again);
        assert_ne!(a, pdf2);
        b.map_role(a, "Chapter", "Sect", pdf2).unwrap();
        assert!(b.map_role(a, "X", "Y", NamespaceId(9)).is_err());

        let tree = b.freeze();
        assert_eq!(tree.namespaces().len(), 2);
    }

    #[test]
    fn test_builder_rejects_unknown_parent() {
        let mut b = StructureTreeBuilder::new();
        assert!(matches!(
            b.add_child(NodeId(3), "P"),
            Err(Error::DanglingNode(NodeId(3)))
        ));
    }

    #[test]
    fn test_annotation_owned_once() {
        let mut b = StructureTreeBuilder::new();
        let doc = b.add_root("Document");
        let f1 = b.add_child(doc, "Form").unwrap();
        let f2 = b.add_child(doc, "Form").unwrap();
        b.add_annotation_ref(f1, AnnotationId(0)).unwrap();
        assert!(b.add_annotation_ref(f2, AnnotationId(0)).is_err());
        assert_eq!(
            b.tree().owner_of_annotation(AnnotationId(0)).found().map(|n| n.handle),
            Some(f1)
        );
    }
}
