//! The frozen structure tree: an arena of structure elements plus the
//! namespace tables, the flat role map and the parent tree.
//!
//! All queries are side-effect free. A query that cannot be answered on a
//! malformed tree returns [`Lookup::NotFound`] or [`Lookup::Dangling`] instead
//! of panicking.

use super::namespace::{Namespace, NamespaceId};
use super::types::{NodeId, StructChild, StructNode};
use crate::annotations::AnnotationId;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Outcome of a structure query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The query was answered
    Found(T),
    /// Nothing matches (e.g. a root has no parent)
    NotFound,
    /// A handle on the path points outside the arena
    Dangling(NodeId),
}

impl<T> Lookup<T> {
    /// The value, if found.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }

    /// Check if the query was answered.
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Treat dangling handles as engine errors, absence as `None`.
    pub fn into_result(self) -> Result<Option<T>> {
        match self {
            Lookup::Found(v) => Ok(Some(v)),
            Lookup::NotFound => Ok(None),
            Lookup::Dangling(id) => Err(Error::DanglingNode(id)),
        }
    }
}

/// The structure tree root (StructTreeRoot) with its elements stored in an arena.
#[derive(Debug, Clone, Default)]
pub struct StructureTree {
    pub(crate) nodes: Vec<StructNode>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) namespaces: Vec<Namespace>,
    pub(crate) default_namespace: Option<NamespaceId>,
    /// Flat /RoleMap of PDF 1.7 documents
    pub(crate) role_map: IndexMap<String, String>,
    /// Parent tree: (page, mcid) to owning element
    pub(crate) parent_tree: HashMap<(u32, u32), NodeId>,
    /// Annotation (OBJR) to owning element
    pub(crate) annotation_owners: HashMap<AnnotationId, NodeId>,
}

impl StructureTree {
    /// Create an empty structure tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of structure elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no structure elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root elements (/K of the StructTreeRoot).
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All elements in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &StructNode> {
        self.nodes.iter()
    }

    /// Namespace table.
    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// Document-wide default namespace, if any.
    pub fn default_namespace(&self) -> Option<NamespaceId> {
        self.default_namespace
    }

    /// Flat role map (no namespace concept).
    pub fn role_map(&self) -> &IndexMap<String, String> {
        &self.role_map
    }

    /// Element by handle.
    pub fn node(&self, id: NodeId) -> Lookup<&StructNode> {
        match self.nodes.get(id.0) {
            Some(node) => Lookup::Found(node),
            None => Lookup::Dangling(id),
        }
    }

    /// Namespace by handle.
    pub fn namespace(&self, id: NamespaceId) -> Option<&Namespace> {
        self.namespaces.get(id.0)
    }

    /// Find a namespace by name.
    pub fn namespace_by_name(&self, name: &str) -> Option<NamespaceId> {
        self.namespaces
            .iter()
            .position(|ns| ns.name == name)
            .map(NamespaceId)
    }

    /// Parent of an element; `NotFound` for roots.
    pub fn parent(&self, id: NodeId) -> Lookup<&StructNode> {
        match self.node(id) {
            Lookup::Found(node) => match node.parent {
                Some(parent) => self.node(parent),
                None => Lookup::NotFound,
            },
            other => other,
        }
    }

    /// Child elements of a node, in order.
    pub fn children(&self, id: NodeId) -> Lookup<Vec<&StructNode>> {
        let node = match self.node(id) {
            Lookup::Found(node) => node,
            Lookup::NotFound => return Lookup::NotFound,
            Lookup::Dangling(d) => return Lookup::Dangling(d),
        };
        let mut children = Vec::new();
        for child in node.child_nodes() {
            match self.node(child) {
                Lookup::Found(c) => children.push(c),
                _ => return Lookup::Dangling(child),
            }
        }
        Lookup::Found(children)
    }

    /// Nearest proper ancestor matching `pred`.
    pub fn ancestor_where<F>(&self, id: NodeId, mut pred: F) -> Lookup<&StructNode>
    where
        F: FnMut(&StructNode) -> bool,
    {
        let mut current = match self.node(id) {
            Lookup::Found(node) => node.parent,
            Lookup::NotFound => return Lookup::NotFound,
            Lookup::Dangling(d) => return Lookup::Dangling(d),
        };
        // bounded by the arena size so a corrupt parent chain cannot loop
        for _ in 0..=self.nodes.len() {
            let Some(parent_id) = current else {
                return Lookup::NotFound;
            };
            let parent = match self.node(parent_id) {
                Lookup::Found(p) => p,
                _ => return Lookup::Dangling(parent_id),
            };
            if pred(parent) {
                return Lookup::Found(parent);
            }
            current = parent.parent;
        }
        Lookup::NotFound
    }

    /// Namespace an element is read in: its own, else the nearest ancestor's,
    /// else the document default. `NotFound` means the flat role map applies.
    pub fn namespace_of(&self, id: NodeId) -> Lookup<NamespaceId> {
        let node = match self.node(id) {
            Lookup::Found(node) => node,
            Lookup::NotFound => return Lookup::NotFound,
            Lookup::Dangling(d) => return Lookup::Dangling(d),
        };
        if let Some(ns) = node.namespace {
            return Lookup::Found(ns);
        }
        match self.ancestor_where(id, |n| n.namespace.is_some()) {
            Lookup::Found(ancestor) => ancestor.namespace.map_or(Lookup::NotFound, Lookup::Found),
            Lookup::Dangling(d) => Lookup::Dangling(d),
            Lookup::NotFound => self.default_namespace.map_or(Lookup::NotFound, Lookup::Found),
        }
    }

    /// Element owning marked content `mcid` on `page`.
    pub fn node_for_mcid(&self, page: u32, mcid: u32) -> Lookup<&StructNode> {
        match self.parent_tree.get(&(page, mcid)) {
            Some(id) => self.node(*id),
            None => Lookup::NotFound,
        }
    }

    /// Element owning an annotation through an object reference.
    pub fn owner_of_annotation(&self, annotation: AnnotationId) -> Lookup<&StructNode> {
        match self.annotation_owners.get(&annotation) {
            Some(id) => self.node(*id),
            None => Lookup::NotFound,
        }
    }

    /// Elements carrying each id, in arena order.
    pub fn ids(&self) -> IndexMap<&str, Vec<NodeId>> {
        let mut index: IndexMap<&str, Vec<NodeId>> = IndexMap::new();
        for node in &self.nodes {
            if let Some(id) = node.id.as_deref() {
                index.entry(id).or_default().push(node.handle);
            }
        }
        index
    }

    /// First element with the given id.
    pub fn node_by_id(&self, id: &str) -> Option<&StructNode> {
        self.nodes.iter().find(|n| n.id.as_deref() == Some(id))
    }

    /// Elements whose /Ref contains `target`.
    pub fn referrers(&self, target: NodeId) -> impl Iterator<Item = &StructNode> {
        self.nodes.iter().filter(move |n| n.refs.contains(&target))
    }

    /// Verify every handle in the tree points into the arena.
    ///
    /// Run before any rule so that rules can treat lookups as infallible.
    pub fn check_references(&self, annotation_count: usize) -> Result<()> {
        for root in &self.roots {
            self.node(*root).into_result()?;
        }
        for node in &self.nodes {
            if let Some(parent) = node.parent {
                self.node(parent).into_result()?;
            }
            if let Some(ns) = node.namespace {
                if self.namespace(ns).is_none() {
                    return Err(Error::DanglingNamespace(ns));
                }
            }
            for child in &node.children {
                match child {
                    StructChild::Node(id) => {
                        self.node(*id).into_result()?;
                    },
                    StructChild::Annotation(annot) if annot.0 >= annotation_count => {
                        return Err(Error::DanglingAnnotation(annot.0));
                    },
                    _ => {},
                }
            }
            for r in &node.refs {
                self.node(*r).into_result()?;
            }
        }
        for ns in &self.namespaces {
            for target in ns.role_map.values() {
                if self.namespace(target.namespace).is_none() {
                    return Err(Error::DanglingNamespace(target.namespace));
                }
            }
        }
        if let Some(ns) = self.default_namespace {
            if self.namespace(ns).is_none() {
                return Err(Error::DanglingNamespace(ns));
            }
        }
        for id in self.parent_tree.values().chain(self.annotation_owners.values()) {
            self.node(*id).into_result()?;
        }
        Ok(())
    }
}
