//! Tagged PDF logical structure model.
//!
//! A read-only, arena-backed representation of a document's structure tree
//! according to ISO 32000-1:2008 Section 14.7 and ISO 32000-2:2020 Section
//! 14.7-14.8 (namespaces and role maps).
//!
//! ## Overview
//!
//! - **StructureTree**: the StructTreeRoot, owning every element, the namespace
//!   table, the flat /RoleMap and the parent tree (MCID → element)
//! - **StructNode**: a structure element with role, namespace, attributes, id,
//!   children and /Ref cross references
//! - **Namespace**: a namespace dictionary with its /RoleMapNS
//!
//! Elements are addressed by [`NodeId`]; parent links and cross references are
//! handles, never owning pointers.
//!
//! ## Example
//!
//! ```
//! use pdf_ua_check::structure::{StructureTreeBuilder, traverse_structure_tree};
//!
//! let mut builder = StructureTreeBuilder::new();
//! let doc = builder.add_root("Document");
//! let heading = builder.add_child(doc, "H1").unwrap();
//! builder.mark_content(heading, 0).unwrap();
//! let tree = builder.freeze();
//!
//! assert_eq!(traverse_structure_tree(&tree).count(), 2);
//! ```

mod builder;
mod namespace;
pub mod traversal;
mod tree;
mod types;

pub use builder::StructureTreeBuilder;
pub use namespace::{
    Namespace, NamespaceId, RoleMapTarget, StandardNamespace, MATHML_NAMESPACE,
    PDF_1_7_NAMESPACE, PDF_2_0_NAMESPACE,
};
pub use traversal::{extract_reading_order, traverse_structure_tree, DepthFirst, Visit};
pub use tree::{Lookup, StructureTree};
pub use types::{
    owners, Attribute, AttributeValue, NodeId, RoleRef, StandardRole, StructChild, StructNode,
};
