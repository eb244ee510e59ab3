// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::enum_variant_names)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::match_like_matches_macro)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # PDF/UA Check
//!
//! Conformance engine for tagged PDF: decides whether a document's logical
//! structure satisfies PDF/UA-1 (ISO 14289-1) or PDF/UA-2 (ISO 14289-2).
//!
//! ## Core Features
//!
//! - **Structure Model**: arena-backed structure tree with namespaces, role
//!   maps, marked-content and annotation ownership (ISO 32000-2, 14.7-14.8)
//! - **Role Resolution**: namespace role-map walks with cycle and
//!   same-namespace detection, memoised and shareable across threads
//! - **Tagging State**: inline tracking of BMC/BDC/EMC nesting while content
//!   is authored
//! - **Semantic Rules**: headings, tables, notes, forms, annotations, structure
//!   destinations and the PDF 2.0 nesting table
//!
//! Nothing here reads or writes PDF bytes. A host builds a
//! [`TaggedDocument`](document::TaggedDocument) through
//! [`StructureTreeBuilder`](structure::StructureTreeBuilder), feeds content
//! operations to a [`TaggingStateTracker`](compliance::TaggingStateTracker)
//! and hands everything to a [`UaChecker`](compliance::UaChecker).
//!
//! ## Quick Start
//!
//! ```
//! use pdf_ua_check::compliance::{UaChecker, UaProfile, ViolationCode};
//! use pdf_ua_check::document::TaggedDocument;
//! use pdf_ua_check::structure::StructureTreeBuilder;
//!
//! # fn main() -> pdf_ua_check::Result<()> {
//! let mut b = StructureTreeBuilder::new();
//! let doc = b.add_root("Document");
//! b.add_child(doc, "H1")?;
//! b.add_child(doc, "H3")?;
//! let document = TaggedDocument::new(b.freeze());
//!
//! let result = UaChecker::new(UaProfile::Ua1).check(&document)?;
//! assert!(result.contains(ViolationCode::HeadingLevelSkipped));
//!
//! // PDF/UA-2 lets heading levels jump
//! let result = UaChecker::new(UaProfile::Ua2).check(&document)?;
//! assert!(!result.contains(ViolationCode::HeadingLevelSkipped));
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Document model
/// Annotation subtypes and flags
pub mod annotation_types;
pub mod annotations;
pub mod document;
pub mod form_fields;
pub mod outline;
/// PDF logical structure (Tagged PDFs)
pub mod structure;

// PDF/UA conformance checking
pub mod compliance;

// Configuration
pub mod config;

// Re-exports
pub use annotation_types::{AnnotationFlags, AnnotationSubtype};
pub use annotations::{Annotation, AnnotationId, Destination, LinkTarget, NamedDestination};
pub use compliance::{
    validate_pdf_ua, CheckResult, UaChecker, UaProfile, ViolationCode, ViolationRecord,
};
pub use config::CheckerConfig;
pub use document::TaggedDocument;
pub use error::{Error, Result};
pub use form_fields::{FieldFlags, FieldId, FieldKind, FormField};
pub use outline::OutlineItem;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
