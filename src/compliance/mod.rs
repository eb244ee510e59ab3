//! PDF/UA conformance checking.
//!
//! This module validates tagged documents against the two PDF/UA profiles
//! (ISO 14289). The same document can be checked against either profile; the
//! profile is a value passed to every rule, never a global.
//!
//! ## Pieces
//!
//! - [`RoleResolver`]: maps any structure type to the standard type it stands
//!   for, following namespace role maps (PDF 2.0) or the flat role map (PDF 1.7).
//! - [`TaggingStateTracker`]: watches content stream operations as they are
//!   authored and reports untagged content, artifact/real content nesting and
//!   text problems.
//! - [`rules`]: one function per requirement, run over the frozen document.
//! - [`UaChecker`]: runs the rules and aggregates everything into a
//!   [`CheckResult`].
//!
//! ## PDF/UA-1 vs PDF/UA-2
//!
//! - UA-1 allows one generic `H` or sequential `Hn`; UA-2 forbids `H` but lets
//!   heading levels jump.
//! - UA-1 needs an ID on every `Note`; UA-2 needs `FENote` and its content to
//!   reference each other.
//! - UA-2 adds the parent/child nesting table and structure destinations.
//!
//! ## Standards Reference
//!
//! - ISO 14289-1:2014 (PDF/UA-1)
//! - ISO 14289-2:2024 (PDF/UA-2)
//! - ISO 32000-2:2020, 14.8 (Tagged PDF)

mod messages;
mod pdf_ua;
pub mod rich_text;
pub mod role_resolver;
pub mod rules;
pub mod tagging;
mod types;

pub use pdf_ua::{validate_pdf_ua, UaChecker};
pub use role_resolver::{ResolutionError, RoleResolver};
pub use tagging::{
    ContentEvent, FontRef, GlyphRun, MarkedContentTag, StreamKind, StreamReport,
    TaggingStateTracker,
};
pub use types::{CheckResult, CheckStats, UaProfile, ViolationClass, ViolationCode, ViolationRecord};
