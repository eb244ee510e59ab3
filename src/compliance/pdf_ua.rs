//! PDF/UA conformance checker.
//!
//! Coordinates the structural and semantic rules over a frozen
//! [`TaggedDocument`] and folds in the reports of content streams that were
//! tracked while the document was authored.
//!
//! ## Standards Reference
//!
//! - ISO 14289-1:2014 (PDF/UA-1)
//! - ISO 14289-2:2024 (PDF/UA-2)
//!
//! ## Example
//!
//! ```
//! use pdf_ua_check::compliance::{ContentEvent, MarkedContentTag, UaChecker, UaProfile};
//! use pdf_ua_check::document::TaggedDocument;
//! use pdf_ua_check::structure::StructureTreeBuilder;
//!
//! let mut b = StructureTreeBuilder::new();
//! let root = b.add_root("Document");
//! let p = b.add_child(root, "P").unwrap();
//! let mcid = b.mark_content(p, 0).unwrap();
//! let doc = TaggedDocument::new(b.freeze());
//!
//! let checker = UaChecker::new(UaProfile::Ua1);
//! let resolver = checker.resolver(&doc);
//! let mut tracker = checker.tracker(0);
//! tracker
//!     .notify(&resolver, ContentEvent::open(MarkedContentTag::RealContent { node: p, mcid }))
//!     .unwrap();
//! tracker.notify(&resolver, ContentEvent::Draw).unwrap();
//! tracker.notify(&resolver, ContentEvent::CloseTag).unwrap();
//! let report = tracker.finish(&resolver).unwrap();
//!
//! let result = checker.check_with_reports(&doc, vec![report]).unwrap();
//! assert!(result.is_compliant);
//! ```

use super::role_resolver::RoleResolver;
use super::rules::{self, Rule, RuleContext};
use super::tagging::{StreamKind, StreamReport, TaggingStateTracker};
use super::types::{CheckResult, UaProfile};
use crate::config::CheckerConfig;
use crate::document::TaggedDocument;
use crate::error::Result;

/// PDF/UA conformance checker.
///
/// Runs, in order: id uniqueness, role resolution, role nesting, headings,
/// tables, notes, forms, annotations and destinations. Disabled rules are
/// skipped; the structural ones always run.
#[derive(Debug, Clone, Default)]
pub struct UaChecker {
    config: CheckerConfig,
}

impl UaChecker {
    /// Create a checker for `profile` with every rule enabled.
    pub fn new(profile: UaProfile) -> Self {
        Self {
            config: CheckerConfig::new(profile),
        }
    }

    /// Create a checker from a configuration.
    pub fn with_config(config: CheckerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Profile checked against.
    pub fn profile(&self) -> UaProfile {
        self.config.profile
    }

    /// Configure whether to stop at the first violation.
    pub fn stop_on_first_violation(mut self, stop: bool) -> Self {
        self.config.stop_on_first_violation = stop;
        self
    }

    /// Resolver over the document's structure tree, shared by all streams.
    pub fn resolver<'t>(&self, document: &'t TaggedDocument) -> RoleResolver<'t> {
        RoleResolver::new(&document.tree, self.config.profile)
    }

    /// Tagging tracker for a page content stream.
    pub fn tracker(&self, page: u32) -> TaggingStateTracker {
        self.stream_tracker(page, StreamKind::Page)
    }

    /// Tagging tracker for any content stream, honouring `fail_fast_tagging`.
    pub fn stream_tracker(&self, page: u32, kind: StreamKind) -> TaggingStateTracker {
        TaggingStateTracker::for_stream(page, kind).fail_fast(self.config.fail_fast_tagging)
    }

    /// Check a document.
    ///
    /// Returns `Err` for engine errors such as dangling handles; conformance
    /// failures are reported in the result.
    pub fn check(&self, document: &TaggedDocument) -> Result<CheckResult> {
        self.check_with_reports(document, Vec::new())
    }

    /// Check a document together with the reports of its content streams.
    pub fn check_with_reports(
        &self,
        document: &TaggedDocument,
        reports: Vec<StreamReport>,
    ) -> Result<CheckResult> {
        document.check_references()?;
        let profile = self.config.profile;
        log::debug!(
            "Checking document against {} ({} elements, {} streams)",
            profile,
            document.tree.len(),
            reports.len()
        );

        let mut result = CheckResult::new(profile);
        for report in reports {
            result.absorb(report);
        }
        if self.should_stop(&result) {
            return Ok(self.finalize_result(result));
        }

        let resolver = self.resolver(document);
        let ctx = RuleContext::new(document, &resolver)?;

        // Macro to run a rule and check for early return
        macro_rules! run_rule {
            ($rule:expr) => {
                $rule(&ctx, &mut result)?;
                if self.should_stop(&result) {
                    return Ok(self.finalize_result(result));
                }
            };
            ($enabled:expr, $rule:expr) => {
                if $enabled {
                    run_rule!($rule);
                }
            };
        }

        run_rule!(rules::structure::check_ids);
        run_rule!(rules::structure::check_role_resolution);
        run_rule!(rules::nesting::check_role_nesting);
        run_rule!(self.config.check_headings, rules::headings::check_headings);
        run_rule!(self.config.check_tables, rules::tables::check_tables);
        run_rule!(self.config.check_notes, rules::notes::check_notes);
        run_rule!(self.config.check_forms, rules::forms::check_forms);
        run_rule!(self.config.check_annotations, rules::annotations::check_annotations);
        run_rule!(self.config.check_destinations, rules::destinations::check_destinations);

        Ok(self.finalize_result(result))
    }

    /// Run a single rule.
    ///
    /// This allows checking individual requirements without running the full
    /// rule set.
    pub fn check_rule(&self, document: &TaggedDocument, rule: Rule) -> Result<CheckResult> {
        document.check_references()?;
        let resolver = self.resolver(document);
        let ctx = RuleContext::new(document, &resolver)?;
        let mut result = CheckResult::new(self.config.profile);
        rule(&ctx, &mut result)?;
        Ok(self.finalize_result(result))
    }

    fn should_stop(&self, result: &CheckResult) -> bool {
        self.config.stop_on_first_violation && result.has_violations()
    }

    fn finalize_result(&self, mut result: CheckResult) -> CheckResult {
        if self.config.stop_on_first_violation {
            result.violations.truncate(1);
        }
        result.is_compliant = !result.has_violations();
        result
    }
}

/// Quick check with default settings.
///
/// # Example
///
/// ```
/// use pdf_ua_check::compliance::{validate_pdf_ua, UaProfile};
/// use pdf_ua_check::document::TaggedDocument;
///
/// let result = validate_pdf_ua(&TaggedDocument::default(), UaProfile::Ua2).unwrap();
/// println!("Compliant: {}", result.is_compliant);
/// ```
pub fn validate_pdf_ua(document: &TaggedDocument, profile: UaProfile) -> Result<CheckResult> {
    UaChecker::new(profile).check(document)
}
