//! Semantic rule set evaluated over a frozen document.
//!
//! Each rule is one function taking the shared [`RuleContext`] and appending
//! to a [`CheckResult`]. Rules never mutate the document and are independent
//! of each other; the checker decides which ones run and when to stop.

pub mod annotations;
pub mod destinations;
pub mod forms;
pub mod headings;
pub mod nesting;
pub mod notes;
pub mod structure;
pub mod tables;

use super::role_resolver::RoleResolver;
use super::types::{CheckResult, UaProfile, ViolationCode, ViolationRecord};
use crate::document::TaggedDocument;
use crate::error::Result;
use crate::structure::{Lookup, NodeId, StandardRole, StructNode, StructureTree};

/// Signature shared by all rules.
pub type Rule = fn(&RuleContext<'_>, &mut CheckResult) -> Result<()>;

/// Everything a rule needs: the document, the resolver and the resolved role
/// of every structure element.
pub struct RuleContext<'a> {
    /// Document under check
    pub document: &'a TaggedDocument,
    /// Shared resolver
    pub resolver: &'a RoleResolver<'a>,
    /// Profile checked against
    pub profile: UaProfile,
    roles: Vec<Option<StandardRole>>,
}

impl<'a> RuleContext<'a> {
    /// Resolve every element once up front.
    pub fn new(document: &'a TaggedDocument, resolver: &'a RoleResolver<'a>) -> Result<Self> {
        let tree = &document.tree;
        let mut roles = Vec::with_capacity(tree.len());
        for node in tree.nodes() {
            roles.push(resolver.resolve_node(node.handle)?.ok());
        }
        Ok(Self {
            document,
            resolver,
            profile: resolver.profile(),
            roles,
        })
    }

    /// The structure tree.
    pub fn tree(&self) -> &'a StructureTree {
        &self.document.tree
    }

    /// Resolved standard role of an element; `None` when it does not resolve.
    pub fn role(&self, id: NodeId) -> Option<StandardRole> {
        self.roles.get(id.0).copied().flatten()
    }

    /// Whether the element resolves to `role`.
    pub fn is(&self, id: NodeId, role: StandardRole) -> bool {
        self.role(id) == Some(role)
    }

    /// Element by handle; handles were checked before any rule runs.
    pub fn node(&self, id: NodeId) -> Option<&'a StructNode> {
        self.tree().node(id).found()
    }

    /// Children of an element, skipping anything that does not resolve.
    pub fn children(&self, id: NodeId) -> Vec<&'a StructNode> {
        match self.tree().children(id) {
            Lookup::Found(children) => children,
            _ => Vec::new(),
        }
    }

    /// Human-readable location of an element, e.g. `TH #12 (id 'h1')`.
    pub fn location(&self, id: NodeId) -> String {
        match self.node(id) {
            Some(node) => match node.id.as_deref() {
                Some(sid) => format!("{} {} (id '{}')", node.role, id, sid),
                None => format!("{} {}", node.role, id),
            },
            None => id.to_string(),
        }
    }

    /// Build a violation for this context's profile.
    pub fn violation(
        &self,
        code: ViolationCode,
        params: Vec<(&'static str, String)>,
    ) -> ViolationRecord {
        ViolationRecord::new(code, self.profile, params)
    }

    /// Build a violation located at an element.
    pub fn violation_at(
        &self,
        id: NodeId,
        code: ViolationCode,
        params: Vec<(&'static str, String)>,
    ) -> ViolationRecord {
        self.violation(code, params).with_location(self.location(id))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::structure::StructureTreeBuilder;

    /// Run one rule over a tree built by `setup`.
    pub fn run_rule<F>(profile: UaProfile, rule: Rule, setup: F) -> CheckResult
    where
        F: FnOnce(&mut StructureTreeBuilder),
    {
        let mut b = StructureTreeBuilder::new();
        setup(&mut b);
        run_rule_on(profile, rule, &TaggedDocument::new(b.freeze()))
    }

    /// Run one rule over a prepared document.
    pub fn run_rule_on(profile: UaProfile, rule: Rule, doc: &TaggedDocument) -> CheckResult {
        let resolver = RoleResolver::new(&doc.tree, profile);
        let ctx = RuleContext::new(doc, &resolver).unwrap();
        let mut result = CheckResult::new(profile);
        rule(&ctx, &mut result).unwrap();
        result
    }

    /// Codes reported, in order.
    pub fn codes(result: &CheckResult) -> Vec<ViolationCode> {
        result.violations.iter().map(|v| v.code).collect()
    }
}
