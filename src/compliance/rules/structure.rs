//! Tree-wide structural rules: id uniqueness and role resolution.

use super::RuleContext;
use crate::compliance::types::{CheckResult, UaProfile, ViolationCode};
use crate::error::Result;
use crate::structure::StandardRole;

/// Element ids must be unique.
///
/// PDF/UA-2 tolerates a clash as long as at most one of the clashing elements
/// is real content, i.e. every other one resolves to Artifact.
pub fn check_ids(ctx: &RuleContext<'_>, result: &mut CheckResult) -> Result<()> {
    for (id, nodes) in ctx.tree().ids() {
        if nodes.len() < 2 {
            continue;
        }
        let clashing = match ctx.profile {
            UaProfile::Ua1 => nodes.len(),
            UaProfile::Ua2 => nodes
                .iter()
                .filter(|n| !ctx.is(**n, StandardRole::Artifact))
                .count(),
        };
        if clashing > 1 {
            result.add_violation(ctx.violation_at(
                nodes[1],
                ViolationCode::DuplicateId,
                vec![("id", id.to_string())],
            ));
        }
    }
    Ok(())
}

/// Every element's role must resolve to a standard structure type.
///
/// Each distinct failure is reported once, at the first element hitting it.
pub fn check_role_resolution(ctx: &RuleContext<'_>, result: &mut CheckResult) -> Result<()> {
    let mut reported = Vec::new();
    for node in ctx.tree().nodes() {
        result.stats.structure_elements_checked += 1;
        if let Err(failure) = ctx.resolver.resolve_node(node.handle)? {
            if reported.contains(&failure) {
                continue;
            }
            result.add_violation(
                failure
                    .to_violation(ctx.profile)
                    .with_location(ctx.location(node.handle)),
            );
            reported.push(failure);
        }
    }
    result.stats.roles_resolved = ctx.resolver.resolved_count();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::rules::test_support::{codes, run_rule};
    use crate::structure::StandardNamespace;

    #[test]
    fn test_unique_ids_pass() {
        let result = run_rule(UaProfile::Ua1, check_ids, |b| {
            let doc = b.add_root("Document");
            let a = b.add_child(doc, "P").unwrap();
            let c = b.add_child(doc, "P").unwrap();
            b.set_id(a, "a").unwrap();
            b.set_id(c, "c").unwrap();
        });
        assert!(result.is_compliant);
    }

    #[test]
    fn test_duplicate_id_fails_ua1() {
        let result = run_rule(UaProfile::Ua1, check_ids, |b| {
            let doc = b.add_root("Document");
            let a = b.add_child(doc, "P").unwrap();
            let c = b.add_child(doc, "P").unwrap();
            b.set_id(a, "dup").unwrap();
            b.set_id(c, "dup").unwrap();
        });
        assert_eq!(codes(&result), vec![ViolationCode::DuplicateId]);
        assert!(result.violations[0].message.contains("'dup'"));
    }

    #[test]
    fn test_ua2_tolerates_clash_with_artifacts() {
        let setup = |b: &mut crate::structure::StructureTreeBuilder| {
            let pdf2 = b.standard_namespace(StandardNamespace::Pdf20);
            b.set_default_namespace(pdf2).unwrap();
            let doc = b.add_root("Document");
            let p = b.add_child(doc, "P").unwrap();
            let artifact = b.add_child(doc, "Artifact").unwrap();
            b.set_id(p, "x").unwrap();
            b.set_id(artifact, "x").unwrap();
        };
        assert!(run_rule(UaProfile::Ua2, check_ids, setup).is_compliant);
        assert!(!run_rule(UaProfile::Ua1, check_ids, setup).is_compliant);
    }

    #[test]
    fn test_unmapped_role_reported_once() {
        let result = run_rule(UaProfile::Ua1, check_role_resolution, |b| {
            let doc = b.add_root("Document");
            b.add_child(doc, "Chapter").unwrap();
            b.add_child(doc, "Chapter").unwrap();
            b.add_child(doc, "P").unwrap();
        });
        assert_eq!(codes(&result), vec![ViolationCode::RoleNotMapped]);
        assert_eq!(result.stats.structure_elements_checked, 4);
        assert_eq!(result.stats.roles_resolved, 3);
    }

    #[test]
    fn test_mapped_roles_pass() {
        let result = run_rule(UaProfile::Ua1, check_role_resolution, |b| {
            b.map_legacy_role("Chapter", "Sect");
            let doc = b.add_root("Document");
            b.add_child(doc, "Chapter").unwrap();
        });
        assert!(result.is_compliant);
    }
}
