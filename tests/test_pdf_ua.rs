//! Integration tests for PDF/UA conformance checking.

use pdf_ua_check::annotations::{Annotation, Destination, LinkTarget, NamedDestination};
use pdf_ua_check::compliance::{
    validate_pdf_ua, CheckResult, UaChecker, UaProfile, ViolationClass, ViolationCode,
};
use pdf_ua_check::config::CheckerConfig;
use pdf_ua_check::document::TaggedDocument;
use pdf_ua_check::form_fields::{FieldKind, FormField};
use pdf_ua_check::outline::OutlineItem;
use pdf_ua_check::structure::{
    AttributeValue, NodeId, StandardNamespace, StructureTreeBuilder,
};
use pdf_ua_check::{AnnotationSubtype, Error};

fn pdf2_builder() -> StructureTreeBuilder {
    let mut b = StructureTreeBuilder::new();
    let ns = b.standard_namespace(StandardNamespace::Pdf20);
    b.set_default_namespace(ns).unwrap();
    b
}

fn headers(ids: &[&str]) -> AttributeValue {
    AttributeValue::List(ids.iter().map(|s| s.to_string()).collect())
}

/// Two-column table whose data cells point at their headers by id.
fn table_doc(header_ids: [Option<&str>; 2]) -> TaggedDocument {
    let mut b = StructureTreeBuilder::new();
    let doc = b.add_root("Document");
    let table = b.add_child(doc, "Table").unwrap();
    let head = b.add_child(table, "TR").unwrap();
    for id in header_ids {
        let th = b.add_child(head, "TH").unwrap();
        if let Some(id) = id {
            b.set_id(th, id).unwrap();
        }
    }
    let row = b.add_child(table, "TR").unwrap();
    for id in ["h1", "h2"] {
        let td = b.add_child(row, "TD").unwrap();
        b.set_attribute(td, "Table", "Headers", headers(&[id])).unwrap();
    }
    TaggedDocument::new(b.freeze())
}

fn codes(result: &CheckResult) -> Vec<ViolationCode> {
    result.violations.iter().map(|v| v.code).collect()
}

#[test]
fn test_empty_document_compliant_under_both_profiles() {
    for profile in [UaProfile::Ua1, UaProfile::Ua2] {
        let result = validate_pdf_ua(&TaggedDocument::default(), profile).unwrap();
        assert!(result.is_compliant);
        assert_eq!(result.profile, profile);
    }
}

#[test]
fn test_well_formed_ua2_document() {
    let mut b = pdf2_builder();
    let doc = b.add_root("Document");
    b.add_child(doc, "H1").unwrap();
    b.add_child(doc, "P").unwrap();
    let table = b.add_child(doc, "Table").unwrap();
    let head = b.add_child(table, "TR").unwrap();
    b.add_child(head, "TH").unwrap();
    b.add_child(head, "TH").unwrap();
    let row = b.add_child(table, "TR").unwrap();
    b.add_child(row, "TD").unwrap();
    b.add_child(row, "TD").unwrap();

    let result = UaChecker::new(UaProfile::Ua2)
        .check(&TaggedDocument::new(b.freeze()))
        .unwrap();
    assert!(result.is_compliant, "{:?}", result.violations);
    assert_eq!(result.stats.structure_elements_checked, 10);
    assert_eq!(result.stats.tables_checked, 1);
}

#[test]
fn test_checking_is_idempotent() {
    let mut b = StructureTreeBuilder::new();
    let doc = b.add_root("Document");
    b.add_child(doc, "H1").unwrap();
    b.add_child(doc, "H4").unwrap();
    b.add_child(doc, "Note").unwrap();
    b.add_child(doc, "Chapter").unwrap();
    let document = TaggedDocument::new(b.freeze());

    let checker = UaChecker::new(UaProfile::Ua1);
    let first = checker.check(&document).unwrap();
    let second = checker.check(&document).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.violations.len(), 3);
}

#[test]
fn test_table_header_round_trip() {
    let result = UaChecker::new(UaProfile::Ua1)
        .check(&table_doc([Some("h1"), Some("h2")]))
        .unwrap();
    assert!(result.is_compliant, "{:?}", result.violations);

    let result = UaChecker::new(UaProfile::Ua1)
        .check(&table_doc([Some("h1"), None]))
        .unwrap();
    assert!(result.contains(ViolationCode::TableHeaderIdNotFound));
    let missing = result
        .violations
        .iter()
        .find(|v| v.code == ViolationCode::TableHeaderIdNotFound)
        .unwrap();
    assert!(missing.message.contains("'h2'"));
}

#[test]
fn test_heading_boundaries() {
    let flat = |roles: &[&str]| {
        let mut b = StructureTreeBuilder::new();
        let doc = b.add_root("Document");
        for role in roles {
            b.add_child(doc, *role).unwrap();
        }
        TaggedDocument::new(b.freeze())
    };

    let ua1 = UaChecker::new(UaProfile::Ua1);
    assert!(ua1.check(&flat(&["H1", "H2", "H3"])).unwrap().is_compliant);

    let result = ua1.check(&flat(&["H1", "H3"])).unwrap();
    assert_eq!(codes(&result), vec![ViolationCode::HeadingLevelSkipped]);
    assert!(result.violations[0].message.contains("H2"));

    // PDF/UA-2: the skip is fine, containment is not
    let mut b = pdf2_builder();
    let doc = b.add_root("Document");
    b.add_child(doc, "H1").unwrap();
    b.add_child(doc, "H3").unwrap();
    let result = UaChecker::new(UaProfile::Ua2)
        .check(&TaggedDocument::new(b.freeze()))
        .unwrap();
    assert!(result.is_compliant, "{:?}", result.violations);

    let mut b = pdf2_builder();
    let doc = b.add_root("Document");
    let h1 = b.add_child(doc, "H1").unwrap();
    b.add_child(h1, "H2").unwrap();
    let result = UaChecker::new(UaProfile::Ua2)
        .check(&TaggedDocument::new(b.freeze()))
        .unwrap();
    assert_eq!(codes(&result), vec![ViolationCode::RoleNestingNotAllowed]);
    let message = &result.violations[0].message;
    assert!(message.contains("H1") && message.contains("H2"), "{}", message);
}

#[test]
fn test_note_rules_per_profile() {
    let mut b = StructureTreeBuilder::new();
    let doc = b.add_root("Document");
    b.add_child(doc, "Note").unwrap();
    let document = TaggedDocument::new(b.freeze());

    let result = validate_pdf_ua(&document, UaProfile::Ua1).unwrap();
    assert_eq!(codes(&result), vec![ViolationCode::NoteMissingId]);
    assert!(validate_pdf_ua(&document, UaProfile::Ua2).unwrap().is_compliant);

    let mut b = pdf2_builder();
    let doc = b.add_root("Document");
    let p = b.add_child(doc, "P").unwrap();
    let note = b.add_child(doc, "FENote").unwrap();
    b.add_ref(note, p).unwrap();
    let result = validate_pdf_ua(&TaggedDocument::new(b.freeze()), UaProfile::Ua2).unwrap();
    assert_eq!(codes(&result), vec![ViolationCode::ContentNotReferencingNote]);
}

#[test]
fn test_namespace_role_map_resolution() {
    let mut b = pdf2_builder();
    let pdf2 = b.standard_namespace(StandardNamespace::Pdf20);
    let custom = b.add_namespace("urn:example:book");
    b.map_role(custom, "Chapter", "Sect", pdf2).unwrap();
    b.map_role(custom, "Loop", "Loop", custom).unwrap();

    let doc = b.add_root("Document");
    let chapter = b.add_child(doc, "Chapter").unwrap();
    b.node_mut(chapter).unwrap().namespace = Some(custom);
    let para = b.add_child(chapter, "P").unwrap();
    b.node_mut(para).unwrap().namespace = Some(pdf2);
    let looped = b.add_child(doc, "Loop").unwrap();
    b.node_mut(looped).unwrap().namespace = Some(custom);

    let result = UaChecker::new(UaProfile::Ua2)
        .check(&TaggedDocument::new(b.freeze()))
        .unwrap();
    assert_eq!(codes(&result), vec![ViolationCode::SameNamespaceRemap]);
    assert_eq!(result.of_class(ViolationClass::Resolution).count(), 1);
}

#[test]
fn test_interactive_objects_end_to_end() {
    let mut b = pdf2_builder();
    let doc = b.add_root("Document");
    let heading = b.add_child(doc, "H1").unwrap();
    let link_owner = b.add_child(doc, "Link").unwrap();
    let form = b.add_child(doc, "Form").unwrap();
    let mut document = TaggedDocument::default();

    let link = document.add_annotation(
        Annotation::new(AnnotationSubtype::Link, 0)
            .with_contents("Chapter one")
            .with_target(LinkTarget::Named("ch1".into())),
    );
    let field = document.add_field(FormField::new("name", FieldKind::Text).with_tooltip("Name"));
    let widget = document
        .add_widget(field, Annotation::new(AnnotationSubtype::Widget, 0))
        .unwrap();
    b.add_annotation_ref(link_owner, link).unwrap();
    b.add_annotation_ref(form, widget).unwrap();
    document.tree = b.freeze();

    document.add_named_destination(
        "ch1",
        NamedDestination::Dictionary {
            sd: Some(Destination::Structure(heading)),
            d: Some(Destination::Page {
                page: 0,
                fit: "Fit".into(),
            }),
        },
    );
    document.add_outline(OutlineItem::new(
        "Chapter one",
        Some(LinkTarget::Explicit(Destination::Page {
            page: 0,
            fit: "XYZ".into(),
        })),
    ));

    let result = UaChecker::new(UaProfile::Ua2).check(&document).unwrap();
    assert_eq!(codes(&result), vec![ViolationCode::NotStructureDestination]);
    assert_eq!(result.stats.annotations_checked, 2);
    assert_eq!(result.stats.form_fields_checked, 1);
    assert_eq!(result.stats.destinations_checked, 2);

    // UA-1 knows nothing about structure destinations
    assert!(UaChecker::new(UaProfile::Ua1).check(&document).unwrap().is_compliant);
}

#[test]
fn test_rule_toggles_from_json_config() {
    let mut b = StructureTreeBuilder::new();
    let doc = b.add_root("Document");
    b.add_child(doc, "H1").unwrap();
    b.add_child(doc, "H3").unwrap();
    let document = TaggedDocument::new(b.freeze());

    let config = CheckerConfig::from_json(r#"{"profile": "UA-1", "check_headings": false}"#).unwrap();
    let result = UaChecker::with_config(config).unwrap().check(&document).unwrap();
    assert!(result.is_compliant);

    let result = UaChecker::with_config(CheckerConfig::new(UaProfile::Ua1))
        .unwrap()
        .check(&document)
        .unwrap();
    assert!(!result.is_compliant);
}

#[test]
fn test_stop_on_first_violation_keeps_one() {
    let mut b = StructureTreeBuilder::new();
    let doc = b.add_root("Document");
    for _ in 0..3 {
        b.add_child(doc, "Note").unwrap();
    }
    let document = TaggedDocument::new(b.freeze());

    let all = UaChecker::new(UaProfile::Ua1).check(&document).unwrap();
    assert_eq!(all.violations.len(), 3);

    let first = UaChecker::new(UaProfile::Ua1)
        .stop_on_first_violation(true)
        .check(&document)
        .unwrap();
    assert_eq!(first.violations.len(), 1);
    assert_eq!(first.first(), all.first());
    assert!(!first.is_compliant);
}

#[test]
fn test_dangling_handles_are_engine_errors() {
    let mut document = TaggedDocument::default();
    document.add_outline(OutlineItem::new(
        "Nowhere",
        Some(LinkTarget::Explicit(Destination::Structure(NodeId(7)))),
    ));
    let err = UaChecker::new(UaProfile::Ua2).check(&document).unwrap_err();
    assert!(matches!(err, Error::DanglingNode(NodeId(7))));
}

#[test]
fn test_result_serializes_to_json() {
    let mut b = StructureTreeBuilder::new();
    let doc = b.add_root("Document");
    b.add_child(doc, "H").unwrap();
    b.add_child(doc, "H").unwrap();
    let result = validate_pdf_ua(&TaggedDocument::new(b.freeze()), UaProfile::Ua1).unwrap();

    let json = result.to_json().unwrap();
    assert!(json.contains("\"UA-1\""));
    assert!(json.contains("MultipleGenericHeadings"));
    let back: CheckResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
    assert_eq!(result.violations[0].qualified_code(), "UA1-HEAD-002");
}
