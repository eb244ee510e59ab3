//! Integration tests for marked-content tagging.

use pdf_ua_check::compliance::{
    ContentEvent, MarkedContentTag, StreamKind, StreamReport, UaChecker, UaProfile, ViolationCode,
};
use pdf_ua_check::config::CheckerConfig;
use pdf_ua_check::document::TaggedDocument;
use pdf_ua_check::structure::{NodeId, StructureTreeBuilder};
use pdf_ua_check::{AnnotationSubtype, Error};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Document with one paragraph per page, each owning MCID 0 on its page.
fn paged_doc(pages: u32) -> (TaggedDocument, Vec<NodeId>) {
    let mut b = StructureTreeBuilder::new();
    let root = b.add_root("Document");
    let mut paras = Vec::new();
    for page in 0..pages {
        let p = b.add_child(root, "P").unwrap();
        b.mark_content(p, page).unwrap();
        paras.push(p);
    }
    (TaggedDocument::new(b.freeze()), paras)
}

fn real(node: NodeId) -> MarkedContentTag {
    MarkedContentTag::RealContent { node, mcid: 0 }
}

fn run(
    checker: &UaChecker,
    doc: &TaggedDocument,
    page: u32,
    events: Vec<ContentEvent>,
) -> StreamReport {
    let resolver = checker.resolver(doc);
    let mut tracker = checker.tracker(page);
    for event in events {
        tracker.notify(&resolver, event).unwrap();
    }
    tracker.finish(&resolver).unwrap()
}

fn codes(report: &StreamReport) -> Vec<ViolationCode> {
    report.violations.iter().map(|v| v.code).collect()
}

#[test]
fn test_artifact_stream_is_clean() {
    init_logging();
    let (doc, _) = paged_doc(1);
    let checker = UaChecker::new(UaProfile::Ua1);
    let report = run(
        &checker,
        &doc,
        0,
        vec![
            ContentEvent::open(MarkedContentTag::Artifact),
            ContentEvent::Draw,
            ContentEvent::CloseTag,
        ],
    );
    assert!(report.violations.is_empty());
    assert_eq!(report.drawing_operations, 1);
}

#[test]
fn test_real_content_and_artifact_do_not_nest() {
    init_logging();
    let (doc, paras) = paged_doc(1);
    let checker = UaChecker::new(UaProfile::Ua1);

    let report = run(
        &checker,
        &doc,
        0,
        vec![
            ContentEvent::open(real(paras[0])),
            ContentEvent::open(MarkedContentTag::Artifact),
            ContentEvent::Draw,
            ContentEvent::CloseTag,
            ContentEvent::CloseTag,
        ],
    );
    assert_eq!(codes(&report), vec![ViolationCode::RealContentInsideArtifact]);
    assert!(report.violations[0]
        .message
        .contains("Real content cannot be inside artifact"));

    let report = run(
        &checker,
        &doc,
        0,
        vec![
            ContentEvent::open(MarkedContentTag::Artifact),
            ContentEvent::open(real(paras[0])),
            ContentEvent::Draw,
            ContentEvent::CloseTag,
            ContentEvent::CloseTag,
        ],
    );
    assert_eq!(codes(&report), vec![ViolationCode::RealContentInsideArtifact]);
}

#[test]
fn test_drawing_before_any_tag() {
    init_logging();
    let (doc, _) = paged_doc(1);
    let report = run(&UaChecker::new(UaProfile::Ua2), &doc, 0, vec![ContentEvent::Draw]);
    assert_eq!(codes(&report), vec![ViolationCode::TagNotAdded]);
    assert!(report.violations[0]
        .message
        .contains("Tag has not been added before content adding"));
}

#[test]
fn test_mcid_must_belong_to_node() {
    let (doc, paras) = paged_doc(2);
    let checker = UaChecker::new(UaProfile::Ua1);
    // paragraph 1 owns mcid 0 on page 1, not page 0
    let report = run(
        &checker,
        &doc,
        0,
        vec![
            ContentEvent::open(real(paras[1])),
            ContentEvent::Draw,
            ContentEvent::CloseTag,
        ],
    );
    assert_eq!(codes(&report), vec![ViolationCode::McidNotFound]);
}

#[test]
fn test_pua_glyphs_need_alternate_in_ua2() {
    let (doc, paras) = paged_doc(1);
    let events = || {
        vec![
            ContentEvent::open(real(paras[0])),
            ContentEvent::glyphs("Symbols", true, "\u{E001}"),
            ContentEvent::CloseTag,
        ]
    };

    let ua2 = UaChecker::new(UaProfile::Ua2);
    let report = run(&ua2, &doc, 0, events());
    assert_eq!(codes(&report), vec![ViolationCode::PuaWithoutAlternate]);
    assert!(report.violations[0].message.contains("E001"));

    assert!(run(&UaChecker::new(UaProfile::Ua1), &doc, 0, events())
        .violations
        .is_empty());

    let report = run(
        &ua2,
        &doc,
        0,
        vec![
            ContentEvent::open_with_actual_text(real(paras[0]), "check mark"),
            ContentEvent::glyphs("Symbols", true, "\u{E001}"),
            ContentEvent::CloseTag,
        ],
    );
    assert!(report.violations.is_empty());
}

#[test]
fn test_unembedded_font_reported_once() {
    let (doc, paras) = paged_doc(1);
    let report = run(
        &UaChecker::new(UaProfile::Ua1),
        &doc,
        0,
        vec![
            ContentEvent::open(real(paras[0])),
            ContentEvent::glyphs("Helvetica", false, "Hello"),
            ContentEvent::glyphs("Helvetica", false, "world"),
            ContentEvent::CloseTag,
        ],
    );
    assert_eq!(codes(&report), vec![ViolationCode::FontNotEmbedded]);
    assert!(report.violations[0].message.contains("Helvetica"));
}

#[test]
fn test_popup_appearance_content() {
    let (doc, paras) = paged_doc(1);
    let checker = UaChecker::new(UaProfile::Ua1);
    let resolver = checker.resolver(&doc);
    let mut tracker =
        checker.stream_tracker(0, StreamKind::AnnotationAppearance(AnnotationSubtype::Popup));
    tracker.notify(&resolver, ContentEvent::open(real(paras[0]))).unwrap();
    tracker.notify(&resolver, ContentEvent::Draw).unwrap();
    tracker.notify(&resolver, ContentEvent::CloseTag).unwrap();
    let report = tracker.finish(&resolver).unwrap();
    assert_eq!(codes(&report), vec![ViolationCode::PopupContent]);
}

#[test]
fn test_unbalanced_streams_are_engine_errors() {
    let (doc, _) = paged_doc(1);
    let checker = UaChecker::new(UaProfile::Ua1);
    let resolver = checker.resolver(&doc);

    let mut tracker = checker.tracker(0);
    assert!(matches!(
        tracker.notify(&resolver, ContentEvent::CloseTag),
        Err(Error::UnbalancedMarkedContent { page: 0 })
    ));

    let mut tracker = checker.tracker(3);
    tracker
        .notify(&resolver, ContentEvent::open(MarkedContentTag::Artifact))
        .unwrap();
    assert!(matches!(
        tracker.finish(&resolver),
        Err(Error::UnclosedMarkedContent { page: 3, open: 1 })
    ));
}

#[test]
fn test_fail_fast_tagging() {
    let (doc, _) = paged_doc(1);
    let config = CheckerConfig::new(UaProfile::Ua1).fail_fast_tagging(true);
    let checker = UaChecker::with_config(config).unwrap();
    let resolver = checker.resolver(&doc);
    let mut tracker = checker.tracker(0);

    let err = tracker.notify(&resolver, ContentEvent::Draw).unwrap_err();
    assert_eq!(err.violation().map(|v| v.code), Some(ViolationCode::TagNotAdded));
}

#[test]
fn test_streams_checked_in_parallel() {
    init_logging();
    let (doc, paras) = paged_doc(4);
    let checker = UaChecker::new(UaProfile::Ua2);
    let resolver = checker.resolver(&doc);

    let reports: Vec<StreamReport> = std::thread::scope(|s| {
        let handles: Vec<_> = paras
            .iter()
            .enumerate()
            .map(|(page, para)| {
                let resolver = &resolver;
                let checker = &checker;
                s.spawn(move || {
                    let page = page as u32;
                    let mut tracker = checker.tracker(page);
                    tracker.notify(resolver, ContentEvent::open(real(*para)))?;
                    tracker.notify(resolver, ContentEvent::glyphs("Body", true, "text"))?;
                    tracker.notify(resolver, ContentEvent::CloseTag)?;
                    // page 3 also draws outside any sequence
                    if page == 3 {
                        tracker.notify(resolver, ContentEvent::Draw)?;
                    }
                    tracker.finish(resolver)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });

    let result = checker.check_with_reports(&doc, reports).unwrap();
    assert_eq!(result.stats.streams_checked, 4);
    assert_eq!(result.stats.drawing_operations_checked, 5);
    assert_eq!(
        result.violations.iter().map(|v| v.code).collect::<Vec<_>>(),
        vec![ViolationCode::TagNotAdded]
    );
    assert_eq!(result.violations[0].location.as_deref(), Some("page 3"));
}
