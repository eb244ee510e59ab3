//! Plain-text view of rich text strings (RV, RC).
//!
//! Rich text in forms and annotations is an XHTML fragment (ISO 32000-1:2008,
//! 12.7.3.4). Two values are textually equivalent when their character data
//! matches after whitespace normalisation.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Elements that break words when they start or end.
const BLOCK_ELEMENTS: &[&[u8]] = &[b"p", b"div", b"br", b"li", b"body", b"html"];

/// Character data of an XHTML fragment.
///
/// Malformed markup is returned unchanged so that it never compares equal to
/// a well-formed value by accident.
pub fn plain_text(xhtml: &str) -> String {
    let mut reader = Reader::from_str(xhtml);
    reader.trim_text(false);

    let mut text = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if BLOCK_ELEMENTS.contains(&e.local_name().as_ref()) {
                    text.push(' ');
                }
            },
            Ok(Event::End(e)) => {
                if BLOCK_ELEMENTS.contains(&e.local_name().as_ref()) {
                    text.push(' ');
                }
            },
            Ok(Event::Empty(e)) => {
                if BLOCK_ELEMENTS.contains(&e.local_name().as_ref()) {
                    text.push(' ');
                }
            },
            Ok(Event::Text(e)) => match e.unescape() {
                Ok(t) => text.push_str(&t),
                Err(err) => {
                    log::debug!("Rich text unescape error: {:?}", err);
                    return xhtml.to_string();
                },
            },
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Ok(Event::Eof) => break,
            Err(e) => {
                log::debug!("Rich text parsing error: {:?}", e);
                return xhtml.to_string();
            },
            _ => {},
        }
    }
    text
}

/// Collapse runs of whitespace and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a plain value and a rich text value carry the same text.
pub fn textually_equivalent(plain: &str, rich: &str) -> bool {
    normalize_whitespace(plain) == normalize_whitespace(&plain_text(rich))
}
