//! Annotation subtypes and flags (ISO 32000-1:2008, 12.5).

use bitflags::bitflags;
use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Annotation subtype per ISO 32000-1 Table 169.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationSubtype {
    /// Text annotation (sticky note)
    Text,
    /// Link annotation
    Link,
    /// Free text annotation
    FreeText,
    /// Line annotation
    Line,
    /// Square annotation
    Square,
    /// Circle annotation
    Circle,
    /// Polygon annotation
    Polygon,
    /// Polyline annotation
    PolyLine,
    /// Highlight annotation
    Highlight,
    /// Underline annotation
    Underline,
    /// Squiggly underline annotation
    Squiggly,
    /// Strikeout annotation
    StrikeOut,
    /// Rubber stamp annotation
    Stamp,
    /// Caret annotation
    Caret,
    /// Ink annotation
    Ink,
    /// Popup annotation
    Popup,
    /// File attachment annotation
    FileAttachment,
    /// Sound annotation
    Sound,
    /// Movie annotation
    Movie,
    /// Widget annotation (form field)
    Widget,
    /// Screen annotation
    Screen,
    /// Printer's mark annotation
    PrinterMark,
    /// Trap network annotation
    TrapNet,
    /// Watermark annotation
    Watermark,
    /// 3D annotation
    ThreeD,
    /// Redaction annotation
    Redact,
    /// RichMedia annotation
    RichMedia,
    /// Unknown annotation type
    Unknown,
}

/// /Subtype names of the known annotation types.
static SUBTYPE_NAMES: phf::Map<&'static str, AnnotationSubtype> = phf_map! {
    "Text" => AnnotationSubtype::Text,
    "Link" => AnnotationSubtype::Link,
    "FreeText" => AnnotationSubtype::FreeText,
    "Line" => AnnotationSubtype::Line,
    "Square" => AnnotationSubtype::Square,
    "Circle" => AnnotationSubtype::Circle,
    "Polygon" => AnnotationSubtype::Polygon,
    "PolyLine" => AnnotationSubtype::PolyLine,
    "Highlight" => AnnotationSubtype::Highlight,
    "Underline" => AnnotationSubtype::Underline,
    "Squiggly" => AnnotationSubtype::Squiggly,
    "StrikeOut" => AnnotationSubtype::StrikeOut,
    "Stamp" => AnnotationSubtype::Stamp,
    "Caret" => AnnotationSubtype::Caret,
    "Ink" => AnnotationSubtype::Ink,
    "Popup" => AnnotationSubtype::Popup,
    "FileAttachment" => AnnotationSubtype::FileAttachment,
    "Sound" => AnnotationSubtype::Sound,
    "Movie" => AnnotationSubtype::Movie,
    "Widget" => AnnotationSubtype::Widget,
    "Screen" => AnnotationSubtype::Screen,
    "PrinterMark" => AnnotationSubtype::PrinterMark,
    "TrapNet" => AnnotationSubtype::TrapNet,
    "Watermark" => AnnotationSubtype::Watermark,
    "3D" => AnnotationSubtype::ThreeD,
    "Redact" => AnnotationSubtype::Redact,
    "RichMedia" => AnnotationSubtype::RichMedia,
};

impl AnnotationSubtype {
    /// PDF name of this subtype, as written in /Subtype.
    pub fn pdf_name(&self) -> &'static str {
        SUBTYPE_NAMES
            .entries()
            .find(|(_, subtype)| *subtype == self)
            .map_or("Unknown", |(name, _)| *name)
    }

    /// Subtype for a /Subtype name; unrecognised names map to `Unknown`.
    pub fn from_pdf_name(name: &str) -> Self {
        SUBTYPE_NAMES.get(name).copied().unwrap_or(Self::Unknown)
    }

    /// Check if this is a markup annotation (has popup, replies, etc.)
    pub fn is_markup(&self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::FreeText
                | Self::Line
                | Self::Square
                | Self::Circle
                | Self::Polygon
                | Self::PolyLine
                | Self::Highlight
                | Self::Underline
                | Self::Squiggly
                | Self::StrikeOut
                | Self::Stamp
                | Self::Caret
                | Self::Ink
                | Self::FileAttachment
                | Self::Sound
                | Self::Redact
        )
    }

    /// Annotations that are pure decoration and may only appear as artifacts.
    pub fn is_decorative(&self) -> bool {
        matches!(self, Self::PrinterMark | Self::Watermark)
    }
}

bitflags! {
    /// Annotation flags per ISO 32000-1 Table 165.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct AnnotationFlags: u32 {
        /// Bit 1: do not display if no appearance handler
        const INVISIBLE = 1 << 0;
        /// Bit 2: do not display or print
        const HIDDEN = 1 << 1;
        /// Bit 3: print when the page is printed
        const PRINT = 1 << 2;
        /// Bit 4: do not scale with page zoom
        const NO_ZOOM = 1 << 3;
        /// Bit 5: do not rotate with page
        const NO_ROTATE = 1 << 4;
        /// Bit 6: do not display on screen
        const NO_VIEW = 1 << 5;
        /// Bit 7: do not allow interaction
        const READ_ONLY = 1 << 6;
        /// Bit 8: do not allow deletion or property changes
        const LOCKED = 1 << 7;
        /// Bit 9: invert NoView on mouse events
        const TOGGLE_NO_VIEW = 1 << 8;
        /// Bit 10: do not allow content modification
        const LOCKED_CONTENTS = 1 << 9;
    }
}

impl AnnotationFlags {
    /// Neither displayed nor printed, so exempt from tagging requirements.
    pub fn is_hidden(&self) -> bool {
        self.contains(Self::HIDDEN) || (self.contains(Self::NO_VIEW) && !self.contains(Self::PRINT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtype_names_roundtrip() {
        for subtype in [
            AnnotationSubtype::Widget,
            AnnotationSubtype::ThreeD,
            AnnotationSubtype::PrinterMark,
            AnnotationSubtype::Popup,
        ] {
            assert_eq!(AnnotationSubtype::from_pdf_name(subtype.pdf_name()), subtype);
        }
        assert_eq!(AnnotationSubtype::from_pdf_name("Bogus"), AnnotationSubtype::Unknown);
    }

    #[test]
    fn test_markup_and_decorative() {
        assert!(AnnotationSubtype::Highlight.is_markup());
        assert!(!AnnotationSubtype::Link.is_markup());
        assert!(!AnnotationSubtype::Popup.is_markup());
        assert!(AnnotationSubtype::Watermark.is_decorative());
        assert!(!AnnotationSubtype::Stamp.is_decorative());
    }

    #[test]
    fn test_hidden_flags() {
        assert!(AnnotationFlags::HIDDEN.is_hidden());
        assert!(AnnotationFlags::NO_VIEW.is_hidden());
        assert!(!(AnnotationFlags::NO_VIEW | AnnotationFlags::PRINT).is_hidden());
        assert!(!AnnotationFlags::PRINT.is_hidden());
        assert!(!AnnotationFlags::empty().is_hidden());
    }
}
