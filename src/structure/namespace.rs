//! Structure namespaces and their role maps (ISO 32000-2 14.7.4).

use super::types::StandardRole;
use indexmap::IndexMap;
use std::fmt;

/// Namespace URI of the PDF 1.7 standard structure types.
pub const PDF_1_7_NAMESPACE: &str = "http://iso.org/pdf/ssn";
/// Namespace URI of the PDF 2.0 standard structure types.
pub const PDF_2_0_NAMESPACE: &str = "http://iso.org/pdf2/ssn";
/// MathML namespace URI.
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Handle of a namespace inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(pub usize);

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns#{}", self.0)
    }
}

/// The well-known namespaces whose element names need no mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardNamespace {
    /// PDF 1.7 standard structure namespace
    Pdf17,
    /// PDF 2.0 standard structure namespace
    Pdf20,
    /// MathML 3.0
    MathMl,
}

impl StandardNamespace {
    /// Namespace URI.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Pdf17 => PDF_1_7_NAMESPACE,
            Self::Pdf20 => PDF_2_0_NAMESPACE,
            Self::MathMl => MATHML_NAMESPACE,
        }
    }

    /// Recognise a namespace URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            PDF_1_7_NAMESPACE => Some(Self::Pdf17),
            PDF_2_0_NAMESPACE => Some(Self::Pdf20),
            MATHML_NAMESPACE => Some(Self::MathMl),
            _ => None,
        }
    }

    /// Standard role for `name` in this namespace, if it is one.
    pub fn standard_role(&self, name: &str) -> Option<StandardRole> {
        match self {
            Self::Pdf17 => StandardRole::from_pdf_1_7(name),
            Self::Pdf20 => StandardRole::from_pdf_2_0(name),
            Self::MathMl => (!name.is_empty()).then_some(StandardRole::MathMl),
        }
    }
}

/// Target of a role map entry: a role in some namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleMapTarget {
    /// Target structure type name
    pub role: String,
    /// Namespace the target is read in
    pub namespace: NamespaceId,
}

/// A namespace dictionary: name plus its role map.
#[derive(Debug, Clone)]
pub struct Namespace {
    /// Namespace name (/NS), usually a URI
    pub name: String,
    /// Role map (/RoleMapNS): local role name to target
    pub role_map: IndexMap<String, RoleMapTarget>,
}

impl Namespace {
    /// Create a namespace without role mappings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role_map: IndexMap::new(),
        }
    }

    /// Which standard namespace this is, if any.
    pub fn standard(&self) -> Option<StandardNamespace> {
        StandardNamespace::from_uri(&self.name)
    }

    /// Check if this is one of the well-known standard namespaces.
    pub fn is_standard(&self) -> bool {
        self.standard().is_some()
    }

    /// Look up the mapping for a local role.
    pub fn mapping(&self, role: &str) -> Option<&RoleMapTarget> {
        self.role_map.get(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_namespace_uris() {
        assert_eq!(
            StandardNamespace::from_uri("http://iso.org/pdf2/ssn"),
            Some(StandardNamespace::Pdf20)
        );
        assert_eq!(StandardNamespace::from_uri("urn:custom"), None);
        assert_eq!(StandardNamespace::Pdf17.uri(), PDF_1_7_NAMESPACE);
    }

    #[test]
    fn test_standard_roles_per_namespace() {
        assert_eq!(
            StandardNamespace::Pdf17.standard_role("Note"),
            Some(StandardRole::Note)
        );
        assert_eq!(StandardNamespace::Pdf20.standard_role("Note"), None);
        assert_eq!(
            StandardNamespace::MathMl.standard_role("mfrac"),
            Some(StandardRole::MathMl)
        );
    }

    #[test]
    fn test_namespace_mapping_lookup() {
        let mut ns = Namespace::new("urn:example");
        ns.role_map.insert(
            "Chapter".to_string(),
            RoleMapTarget {
                role: "Sect".to_string(),
                namespace: NamespaceId(0),
            },
        );
        assert!(!ns.is_standard());
        assert_eq!(ns.mapping("Chapter").map(|t| t.role.as_str()), Some("Sect"));
        assert!(ns.mapping("Verse").is_none());
    }
}
