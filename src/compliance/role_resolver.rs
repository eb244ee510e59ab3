//! Role resolution through namespace role maps.
//!
//! A structure type is resolved by following `/RoleMapNS` entries from its
//! namespace until a standard structure type of a standard namespace is
//! reached (ISO 32000-2:2020, 14.8.6). Documents without namespaces use the
//! flat `/RoleMap` over the PDF 1.7 vocabulary instead.
//!
//! Only mappings reachable from a role in use are ever followed, so a broken
//! but unused role map entry is never reported.

use super::types::{UaProfile, ViolationCode, ViolationRecord};
use crate::error::{Error, Result};
use crate::structure::{Lookup, NamespaceId, NodeId, StandardRole, StructureTree};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Namespace label used in messages for the flat role map.
const LEGACY_NAMESPACE_LABEL: &str = "RoleMap";

/// Why a role could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The chain ended in a non-standard role with no mapping
    Unmapped {
        /// Role where the chain stopped
        role: String,
        /// Namespace the role was read in
        namespace: String,
    },
    /// The chain revisited a (namespace, role) pair
    Cycle {
        /// Role where the cycle closed
        role: String,
        /// Namespace of that role
        namespace: String,
    },
    /// The chain came back to a namespace it already passed with another role
    SameNamespace {
        /// Role first seen in the namespace
        role: String,
        /// The namespace
        namespace: String,
    },
    /// A standard structure type is remapped through the flat role map (PDF/UA-1)
    StandardRemapped {
        /// The standard type
        role: String,
        /// What it is mapped to
        target: String,
    },
}

impl ResolutionError {
    /// Violation reported for this failure under `profile`.
    ///
    /// Cycles are "not mapped" under PDF/UA-1 and same-namespace remaps under
    /// PDF/UA-2.
    pub fn to_violation(&self, profile: UaProfile) -> ViolationRecord {
        match self {
            ResolutionError::Unmapped { role, namespace } => ViolationRecord::new(
                ViolationCode::RoleNotMapped,
                profile,
                vec![("role", role.clone()), ("namespace", namespace.clone())],
            ),
            ResolutionError::Cycle { role, namespace } => {
                let code = match profile {
                    UaProfile::Ua1 => ViolationCode::RoleNotMapped,
                    UaProfile::Ua2 => ViolationCode::SameNamespaceRemap,
                };
                ViolationRecord::new(
                    code,
                    profile,
                    vec![("role", role.clone()), ("namespace", namespace.clone())],
                )
            },
            ResolutionError::SameNamespace { role, namespace } => ViolationRecord::new(
                ViolationCode::SameNamespaceRemap,
                profile,
                vec![("role", role.clone()), ("namespace", namespace.clone())],
            ),
            ResolutionError::StandardRemapped { role, target } => ViolationRecord::new(
                ViolationCode::StandardRoleRemapped,
                profile,
                vec![("role", role.clone()), ("target", target.clone())],
            ),
        }
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::Unmapped { role, namespace } => {
                write!(f, "'{}' in '{}' is not mapped", role, namespace)
            },
            ResolutionError::Cycle { role, namespace } => {
                write!(f, "role map cycle at '{}' in '{}'", role, namespace)
            },
            ResolutionError::SameNamespace { role, namespace } => {
                write!(f, "'{}' remapped within '{}'", role, namespace)
            },
            ResolutionError::StandardRemapped { role, target } => {
                write!(f, "standard type '{}' remapped to '{}'", role, target)
            },
        }
    }
}

type CacheKey = (Option<NamespaceId>, String);

/// Resolves structure types to standard roles, memoizing per (namespace, role).
///
/// The cache sits behind a mutex so one resolver can serve content streams
/// checked on different threads.
#[derive(Debug)]
pub struct RoleResolver<'t> {
    tree: &'t StructureTree,
    profile: UaProfile,
    cache: Mutex<HashMap<CacheKey, std::result::Result<StandardRole, ResolutionError>>>,
}

impl<'t> RoleResolver<'t> {
    /// Create a resolver over a frozen tree.
    pub fn new(tree: &'t StructureTree, profile: UaProfile) -> Self {
        Self {
            tree,
            profile,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The tree being resolved against.
    pub fn tree(&self) -> &'t StructureTree {
        self.tree
    }

    /// Profile the resolver was created for.
    pub fn profile(&self) -> UaProfile {
        self.profile
    }

    /// Number of distinct (namespace, role) pairs resolved so far.
    pub fn resolved_count(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Resolve `role` read in `namespace`; `None` selects the flat role map.
    pub fn resolve(
        &self,
        role: &str,
        namespace: Option<NamespaceId>,
    ) -> std::result::Result<StandardRole, ResolutionError> {
        let key = (namespace, role.to_string());
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            log::trace!("Role cache hit for '{}' in {:?}", role, namespace);
            return hit.clone();
        }

        let outcome = match namespace {
            Some(ns) => self.resolve_namespaced(role, ns),
            None => self.resolve_legacy(role),
        };
        if let Err(ref e) = outcome {
            log::debug!("Role resolution failed: {}", e);
        }

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, outcome.clone());
        outcome
    }

    /// Resolve the role of a structure element in the namespace it is read in.
    pub fn resolve_node(
        &self,
        node: NodeId,
    ) -> Result<std::result::Result<StandardRole, ResolutionError>> {
        let role = match self.tree.node(node) {
            Lookup::Found(n) => &n.role,
            _ => return Err(Error::DanglingNode(node)),
        };
        let namespace = match self.tree.namespace_of(node) {
            Lookup::Found(ns) => Some(ns),
            Lookup::NotFound => None,
            Lookup::Dangling(d) => return Err(Error::DanglingNode(d)),
        };
        Ok(self.resolve(&role.name(), namespace))
    }

    /// Resolved role of an element, treating resolution failures as "no role".
    pub fn standard_role_of(&self, node: NodeId) -> Result<Option<StandardRole>> {
        Ok(self.resolve_node(node)?.ok())
    }

    fn namespace_label(&self, ns: NamespaceId) -> String {
        self.tree
            .namespace(ns)
            .map_or_else(|| ns.to_string(), |n| n.name.clone())
    }

    fn resolve_namespaced(
        &self,
        role: &str,
        start: NamespaceId,
    ) -> std::result::Result<StandardRole, ResolutionError> {
        let mut current_role = role.to_string();
        let mut current_ns = start;
        let mut visited: HashSet<(NamespaceId, String)> = HashSet::new();
        // first role seen in each namespace along the chain
        let mut seen_in: HashMap<NamespaceId, String> = HashMap::new();
        seen_in.insert(start, current_role.clone());

        loop {
            if !visited.insert((current_ns, current_role.clone())) {
                return Err(ResolutionError::Cycle {
                    role: current_role,
                    namespace: self.namespace_label(current_ns),
                });
            }

            let namespace = match self.tree.namespace(current_ns) {
                Some(ns) => ns,
                None => {
                    return Err(ResolutionError::Unmapped {
                        role: current_role,
                        namespace: current_ns.to_string(),
                    })
                },
            };

            let target = match namespace.mapping(&current_role) {
                Some(target) => target,
                None => {
                    return namespace
                        .standard()
                        .and_then(|std_ns| std_ns.standard_role(&current_role))
                        .ok_or_else(|| ResolutionError::Unmapped {
                            role: current_role.clone(),
                            namespace: namespace.name.clone(),
                        });
                },
            };

            if let Some(earlier) = seen_in.get(&target.namespace) {
                if *earlier != target.role {
                    return Err(ResolutionError::SameNamespace {
                        role: earlier.clone(),
                        namespace: self.namespace_label(target.namespace),
                    });
                }
            } else {
                seen_in.insert(target.namespace, target.role.clone());
            }

            current_role = target.role.clone();
            current_ns = target.namespace;
        }
    }

    fn resolve_legacy(&self, role: &str) -> std::result::Result<StandardRole, ResolutionError> {
        let role_map = self.tree.role_map();
        let mut current = role.to_string();
        let mut visited: HashSet<String> = HashSet::new();

        loop {
            if !visited.insert(current.clone()) {
                return Err(ResolutionError::Cycle {
                    role: current,
                    namespace: LEGACY_NAMESPACE_LABEL.to_string(),
                });
            }

            let standard = StandardRole::from_pdf_1_7(&current);
            match (role_map.get(&current), standard) {
                (Some(target), Some(_)) if self.profile == UaProfile::Ua1 => {
                    return Err(ResolutionError::StandardRemapped {
                        role: current,
                        target: target.clone(),
                    });
                },
                // standard types are terminal, a remap of one is ignored
                (_, Some(std_role)) => return Ok(std_role),
                (Some(target), None) => current = target.clone(),
                (None, None) => {
                    return Err(ResolutionError::Unmapped {
                        role: current,
                        namespace: LEGACY_NAMESPACE_LABEL.to_string(),
                    })
                },
            }
        }
    }
}
