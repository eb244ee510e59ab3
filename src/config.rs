//! Checker configuration.
//!
//! Plain data with builder-style setters, loadable from JSON so a host can keep
//! profiles and rule selections next to its other settings.
//!
//! # Example
//!
//! ```
//! use pdf_ua_check::config::CheckerConfig;
//! use pdf_ua_check::compliance::UaProfile;
//!
//! let config = CheckerConfig::new(UaProfile::Ua2)
//!     .stop_on_first_violation(true)
//!     .check_destinations(false);
//! assert!(!config.check_destinations);
//!
//! let parsed = CheckerConfig::from_json(r#"{"profile": "UA-1", "check_tables": false}"#).unwrap();
//! assert_eq!(parsed.profile, UaProfile::Ua1);
//! assert!(!parsed.check_tables);
//! assert!(parsed.check_headings);
//! ```

use crate::compliance::UaProfile;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Conformance checker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Profile to check against.
    pub profile: UaProfile,

    /// Stop the rule set at the first violation.
    pub stop_on_first_violation: bool,

    /// Make the tagging hook return the first violation as an error.
    pub fail_fast_tagging: bool,

    /// Run the heading rules.
    pub check_headings: bool,

    /// Run the table rules.
    pub check_tables: bool,

    /// Run the note rules.
    pub check_notes: bool,

    /// Run the form field rules.
    pub check_forms: bool,

    /// Run the annotation rules.
    pub check_annotations: bool,

    /// Run the destination rules (PDF/UA-2 only).
    pub check_destinations: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self::new(UaProfile::Ua1)
    }
}

impl CheckerConfig {
    /// Create a configuration with every rule enabled, collecting all violations.
    pub fn new(profile: UaProfile) -> Self {
        Self {
            profile,
            stop_on_first_violation: false,
            fail_fast_tagging: false,
            check_headings: true,
            check_tables: true,
            check_notes: true,
            check_forms: true,
            check_annotations: true,
            check_destinations: true,
        }
    }

    /// Load from a JSON object; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject combinations that cannot be honoured.
    pub fn validate(&self) -> Result<()> {
        if self.fail_fast_tagging && !self.stop_on_first_violation {
            return Err(Error::Config(
                "fail_fast_tagging requires stop_on_first_violation".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the profile.
    pub fn with_profile(mut self, profile: UaProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Configure whether to stop on the first violation.
    pub fn stop_on_first_violation(mut self, stop: bool) -> Self {
        self.stop_on_first_violation = stop;
        self
    }

    /// Configure fail-fast tagging. Implies stopping on the first violation.
    pub fn fail_fast_tagging(mut self, fail_fast: bool) -> Self {
        self.fail_fast_tagging = fail_fast;
        if fail_fast {
            self.stop_on_first_violation = true;
        }
        self
    }

    /// Enable or disable the heading rules.
    pub fn check_headings(mut self, enable: bool) -> Self {
        self.check_headings = enable;
        self
    }

    /// Enable or disable the table rules.
    pub fn check_tables(mut self, enable: bool) -> Self {
        self.check_tables = enable;
        self
    }

    /// Enable or disable the note rules.
    pub fn check_notes(mut self, enable: bool) -> Self {
        self.check_notes = enable;
        self
    }

    /// Enable or disable the form field rules.
    pub fn check_forms(mut self, enable: bool) -> Self {
        self.check_forms = enable;
        self
    }

    /// Enable or disable the annotation rules.
    pub fn check_annotations(mut self, enable: bool) -> Self {
        self.check_annotations = enable;
        self
    }

    /// Enable or disable the destination rules.
    pub fn check_destinations(mut self, enable: bool) -> Self {
        self.check_destinations = enable;
        self
    }
}
