//! Environments and backend modules.
//!
//! An environment is a named deployment target (DAI, SIT, UAT by default)
//! with a base URL and a default cookie string. A module is one of the two
//! backend path namespaces the tool targets; resolving an environment for a
//! module yields the base URL with exactly one module suffix appended.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three environments every installation ships with.
pub const DEFAULT_ENVIRONMENTS: [&str; 3] = ["DAI", "SIT", "UAT"];

const DAI_BASE_URL: &str = "https://dai.campus.internal";
const SIT_BASE_URL: &str = "https://sit.campus.internal";
const UAT_BASE_URL: &str = "https://uat.campus.internal";

/// Backend module namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Module {
    /// Assessment module.
    #[default]
    #[serde(rename = "EX")]
    Ex,
    /// Administration module.
    #[serde(rename = "AD")]
    Ad,
}

impl Module {
    /// Path suffix appended to an environment's base URL for this module.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Ex => "/api/assessment/api/v1",
            Self::Ad => "/api/administration/api/v1",
        }
    }

    /// Both module suffixes, used when stripping a previously appended one.
    #[must_use]
    pub const fn all_suffixes() -> [&'static str; 2] {
        [Self::Ex.suffix(), Self::Ad.suffix()]
    }

    /// Short tag used in persisted configuration ("EX" / "AD").
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Ex => "EX",
            Self::Ad => "AD",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A single deployment target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentEntry {
    /// Environment name (e.g. "SIT").
    pub name: String,
    /// Base URL without any module suffix.
    pub base_url: String,
    /// Cookie string used when neither the user nor the admin configured one.
    #[serde(default)]
    pub default_cookies: String,
    /// Disabled entries fall back to the hard-coded defaults on resolution.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl EnvironmentEntry {
    /// Creates an enabled entry with no default cookies.
    #[must_use]
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            default_cookies: String::new(),
            enabled: true,
        }
    }
}

/// Registry of environments: the hard-coded default triplet layered under
/// persisted overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentRegistry {
    /// Runtime-added or overridden entries, in insertion order.
    #[serde(default)]
    entries: Vec<EnvironmentEntry>,
}

impl EnvironmentRegistry {
    /// Creates a registry with no overrides; lookups see only the defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a registry from persisted override entries.
    #[must_use]
    pub fn with_entries(entries: Vec<EnvironmentEntry>) -> Self {
        Self { entries }
    }

    /// The hard-coded entry shipped for a default environment, if any.
    #[must_use]
    pub fn builtin(name: &str) -> Option<EnvironmentEntry> {
        let base_url = match name.to_uppercase().as_str() {
            "DAI" => DAI_BASE_URL,
            "SIT" => SIT_BASE_URL,
            "UAT" => UAT_BASE_URL,
            _ => return None,
        };
        Some(EnvironmentEntry::new(name.to_uppercase(), base_url))
    }

    /// Adds or replaces an override entry by name.
    pub fn upsert(&mut self, entry: EnvironmentEntry) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(&entry.name))
        {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Looks up an environment: enabled overrides win, then the built-in
    /// defaults. Disabled or unknown names resolve to the built-in entry.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<EnvironmentEntry> {
        let stored = self
            .entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name));
        match stored {
            Some(entry) if entry.enabled => Some(entry.clone()),
            _ => Self::builtin(name),
        }
    }

    /// All environment names visible to the UI: defaults first, then any
    /// enabled extra entries.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = DEFAULT_ENVIRONMENTS
            .iter()
            .map(ToString::to_string)
            .collect();
        for entry in &self.entries {
            if entry.enabled && !names.iter().any(|n| n.eq_ignore_ascii_case(&entry.name)) {
                names.push(entry.name.clone());
            }
        }
        names
    }

    /// The persisted override entries.
    #[must_use]
    pub fn entries(&self) -> &[EnvironmentEntry] {
        &self.entries
    }

    /// Resolves an environment name and module to a concrete base URL.
    ///
    /// Any recognized module suffix already present on the stored base URL
    /// is stripped before the requested module's suffix is appended, so a
    /// URL never accumulates more than one suffix and repeated resolution
    /// is idempotent.
    #[must_use]
    pub fn resolve(&self, name: &str, module: Module) -> Option<String> {
        let entry = self.get(name)?;
        Some(apply_module_suffix(&entry.base_url, module))
    }
}

/// Strips any recognized module suffix, then appends the requested one.
#[must_use]
pub fn apply_module_suffix(base_url: &str, module: Module) -> String {
    let mut base = base_url.trim_end_matches('/');
    for suffix in Module::all_suffixes() {
        if let Some(stripped) = base.strip_suffix(suffix) {
            base = stripped;
            break;
        }
    }
    format!("{}{}", base, module.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_triplet() {
        for name in DEFAULT_ENVIRONMENTS {
            assert!(EnvironmentRegistry::builtin(name).is_some());
        }
        assert!(EnvironmentRegistry::builtin("PROD").is_none());
    }

    #[test]
    fn test_override_wins_over_builtin() {
        let mut registry = EnvironmentRegistry::new();
        registry.upsert(EnvironmentEntry::new("SIT", "https://sit2.campus.internal"));

        let entry = registry.get("SIT").unwrap();
        assert_eq!(entry.base_url, "https://sit2.campus.internal");
    }

    #[test]
    fn test_disabled_override_falls_back() {
        let mut registry = EnvironmentRegistry::new();
        let mut entry = EnvironmentEntry::new("SIT", "https://sit2.campus.internal");
        entry.enabled = false;
        registry.upsert(entry);

        let resolved = registry.get("SIT").unwrap();
        assert_eq!(resolved.base_url, "https://sit.campus.internal");
    }

    #[test]
    fn test_resolve_appends_module_suffix() {
        let registry = EnvironmentRegistry::new();
        let url = registry.resolve("SIT", Module::Ex).unwrap();
        assert_eq!(url, "https://sit.campus.internal/api/assessment/api/v1");
    }

    #[test]
    fn test_suffix_is_idempotent() {
        let once = apply_module_suffix("https://sit.campus.internal", Module::Ex);
        let twice = apply_module_suffix(&once, Module::Ex);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("/api/assessment/api/v1").count(), 1);
    }

    #[test]
    fn test_suffix_replaces_other_module() {
        let ex = apply_module_suffix("https://sit.campus.internal", Module::Ex);
        let ad = apply_module_suffix(&ex, Module::Ad);
        assert_eq!(ad, "https://sit.campus.internal/api/administration/api/v1");
        assert!(!ad.contains("/api/assessment/api/v1"));
    }

    #[test]
    fn test_unknown_environment_resolves_to_none() {
        let registry = EnvironmentRegistry::new();
        assert!(registry.resolve("PROD", Module::Ex).is_none());
    }

    #[test]
    fn test_names_lists_defaults_and_extras() {
        let mut registry = EnvironmentRegistry::new();
        registry.upsert(EnvironmentEntry::new("DEV9", "https://dev9.campus.internal"));
        let names = registry.names();
        assert_eq!(names, vec!["DAI", "SIT", "UAT", "DEV9"]);
    }
}
