//! Cookie string handling.
//!
//! Cookies cross the tool's boundaries as a single semicolon-delimited
//! string (`name1=value1; name2=value2`). The conversion is lossy for
//! values containing literal `;` or `=`; that is an accepted limitation of
//! the wire format, not something to repair here.

use std::collections::BTreeMap;

use crate::environment::EnvironmentRegistry;

/// The single reserved administrator username.
pub const ADMIN_USERNAME: &str = "adminadmin";

/// Parses a cookie string into a map.
///
/// Splits on `;`, then on the first `=` per segment; whitespace is trimmed
/// and segments without `=` are skipped. A `=value` segment is kept under
/// the empty-string name.
#[must_use]
pub fn parse_cookie_string(cookies: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for segment in cookies.split(';') {
        if let Some((name, value)) = segment.split_once('=') {
            map.insert(name.trim().to_string(), value.trim().to_string());
        }
    }
    map
}

/// Formats a cookie map as `name1=value1; name2=value2`.
#[must_use]
pub fn format_cookie_string(cookies: &BTreeMap<String, String>) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Resolves the cookie string to attach to a request against `env_name`.
///
/// Precedence: the user's non-empty string for the environment, then the
/// admin's global string, then the environment's configured default, then
/// empty. The winning tier is used outright; tiers are never merged.
#[must_use]
pub fn resolve_cookie_string(
    env_name: &str,
    user_cookies: &BTreeMap<String, String>,
    admin_cookies: &BTreeMap<String, String>,
    registry: &EnvironmentRegistry,
) -> String {
    if let Some(cookies) = user_cookies.get(env_name) {
        if !cookies.trim().is_empty() {
            return cookies.clone();
        }
    }
    if let Some(cookies) = admin_cookies.get(env_name) {
        if !cookies.trim().is_empty() {
            return cookies.clone();
        }
    }
    registry
        .get(env_name)
        .map(|entry| entry.default_cookies)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentEntry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_string() {
        let map = parse_cookie_string("session=abc; token=xyz");
        assert_eq!(map.get("session"), Some(&"abc".to_string()));
        assert_eq!(map.get("token"), Some(&"xyz".to_string()));
    }

    #[test]
    fn test_parse_skips_segments_without_equals() {
        let map = parse_cookie_string("session=abc; garbage; token=xyz");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_parse_keeps_nameless_value_under_empty_key() {
        let map = parse_cookie_string("=orphan; session=abc");
        assert_eq!(map.get(""), Some(&"orphan".to_string()));
        assert_eq!(map.get("session"), Some(&"abc".to_string()));
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        let map = parse_cookie_string("token=a=b=c");
        assert_eq!(map.get("token"), Some(&"a=b=c".to_string()));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let map = parse_cookie_string("  session = abc ;token= xyz ");
        assert_eq!(map.get("session"), Some(&"abc".to_string()));
        assert_eq!(map.get("token"), Some(&"xyz".to_string()));
    }

    #[test]
    fn test_round_trip_for_simple_values() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), "1".to_string());
        map.insert("b".to_string(), "2".to_string());

        assert_eq!(parse_cookie_string(&format_cookie_string(&map)), map);
    }

    #[test]
    fn test_format_empty_map() {
        assert_eq!(format_cookie_string(&BTreeMap::new()), "");
    }

    #[test]
    fn test_user_beats_admin_outright() {
        let registry = EnvironmentRegistry::new();
        let mut user = BTreeMap::new();
        user.insert("SIT".to_string(), "a=1".to_string());
        let mut admin = BTreeMap::new();
        admin.insert("SIT".to_string(), "b=2".to_string());

        let resolved = resolve_cookie_string("SIT", &user, &admin, &registry);
        assert_eq!(resolved, "a=1");
        assert_eq!(
            parse_cookie_string(&resolved),
            BTreeMap::from([("a".to_string(), "1".to_string())])
        );
    }

    #[test]
    fn test_empty_user_string_falls_through_to_admin() {
        let registry = EnvironmentRegistry::new();
        let mut user = BTreeMap::new();
        user.insert("SIT".to_string(), "   ".to_string());
        let mut admin = BTreeMap::new();
        admin.insert("SIT".to_string(), "b=2".to_string());

        assert_eq!(resolve_cookie_string("SIT", &user, &admin, &registry), "b=2");
    }

    #[test]
    fn test_environment_default_is_last_resort() {
        let mut registry = EnvironmentRegistry::new();
        let mut entry = EnvironmentEntry::new("SIT", "https://sit.campus.internal");
        entry.default_cookies = "env=default".to_string();
        registry.upsert(entry);

        let resolved =
            resolve_cookie_string("SIT", &BTreeMap::new(), &BTreeMap::new(), &registry);
        assert_eq!(resolved, "env=default");
    }

    #[test]
    fn test_unknown_environment_resolves_empty() {
        let registry = EnvironmentRegistry::new();
        let resolved =
            resolve_cookie_string("PROD", &BTreeMap::new(), &BTreeMap::new(), &registry);
        assert_eq!(resolved, "");
    }
}
