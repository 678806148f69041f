//! Cache Key Module
//!
//! Builds deterministic fingerprints from wish-list query parameters.

/// Prefix shared by every wish-list key.
pub const WISHES_KEY_PREFIX: &str = "wishes:";

/// Placeholder used when no venue filter is set.
const ALL_VENUES: &str = "all";

// == Key Options ==
/// Named parameters that identify one wish-list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOptions<'a> {
    /// Venue filter, if any
    pub venue: Option<&'a str>,
    /// Page size
    pub limit: u32,
    /// 1-based page number
    pub page: u32,
}

/// Canonical form of a venue filter: trimmed and lower-cased, `None` when
/// blank. Both the cache key and the upstream query use this form.
pub fn normalize_venue(venue: &str) -> Option<String> {
    let venue = venue.trim();
    (!venue.is_empty()).then(|| venue.to_lowercase())
}

// == Build Key ==
/// Builds the cache key for a request.
///
/// The venue goes through [`normalize_venue`] and a blank venue means
/// "all", so logically identical requests always map to the same key.
pub fn build_key(options: &KeyOptions<'_>) -> String {
    let venue = options
        .venue
        .and_then(normalize_venue)
        .unwrap_or_else(|| ALL_VENUES.to_string());

    format!(
        "{}{}:{}:{}",
        WISHES_KEY_PREFIX, venue, options.limit, options.page
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key_is_deterministic() {
        let options = KeyOptions {
            venue: Some("hue"),
            limit: 10,
            page: 1,
        };

        let first = build_key(&options);
        let second = build_key(&options);

        assert_eq!(first, second);
        assert_eq!(first, "wishes:hue:10:1");
    }

    #[test]
    fn test_build_key_normalizes_venue() {
        let a = build_key(&KeyOptions {
            venue: Some("  Hue "),
            limit: 10,
            page: 1,
        });
        let b = build_key(&KeyOptions {
            venue: Some("hue"),
            limit: 10,
            page: 1,
        });
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalize_venue() {
        assert_eq!(normalize_venue(" Hội An "), Some("hội an".to_string()));
        assert_eq!(normalize_venue("HUE"), Some("hue".to_string()));
        assert_eq!(normalize_venue("   "), None);
    }

    #[test]
    fn test_build_key_blank_venue_is_all() {
        let none = build_key(&KeyOptions {
            venue: None,
            limit: 20,
            page: 3,
        });
        let blank = build_key(&KeyOptions {
            venue: Some("   "),
            limit: 20,
            page: 3,
        });

        assert_eq!(none, "wishes:all:20:3");
        assert_eq!(none, blank);
    }

    #[test]
    fn test_build_key_distinguishes_pages() {
        let p1 = build_key(&KeyOptions {
            venue: None,
            limit: 10,
            page: 1,
        });
        let p2 = build_key(&KeyOptions {
            venue: None,
            limit: 10,
            page: 2,
        });
        assert_ne!(p1, p2);
        assert!(p1.starts_with(WISHES_KEY_PREFIX));
    }
}
