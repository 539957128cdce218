//! Target version codec.
//!
//! Version strings such as `v1_21_50`, `1_21_50`, `1.21.50` and `v1.21.50`
//! all normalize to the canonical integer `121050`
//! (`100000 + minor * 1000 + patch`). The canonical value `0` is never a
//! valid version, so the codec hands out [`TargetVersion`] values that can
//! only hold valid canonical integers.

use crate::errors::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

const MAJOR_BASE: u64 = 100_000;
const MINOR_LIMIT: u64 = 100;
const PATCH_LIMIT: u64 = 1_000;

/// A validated canonical target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetVersion(u64);

impl TargetVersion {
    /// Parse a single version string. Returns `None` for anything that is
    /// not a `1.<minor>.<patch>` version.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let text = text
            .strip_prefix('v')
            .or_else(|| text.strip_prefix('V'))
            .unwrap_or(text);

        let separator = if text.starts_with("1_") {
            '_'
        } else if text.starts_with("1.") {
            '.'
        } else {
            return None;
        };

        let mut parts = text.split(separator);
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return None;
        };

        if major != "1" {
            return None;
        }
        let minor = parse_component(minor, MINOR_LIMIT)?;
        let patch = parse_component(patch, PATCH_LIMIT)?;

        Some(Self(MAJOR_BASE + minor * PATCH_LIMIT + patch))
    }

    /// Wrap an already canonical integer, rejecting values outside the
    /// encodable range (including the `0` sentinel).
    pub fn from_canonical(canonical: u64) -> Option<Self> {
        let offset = canonical.checked_sub(MAJOR_BASE)?;
        (offset < MINOR_LIMIT * PATCH_LIMIT).then_some(Self(canonical))
    }

    pub fn canonical(self) -> u64 {
        self.0
    }

    pub fn minor(self) -> u64 {
        (self.0 - MAJOR_BASE) / PATCH_LIMIT
    }

    pub fn patch(self) -> u64 {
        self.0 % PATCH_LIMIT
    }
}

impl fmt::Display for TargetVersion {
    /// Renders the `v1_<minor>_<patch>` form used in artifact names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v1_{}_{}", self.minor(), self.patch())
    }
}

impl std::str::FromStr for TargetVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::Validation(format!("invalid version string: \"{s}\"")))
    }
}

/// Parse a canonical version, returning `0` when the text is not a version.
///
/// Callers must treat `0` as "not a version", never as `1.0.0`.
pub fn parse_canonical(text: &str) -> u64 {
    TargetVersion::parse(text).map_or(0, TargetVersion::canonical)
}

/// Parse a comma separated version list. The whole list is rejected if any
/// element is invalid.
pub fn parse_version_list(text: &str) -> Result<BTreeSet<TargetVersion>> {
    text.split(',')
        .map(|item| {
            TargetVersion::parse(item)
                .ok_or_else(|| Error::Validation(format!("invalid version string: \"{text}\"")))
        })
        .collect()
}

fn parse_component(text: &str, limit: u64) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u64>().ok().filter(|value| *value < limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_spellings_share_one_canonical_value() {
        for text in ["v1_21_50", "1_21_50", "1.21.50", "v1.21.50", "V1_21_50", "  1.21.50 "] {
            assert_eq!(parse_canonical(text), 121_050, "spelling {text:?}");
        }
    }

    #[test]
    fn test_rejects_wrong_major() {
        assert_eq!(parse_canonical("2_0_0"), 0);
        assert_eq!(parse_canonical("0.21.50"), 0);
        assert_eq!(parse_canonical("11.21.50"), 0);
    }

    #[test]
    fn test_rejects_out_of_range_components() {
        assert_eq!(parse_canonical("1_100_0"), 0);
        assert_eq!(parse_canonical("1_99_1000"), 0);
        assert_eq!(parse_canonical("1_99_999"), 199_999);
    }

    #[test]
    fn test_rejects_malformed_shapes() {
        for text in [
            "", "v", "1", "1_21", "1_21_50_1", "1_21.50", "1.21_50", "1_a_5", "1_-1_5", "1__5",
        ] {
            assert_eq!(parse_canonical(text), 0, "input {text:?}");
        }
    }

    #[test]
    fn test_format_uses_underscore_form() {
        let version = TargetVersion::parse("1.21.2").unwrap();
        assert_eq!(version.to_string(), "v1_21_2");
        assert_eq!(version.canonical(), 121_002);
    }

    #[test]
    fn test_version_list_is_fail_fast() {
        let set = parse_version_list("1.21.2, v1_21_3").unwrap();
        let canonical: Vec<u64> = set.iter().map(|v| v.canonical()).collect();
        assert_eq!(canonical, vec![121_002, 121_003]);

        assert!(parse_version_list("1.21.2,bogus").is_err());
        assert!(parse_version_list("").is_err());
        assert!(parse_version_list("1.21.2,").is_err());
    }

    #[test]
    fn test_from_canonical_rejects_sentinel() {
        assert!(TargetVersion::from_canonical(0).is_none());
        assert!(TargetVersion::from_canonical(99_999).is_none());
        assert!(TargetVersion::from_canonical(200_000).is_none());
        assert_eq!(
            TargetVersion::from_canonical(121_050).map(|v| v.to_string()),
            Some("v1_21_50".into())
        );
    }

    proptest! {
        #[test]
        fn prop_format_is_left_inverse_of_parse(minor in 0u64..100, patch in 0u64..1000) {
            let text = format!("1.{minor}.{patch}");
            let version = TargetVersion::parse(&text).unwrap();
            let reparsed = TargetVersion::parse(&version.to_string()).unwrap();
            prop_assert_eq!(version, reparsed);
            prop_assert_eq!(version.minor(), minor);
            prop_assert_eq!(version.patch(), patch);
        }
    }
}
