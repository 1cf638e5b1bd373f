use std::{collections::BTreeSet, fmt::Display};

use once_cell::sync::Lazy;
use regex::Regex;

pub static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s,]{1,255}$").expect("Tag regex is invalid!"));

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&&str> for Tag {
    type Error = ();
    fn try_from(tag: &&str) -> Result<Self, Self::Error> {
        let trimmed_tag = tag.trim();
        if trimmed_tag.is_empty() {
            return Err(());
        }
        if !TAG_RE.is_match(trimmed_tag) {
            return Err(());
        }

        Ok(Self(trimmed_tag.to_string()))
    }
}

impl TryFrom<&str> for Tag {
    type Error = ();

    fn try_from(tag: &str) -> Result<Self, Self::Error> {
        Self::try_from(&tag)
    }
}

/// Split a space delimited tag list, dropping anything that isn't a valid tag.
pub fn parse_tags(raw: &str) -> BTreeSet<Tag> {
    raw.split_whitespace()
        .filter_map(|t| match Tag::try_from(t) {
            Ok(tag) => Some(tag),
            Err(()) => {
                log::warn!("ignoring invalid tag {t:?}");
                None
            }
        })
        .collect()
}

/// Join tags the way the API expects them on the wire.
pub fn join_tags(tags: &BTreeSet<Tag>) -> String {
    tags.iter().map(Tag::as_str).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quoted_tag_flag_becomes_set() {
        let tags = parse_tags("a b");
        let expected: BTreeSet<Tag> = ["a", "b"]
            .iter()
            .map(|t| Tag::try_from(*t).unwrap())
            .collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn duplicates_collapse_and_case_is_kept() {
        let tags = parse_tags("Rust rust Rust");
        assert_eq!(join_tags(&tags), "Rust rust");
    }

    #[test]
    fn commas_are_rejected() {
        assert!(Tag::try_from("a,b").is_err());
        assert!(Tag::try_from("   ").is_err());
        assert!(parse_tags("ok a,b").iter().map(Tag::as_str).eq(["ok"]));
    }

    proptest! {
        #[test]
        fn join_then_parse_is_stable(words in prop::collection::vec("[a-z0-9_.:-]{1,12}", 0..8)) {
            let tags = parse_tags(&words.join(" "));
            prop_assert_eq!(parse_tags(&join_tags(&tags)), tags.clone());
            prop_assert!(tags.len() <= words.len());
        }
    }
}
