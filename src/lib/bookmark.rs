use std::collections::BTreeSet;

use crate::tag::{Tag, parse_tags};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single bookmark, as sent to or received from the service.
pub struct Bookmark {
    pub url: String,
    pub title: String,
    pub extended: String,
    pub tags: BTreeSet<Tag>,
    pub shared: bool,
    pub unread: bool,
}

/// Everything `add` knows about a bookmark before its title is settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub url: String,
    /// Explicit title; when absent the page title is fetched.
    pub title: Option<String>,
    pub extended: String,
    pub tags: BTreeSet<Tag>,
    pub private: bool,
    pub read_later: bool,
}

impl Draft {
    pub fn new(url: String) -> Self {
        Self {
            url,
            title: None,
            extended: String::new(),
            tags: BTreeSet::new(),
            private: false,
            read_later: false,
        }
    }

    pub fn with_tags(mut self, raw: &str) -> Self {
        self.tags = parse_tags(raw);
        self
    }

    pub fn into_bookmark(self, title: String) -> Bookmark {
        Bookmark {
            url: self.url,
            title,
            extended: self.extended,
            tags: self.tags,
            shared: !self.private,
            unread: self.read_later,
        }
    }
}
