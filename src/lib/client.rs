use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;
use ureq::Agent;
use url::Url;

use crate::{
    bookmark::Bookmark,
    tag::{Tag, join_tags, parse_tags},
    token::Token,
};

/// Number of bookmarks `ls` shows unless told otherwise.
pub const DEFAULT_COUNT: u16 = 50;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid API endpoint {method}")]
    Endpoint {
        #[source]
        error: url::ParseError,
        method: &'static str,
    },
    #[error("{method} request failed")]
    Transport {
        #[source]
        error: ureq::Error,
        method: &'static str,
    },
    #[error("{method}: {code}")]
    Rejected { method: &'static str, code: String },
    #[error("unexpected response from {method}")]
    Decode {
        #[source]
        error: serde_json::Error,
        method: &'static str,
    },
}

/// Filters for listing recent bookmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentFilter {
    pub tags: BTreeSet<Tag>,
    pub unread_only: bool,
    pub count: u16,
}

impl Default for RecentFilter {
    fn default() -> Self {
        Self {
            tags: BTreeSet::new(),
            unread_only: false,
            count: DEFAULT_COUNT,
        }
    }
}

#[derive(Deserialize)]
struct ResultCode {
    result_code: String,
}

#[derive(Deserialize)]
struct Recent {
    #[serde(default)]
    posts: Vec<Post>,
}

#[derive(Deserialize)]
struct Post {
    href: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    extended: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    shared: String,
    #[serde(default)]
    toread: String,
}

impl From<Post> for Bookmark {
    fn from(post: Post) -> Self {
        Bookmark {
            url: post.href,
            title: post.description,
            extended: post.extended,
            tags: parse_tags(&post.tags),
            shared: post.shared != "no",
            unread: post.toread == "yes",
        }
    }
}

/// Blocking client for the bookmarking API. Every method is one HTTP request.
pub struct Client {
    agent: Agent,
    base: Url,
    token: Token,
}

impl Client {
    pub fn new(agent: Agent, base: Url, token: Token) -> Self {
        Self { agent, base, token }
    }

    pub fn add(&self, bookmark: &Bookmark) -> Result<(), Error> {
        let mut params = vec![
            ("url", bookmark.url.clone()),
            ("description", bookmark.title.clone()),
        ];
        if !bookmark.extended.is_empty() {
            params.push(("extended", bookmark.extended.clone()));
        }
        if !bookmark.tags.is_empty() {
            params.push(("tags", join_tags(&bookmark.tags)));
        }
        if !bookmark.shared {
            params.push(("shared", "no".to_owned()));
        }
        if bookmark.unread {
            params.push(("toread", "yes".to_owned()));
        }
        self.expect_done("posts/add", &params)
    }

    pub fn delete(&self, url: &str) -> Result<(), Error> {
        self.expect_done("posts/delete", &[("url", url.to_owned())])
    }

    /// Most recent bookmarks, in the order the service returns them.
    pub fn recent(&self, filter: &RecentFilter) -> Result<Vec<Bookmark>, Error> {
        let mut params = vec![("count", filter.count.to_string())];
        if !filter.tags.is_empty() {
            params.push(("tag", join_tags(&filter.tags)));
        }
        let method = "posts/recent";
        let body = self.call(method, &params)?;
        let mut bookmarks =
            decode_recent(&body).map_err(|error| Error::Decode { error, method })?;
        // The service has no unread filter of its own.
        if filter.unread_only {
            bookmarks.retain(|b| b.unread);
        }
        Ok(bookmarks)
    }

    fn expect_done(&self, method: &'static str, params: &[(&str, String)]) -> Result<(), Error> {
        let body = self.call(method, params)?;
        let ResultCode { result_code } =
            serde_json::from_str(&body).map_err(|error| Error::Decode { error, method })?;
        if result_code == "done" {
            Ok(())
        } else {
            Err(Error::Rejected {
                method,
                code: result_code,
            })
        }
    }

    fn call(&self, method: &'static str, params: &[(&str, String)]) -> Result<String, Error> {
        let endpoint = self
            .base
            .join(method)
            .map_err(|error| Error::Endpoint { error, method })?;
        log::debug!("{method} {params:?}");
        let mut request = self
            .agent
            .get(endpoint.as_str())
            .query("auth_token", self.token.expose())
            .query("format", "json");
        for (key, value) in params {
            request = request.query(*key, value);
        }
        request
            .call()
            .map_err(|error| Error::Transport { error, method })?
            .body_mut()
            .read_to_string()
            .map_err(|error| Error::Transport { error, method })
    }
}

/// Decode a `posts/recent` response body.
pub fn decode_recent(body: &str) -> Result<Vec<Bookmark>, serde_json::Error> {
    let recent: Recent = serde_json::from_str(body)?;
    Ok(recent.posts.into_iter().map(Bookmark::from).collect())
}
