use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use ureq::Agent;

/// Anything between the first `<title>` and the next `</title>`, newlines included.
pub static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<title>(.*?)</title>").expect("Title regex is invalid!"));

#[derive(Debug, Error)]
pub enum Error {
    #[error("couldn't fetch {url}")]
    FetchError {
        #[source]
        error: ureq::Error,
        url: String,
    },
    #[error("couldn't get page title: {url} (use -title to set one)")]
    NoTitleError { url: String },
}

/// Fetch `url` and return the text of its `<title>` element.
pub fn fetch(agent: &Agent, url: &str) -> Result<String, Error> {
    log::debug!("fetching title of {url}");
    let body = agent
        .get(url)
        .call()
        .map_err(|e| Error::FetchError {
            error: e,
            url: url.to_owned(),
        })?
        .body_mut()
        .read_to_vec()
        .map_err(|e| Error::FetchError {
            error: e,
            url: url.to_owned(),
        })?;
    extract(&String::from_utf8_lossy(&body)).ok_or_else(|| Error::NoTitleError {
        url: url.to_owned(),
    })
}

/// Pull the first title out of an HTML document, trimmed and with entities decoded.
pub fn extract(body: &str) -> Option<String> {
    let raw = TITLE_RE.captures(body)?.get(1)?.as_str().trim();
    if raw.is_empty() {
        return None;
    }
    let title = html_escape::decode_html_entities(raw);
    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_owned())
    }
}
