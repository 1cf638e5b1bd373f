use std::{path::PathBuf, time::Duration};

use url::Url;

use crate::{
    cli::Settings,
    token::{self, Token},
};

pub const DEFAULT_API_URL: &str = "https://api.pinboard.in/v1/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings resolved once at startup and handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub timeout: Duration,
    pub token_path: Option<PathBuf>,
    /// Set up front instead of read from `token_path`.
    token: Option<Token>,
}

impl Config {
    pub fn load(settings: &Settings) -> Self {
        Self::new(
            settings.api_url.clone(),
            Duration::from_secs(settings.timeout),
            settings.token_file.clone().or_else(token::default_path),
            None,
        )
    }

    pub fn new(
        api_url: Url,
        timeout: Duration,
        token_path: Option<PathBuf>,
        token: Option<Token>,
    ) -> Self {
        Self {
            api_url: with_trailing_slash(api_url),
            timeout,
            token_path,
            token,
        }
    }

    /// The token, or the error every API-calling command fails with. The token
    /// file is only read here, so commands that never call the API never touch it.
    pub fn token(&self) -> Result<Token, token::Error> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        let path = self.token_path.as_ref().ok_or(token::Error::NoHomeDirectory)?;
        Token::read(path)?.ok_or_else(|| token::Error::TokenMissingError { path: path.clone() })
    }
}

// Url::join drops the last path segment unless the base ends in '/'.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
