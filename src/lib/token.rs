use std::{
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// File in the home directory holding the API token.
pub const TOKEN_FILE: &str = ".pinboard";

#[derive(Debug, Error)]
pub enum Error {
    #[error("No authorization token found. Please add your authorization token to {}", path.display())]
    TokenMissingError { path: PathBuf },
    #[error("No authorization token found and no home directory to look in")]
    NoHomeDirectory,
    #[error("Failed to read token file {}", path.display())]
    ReadError {
        #[source]
        error: io::Error,
        path: PathBuf,
    },
}

/// Authentication secret for the API. Opaque; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Read a token file. A missing file or one holding only whitespace yields `None`.
    pub fn read(path: &Path) -> Result<Option<Self>, Error> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let secret = contents.trim();
                Ok((!secret.is_empty()).then(|| Self(secret.to_owned())))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::ReadError {
                error: e,
                path: path.to_owned(),
            }),
        }
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// `~/.pinboard`, if there is a home directory.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(TOKEN_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE);
        fs::write(&path, "user:ABCDEF\n").unwrap();
        assert_eq!(Token::read(&path).unwrap(), Some(Token::new("user:ABCDEF")));
    }

    #[test]
    fn missing_or_blank_file_is_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE);
        assert_eq!(Token::read(&path).unwrap(), None);
        fs::write(&path, " \n").unwrap();
        assert_eq!(Token::read(&path).unwrap(), None);
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", Token::new("user:SECRET"));
        assert!(!rendered.contains("SECRET"));
    }
}
