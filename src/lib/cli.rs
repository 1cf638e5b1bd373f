use std::{ffi::OsString, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::{
    client::DEFAULT_COUNT,
    config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS},
};

pub const USAGE: &str = r#"Usage: pin
  pin rm  URL
  pin add URL [OPTION]
  pin ls [OPTION]

Options:
  -title      title of bookmark being added
  -tag        space delimited tags
  -private    mark bookmark as private
  -readlater  mark bookmark as read later
  -text       longer description of bookmark
  -l          long format for ls
  -count      number of bookmarks for ls (default 50)
  -format     template used to print each bookmark for ls

A URL may also be piped in on standard input.
"#;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "pin",
    about = "Add, remove and list bookmarks from the command line",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Base URL of the bookmarking API.
    #[arg(long, env = "PIN_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: Url,
    /// File holding the API token. Defaults to ~/.pinboard.
    #[arg(long, env = "PIN_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,
    /// Network timeout in seconds.
    #[arg(long, env = "PIN_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a bookmark.
    Add {
        url: Option<String>,
        #[command(flatten)]
        options: AddOptions,
    },
    /// Delete a bookmark.
    Rm { url: Option<String> },
    /// List recent bookmarks.
    Ls(ListOptions),
    /// Print usage.
    Help,
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Args, Debug, Default)]
pub struct AddOptions {
    /// Title of the bookmark; fetched from the page when omitted.
    #[arg(long, allow_hyphen_values = true)]
    pub title: Option<String>,
    /// Space delimited tags.
    #[arg(long)]
    pub tag: Option<String>,
    /// Mark the bookmark as private.
    #[arg(long)]
    pub private: bool,
    /// Mark the bookmark as read later.
    #[arg(long)]
    pub readlater: bool,
    /// Longer description of the bookmark.
    #[arg(long, allow_hyphen_values = true)]
    pub text: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListOptions {
    /// Only bookmarks with these space delimited tags.
    #[arg(long)]
    pub tag: Option<String>,
    /// Only unread bookmarks.
    #[arg(long)]
    pub readlater: bool,
    /// Long format.
    #[arg(short = 'l', long = "long")]
    pub long: bool,
    /// Number of bookmarks to fetch.
    #[arg(long, default_value_t = DEFAULT_COUNT, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub count: u16,
    /// Template used to print each bookmark.
    #[arg(long)]
    pub format: Option<String>,
}

/// Single-dash long flags accepted in addition to their `--` spelling.
const LONG_FLAGS: &[&str] = &[
    "title",
    "tag",
    "private",
    "readlater",
    "text",
    "count",
    "format",
];
const VALUE_FLAGS: &[&str] = &["title", "tag", "text", "count", "format"];

/// Rewrite `-tag x` style flags into `--tag x` so clap understands them.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut takes_value = false;
    let mut passthrough = false;
    for arg in args {
        if passthrough || takes_value {
            takes_value = false;
            out.push(arg);
            continue;
        }
        let Some(s) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        if s == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        let name = s
            .strip_prefix("--")
            .or_else(|| s.strip_prefix('-'))
            .map(|rest| rest.split_once('=').map_or(rest, |(n, _)| n));
        match name {
            Some(name) if LONG_FLAGS.contains(&name) => {
                takes_value = VALUE_FLAGS.contains(&name) && !s.contains('=');
                if s.starts_with("--") {
                    out.push(arg);
                } else {
                    out.push(format!("-{s}").into());
                }
            }
            _ => out.push(arg),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let args = normalize_args(args.iter().map(OsString::from));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn go_style_flags_are_understood() {
        let cli = parse(&[
            "pin",
            "add",
            "https://example.com",
            "-tag",
            "a b",
            "-private",
            "-title=Example",
            "-text",
            "-private is not a flag here",
        ]);
        let Some(Command::Add { url, options }) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(url.as_deref(), Some("https://example.com"));
        assert_eq!(options.tag.as_deref(), Some("a b"));
        assert!(options.private);
        assert!(!options.readlater);
        assert_eq!(options.title.as_deref(), Some("Example"));
        assert_eq!(options.text.as_deref(), Some("-private is not a flag here"));
    }

    #[test]
    fn ls_flags() {
        let cli = parse(&["pin", "ls", "-l", "-readlater", "-count", "5"]);
        let Some(Command::Ls(options)) = cli.command else {
            panic!("expected ls");
        };
        assert!(options.long);
        assert!(options.readlater);
        assert_eq!(options.count, 5);
    }

    #[test]
    fn ls_count_defaults_and_is_bounded() {
        let cli = parse(&["pin", "ls"]);
        let Some(Command::Ls(options)) = cli.command else {
            panic!("expected ls");
        };
        assert_eq!(options.count, DEFAULT_COUNT);
        let args = normalize_args(["pin", "ls", "-count", "500"].map(OsString::from));
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn unknown_verb_is_external() {
        let cli = parse(&["pin", "frob", "x"]);
        assert!(matches!(cli.command, Some(Command::External(ref v)) if v[0] == "frob"));
    }

    #[test]
    fn help_is_our_own_verb() {
        assert!(matches!(parse(&["pin", "help"]).command, Some(Command::Help)));
        assert!(parse(&["pin"]).command.is_none());
    }
}
