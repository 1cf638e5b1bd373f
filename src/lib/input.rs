use std::io::{self, BufRead};

use thiserror::Error;

use crate::{
    bookmark::Draft,
    cli::{AddOptions, Command, ListOptions},
    client::RecentFilter,
    tag::parse_tags,
    template::Format,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("no command is given.")]
    NoCommand,
    #[error("command {0} not found.")]
    UnknownCommandError(String),
    #[error("{verb}: no URL given")]
    ArgumentError { verb: &'static str },
    #[error("failed to read standard input")]
    Stdin(#[from] io::Error),
}

/// One invocation, parsed once and ready to dispatch.
#[derive(Debug)]
pub enum Request {
    Help,
    Add(Draft),
    Remove { url: String },
    List { filter: RecentFilter, format: Format },
}

/// Turn parsed arguments into a request. `piped` is only consulted when a URL is
/// needed and none was given on the command line.
pub fn resolve<F>(command: Option<Command>, piped: F) -> Result<Request, Error>
where
    F: FnOnce() -> io::Result<Option<String>>,
{
    match command {
        None => Err(Error::NoCommand),
        Some(Command::External(args)) => Err(Error::UnknownCommandError(
            args.into_iter().next().unwrap_or_default(),
        )),
        Some(Command::Help) => Ok(Request::Help),
        Some(Command::Add { url, options }) => {
            let url = target_url("add", url, piped)?;
            Ok(Request::Add(draft(url, options)))
        }
        Some(Command::Rm { url }) => {
            let url = target_url("rm", url, piped)?;
            Ok(Request::Remove { url })
        }
        Some(Command::Ls(options)) => Ok(list(options)),
    }
}

fn target_url<F>(verb: &'static str, positional: Option<String>, piped: F) -> Result<String, Error>
where
    F: FnOnce() -> io::Result<Option<String>>,
{
    if let Some(url) = positional {
        return Ok(url);
    }
    piped()?.ok_or(Error::ArgumentError { verb })
}

fn draft(url: String, options: AddOptions) -> Draft {
    let mut draft = Draft::new(url).with_tags(options.tag.as_deref().unwrap_or_default());
    draft.title = options.title.filter(|t| !t.trim().is_empty());
    draft.extended = options.text.unwrap_or_default();
    draft.private = options.private;
    draft.read_later = options.readlater;
    draft
}

fn list(options: ListOptions) -> Request {
    let format = match options.format {
        Some(template) => Format::Custom(template),
        None if options.long => Format::Long,
        None => Format::Short,
    };
    let filter = RecentFilter {
        tags: parse_tags(options.tag.as_deref().unwrap_or_default()),
        unread_only: options.readlater,
        count: options.count,
    };
    Request::List { filter, format }
}

/// The first line of standard input, if it is a pipe.
pub fn read_piped() -> io::Result<Option<String>> {
    let stdin = io::stdin();
    if !is_pipe(&stdin)? {
        return Ok(None);
    }
    first_line(stdin.lock())
}

/// Only a FIFO counts as piped input; terminals and redirected files don't.
#[cfg(unix)]
pub fn is_pipe<T: std::os::fd::AsFd>(handle: &T) -> io::Result<bool> {
    use std::{fs::File, os::unix::fs::FileTypeExt};

    let file = File::from(handle.as_fd().try_clone_to_owned()?);
    Ok(file.metadata()?.file_type().is_fifo())
}

#[cfg(not(unix))]
pub fn is_pipe<T: io::IsTerminal>(handle: &T) -> io::Result<bool> {
    Ok(!handle.is_terminal())
}

pub fn first_line<R: BufRead>(mut reader: R) -> io::Result<Option<String>> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_owned()))
}
