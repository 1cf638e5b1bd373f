use std::io::{self, Write};

use thiserror::Error;
use ureq::Agent;

use crate::{
    bookmark::{Bookmark, Draft},
    cli::USAGE,
    client::{self, Client},
    config::Config,
    input::{self, Request},
    template::{self, Format},
    title, token,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] input::Error),
    #[error(transparent)]
    Token(#[from] token::Error),
    #[error(transparent)]
    Title(#[from] title::Error),
    #[error(transparent)]
    Remote(#[from] client::Error),
    #[error(transparent)]
    Template(#[from] template::Error),
    #[error("failed to write output")]
    Output(#[from] io::Error),
}

/// Carry out a single request, writing whatever it prints to `out`.
pub fn run<W: Write>(request: Request, config: &Config, out: &mut W) -> Result<(), Error> {
    match request {
        Request::Help => {
            out.write_all(USAGE.as_bytes())?;
            Ok(())
        }
        Request::Add(draft) => add(draft, config),
        Request::Remove { url } => {
            connect(config, crate::agent(config.timeout))?.delete(&url)?;
            Ok(())
        }
        Request::List { filter, format } => {
            format.template().check()?;
            let bookmarks = connect(config, crate::agent(config.timeout))?.recent(&filter)?;
            write_listing(out, &bookmarks, &format)
        }
    }
}

fn connect(config: &Config, agent: Agent) -> Result<Client, Error> {
    let token = config.token()?;
    Ok(Client::new(agent, config.api_url.clone(), token))
}

fn add(mut draft: Draft, config: &Config) -> Result<(), Error> {
    let agent = crate::agent(config.timeout);
    let client = connect(config, agent.clone())?;
    let title = match draft.title.take() {
        Some(title) => title,
        None => title::fetch(&agent, &draft.url)?,
    };
    client.add(&draft.into_bookmark(title))?;
    Ok(())
}

/// Print bookmarks one after another in the given format.
pub fn write_listing<W: Write>(
    out: &mut W,
    bookmarks: &[Bookmark],
    format: &Format,
) -> Result<(), Error> {
    let template = format.template();
    for bookmark in bookmarks {
        writeln!(out, "{}", template.render(bookmark)?)?;
        if format.spaced() {
            writeln!(out)?;
        }
    }
    Ok(())
}
