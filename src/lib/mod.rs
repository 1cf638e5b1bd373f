use std::time::Duration;

use ureq::Agent;

pub mod bookmark;
pub mod cli;
pub mod client;
pub mod command;
pub mod config;
pub mod input;
pub mod tag;
pub mod template;
pub mod title;
pub mod token;

const USER_AGENT: &str = concat!("pin/", env!("CARGO_PKG_VERSION"));

/// HTTP agent used for both title fetches and API calls.
pub fn agent(timeout: Duration) -> Agent {
    let config = Agent::config_builder()
        .user_agent(USER_AGENT)
        .timeout_global(Some(timeout))
        .build();
    let agent: Agent = config.into();
    agent
}
