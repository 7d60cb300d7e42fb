// ABOUTME: API key and token discovery with precedence chain
// ABOUTME: CLI flag → TRELLO_API_KEY / TRELLO_TOKEN env vars

use crate::{Error, Result};
use std::env;

pub const API_KEY_ENV: &str = "TRELLO_API_KEY";
pub const TOKEN_ENV: &str = "TRELLO_TOKEN";

#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

pub fn resolve_credentials(
    cli_api_key: Option<String>,
    cli_token: Option<String>,
) -> Result<Credentials> {
    let api_key = pick(cli_api_key, env::var(API_KEY_ENV).ok());
    let token = pick(cli_token, env::var(TOKEN_ENV).ok());

    match (api_key, token) {
        (Some(api_key), Some(token)) => Ok(Credentials { api_key, token }),
        _ => Err(Error::Auth(format!(
            "Please provide {} and {} as environment variables",
            API_KEY_ENV, TOKEN_ENV
        ))),
    }
}

fn pick(cli: Option<String>, env: Option<String>) -> Option<String> {
    cli.or(env).filter(|v| !v.trim().is_empty())
}
