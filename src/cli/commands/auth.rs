use crate::auth::{DEFAULT_JWT_SECRET, DEFAULT_TOKEN_TTL_SECONDS};
use anyhow::{Context, Result};
use clap::{Arg, Command};
use secrecy::SecretString;

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_TOKEN_TTL_SECONDS: &str = "token-ttl-seconds";
pub const ARG_FRONTEND_URL: &str = "frontend-url";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret used to sign session tokens")
                .long_help(
                    "Secret used to sign session tokens. When unset an insecure development secret is used and a warning is logged.",
                )
                .env("COACHIQ_JWT_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_SECONDS)
                .long(ARG_TOKEN_TTL_SECONDS)
                .help("Session token TTL in seconds")
                .env("COACHIQ_TOKEN_TTL_SECONDS")
                .default_value(DEFAULT_TOKEN_TTL_SECONDS_STR)
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new(ARG_FRONTEND_URL)
                .long(ARG_FRONTEND_URL)
                .help("Frontend URL allowed by CORS; any origin when unset")
                .env("COACHIQ_FRONTEND_URL"),
        )
}

const DEFAULT_TOKEN_TTL_SECONDS_STR: &str = "86400";

#[derive(Debug)]
pub struct Options {
    pub jwt_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub frontend_url: Option<String>,
}

impl Options {
    /// # Errors
    /// Returns an error if the token TTL argument is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .cloned()
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        let token_ttl_seconds = matches
            .get_one::<i64>(ARG_TOKEN_TTL_SECONDS)
            .copied()
            .context("missing required argument: --token-ttl-seconds")?;

        Ok(Self {
            jwt_secret: SecretString::from(jwt_secret),
            token_ttl_seconds,
            frontend_url: matches.get_one::<String>(ARG_FRONTEND_URL).cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_matches_service_default() {
        assert_eq!(
            DEFAULT_TOKEN_TTL_SECONDS_STR.parse::<i64>().ok(),
            Some(DEFAULT_TOKEN_TTL_SECONDS)
        );
    }
}
