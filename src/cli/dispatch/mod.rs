//! Map validated CLI arguments to the action to run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, store, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3001);

    let store_opts = store::Options::parse(matches)?;
    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        data_file: store_opts.data_file,
        jwt_secret: auth_opts.jwt_secret,
        token_ttl_seconds: auth_opts.token_ttl_seconds,
        frontend_url: auth_opts.frontend_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::DEFAULT_JWT_SECRET, cli::commands};
    use secrecy::ExposeSecret;
    use std::path::PathBuf;

    #[test]
    fn server_action_from_env() {
        temp_env::with_vars(
            [
                ("COACHIQ_PORT", Some("4000")),
                ("COACHIQ_DATA_FILE", Some("/tmp/coachiq/users.json")),
                ("COACHIQ_JWT_SECRET", Some("s3cret")),
                ("COACHIQ_TOKEN_TTL_SECONDS", Some("120")),
                ("COACHIQ_FRONTEND_URL", Some("http://localhost:3000")),
                ("COACHIQ_LOG_LEVEL", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec!["coachiq"]);
                let result = handler(&matches);
                assert!(result.is_ok(), "{result:?}");

                let Ok(Action::Server(args)) = result else {
                    return;
                };
                assert_eq!(args.port, 4000);
                assert_eq!(args.data_file, PathBuf::from("/tmp/coachiq/users.json"));
                assert_eq!(args.jwt_secret.expose_secret(), "s3cret");
                assert_eq!(args.token_ttl_seconds, 120);
                assert_eq!(args.frontend_url.as_deref(), Some("http://localhost:3000"));
            },
        );
    }

    #[test]
    fn jwt_secret_falls_back_to_development_default() {
        temp_env::with_vars(
            [
                ("COACHIQ_JWT_SECRET", None::<&str>),
                ("COACHIQ_TOKEN_TTL_SECONDS", None),
                ("COACHIQ_FRONTEND_URL", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec!["coachiq"]);
                let Ok(Action::Server(args)) = handler(&matches) else {
                    panic!("dispatch failed");
                };

                assert_eq!(args.jwt_secret.expose_secret(), DEFAULT_JWT_SECRET);
                assert_eq!(args.token_ttl_seconds, 86_400);
                assert!(args.frontend_url.is_none());
                assert!(!format!("{args:?}").contains(DEFAULT_JWT_SECRET));
            },
        );
    }
}
