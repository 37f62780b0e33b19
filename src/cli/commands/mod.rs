pub mod auth;
pub mod logging;
pub mod store;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("coachiq")
        .about("Coaching platform authentication API")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("3001")
                .env("COACHIQ_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = store::with_args(command);
    let command = auth::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const ENV_VARS: [&str; 6] = [
        "COACHIQ_PORT",
        "COACHIQ_DATA_FILE",
        "COACHIQ_JWT_SECRET",
        "COACHIQ_TOKEN_TTL_SECONDS",
        "COACHIQ_FRONTEND_URL",
        "COACHIQ_LOG_LEVEL",
    ];

    fn without_env<F: FnOnce()>(f: F) {
        temp_env::with_vars(ENV_VARS.map(|name| (name, None::<&str>)), f);
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "coachiq");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Coaching platform authentication API".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        without_env(|| {
            let matches = new().get_matches_from(vec!["coachiq"]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(3001));
            assert_eq!(
                matches.get_one::<PathBuf>(store::ARG_DATA_FILE).cloned(),
                Some(PathBuf::from("data/users.json"))
            );
            assert_eq!(
                matches.get_one::<i64>(auth::ARG_TOKEN_TTL_SECONDS).copied(),
                Some(86_400)
            );
            assert!(matches.get_one::<String>(auth::ARG_JWT_SECRET).is_none());
            assert!(matches.get_one::<String>(auth::ARG_FRONTEND_URL).is_none());
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(0)
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("COACHIQ_PORT", Some("8443")),
                ("COACHIQ_DATA_FILE", Some("/var/lib/coachiq/users.json")),
                ("COACHIQ_JWT_SECRET", Some("from-env")),
                ("COACHIQ_TOKEN_TTL_SECONDS", Some("3600")),
                ("COACHIQ_FRONTEND_URL", Some("http://localhost:3000")),
                ("COACHIQ_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["coachiq"]);

                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8443));
                assert_eq!(
                    matches.get_one::<PathBuf>(store::ARG_DATA_FILE).cloned(),
                    Some(PathBuf::from("/var/lib/coachiq/users.json"))
                );
                assert_eq!(
                    matches.get_one::<String>(auth::ARG_JWT_SECRET).cloned(),
                    Some("from-env".to_string())
                );
                assert_eq!(
                    matches.get_one::<i64>(auth::ARG_TOKEN_TTL_SECONDS).copied(),
                    Some(3600)
                );
                assert_eq!(
                    matches.get_one::<String>(auth::ARG_FRONTEND_URL).cloned(),
                    Some("http://localhost:3000".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            without_env(|| {
                let mut args = vec!["coachiq".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_rejects_invalid_values() {
        without_env(|| {
            assert!(new()
                .try_get_matches_from(vec!["coachiq", "--port", "70000"])
                .is_err());
            assert!(new()
                .try_get_matches_from(vec!["coachiq", "--token-ttl-seconds", "0"])
                .is_err());
        });
    }
}
