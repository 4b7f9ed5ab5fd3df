pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_DSN: &str = "dsn";
pub const ARG_MAX_CONNECTIONS: &str = "max-connections";
pub const ARG_CORS_ORIGIN: &str = "cors-origin";

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

    let command = Command::new("realty")
        .about("Property management API")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("REALTY_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long("dsn")
                .help("SQLite connection string")
                .long_help(
                    "SQLite connection string. The database file is created on first start \
                     and the schema is applied on every start.",
                )
                .default_value("sqlite://realty.db")
                .env("REALTY_DSN"),
        )
        .arg(
            Arg::new(ARG_MAX_CONNECTIONS)
                .long("max-connections")
                .help("Maximum number of pooled database connections")
                .default_value("5")
                .env("REALTY_MAX_CONNECTIONS")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_CORS_ORIGIN)
                .long("cors-origin")
                .help("Browser origin allowed by CORS, e.g. https://app.realty.dev")
                .env("REALTY_CORS_ORIGIN"),
        );

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 5] = [
        "REALTY_PORT",
        "REALTY_DSN",
        "REALTY_MAX_CONNECTIONS",
        "REALTY_CORS_ORIGIN",
        "REALTY_LOG_LEVEL",
    ];

    fn clear_env() -> Vec<(&'static str, Option<&'static str>)> {
        ENV_VARS.iter().map(|name| (*name, None)).collect()
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "realty");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Property management API".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(clear_env(), || {
            let matches = new().get_matches_from(vec!["realty"]);
            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches.get_one::<String>(ARG_DSN).map(String::as_str),
                Some("sqlite://realty.db")
            );
            assert_eq!(
                matches.get_one::<u32>(ARG_MAX_CONNECTIONS).copied(),
                Some(5)
            );
            assert_eq!(matches.get_one::<String>(ARG_CORS_ORIGIN), None);
        });
    }

    #[test]
    fn test_check_args() {
        temp_env::with_vars(clear_env(), || {
            let matches = new().get_matches_from(vec![
                "realty",
                "--port",
                "9090",
                "--dsn",
                "sqlite:///var/lib/realty/realty.db",
                "--max-connections",
                "12",
                "--cors-origin",
                "https://app.realty.dev",
            ]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(9090));
            assert_eq!(
                matches.get_one::<String>(ARG_DSN).map(String::as_str),
                Some("sqlite:///var/lib/realty/realty.db")
            );
            assert_eq!(
                matches.get_one::<u32>(ARG_MAX_CONNECTIONS).copied(),
                Some(12)
            );
            assert_eq!(
                matches.get_one::<String>(ARG_CORS_ORIGIN).map(String::as_str),
                Some("https://app.realty.dev")
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("REALTY_PORT", Some("443")),
                ("REALTY_DSN", Some("sqlite::memory:")),
                ("REALTY_MAX_CONNECTIONS", Some("2")),
                ("REALTY_CORS_ORIGIN", Some("http://localhost:3000")),
                ("REALTY_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["realty"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(ARG_DSN).map(String::as_str),
                    Some("sqlite::memory:")
                );
                assert_eq!(
                    matches.get_one::<u32>(ARG_MAX_CONNECTIONS).copied(),
                    Some(2)
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_CORS_ORIGIN).map(String::as_str),
                    Some("http://localhost:3000")
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_zero_connections_rejected() {
        temp_env::with_vars(clear_env(), || {
            let result = new().try_get_matches_from(vec!["realty", "--max-connections", "0"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, level) in levels.into_iter().enumerate() {
            temp_env::with_vars([("REALTY_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["realty"]);
                assert_eq!(
                    matches
                        .get_one::<u8>(logging::ARG_VERBOSITY)
                        .map(|v| usize::from(*v)),
                    Some(index)
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 1..5_usize {
            temp_env::with_vars([("REALTY_LOG_LEVEL", None::<&str>)], || {
                let flag = format!("-{}", "v".repeat(index));
                let matches = new().get_matches_from(vec!["realty".to_string(), flag]);
                assert_eq!(
                    matches
                        .get_one::<u8>(logging::ARG_VERBOSITY)
                        .map(|v| usize::from(*v)),
                    Some(index)
                );
            });
        }
    }
}
