use clap::{crate_version, Arg, ArgMatches, Command};

use super::{LogFormat, LogLevel};

/// Low-level `clap` object which provides with `value_source` which
/// indicates whether an option was set by the user (cli/env) or by the
/// default value.
///
/// This also encapsulates the core configuation that is supported for the cli, env,
/// and TOML (file-based) configuration.
pub(super) fn get_matches() -> ArgMatches {
    command().get_matches()
}

pub(super) fn command() -> Command {
    Command::new("storage_server")
        .about("Off-chain storage for sparse Merkle trees, with signed root commitments")
        .version(crate_version!()) // pick the version from `Cargo.toml`
        .propagate_version(true)
        .subcommand(Command::new("start").about("Start the server"))
        .subcommand(Command::new("generate_key").about("Generate a new secret key"))
        .arg(
            Arg::new("root-dir")
                .help("Root directory where application data is stored")
                .short('r')
                .long("root-dir")
                .value_name("ROOT_DIR")
                .env("ROOT_DIR")
                .value_parser(clap::value_parser!(String))
                .default_value("~/.storage_server"),
        )
        .arg(
            Arg::new("log-level")
                .help("Log level")
                .long("log-level")
                .value_name("LOG_LEVEL")
                .env("LOG_LEVEL")
                .value_parser(clap::builder::EnumValueParser::<LogLevel>::new())
                .default_value("INFO"),
        )
        .arg(
            Arg::new("log-format")
                .help("Log format")
                .long("log-format")
                .value_name("LOG_FORMAT")
                .env("LOG_FORMAT")
                .value_parser(clap::builder::EnumValueParser::<LogFormat>::new())
                .default_value("PRETTY"),
        )
        .arg(
            Arg::new("rpc-laddr")
                .help("RPC listen address")
                .long("rpc-laddr")
                .value_name("RPC_LADDR")
                .env("RPC_LADDR")
                .value_parser(clap::value_parser!(String))
                .default_value("0.0.0.0:8080"),
        )
        .arg(
            Arg::new("secret-key")
                .help("Secret key encoded as hex")
                .long("secret-key")
                .value_name("SECRET_KEY")
                .env("SECRET_KEY")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("max-height")
                .help("Maximum height of any owner's tree")
                .long("max-height")
                .value_name("MAX_HEIGHT")
                .env("MAX_HEIGHT")
                .value_parser(clap::value_parser!(usize))
                .default_value("32"),
        )
}
