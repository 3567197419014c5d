use clap::{arg, command, ArgMatches, Command};
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod base32;
mod clipboard;
mod cmd;
mod config;
mod error;
mod hotp;
mod server;
mod store;
mod totp;
mod writer;

#[cfg(test)]
mod tests;

use crate::clipboard::SystemClipboard;
use crate::cmd::{code, create, generate, list, remove, serve, CommandType, Status};
use crate::config::Config;
use crate::store::SecretStore;
use crate::totp::Clock;
use crate::writer::{AuthWriter, OutErr};

const EXAMPLES: &str = "\
Examples:
  authinator create github JBSWY3DPEHPK3PXP
  authinator list
  authinator github
  authinator remove github
  authinator serve --port 8055

HTTP API (authinator serve):
  GET    /totps          List all entries
  POST   /totps          Create an entry from {\"name\": ..., \"secret\": ...}
  GET    /totps/{name}   Current code and seconds until it expires
  DELETE /totps/{name}   Remove an entry";

fn cli() -> Command<'static> {
    command!()
        .about("Time-based one-time passcodes for your second-factor accounts")
        .allow_external_subcommands(true)
        .args(&[
            arg!(--store <PATH> "Path to the TOTP store [default: ~/.authinator/totp.json]")
                .required(false)
                .env("AUTHINATOR_STORE"),
            arg!(--config <PATH> "Path to a TOML config file").required(false),
        ])
        .subcommands([
            create::subcommand(),
            list::subcommand(),
            code::subcommand(),
            remove::subcommand(),
            generate::subcommand(),
            serve::subcommand(),
        ])
        .after_help(EXAMPLES)
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();

    let config = Config::load(matches.value_of("config").map(Path::new))?;
    let is_serve = matches.subcommand_name() == Some(CommandType::Serve.as_str());
    let default_level = if is_serve { "info" } else { "warn" };
    init_logging(config.log_level.as_deref().unwrap_or(default_level));

    let store = SecretStore::new(config.store_path(matches.value_of("store")));
    tracing::debug!(store = %store.path().display(), "using store");

    let status = run(&matches, store, &config)?;
    Ok(status.into())
}

fn run(matches: &ArgMatches, store: SecretStore, config: &Config) -> anyhow::Result<Status> {
    let clock = Clock::new();
    let mut writer = AuthWriter::new();

    let status = match matches.subcommand() {
        Some((name, args)) if name == CommandType::Create.as_str() => {
            create::run_create(args, &store, &mut io::stdin().lock(), &mut writer)
        }
        Some((name, _)) if name == CommandType::List.as_str() => {
            list::run_list(&store, &clock, &mut writer)
        }
        Some((name, args)) if name == CommandType::Code.as_str() => {
            let entry = args.value_of("NAME").unwrap_or_default();
            let copy = !args.is_present("no-copy");
            code::run_code(entry, copy, &store, &clock, &SystemClipboard::new(), &mut writer)
        }
        Some((name, args)) if name == CommandType::Remove.as_str() => {
            remove::run_remove(args, &store, &mut writer)
        }
        Some((name, _)) if name == CommandType::Generate.as_str() => {
            generate::run_generate(&mut writer)
        }
        Some((name, args)) if name == CommandType::Serve.as_str() => {
            serve::run_serve(args, store, &config.server, &mut writer)
        }
        // Anything else is the name of an entry.
        Some((entry, args)) => {
            if args.values_of("").map_or(0, |extra| extra.count()) > 0 {
                writer.write_err("Usage: authinator [command] [arguments...]\n");
                Status::Failure
            } else {
                code::run_code(entry, true, &store, &clock, &SystemClipboard::new(), &mut writer)
            }
        }
        None => {
            cli().print_long_help()?;
            Status::Success
        }
    };

    Ok(status)
}
