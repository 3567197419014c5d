use clap::{arg, command, ArgMatches, Command};

use super::{CommandType, Status};
use crate::error::Error;
use crate::store::EntryStoreOperations;
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Remove.as_str())
        .about("Remove a TOTP entry")
        .args(&[arg!(<NAME> "Name of the entry to remove")])
}

pub fn run_remove<W>(
    remove_args: &ArgMatches,
    store: &impl EntryStoreOperations,
    writer: &mut W,
) -> Status
where
    W: OutErr,
{
    let name = match remove_args.value_of("NAME") {
        Some(name) => name,
        None => {
            writer.write_err("Usage: authinator remove [name]\n");
            return Status::Failure;
        }
    };

    match store.remove(name) {
        Ok(_) => {
            writer.write(&format!("Entry '{}' has been removed.\n", name));
            Status::Success
        }
        Err(Error::NotFound(_)) => {
            writer.write_err(&format!("No entry found with the name: {}\n", name));
            Status::Failure
        }
        Err(err) => {
            writer.write_err(&format!("{}\n", err));
            Status::Failure
        }
    }
}
