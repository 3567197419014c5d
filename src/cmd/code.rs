use clap::{arg, command, Arg, Command};
use tracing::debug;

use super::{CommandType, Status};
use crate::clipboard::Clipboard;
use crate::error::Error;
use crate::store::EntryStoreOperations;
use crate::totp::{self, GetTime};
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Code.as_str())
        .about("Get the current TOTP code for an entry (also `authinator <NAME>`)")
        .args(&[
            arg!(<NAME> "Name of the entry"),
            Arg::new("no-copy")
                .long("no-copy")
                .help("Do not copy the code to the clipboard"),
        ])
}

pub fn run_code<W>(
    name: &str,
    copy: bool,
    store: &impl EntryStoreOperations,
    clock: &impl GetTime,
    clipboard: &impl Clipboard,
    writer: &mut W,
) -> Status
where
    W: OutErr,
{
    let entry = match store.find(name) {
        Ok(entry) => entry,
        Err(Error::NotFound(_)) => {
            writer.write_err("No entry found with that name.\n");
            return Status::Failure;
        }
        Err(err) => {
            writer.write_err(&format!("{}\n", err));
            return Status::Failure;
        }
    };

    let derived = match totp::derive(&entry.secret, clock.get_now()) {
        Ok(derived) => derived,
        Err(err) => {
            writer.write_err(&format!("Error generating TOTP code: {}\n", err));
            return Status::Failure;
        }
    };

    writer.write(&format!(
        "Your current TOTP code is: {} (Time remaining: {} seconds)\n",
        derived.code, derived.expires_in
    ));
    writer.write(&format!(
        "After this, your next TOTP code will be: {}\n",
        derived.next_code
    ));

    if copy {
        match clipboard.copy(&derived.code) {
            Ok(_) => writer.write("Current code copied to clipboard.\n"),
            Err(err) => {
                debug!("clipboard copy failed: {:#}", err);
                writer.write_err(&format!("Failed to copy code to clipboard: {}\n", err));
            }
        }
    }

    Status::Success
}
