use clap::{command, Command};
use tracing::warn;

use super::{CommandType, Status};
use crate::base32;
use crate::store::EntryStoreOperations;
use crate::totp::{current_code, seconds_remaining, GetTime};
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::List.as_str())
        .about("List all stored TOTP entries with their current codes and time remaining")
}

pub fn run_list<W>(store: &impl EntryStoreOperations, clock: &impl GetTime, writer: &mut W) -> Status
where
    W: OutErr,
{
    let entries = match store.list() {
        Ok(entries) => entries,
        Err(err) => {
            writer.write_err(&format!("{}\n", err));
            return Status::Failure;
        }
    };

    if entries.is_empty() {
        writer.write("No entries found.\n");
        return Status::Success;
    }

    let now = clock.get_now();
    let remaining = seconds_remaining(now);

    writer.write("Stored TOTP entries:\n");
    for entry in entries {
        let code = base32::decode(&entry.secret).and_then(|key| current_code(&key, now));
        match code {
            Ok(code) => writer.write(&format!(
                " - {}: {} (expires in {} seconds)\n",
                entry.name, code, remaining
            )),
            Err(err) => warn!(entry = %entry.name, "unable to generate TOTP code: {}", err),
        }
    }

    Status::Success
}
