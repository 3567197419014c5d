use clap::{arg, command, ArgMatches, Command};
use std::io::{self, BufRead};

use super::{CommandType, Status};
use crate::error::Error;
use crate::store::EntryStoreOperations;
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Create.as_str())
        .about("Create a new TOTP entry (prompts for anything not given)")
        .args(&[
            arg!([NAME] "Name of the entry"),
            arg!([SECRET] "Base32 TOTP secret provided by the service"),
        ])
}

pub fn run_create<R, W>(
    create_args: &ArgMatches,
    store: &impl EntryStoreOperations,
    input: &mut R,
    writer: &mut W,
) -> Status
where
    R: BufRead,
    W: OutErr,
{
    let values = value_or_prompt(create_args.value_of("NAME"), "Enter name: ", input, writer)
        .and_then(|name| {
            value_or_prompt(
                create_args.value_of("SECRET"),
                "Enter TOTP secret: ",
                input,
                writer,
            )
            .map(|secret| (name, secret))
        });
    let (name, secret) = match values {
        Ok(values) => values,
        Err(err) => {
            writer.write_err(&format!("Unable to read input: {}\n", err));
            return Status::Failure;
        }
    };

    if name.is_empty() || secret.is_empty() {
        writer.write_err("Name and secret are required\n");
        return Status::Failure;
    }

    match store.add(&name, &secret) {
        Ok(_) => {
            writer.write("Entry created successfully!\n");
            Status::Success
        }
        Err(Error::DuplicateName(_)) => {
            writer.write_err("Entry with this name already exists.\n");
            Status::Failure
        }
        Err(err) => {
            writer.write_err(&format!("{}\n", err));
            Status::Failure
        }
    }
}

fn value_or_prompt<R, W>(
    value: Option<&str>,
    prompt: &str,
    input: &mut R,
    writer: &mut W,
) -> io::Result<String>
where
    R: BufRead,
    W: OutErr,
{
    if let Some(value) = value {
        return Ok(String::from(value));
    }

    writer.write(prompt);
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(String::from(line.trim()))
}
