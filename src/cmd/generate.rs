use clap::{command, Command};

use super::{CommandType, Status};
use crate::base32::generate_secret;
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Generate.as_str()).about("Generate a random base32 secret")
}

pub fn run_generate<W>(writer: &mut W) -> Status
where
    W: OutErr,
{
    writer.write(&format!("{}\n", generate_secret()));
    Status::Success
}
