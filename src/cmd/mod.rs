use std::process::ExitCode;

pub mod code;
pub mod create;
pub mod generate;
pub mod list;
pub mod remove;
pub mod serve;

pub enum CommandType {
    Create,
    List,
    Code,
    Remove,
    Generate,
    Serve,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Create => "create",
            CommandType::List => "list",
            CommandType::Code => "code",
            CommandType::Remove => "remove",
            CommandType::Generate => "generate",
            CommandType::Serve => "serve",
        }
    }
}

/// Whether a command did what was asked; failures have already been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Failure => ExitCode::FAILURE,
        }
    }
}
