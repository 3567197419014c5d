use clap::{ArgMatches, Command};
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::SecretStore;

pub fn get_cmd_args(
    command_str: &str,
    subcommand: Command<'static>,
    arg_vec: &Vec<&str>,
) -> Result<ArgMatches, clap::Error> {
    let matches = Command::new("authinator")
        .subcommand(subcommand)
        .try_get_matches_from(arg_vec)?;

    let arg_matches = matches.subcommand().unwrap();
    let cmd_args = match arg_matches {
        (cmd, cmd_args) if cmd == command_str => cmd_args.clone(),
        _ => panic!("Expected {} subcommand", command_str),
    };
    Ok(cmd_args)
}

/// A scratch directory holding one store file, removed on drop.
pub struct TempStore {
    dir: PathBuf,
}

impl TempStore {
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!(
            "authinator-test-{}-{:016x}",
            std::process::id(),
            rand::random::<u64>()
        ));
        fs::create_dir_all(&dir).unwrap();
        TempStore { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join("totp.json")
    }

    pub fn store(&self) -> SecretStore {
        SecretStore::new(self.path())
    }
}

impl Drop for TempStore {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}
