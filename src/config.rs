use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "authinator";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_DIR: &str = ".authinator";
const STORE_FILE_NAME: &str = "totp.json";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: Option<PathBuf>,
    pub log_level: Option<String>,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8055,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Config {
    /// Reads `path`, or the per-user config file when no path is given.
    ///
    /// Only the per-user file may be absent.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Config::read(path),
            None => match default_config_path() {
                Some(path) => match Config::read(&path) {
                    Err(err) if is_not_found(&err) => Ok(Config::default()),
                    result => result,
                },
                None => Ok(Config::default()),
            },
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Config::parse(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Command-line value first, then the config file, then the per-user default.
    pub fn store_path(&self, flag: Option<&str>) -> PathBuf {
        flag.map(PathBuf::from)
            .or_else(|| self.store.clone())
            .unwrap_or_else(default_store_path)
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .map(|err| err.kind() == io::ErrorKind::NotFound)
        .unwrap_or(false)
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

pub fn default_store_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(STORE_DIR).join(STORE_FILE_NAME),
        None => PathBuf::from(STORE_FILE_NAME),
    }
}
