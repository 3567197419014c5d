use anyhow::Context;
use clap::{arg, command, ArgMatches, Command};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use super::{CommandType, Status};
use crate::config::ServerConfig;
use crate::server::{self, AppState};
use crate::store::SecretStore;
use crate::totp::Clock;
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Serve.as_str())
        .about("Start an HTTP server to manage TOTP entries via a REST API")
        .args(&[
            arg!(--host <HOST> "Address to listen on [default: 0.0.0.0]").required(false),
            arg!(--port <PORT> "Port to listen on [default: 8055]").required(false),
        ])
}

pub fn run_serve<W>(
    serve_args: &ArgMatches,
    store: SecretStore,
    server_config: &ServerConfig,
    writer: &mut W,
) -> Status
where
    W: OutErr,
{
    let addr = match listen_addr(serve_args, server_config) {
        Ok(addr) => addr,
        Err(err) => {
            writer.write_err(&format!("{:#}\n", err));
            return Status::Failure;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            writer.write_err(&format!("Unable to start the runtime: {}\n", err));
            return Status::Failure;
        }
    };

    let state = AppState::new(Arc::new(store), Arc::new(Clock::new()));

    match runtime.block_on(bind_and_serve(state, addr, writer)) {
        Ok(_) => Status::Success,
        Err(err) => {
            writer.write_err(&format!("{:#}\n", err));
            Status::Failure
        }
    }
}

/// Announces the address only once the listener is bound.
async fn bind_and_serve<W>(state: AppState, addr: SocketAddr, writer: &mut W) -> anyhow::Result<()>
where
    W: OutErr,
{
    let listener = server::bind(addr).await?;
    writer.write(&format!("Serving on http://{}\n", listener.local_addr()?));

    server::serve_http(server::new_http(state), listener).await
}

pub fn listen_addr(serve_args: &ArgMatches, server_config: &ServerConfig) -> anyhow::Result<SocketAddr> {
    let mut addr = server_config.addr();
    if let Some(host) = serve_args.value_of("host") {
        addr.set_ip(
            host.parse::<IpAddr>()
                .with_context(|| format!("invalid host address: {}", host))?,
        );
    }
    if let Some(port) = serve_args.value_of("port") {
        addr.set_port(
            port.parse::<u16>()
                .with_context(|| format!("invalid port: {}", port))?,
        );
    }

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::CommandType::Serve;
    use crate::tests::mocks::{MockClock, MockStore, MockWriter};
    use crate::tests::utils::get_cmd_args;
    use std::net::TcpListener;

    #[test]
    fn defaults_to_the_configured_address() {
        let arg_vec = vec!["authinator", Serve.as_str()];
        let serve_args = get_cmd_args(Serve.as_str(), subcommand(), &arg_vec).unwrap();

        let addr = listen_addr(&serve_args, &ServerConfig::default()).unwrap();

        assert_eq!(addr, "0.0.0.0:8055".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn flags_override_the_config() {
        let arg_vec = vec![
            "authinator",
            Serve.as_str(),
            "--host",
            "127.0.0.1",
            "--port",
            "9100",
        ];
        let serve_args = get_cmd_args(Serve.as_str(), subcommand(), &arg_vec).unwrap();

        let addr = listen_addr(&serve_args, &ServerConfig::default()).unwrap();

        assert_eq!(addr, "127.0.0.1:9100".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn rejects_an_invalid_port() {
        let arg_vec = vec!["authinator", Serve.as_str(), "--port", "http"];
        let serve_args = get_cmd_args(Serve.as_str(), subcommand(), &arg_vec).unwrap();

        let err = listen_addr(&serve_args, &ServerConfig::default()).unwrap_err();

        assert!(err.to_string().contains("invalid port"), "{}", err);
    }

    #[test]
    fn keeps_the_configured_host_when_only_the_port_is_given() {
        let arg_vec = vec!["authinator", Serve.as_str(), "--port", "9100"];
        let serve_args = get_cmd_args(Serve.as_str(), subcommand(), &arg_vec).unwrap();
        let server_config = ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 8055,
        };

        let addr = listen_addr(&serve_args, &server_config).unwrap();

        assert_eq!(addr, "127.0.0.1:9100".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn does_not_announce_an_address_it_cannot_bind() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();
        let state = AppState::new(Arc::new(MockStore::new()), Arc::new(MockClock::new()));
        let mut writer = MockWriter::new();

        let result = bind_and_serve(state, addr, &mut writer).await;

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("unable to listen on"), "{:#}", err);
        assert_eq!(writer.out, Vec::<u8>::new());
    }
}
