use anyhow::Context;
use axum::{
    extract::{connect_info::ConnectInfo, Request},
    http,
    middleware::{from_fn, Next},
    response::{Json, Response},
    routing::get,
    serve, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::store::EntryStoreOperations;
use crate::totp::GetTime;

mod handlers;

const HEALTHCHECK_PATH: &str = "/healthz";

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn EntryStoreOperations>,
    clock: Arc<dyn GetTime>,
}

impl AppState {
    pub fn new(store: Arc<dyn EntryStoreOperations>, clock: Arc<dyn GetTime>) -> Self {
        AppState { store, clock }
    }
}

pub fn new_http(state: AppState) -> Router {
    Router::new()
        .route(
            "/totps",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route(
            "/totps/{name}",
            get(handlers::get_code).delete(handlers::remove_entry),
        )
        .route(HEALTHCHECK_PATH, get(healthcheck))
        .layer(from_fn(http_request_log))
        .with_state(state)
}

async fn healthcheck() -> Json<Value> {
    Json(json!({
        "success": true,
    }))
}

fn get_client_ip(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.ip().to_string())
        .unwrap_or_else(|| String::from("unknown"))
}

fn get_user_agent(req: &Request) -> String {
    req.headers()
        .get(http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_owned()
}

async fn http_request_log(req: Request, next: Next) -> Response {
    let ip = get_client_ip(&req);
    let user_agent = get_user_agent(&req);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();

    let start = std::time::Instant::now();
    let response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis();

    let status = response.status().as_u16();

    info!(
        client.address = ip,
        http.request.method = method,
        http.response.latency_ms = latency_ms,
        http.response.status_code = status,
        url.path = path,
        user_agent.original = user_agent,
        "[{}] {} - {}",
        status,
        method,
        path,
    );

    response
}

pub async fn bind(addr: SocketAddr) -> anyhow::Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("unable to listen on {}", addr))
}

pub async fn serve_http(app: Router, listener: TcpListener) -> anyhow::Result<()> {
    info!("server listening on {}", listener.local_addr()?);

    serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!("unable to listen for the shutdown signal: {}", err);
            std::future::pending::<()>().await
        }
    }
}
