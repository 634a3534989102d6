use crate::{
    config::{LoadError, ProxyConfig},
    proxy::{self, HttpClient, ProxyRoute},
};
use anyhow::Context as _;
use axum::{
    Router,
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt as _;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

#[derive(Clone)]
struct AppState {
    routes: Arc<[ProxyRoute]>,
    client: HttpClient,
    static_files: ServeDir<ServeFile>,
}

/// Builds the dev-server: requests matching a proxy prefix are forwarded,
/// everything else is served from the static directory. Unknown files fall
/// back to `index.html` so client side routes can be reloaded.
pub fn router(config: &ProxyConfig) -> Result<Router, LoadError> {
    let routes = config
        .proxy
        .iter()
        .map(|(prefix, rule)| ProxyRoute::new(prefix, rule))
        .collect::<Result<Arc<[_]>, _>>()?;
    let client = Client::builder(TokioExecutor::new()).build_http();
    let static_files = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));
    let state = AppState {
        routes,
        client,
        static_files,
    };
    Ok(Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http()))
}

async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let path = req.uri().path().to_string();
    if let Some(route) = state.routes.iter().find(|route| route.matches(&path)) {
        let method = req.method().clone();
        return match proxy::forward(&state.client, route, req).await {
            Ok(response) => {
                debug!(
                    prefix = %route.prefix,
                    %method,
                    %path,
                    status = %response.status(),
                    "Forwarded"
                );
                response
            }
            Err(err) => err.into_response(),
        };
    }
    match state.static_files.oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(infallible) => match infallible {},
    }
}

pub async fn serve(config: ProxyConfig) -> anyhow::Result<()> {
    let app = router(&config)?;
    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("cannot bind {}", config.listen))?;
    info!(
        "Serving {:?} on http://{}",
        config.static_dir,
        listener.local_addr()?
    );
    if !config.static_dir.is_dir() {
        warn!(
            "Static directory {:?} does not exist, build the web UI first",
            config.static_dir
        );
    }
    for (prefix, rule) in &config.proxy {
        info!(
            "Proxying {prefix}* to {} (change origin: {})",
            rule.target, rule.change_origin
        );
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
