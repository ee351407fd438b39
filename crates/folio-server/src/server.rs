//! Site server: the contribution API plus static files, and in development
//! mode a live-reload channel and an on-the-fly stylesheet.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use folio_style::{StyleBundle, StyleEngine};

use crate::contribution::{
    api_router, ContributionConfig, ContributionError, ContributionService, ExecutionMode,
};
use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, inject_client, HmrHub, HmrMessage, HMR_ROUTE};

/// Configuration for the site server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Development or production behavior
    pub mode: ExecutionMode,

    /// Directory served as the site root
    pub root_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Contribution endpoint settings; its mode is overridden by `mode`
    pub contribution: ContributionConfig,

    /// Stylesheet inputs compiled for `/assets/main.css` in development mode
    pub styles: StyleBundle,

    /// Extra paths watched in development mode
    pub watch_paths: Vec<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Development,
            root_dir: PathBuf::from("public"),
            port: 1111,
            host: "127.0.0.1".to_string(),
            open: true,
            contribution: ContributionConfig::default(),
            styles: StyleBundle::default(),
            watch_paths: Vec::new(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    ServeError(String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error(transparent)]
    Contribution(#[from] ContributionError),
}

/// Shared development-mode state.
struct DevState {
    root_dir: PathBuf,
    hmr: HmrHub,
    styles: StyleBundle,
    engine: StyleEngine,
}

impl DevState {
    fn compile_css(&self) -> Result<String, folio_style::StyleError> {
        self.styles.compile(&self.engine)
    }
}

/// Site server.
pub struct SiteServer {
    config: ServerConfig,
    engine: StyleEngine,
}

impl SiteServer {
    /// Create a new server; `engine` renders utilities in development mode.
    pub fn new(config: ServerConfig, engine: StyleEngine) -> Self {
        Self { config, engine }
    }

    /// Address the server binds to.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        addr.parse().map_err(|_| ServerError::InvalidAddress(addr.clone()))
    }

    /// Build the application router.
    pub fn router(&self) -> Result<Router, ServerError> {
        Ok(self.build()?.0)
    }

    fn build(&self) -> Result<(Router, Option<Arc<DevState>>), ServerError> {
        let contribution = ContributionService::new(ContributionConfig {
            mode: self.config.mode,
            ..self.config.contribution.clone()
        })?;
        let api = api_router(Arc::new(contribution));
        let files = ServeDir::new(&self.config.root_dir);

        match self.config.mode {
            ExecutionMode::Production => {
                let app = Router::new().merge(api).fallback_service(files);
                Ok((app, None))
            }
            ExecutionMode::Development => {
                let state = Arc::new(DevState {
                    root_dir: self.config.root_dir.clone(),
                    hmr: HmrHub::new(),
                    styles: self.config.styles.clone(),
                    engine: self.engine.clone(),
                });

                let app = Router::new()
                    .route("/", get(index_handler))
                    .route(HMR_ROUTE, get(ws_handler))
                    .route("/__hmr.js", get(hmr_script_handler))
                    .route("/assets/main.css", get(css_handler))
                    .with_state(Arc::clone(&state))
                    .merge(api)
                    .fallback_service(files);

                Ok((app, Some(state)))
            }
        }
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.addr()?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!(
            "Serving {} ({:?} mode) at http://{}",
            self.config.root_dir.display(),
            self.config.mode,
            addr
        );

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::debug!("Could not open browser: {}", e);
            }
        }

        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let (app, dev_state) = self.build()?;

        // Keep the watcher alive for as long as the server runs.
        let _watcher = match dev_state {
            Some(state) => Some(self.spawn_watcher(state)?),
            None => None,
        };

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))
    }

    fn spawn_watcher(&self, state: Arc<DevState>) -> Result<FileWatcher, ServerError> {
        let mut watch_paths = vec![self.config.root_dir.clone()];
        watch_paths.extend(self.config.styles.content_dirs.iter().cloned());
        watch_paths.extend(
            self.config
                .styles
                .sources
                .iter()
                .filter_map(|s| s.parent().map(PathBuf::from)),
        );
        watch_paths.extend(self.config.watch_paths.iter().cloned());
        watch_paths.retain(|p| !p.as_os_str().is_empty());
        watch_paths.sort();
        watch_paths.dedup();

        let (watcher, mut rx) =
            FileWatcher::new(&watch_paths).map_err(|e| ServerError::WatchError(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state, event);
            }
        });

        Ok(watcher)
    }
}

/// Handle file watch events.
fn handle_watch_event(state: &DevState, event: WatchEvent) {
    match event {
        WatchEvent::StyleModified(path) => {
            tracing::info!("Stylesheet modified: {}", path.display());

            match state.compile_css() {
                Ok(css) => state.hmr.send(HmrMessage::UpdateCss { css }),
                Err(e) => {
                    tracing::warn!("Failed to compile stylesheet: {}", e);
                    state.hmr.send(HmrMessage::Reload);
                }
            }
        }

        WatchEvent::ContentModified(path) => {
            tracing::info!("Content modified: {}", path.display());
            state.hmr.send(HmrMessage::Reload);
        }

        WatchEvent::Created(_) | WatchEvent::Deleted(_) | WatchEvent::Modified(_) => {
            state.hmr.send(HmrMessage::Reload);
        }
    }
}

/// Handler for the index page, with the live-reload client injected.
async fn index_handler(State(state): State<Arc<DevState>>) -> Response {
    let index_path = state.root_dir.join("index.html");

    let page = match tokio::fs::read_to_string(&index_path).await {
        Ok(html) => html,
        Err(_) => format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
             <link rel=\"stylesheet\" href=\"/assets/main.css\">\n</head>\n<body>\n  \
             <h1>Welcome</h1>\n  <p>Create {} to get started.</p>\n</body>\n</html>",
            index_path.display()
        ),
    };

    Html(inject_client(&page)).into_response()
}

/// Handler for the development stylesheet.
async fn css_handler(State(state): State<Arc<DevState>>) -> Response {
    match state.compile_css() {
        Ok(css) => ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response(),
        Err(e) => {
            tracing::warn!("Failed to compile stylesheet: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Handler for the HMR WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<DevState>>) -> Response {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<DevState>) {
    let mut rx = state.hmr.subscribe();

    if !send_message(&mut socket, &HmrMessage::Connected).await {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if !send_message(&mut socket, &msg).await {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> bool {
    let Ok(json) = serde_json::to_string(msg) else {
        return false;
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handler for the HMR client script.
async fn hmr_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        hmr_client_script(),
    )
}
