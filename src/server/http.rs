//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo; one task per connection.

use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::auth::{CredentialStore, JwtValidator};
use crate::config::{normalize_base_path, Args, DEFAULT_BASE_PATH};
use crate::report::{AgentRoster, ReportStore, ReportTables, TeacherAllowList};
use crate::routes::{self, BoxBody, ReportEndpoint};
use crate::types::{ReportError, Result};

/// Shared application state, immutable after startup
pub struct AppState {
    pub store: Arc<dyn ReportStore>,
    pub credentials: CredentialStore,
    pub jwt: JwtValidator,
    pub tables: ReportTables,
    /// Prefix of the report endpoints, no trailing slash
    pub base_path: String,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ReportStore>,
        credentials: CredentialStore,
        jwt: JwtValidator,
        tables: ReportTables,
    ) -> Self {
        Self {
            store,
            credentials,
            jwt,
            tables,
            base_path: DEFAULT_BASE_PATH.to_string(),
            cors_origin: "*".to_string(),
        }
    }

    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }

    /// Build state from configuration, loading the credential list, the
    /// agent roster and the teacher allow-list from disk
    pub fn from_args(args: &Args, store: Arc<dyn ReportStore>) -> Result<Self> {
        let jwt = match args.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => {
                JwtValidator::new(secret.to_string(), args.jwt_expiry_seconds)?
            }
            _ if args.dev_mode => {
                warn!("No JWT_SECRET set, using the insecure development secret");
                JwtValidator::new_dev()
            }
            _ => {
                return Err(ReportError::Config(
                    "JWT_SECRET is required in production mode".into(),
                ))
            }
        };

        let credentials = match &args.users_file {
            Some(path) => CredentialStore::load(path)?,
            None => {
                warn!("No USERS_FILE configured, every login will be rejected");
                CredentialStore::default()
            }
        };
        if credentials.is_empty() {
            warn!("Credential list is empty");
        }

        let agents = match &args.agent_roster_file {
            Some(path) => AgentRoster::load(path)?,
            None => AgentRoster::default(),
        };

        let allow_list = args
            .teacher_allowlist_file
            .as_deref()
            .map(TeacherAllowList::load)
            .transpose()?;

        info!(
            "Loaded {} credentials, {} agents, teacher allow-list: {}",
            credentials.len(),
            agents.len(),
            allow_list
                .as_ref()
                .map_or("none".to_string(), |l| format!("{} names", l.len()))
        );

        Ok(Self::new(store, credentials, jwt, ReportTables { agents, allow_list })
            .with_base_path(&args.base_path)
            .with_cors_origin(args.cors_origin.clone()))
    }
}

pub async fn run(state: Arc<AppState>, listen: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(listen).await?;

    info!(
        "Report service listening on {} (reports under {}/)",
        listen, state.base_path
    );

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

async fn handle_request<B>(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<B>,
) -> std::result::Result<Response<BoxBody>, hyper::Error>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    info!("[{}] {} {}", addr, req.method(), req.uri().path());
    Ok(route(state, req).await)
}

/// Route a request to its handler
pub async fn route<B>(state: Arc<AppState>, req: Request<B>) -> Response<BoxBody>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    if method == Method::OPTIONS {
        return routes::cors_preflight(&state.cors_origin);
    }

    match (method, path.as_str()) {
        (Method::POST, "/api/login") => routes::handle_login(req, Arc::clone(&state)).await,

        (Method::GET, "/health") | (Method::GET, "/healthz") => routes::health_check(&state),

        (Method::GET, p) => match ReportEndpoint::match_path(&state.base_path, p) {
            Some(endpoint) => routes::handle_report_request(endpoint, req, &state).await,
            None => routes::not_found_response(&path, &state.cors_origin),
        },

        _ => routes::not_found_response(&path, &state.cors_origin),
    }
}
