// ./api/src/main.rs
use axum::{
    Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json as JsonResponse, Response},
    routing::{get, post},
};
use clap::{ArgAction, Parser};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Import application layer components
use application::{
    ApplicationError, CreateMessageRequest, ListFilter, MessageService, MessageStore,
};
// Import infrastructure layer implementations
use infrastructure::{InMemoryMessageStore, SqliteMessageStore};

/// Application state shared by all handlers.
#[derive(Clone)]
struct AppState {
    message_service: Arc<MessageService>,
}

/// Server configuration. Each option is settable via command-line flag or
/// environment variable, with the flag taking precedence.
#[derive(Parser, Debug)]
#[command(name = "palindrome-service")]
#[command(about = "CRUD service that stores messages and classifies them as palindromes")]
struct Config {
    /// HTTP listen address
    #[arg(long, env = "HTTP_ADDR", default_value = "0.0.0.0:8080")]
    http_addr: SocketAddr,

    /// Use the strict definition of a palindrome
    #[arg(long, env = "STRICT_PALINDROME", default_value_t = true, action = ArgAction::Set)]
    strict_palindrome: bool,

    /// SQLite connection string (e.g. sqlite://messages.db?mode=rwc).
    /// Omit to use the in-memory store
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

// Application entry point
#[tokio::main]
async fn main() {
    let cfg = Config::parse();

    // --- Logger Initialization ---
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
    info!(
        http_addr = %cfg.http_addr,
        strict_palindrome = cfg.strict_palindrome,
        "Configuration loaded"
    );

    // --- Dependency Injection ---
    // 1. Select the storage backend
    let store: Arc<dyn MessageStore> = match cfg.database_url.as_deref() {
        Some(url) if !url.is_empty() => match SqliteMessageStore::connect(url).await {
            Ok(store) => {
                info!("SQLite message store initialized.");
                Arc::new(store)
            }
            Err(e) => {
                error!("Failed to initialize SQLite store: {}", e);
                std::process::exit(1);
            }
        },
        _ => {
            info!("No database URL configured, using in-memory message store.");
            Arc::new(InMemoryMessageStore::new())
        }
    };

    // 2. Create the application service, injecting the store
    let message_service = Arc::new(MessageService::new(store, cfg.strict_palindrome));
    info!("Application service initialized.");

    // 3. Create the application state and router
    let app_state = AppState { message_service };
    let app = app(app_state);
    info!("API routes configured.");

    // --- Server Startup ---
    let listener = match TcpListener::bind(cfg.http_addr).await {
        Ok(listener) => {
            info!("Server listening on {}", cfg.http_addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", cfg.http_addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
    info!("Server stopped.");
}

/// Resolves when an interrupt signal arrives, triggering the graceful drain.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install interrupt handler: {}", e);
        return;
    }
    info!("Interrupt received, shutting down");
}

// --- API Router Definition ---

fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/healthz/", get(health_check))
        .nest("/api/v1", messages_router())
        .with_state(state)
}

/// Message CRUD routes. Route definitions are duplicated to match trailing
/// slashes without redirecting.
fn messages_router() -> Router<AppState> {
    Router::new()
        .route(
            "/messages",
            post(create_message_handler).get(list_messages_handler),
        )
        .route(
            "/messages/",
            post(create_message_handler).get(list_messages_handler),
        )
        .route(
            "/messages/:id",
            get(read_message_handler).delete(delete_message_handler),
        )
        .route(
            "/messages/:id/",
            get(read_message_handler).delete(delete_message_handler),
        )
}

// --- API Handlers ---

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Handler for creating a message (POST /api/v1/messages).
async fn create_message_handler(
    State(state): State<AppState>,
    payload: Result<JsonResponse<CreateMessageRequest>, JsonRejection>,
) -> Response {
    // Any body decode failure is a client error, same as the missing-field case
    let request = match payload {
        Ok(JsonResponse(request)) => request,
        Err(rejection) => {
            warn!("Rejected create request body: {}", rejection);
            return map_application_error_to_response(ApplicationError::InvalidInput(
                "invalid request body".to_string(),
            ));
        }
    };
    let Some(text) = request.text else {
        warn!("Rejected create request without 'text' field");
        return map_application_error_to_response(ApplicationError::InvalidInput(
            "missing required field 'text'".to_string(),
        ));
    };

    info!("Received request to create message");
    match state.message_service.create(text).await {
        Ok(msg) => (StatusCode::OK, JsonResponse(msg)).into_response(),
        Err(e) => {
            error!("Failed to create message via handler: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Handler for reading a message (GET /api/v1/messages/:id).
async fn read_message_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!(id = %id, "Received request to read message");
    match state.message_service.read(&id).await {
        Ok(msg) => (StatusCode::OK, JsonResponse(msg)).into_response(),
        Err(e) => map_application_error_to_response(e),
    }
}

#[derive(Deserialize, Debug)]
struct ListParams {
    palindrome: Option<String>,
}

/// Handler for listing messages (GET /api/v1/messages?palindrome=true|false).
async fn list_messages_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    info!(palindrome = ?params.palindrome, "Received request to list messages");
    let filter = match parse_list_filter(params) {
        Ok(filter) => filter,
        Err(e) => return map_application_error_to_response(e),
    };
    match state.message_service.list(filter).await {
        Ok(msgs) => (StatusCode::OK, JsonResponse(msgs)).into_response(),
        Err(e) => {
            error!("Failed to list messages via handler: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Handler for deleting a message (DELETE /api/v1/messages/:id).
async fn delete_message_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!(id = %id, "Received request to delete message");
    match state.message_service.delete(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!(id = %id, "Failed to delete message via handler: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Parses the optional `palindrome` query value, case-insensitively. Any
/// non-empty value other than true/false is a bad request.
fn parse_list_filter(params: ListParams) -> Result<ListFilter, ApplicationError> {
    let palindrome = match params.palindrome.as_deref().map(str::to_ascii_lowercase) {
        None => None,
        Some(raw) => match raw.as_str() {
            "" => None,
            "true" => Some(true),
            "false" => Some(false),
            other => {
                warn!(value = %other, "Rejected invalid palindrome query value");
                return Err(ApplicationError::InvalidInput(format!(
                    "invalid boolean value '{}' for palindrome",
                    other
                )));
            }
        },
    };
    Ok(ListFilter { palindrome })
}

/// Helper function to map ApplicationError to HTTP status codes and a
/// response body. Internal failures never leak detail to the client.
fn map_application_error_to_response(err: ApplicationError) -> Response {
    let (status, body) = match err {
        ApplicationError::NotFound(id) => {
            (StatusCode::NOT_FOUND, format!("Message '{}' not found", id))
        }
        ApplicationError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        ApplicationError::Store(msg) => {
            error!("Underlying storage error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred".to_string(),
            )
        }
    };
    (status, body).into_response()
}
