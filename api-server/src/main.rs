use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Responder};
use host::{GameConfig, HeadlessRenderer, Intent, MemoryStore, Session};
use pong_core::{GameLevel, ServerSnapshot, Side};
use serde::{Deserialize, Serialize};

/// Upper bound on frames advanced by a single tick request
const MAX_FRAMES_PER_TICK: u32 = 600;

/// Live sessions kept before creation is refused
const MAX_SESSIONS: usize = 1024;

type ServerSession = Session<HeadlessRenderer>;

struct AppState {
    config: GameConfig,
    sessions: Mutex<HashMap<u32, ServerSession>>,
    next_id: AtomicU32,
    max_sessions: usize,
}

impl AppState {
    fn new(config: GameConfig) -> Self {
        Self::with_capacity(config, MAX_SESSIONS)
    }

    fn with_capacity(config: GameConfig, max_sessions: usize) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU32::new(1),
            max_sessions,
        }
    }

    /// Next id not held by a live session. Ids wrap, so skip taken ones.
    fn allocate_id(&self, sessions: &HashMap<u32, ServerSession>) -> u32 {
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            if !sessions.contains_key(&id) {
                return id;
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreateRequest {
    level: Option<GameLevel>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct IntentRequest {
    side: Side,
    /// `null` releases the paddle
    intent: Option<Intent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TickRequest {
    frames: Option<u32>,
    dt: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionResponse {
    success: bool,
    id: u32,
    frame: u64,
    game_over: bool,
    snapshot: ServerSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl SessionResponse {
    fn of(id: u32, session: &ServerSession) -> Self {
        Self {
            success: true,
            id,
            frame: session.frame(),
            game_over: session.manager().is_game_over(),
            snapshot: session.snapshot(),
        }
    }
}

fn error(status: actix_web::http::StatusCode, msg: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        success: false,
        error: msg.into(),
    })
}

/// Run `f` against session `id`, mapping a missing id to 404.
fn with_session<F>(state: &AppState, id: u32, f: F) -> HttpResponse
where
    F: FnOnce(&mut ServerSession) -> HttpResponse,
{
    let mut sessions = match state.sessions.lock() {
        Ok(s) => s,
        Err(_) => {
            tracing::error!("Session table lock poisoned");
            return error(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "session table unavailable");
        }
    };
    match sessions.get_mut(&id) {
        Some(session) => f(session),
        None => error(actix_web::http::StatusCode::NOT_FOUND, format!("Unknown session: {}", id)),
    }
}

// API Handlers

/// POST /api/sessions
/// Create an authoritative session and serve the first ball
async fn create_session(state: web::Data<AppState>, req: web::Json<CreateRequest>) -> impl Responder {
    let mut config = state.config.clone();
    if let Some(level) = req.level {
        config.level = level;
    }
    if let Some(seed) = req.seed {
        config.seed = seed;
    }

    let renderer = HeadlessRenderer::new(config.canvas_width, config.canvas_height);
    let mut session = match Session::new(config, renderer, MemoryStore::default()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to create session: {}", e);
            return error(actix_web::http::StatusCode::BAD_REQUEST, e.to_string());
        }
    };
    session.start_game();

    let mut sessions = match state.sessions.lock() {
        Ok(s) => s,
        Err(_) => {
            return error(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "session table unavailable");
        }
    };
    if sessions.len() >= state.max_sessions {
        let before = sessions.len();
        sessions.retain(|_, s| !s.manager().is_game_over());
        tracing::info!("Evicted {} finished sessions", before - sessions.len());
    }
    if sessions.len() >= state.max_sessions {
        tracing::warn!("Session table full ({} live)", sessions.len());
        return error(actix_web::http::StatusCode::SERVICE_UNAVAILABLE, "too many live sessions");
    }

    let id = state.allocate_id(&sessions);
    let body = SessionResponse::of(id, &session);
    sessions.insert(id, session);
    drop(sessions);
    tracing::info!("Created session {}", id);
    HttpResponse::Created().json(body)
}

/// GET /api/sessions/{id}/snapshot
async fn get_snapshot(state: web::Data<AppState>, path: web::Path<u32>) -> impl Responder {
    let id = path.into_inner();
    with_session(&state, id, |s| HttpResponse::Ok().json(SessionResponse::of(id, s)))
}

/// POST /api/sessions/{id}/intent
/// Set or release a paddle direction
async fn post_intent(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    req: web::Json<IntentRequest>,
) -> impl Responder {
    let id = path.into_inner();
    tracing::debug!("Session {}: {} intent {:?}", id, req.side, req.intent);
    with_session(&state, id, |s| {
        s.set_intent(req.side, req.intent);
        HttpResponse::NoContent().finish()
    })
}

/// POST /api/sessions/{id}/tick
/// Advance the simulation and return the resulting snapshot
async fn post_tick(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    req: web::Json<TickRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let frames = req.frames.unwrap_or(1).min(MAX_FRAMES_PER_TICK);
    let dt = req.dt.unwrap_or(1.0);
    if !(dt.is_finite() && dt > 0.0) {
        return error(actix_web::http::StatusCode::BAD_REQUEST, format!("dt must be positive, got {}", dt));
    }
    with_session(&state, id, |s| {
        for _ in 0..frames {
            s.tick(dt);
        }
        HttpResponse::Ok().json(SessionResponse::of(id, s))
    })
}

/// DELETE /api/sessions/{id}
async fn delete_session(state: web::Data<AppState>, path: web::Path<u32>) -> impl Responder {
    let id = path.into_inner();
    let removed = match state.sessions.lock() {
        Ok(mut sessions) => sessions.remove(&id),
        Err(_) => {
            return error(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "session table unavailable");
        }
    };
    match removed {
        Some(mut session) => {
            session.teardown();
            tracing::info!("Deleted session {}", id);
            HttpResponse::NoContent().finish()
        }
        None => error(actix_web::http::StatusCode::NOT_FOUND, format!("Unknown session: {}", id)),
    }
}

/// GET /health
/// Health check endpoint
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "pong-session-api"
    }))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/api/sessions", web::post().to(create_session))
        .route("/api/sessions/{id}/snapshot", web::get().to(get_snapshot))
        .route("/api/sessions/{id}/intent", web::post().to(post_intent))
        .route("/api/sessions/{id}/tick", web::post().to(post_tick))
        .route("/api/sessions/{id}", web::delete().to(delete_session));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Pong Session API Server");

    let config = match std::env::var("PONG_CONFIG") {
        Ok(path) => GameConfig::load(&path).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{}: {}", path, e))
        })?,
        Err(_) => GameConfig::default(),
    };
    let state = web::Data::new(AppState::new(config));

    let bind_address = std::env::var("PONG_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    tracing::info!("Binding to {}", bind_address);

    HttpServer::new(move || {
        // Configure CORS to allow all origins
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_any_header()
            .max_age(86400);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(64 * 1024))
            .configure(routes)
    })
    .bind(bind_address)?
    .run()
    .await
}
