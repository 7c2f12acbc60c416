//! Web API Module
//!
//! RESTful JSON endpoints under `/api/v1`. Every route except registration and
//! the health check requires the caller's id in the `X-User-Id` header.

pub mod mentorship;
pub mod profile;
pub mod users;

use crate::config::AppConfig;
use crate::db::{Database, StoreResult};
use crate::directory::{SqliteUserDirectory, User, UserDirectory};
use crate::error::{AppError, ErrorDetail};
use crate::mentorship::{AccessPolicy, MentorDirectory, MentorshipManager, SqliteMentorshipStore};
use crate::profile::{AchievementStore, NotificationStore, ProjectStore, SettingsStore};
use actix_cors::Cors;
use actix_web::dev::Payload;
use actix_web::middleware::Logger;
use actix_web::{web, App, FromRequest, HttpRequest, HttpResponse, HttpServer};
use serde::Serialize;
use std::future::{ready, Ready};
use std::sync::Arc;

/// Header carrying the authenticated caller's user id
pub const USER_ID_HEADER: &str = "X-User-Id";

// ============================================================
// APPLICATION STATE
// ============================================================

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub users: Arc<SqliteUserDirectory>,
    pub mentorships: MentorshipManager,
    pub mentors: MentorDirectory,
    pub achievements: AchievementStore,
    pub projects: ProjectStore,
    pub notifications: NotificationStore,
    pub settings: SettingsStore,
}

impl AppState {
    pub fn new(config: &AppConfig) -> StoreResult<Self> {
        let db = if config.is_in_memory() {
            Database::in_memory()?
        } else {
            Database::open(&config.database_path)?
        };
        Ok(Self::with_database(db, config))
    }

    pub fn with_database(db: Database, config: &AppConfig) -> Self {
        let users = Arc::new(SqliteUserDirectory::new(db.clone()));
        let store = Arc::new(SqliteMentorshipStore::new(db.clone()));

        Self {
            mentorships: MentorshipManager::new(
                store.clone(),
                users.clone(),
                AccessPolicy {
                    conceal_foreign: config.conceal_foreign_mentorships,
                },
            ),
            mentors: MentorDirectory::new(users.clone(), store, config.mentee_count_mode),
            achievements: AchievementStore::new(db.clone()),
            projects: ProjectStore::new(db.clone()),
            notifications: NotificationStore::new(db.clone()),
            settings: SettingsStore::new(db.clone()),
            users,
            db,
        }
    }
}

// ============================================================
// RESPONSE ENVELOPE
// ============================================================

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorDetail>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(detail: ErrorDetail) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(detail),
        }
    }
}

pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(data))
}

pub(crate) fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::success(data))
}

// ============================================================
// CALLER IDENTITY
// ============================================================

/// The registered user named by the `X-User-Id` header
pub struct Caller(pub User);

impl Caller {
    pub fn id(&self) -> &str {
        &self.0.id
    }
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(resolve_caller(req))
    }
}

fn resolve_caller(req: &HttpRequest) -> Result<Caller, AppError> {
    let state = req
        .app_data::<web::Data<Arc<AppState>>>()
        .ok_or_else(|| AppError::Internal("application state is not registered".to_string()))?;

    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", USER_ID_HEADER)))?;

    let user = state
        .users
        .get(user_id)?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

    Ok(Caller(user))
}

// ============================================================
// ROUTING
// ============================================================

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid request body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid query string: {}", err)).into()
    })
}

/// Health check endpoint
async fn health_check(data: web::Data<Arc<AppState>>) -> HttpResponse {
    let database = match data.db.ping() {
        Ok(()) => "ok",
        Err(e) => {
            log::error!("[API] Health check failed: {}", e);
            "unavailable"
        }
    };

    let body = serde_json::json!({
        "status": if database == "ok" { "healthy" } else { "degraded" },
        "service": "Career Platform API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    });

    if database == "ok" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

/// Register every route. Expects `web::Data<Arc<AppState>>` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api/v1")
            .app_data(json_config())
            .app_data(query_config())
            .configure(users::configure)
            .configure(mentorship::configure)
            .configure(profile::configure),
    );
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = if origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allow_any_method().allow_any_header()
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let state = Arc::new(
        AppState::new(&config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?,
    );

    log::info!(
        "[API] Career Platform API starting at http://{}:{} (database: {})",
        config.host,
        config.port,
        config.database_path.display()
    );
    log::info!(
        "[API] Mentee count mode: {:?}, conceal foreign mentorships: {}",
        config.mentee_count_mode,
        config.conceal_foreign_mentorships
    );

    let origins = config.cors_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&origins))
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
