//! User profile, skill and settings endpoints

use super::{created, ok, AppState, Caller};
use crate::directory::{NewUser, Skill};
use crate::error::AppError;
use crate::profile::{NotificationSettings, PrivacySettings};
use actix_web::{web, HttpResponse};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(register_user))
            .route("/me", web::get().to(get_me))
            .route("/me/skills", web::post().to(add_skill))
            .route("/settings", web::get().to(get_settings))
            .route("/settings/notifications", web::patch().to(update_notification_settings))
            .route("/settings/privacy", web::patch().to(update_privacy_settings)),
    );
}

/// Register a new user (no identity required)
async fn register_user(
    data: web::Data<Arc<AppState>>,
    body: web::Json<NewUser>,
) -> Result<HttpResponse, AppError> {
    let user = data.users.register(body.into_inner())?;
    Ok(created(user))
}

async fn get_me(caller: Caller) -> HttpResponse {
    ok(caller.0)
}

/// Add or replace one of the caller's skills
async fn add_skill(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    body: web::Json<Skill>,
) -> Result<HttpResponse, AppError> {
    let user = data.users.add_skill(caller.id(), body.into_inner())?;
    Ok(created(user))
}

async fn get_settings(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    Ok(ok(data.settings.get(caller.id())?))
}

async fn update_notification_settings(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    body: web::Json<NotificationSettings>,
) -> Result<HttpResponse, AppError> {
    let saved = data.settings.set_notifications(caller.id(), body.into_inner())?;
    Ok(ok(saved))
}

async fn update_privacy_settings(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    body: web::Json<PrivacySettings>,
) -> Result<HttpResponse, AppError> {
    let saved = data.settings.set_privacy(caller.id(), body.into_inner())?;
    Ok(ok(saved))
}
