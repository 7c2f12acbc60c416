//! Achievement, project and notification endpoints

use super::{created, ok, AppState, Caller};
use crate::error::AppError;
use crate::profile::{AchievementList, NewAchievement, NewProject, Page, ProjectList, ProjectUpdate};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct NotificationQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub notification_ids: Vec<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/achievements")
            .route("", web::post().to(create_achievement))
            .route("/me", web::get().to(my_achievements))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_achievement))
                    .route(web::delete().to(delete_achievement)),
            ),
    )
    .service(
        web::scope("/projects")
            .route("", web::post().to(create_project))
            .route("/me", web::get().to(my_projects))
            .route("/{id}/endorse", web::post().to(endorse_project))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_project))
                    .route(web::patch().to(update_project))
                    .route(web::delete().to(delete_project)),
            ),
    )
    .service(
        web::scope("/notifications")
            .route("", web::get().to(list_notifications))
            .route("/mark-read", web::post().to(mark_notifications_read))
            .route("/unread-count", web::get().to(unread_count))
            .route("/{id}/read", web::patch().to(mark_notification_read))
            .route("/{id}", web::delete().to(delete_notification)),
    );
}

// ============================================================
// ACHIEVEMENTS
// ============================================================

async fn my_achievements(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let achievements = data.achievements.list_for_user(caller.id())?;
    Ok(ok(AchievementList::from(achievements)))
}

async fn create_achievement(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    body: web::Json<NewAchievement>,
) -> Result<HttpResponse, AppError> {
    let achievement = data.achievements.create(caller.id(), body.into_inner())?;
    Ok(created(achievement))
}

async fn get_achievement(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(data.achievements.get(&path, caller.id())?))
}

async fn delete_achievement(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    data.achievements.delete(&path, caller.id())?;
    Ok(HttpResponse::NoContent().finish())
}

// ============================================================
// PROJECTS
// ============================================================

async fn my_projects(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let projects = data.projects.list_for_user(caller.id())?;
    Ok(ok(ProjectList::from(projects)))
}

async fn create_project(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    body: web::Json<NewProject>,
) -> Result<HttpResponse, AppError> {
    let project = data.projects.create(caller.id(), body.into_inner())?;
    Ok(created(project))
}

/// Any signed-in user may view a project
async fn get_project(
    data: web::Data<Arc<AppState>>,
    _caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(data.projects.get(&path)?))
}

async fn update_project(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    path: web::Path<String>,
    body: web::Json<ProjectUpdate>,
) -> Result<HttpResponse, AppError> {
    let project = data.projects.update(&path, caller.id(), body.into_inner())?;
    Ok(ok(project))
}

async fn delete_project(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    data.projects.delete(&path, caller.id())?;
    Ok(HttpResponse::NoContent().finish())
}

async fn endorse_project(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(data.projects.endorse(&path, caller.id())?))
}

// ============================================================
// NOTIFICATIONS
// ============================================================

async fn list_notifications(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::new(query.skip, query.limit)?;
    Ok(ok(data.notifications.list(caller.id(), page)?))
}

async fn mark_notifications_read(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    body: web::Json<MarkReadRequest>,
) -> Result<HttpResponse, AppError> {
    let marked = data
        .notifications
        .mark_many_read(caller.id(), &body.notification_ids)?;
    Ok(ok(json!({ "marked_count": marked })))
}

async fn mark_notification_read(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(data.notifications.mark_read(&path, caller.id())?))
}

async fn delete_notification(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    data.notifications.delete(&path, caller.id())?;
    Ok(HttpResponse::NoContent().finish())
}

async fn unread_count(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let count = data.notifications.unread_count(caller.id())?;
    Ok(ok(json!({ "unread_count": count })))
}
