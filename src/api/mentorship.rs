//! Mentorship endpoints

use super::{created, ok, AppState, Caller};
use crate::error::AppError;
use crate::mentorship::lifecycle::parse_status;
use crate::mentorship::{MentorshipList, MentorshipStatus};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CreateMentorshipRequest {
    pub mentor_id: String,
    pub skill_focus: String,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct AvailableMentorsQuery {
    pub skill_focus: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/mentorships")
            .route("", web::post().to(create_mentorship))
            .route("/mentees", web::get().to(list_my_mentees))
            .route("/mentors", web::get().to(list_my_mentors))
            .route("/available-mentors", web::get().to(available_mentors))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_mentorship))
                    .route(web::patch().to(update_status))
                    .route(web::delete().to(cancel_mentorship)),
            ),
    );
}

/// The caller's mentees: relationships where the caller is the mentor
async fn list_my_mentees(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let items = data.mentorships.list_for_user(caller.id(), false)?;
    Ok(ok(MentorshipList::from(items)))
}

/// The caller's mentors: relationships where the caller is the mentee
async fn list_my_mentors(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let items = data.mentorships.list_for_user(caller.id(), true)?;
    Ok(ok(MentorshipList::from(items)))
}

async fn available_mentors(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    query: web::Query<AvailableMentorsQuery>,
) -> Result<HttpResponse, AppError> {
    let skill_focus = query.skill_focus.as_deref().unwrap_or("");
    let mentors = data.mentors.get_available_mentors(skill_focus, caller.id())?;
    Ok(ok(mentors))
}

async fn create_mentorship(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    body: web::Json<CreateMentorshipRequest>,
) -> Result<HttpResponse, AppError> {
    let mentorship = data
        .mentorships
        .create(&body.mentor_id, caller.id(), &body.skill_focus)?;

    notify(
        &data,
        &mentorship.mentor_id,
        "New mentorship request",
        &format!(
            "{} asked you to mentor them in {}",
            caller.0.full_name, mentorship.skill_focus
        ),
    );

    Ok(created(mentorship))
}

async fn get_mentorship(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mentorship = data.mentorships.get(&path, caller.id())?;
    Ok(ok(mentorship))
}

async fn update_status(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let status = parse_status(&body.status)?;
    let mentorship = data.mentorships.update_status(&path, status, caller.id())?;

    let title = match mentorship.status {
        MentorshipStatus::Accepted => "Mentorship accepted",
        MentorshipStatus::Declined => "Mentorship declined",
        MentorshipStatus::Completed => "Mentorship completed",
        MentorshipStatus::Cancelled => "Mentorship cancelled",
        MentorshipStatus::Pending => "Mentorship updated",
    };
    notify(
        &data,
        &mentorship.mentee_id,
        title,
        &format!("Your {} mentorship is now {}", mentorship.skill_focus, mentorship.status),
    );

    Ok(ok(mentorship))
}

/// Cancel and remove a live mentorship
async fn cancel_mentorship(
    data: web::Data<Arc<AppState>>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    data.mentorships.cancel(&path, caller.id())?;
    Ok(HttpResponse::NoContent().finish())
}

/// Best effort: a failed notification never fails the mentorship operation
fn notify(data: &AppState, user_id: &str, title: &str, message: &str) {
    if let Err(e) = data.notifications.create(user_id, "mentorship", title, message) {
        log::warn!("[API] Failed to notify {}: {}", user_id, e);
    }
}
