//! HTTP tests for the mentorship endpoints

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use career_platform::config::{AppConfig, MenteeCountMode};
use serde_json::{json, Value};

const USER: &str = "X-User-Id";

#[actix_rt::test]
async fn test_mentorship_walkthrough() {
    let state = common::state();
    let mentor = common::register(&state, "Mia Mentor", &[("Go", 8)]);
    let mentee_a = common::register(&state, "Ann Mentee", &[]);
    let mentee_b = common::register(&state, "Ben Mentee", &[]);
    let app = init_app!(state);

    // A requests mentorship from M
    let req = test::TestRequest::post()
        .uri("/api/v1/mentorships")
        .insert_header((USER, mentee_a.as_str()))
        .set_json(json!({ "mentor_id": mentor, "skill_focus": "Go" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["mentee_id"], mentee_a.as_str());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // B discovers M with one mentee
    let req = test::TestRequest::get()
        .uri("/api/v1/mentorships/available-mentors?skill_focus=Go")
        .insert_header((USER, mentee_b.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let mentors = body["data"].as_array().unwrap();
    assert_eq!(mentors.len(), 1);
    assert_eq!(mentors[0]["id"], mentor.as_str());
    assert_eq!(mentors[0]["current_mentees_count"], 1);
    assert_eq!(mentors[0]["expertise_skills"], json!(["Go"]));

    // M accepts
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/mentorships/{}", id))
        .insert_header((USER, mentor.as_str()))
        .set_json(json!({ "status": "accepted" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "accepted");

    // B is not a participant
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/mentorships/{}", id))
        .insert_header((USER, mentee_b.as_str()))
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    // A cancels, after which the record is gone
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/mentorships/{}", id))
        .insert_header((USER, mentee_a.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/mentorships/{}", id))
        .insert_header((USER, mentee_a.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_lists_by_role() {
    let state = common::state();
    let mentor = common::register(&state, "Mia Mentor", &[("Go", 8)]);
    let mentee = common::register(&state, "Ann Mentee", &[]);
    state.mentorships.create(&mentor, &mentee, "Go").unwrap();
    let app = init_app!(state);

    for (caller, path, expected) in [
        (&mentor, "mentees", 1),
        (&mentor, "mentors", 0),
        (&mentee, "mentors", 1),
        (&mentee, "mentees", 0),
    ] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/mentorships/{}", path))
            .insert_header((USER, caller.as_str()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["total_count"], expected, "{} as {}", caller, path);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), expected);
    }

    // The mentor sees who they mentor, the mentee sees who mentors them
    let req = test::TestRequest::get()
        .uri("/api/v1/mentorships/mentees")
        .insert_header((USER, mentor.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["items"][0]["mentee_id"], mentee.as_str());

    let req = test::TestRequest::get()
        .uri("/api/v1/mentorships/mentors")
        .insert_header((USER, mentee.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["items"][0]["mentor_id"], mentor.as_str());
}

#[actix_rt::test]
async fn test_illegal_transition_is_unprocessable() {
    let state = common::state();
    let mentor = common::register(&state, "Mia Mentor", &[("Go", 8)]);
    let mentee = common::register(&state, "Ann Mentee", &[]);
    let m = state.mentorships.create(&mentor, &mentee, "Go").unwrap();
    let app = init_app!(state);

    let patch = |status: &str| {
        test::TestRequest::patch()
            .uri(&format!("/api/v1/mentorships/{}", m.id))
            .insert_header((USER, mentor.as_str()))
            .set_json(json!({ "status": status }))
            .to_request()
    };

    let resp = test::call_service(&app, patch("completed")).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    let resp = test::call_service(&app, patch("archived")).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Declined is terminal: cancelling it is rejected too
    let resp = test::call_service(&app, patch("declined")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/mentorships/{}", m.id))
        .insert_header((USER, mentee.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_create_validation() {
    let state = common::state();
    let mentee = common::register(&state, "Ann Mentee", &[]);
    let app = init_app!(state);

    let create = |body: Value| {
        test::TestRequest::post()
            .uri("/api/v1/mentorships")
            .insert_header((USER, mentee.as_str()))
            .set_json(body)
            .to_request()
    };

    let resp = test::call_service(&app, create(json!({ "mentor_id": mentee, "skill_focus": "Go" }))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(&app, create(json!({ "mentor_id": "ghost", "skill_focus": "Go" }))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, create(json!({ "mentor_id": "ghost" }))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let req = test::TestRequest::get()
        .uri("/api/v1/mentorships/available-mentors")
        .insert_header((USER, mentee.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_identity_is_required() {
    let state = common::state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/v1/mentorships/mentees").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let req = test::TestRequest::get()
        .uri("/api/v1/mentorships/mentees")
        .insert_header((USER, "nobody"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_conceal_mode_hides_foreign_mentorships() {
    let state = common::state_with(AppConfig {
        conceal_foreign_mentorships: true,
        ..AppConfig::default()
    });
    let mentor = common::register(&state, "Mia Mentor", &[("Go", 8)]);
    let mentee = common::register(&state, "Ann Mentee", &[]);
    let stranger = common::register(&state, "Sam Stranger", &[]);
    let m = state.mentorships.create(&mentor, &mentee, "Go").unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/mentorships/{}", m.id))
        .insert_header((USER, stranger.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The mentee still gets 403 for a mentor-only action
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/mentorships/{}", m.id))
        .insert_header((USER, mentee.as_str()))
        .set_json(json!({ "status": "accepted" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_active_count_mode() {
    let state = common::state_with(AppConfig {
        mentee_count_mode: MenteeCountMode::ActiveOnly,
        ..AppConfig::default()
    });
    let mentor = common::register(&state, "Mia Mentor", &[("Go", 8)]);
    let a = common::register(&state, "Ann Mentee", &[]);
    let b = common::register(&state, "Ben Mentee", &[]);
    let seeker = common::register(&state, "Sue Seeker", &[]);

    state.mentorships.create(&mentor, &a, "Go").unwrap();
    let declined = state.mentorships.create(&mentor, &b, "Go").unwrap();
    state
        .mentorships
        .update_status(&declined.id, career_platform::mentorship::MentorshipStatus::Declined, &mentor)
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/mentorships/available-mentors?skill_focus=Go")
        .insert_header((USER, seeker.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["current_mentees_count"], 1);
}

#[actix_rt::test]
async fn test_requests_notify_the_mentor() {
    let state = common::state();
    let mentor = common::register(&state, "Mia Mentor", &[("Go", 8)]);
    let mentee = common::register(&state, "Ann Mentee", &[]);
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/mentorships")
        .insert_header((USER, mentee.as_str()))
        .set_json(json!({ "mentor_id": mentor, "skill_focus": "Go" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications/unread-count")
        .insert_header((USER, mentor.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["unread_count"], 1);
}
