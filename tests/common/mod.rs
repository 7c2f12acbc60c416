//! Shared helpers for the HTTP integration tests
#![allow(dead_code)]

use career_platform::config::AppConfig;
use career_platform::directory::{NewUser, Skill};
use career_platform::AppState;
use std::sync::Arc;

/// Build the full application service around a shared state
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(career_platform::configure),
        )
        .await
    };
}

pub fn state_with(config: AppConfig) -> Arc<AppState> {
    Arc::new(AppState::new(&config).expect("in-memory state"))
}

pub fn state() -> Arc<AppState> {
    state_with(AppConfig::default())
}

/// Register a user directly and attach skills; returns the user id
pub fn register(state: &AppState, name: &str, skills: &[(&str, u8)]) -> String {
    let user = state
        .users
        .register(NewUser {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            title: Some("Engineer".to_string()),
            ..Default::default()
        })
        .expect("register user");

    for (skill, level) in skills {
        state
            .users
            .add_skill(&user.id, Skill::new(skill, *level, "Engineering"))
            .expect("add skill");
    }
    user.id
}
