//! `GET /`: service greeting.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

pub async fn welcome(State(ctx): State<ApiContext>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: format!("Welcome to {} API", ctx.project_name),
    })
}
