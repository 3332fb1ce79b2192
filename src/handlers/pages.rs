use axum::{extract::State, routing::get, Router};
use maud::Markup;

use crate::{extractors::StoredSettings, models::Mode, names, views, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::TOPIC_URL, get(topic_page))
        .route(names::IMAGE_URL, get(image_page))
        .route(names::DOCUMENT_URL, get(document_page))
        .route(names::VIDEO_URL, get(video_page))
        .route(names::HEALTH_URL, get(health))
}

async fn topic_page(
    State(state): State<AppState>,
    StoredSettings(settings): StoredSettings,
) -> Markup {
    views::mode_page(Mode::Topic, &settings, &state.config.default_model)
}

async fn image_page(
    State(state): State<AppState>,
    StoredSettings(settings): StoredSettings,
) -> Markup {
    views::mode_page(Mode::Image, &settings, &state.config.default_model)
}

async fn document_page(
    State(state): State<AppState>,
    StoredSettings(settings): StoredSettings,
) -> Markup {
    views::mode_page(Mode::Document, &settings, &state.config.default_model)
}

async fn video_page(
    State(state): State<AppState>,
    StoredSettings(settings): StoredSettings,
) -> Markup {
    views::mode_page(Mode::Video, &settings, &state.config.default_model)
}

async fn health() -> &'static str {
    "OK"
}
