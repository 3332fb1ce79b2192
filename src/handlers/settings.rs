use axum::{
    extract::{Form, State},
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::post,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    composer::{Settings, SettingsForm},
    error::{AppError, ComposeError},
    extractors::StoredSettings,
    models::catalog,
    names, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::SETTINGS_URL, post(save_settings))
}

fn settings_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .build()
}

/// 保存 API Key 和模型
///
/// Key 输入框留空时沿用已保存的 Key，只改模型不会丢失登录状态；
/// (API Key, 模型) 变化时淘汰旧客户端
async fn save_settings(
    State(state): State<AppState>,
    StoredSettings(previous): StoredSettings,
    jar: CookieJar,
    Form(form): Form<SettingsForm>,
) -> Result<impl IntoResponse, AppError> {
    let trimmed = |v: Option<String>| v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let model = trimmed(form.model)
        .or_else(|| previous.model.clone())
        .unwrap_or_else(|| state.config.default_model.clone());
    if !catalog::is_supported(&model) {
        return Err(ComposeError::UnsupportedModel { model }.into());
    }

    let next = Settings {
        api_key: trimmed(form.api_key).or_else(|| previous.api_key.clone()),
        model: Some(model.clone()),
    };

    let default_model = &state.config.default_model;
    if let Some(next_key) = next.client_key(default_model) {
        let previous_key = previous.client_key(default_model);
        if state.registry().activate(previous_key.as_ref(), &next_key) {
            tracing::info!("🔑 设置已切换，旧客户端已淘汰 → {}", next_key);
        }
    }

    let secure = state.config.secure_cookies;
    let mut jar = jar.add(settings_cookie(names::MODEL_COOKIE_NAME, model, secure));
    if let Some(api_key) = next.api_key {
        jar = jar.add(settings_cookie(names::API_KEY_COOKIE_NAME, api_key, secure));
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        "HX-Redirect",
        HeaderValue::from_static(names::safe_return_url(form.return_to.as_deref())),
    );

    Ok((jar, headers, ""))
}
