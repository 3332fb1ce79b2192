//! 请求提取器

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::{composer::Settings, names};

/// 从设置 Cookie 中读取已保存的 API Key 和模型，空值视为未设置
pub struct StoredSettings(pub Settings);

impl<S: Send + Sync> FromRequestParts<S> for StoredSettings {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let read = |name: &str| {
            jar.get(name)
                .map(|c| c.value().trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Ok(StoredSettings(Settings {
            api_key: read(names::API_KEY_COOKIE_NAME),
            model: read(names::MODEL_COOKIE_NAME),
        }))
    }
}
