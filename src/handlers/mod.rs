pub mod generate;
pub mod pages;
pub mod settings;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// 修改状态的请求必须由 htmx 发出
///
/// 跨站表单提交不会携带 `HX-Request` 头，设置 Cookie 因此无法被其他站点利用
pub async fn csrf_check(req: Request<Body>, next: Next) -> Response {
    let state_changing = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

    if state_changing.contains(req.method()) {
        let has_hx_request = req
            .headers()
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "true");

        if !has_hx_request {
            return (StatusCode::FORBIDDEN, "CSRF check failed").into_response();
        }
    }

    next.run(req).await
}
