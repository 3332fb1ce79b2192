use axum::{
    extract::{Form, Multipart, State},
    routing::post,
    Router,
};
use maud::Markup;

use crate::{
    composer::{DocumentForm, ImageForm, MultipartForm, Settings, TopicForm, VideoForm},
    error::AppError,
    extractors::StoredSettings,
    infrastructure::ClientKey,
    models::Upload,
    names, views, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::GENERATE_TOPIC_URL, post(generate_topic))
        .route(names::GENERATE_DOCUMENT_URL, post(generate_document))
        .route(names::GENERATE_VIDEO_URL, post(generate_video))
        .route(names::SOLVE_IMAGE_URL, post(solve_image))
}

/// 确定本次使用的 (API Key, 模型)，并淘汰会话之前用过的客户端
///
/// 在一切校验之前执行：缺少 API Key 时直接拦截，不会触碰引擎
fn activate_key(
    state: &AppState,
    form_key: Option<&str>,
    form_model: Option<&str>,
    settings: &Settings,
) -> Result<ClientKey, AppError> {
    let key = state.composer.resolve_key(form_key, form_model, settings)?;
    let previous = settings.client_key(&state.config.default_model);
    if state.registry().activate(previous.as_ref(), &key) {
        tracing::info!("🔑 会话改用 {}，旧客户端已淘汰", key);
    }
    Ok(key)
}

async fn generate_topic(
    State(state): State<AppState>,
    StoredSettings(settings): StoredSettings,
    Form(form): Form<TopicForm>,
) -> Result<Markup, AppError> {
    let key = activate_key(&state, form.api_key.as_deref(), form.model.as_deref(), &settings)?;
    let composed = state.composer.topic(form)?;
    let results = state.flow.run(&key, composed).await?;
    Ok(views::questions_fragment(&results))
}

async fn generate_video(
    State(state): State<AppState>,
    StoredSettings(settings): StoredSettings,
    Form(form): Form<VideoForm>,
) -> Result<Markup, AppError> {
    let key = activate_key(&state, form.api_key.as_deref(), form.model.as_deref(), &settings)?;
    let composed = state.composer.video(form)?;
    let results = state.flow.run(&key, composed).await?;
    Ok(views::questions_fragment(&results))
}

async fn generate_document(
    State(state): State<AppState>,
    StoredSettings(settings): StoredSettings,
    multipart: Multipart,
) -> Result<Markup, AppError> {
    let form: DocumentForm = read_multipart(multipart).await?;
    let key = activate_key(&state, form.api_key.as_deref(), form.model.as_deref(), &settings)?;
    let composed = state.composer.document(form)?;
    let results = state.flow.run(&key, composed).await?;
    Ok(views::questions_fragment(&results))
}

async fn solve_image(
    State(state): State<AppState>,
    StoredSettings(settings): StoredSettings,
    multipart: Multipart,
) -> Result<Markup, AppError> {
    let form: ImageForm = read_multipart(multipart).await?;
    let key = activate_key(&state, form.api_key.as_deref(), form.model.as_deref(), &settings)?;
    let composed = state.composer.image(form)?;
    let solution = state.flow.solve(&key, composed).await?;
    Ok(views::solution_fragment(&solution))
}

/// 把 multipart 字段读入表单
///
/// 浏览器对未选择文件的输入框会提交空文件名，这类字段直接跳过
async fn read_multipart<F: MultipartForm>(mut multipart: Multipart) -> Result<F, AppError> {
    let mut form = F::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field.bytes().await?;
                if !file_name.trim().is_empty() {
                    form.set_file(&name, Upload::new(file_name, bytes.to_vec()));
                }
            }
            None => {
                let text = field.text().await?;
                form.set_text(&name, text);
            }
        }
    }

    Ok(form)
}
