use question_studio::composer::{Composer, Settings, TopicForm, VideoForm};
use question_studio::config::Config;
use question_studio::logger;
use question_studio::render::{markdown::blocks_to_markdown, render_result_set};
use question_studio::services::LlmEngineFactory;
use question_studio::AppState;
use std::sync::Arc;

fn live_state() -> (AppState, Settings) {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env().expect("加载配置失败");

    let api_key = std::env::var("GOOGLE_API_KEY").expect("需要设置 GOOGLE_API_KEY");
    let settings = Settings {
        api_key: Some(api_key),
        model: Some(config.default_model.clone()),
    };

    let factory = LlmEngineFactory::new(&config).expect("初始化客户端工厂失败");
    (AppState::new(config, Arc::new(factory)), settings)
}

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：GOOGLE_API_KEY=... cargo test -- --ignored
async fn test_generate_topic_questions() {
    let (state, settings) = live_state();
    let composer: &Composer = &state.composer;

    let key = composer
        .resolve_key(None, None, &settings)
        .expect("缺少 API Key");
    let composed = composer
        .topic(TopicForm {
            topic: Some("Solar System".to_string()),
            count: Some("3".to_string()),
            question_type: Some("multiple_choice".to_string()),
            ..Default::default()
        })
        .expect("表单校验失败");

    let results = state.flow.run(&key, composed).await.expect("生成失败");
    assert!(!results.is_empty(), "应该生成至少一道题");

    let markdown = blocks_to_markdown(&render_result_set(Some(&results)));
    println!("{}", markdown);
    assert!(markdown.contains("### Question 1:"));
}

#[tokio::test]
#[ignore]
async fn test_generate_video_questions() {
    let (state, settings) = live_state();

    let key = state
        .composer
        .resolve_key(None, None, &settings)
        .expect("缺少 API Key");
    let composed = state
        .composer
        .video(VideoForm {
            url: Some("https://www.youtube.com/watch?v=libKVRa01L8".to_string()),
            count: Some("2".to_string()),
            ..Default::default()
        })
        .expect("表单校验失败");

    let results = state.flow.run(&key, composed).await.expect("生成失败");
    assert!(!results.is_empty(), "应该生成至少一道题");
}
