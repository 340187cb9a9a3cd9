use epic_postcard::{
    ai::{GeneratorFactory, ImageTextGenerator, ScriptedGenerator},
    error::{AdapterError, ErrorKind},
    generation::{Orchestrator, RetryPolicy},
    models::{GenerationConfig, GenerationRequest, GenerationResult, MockSettings, Postcard},
    prompts,
};
use std::time::Duration;
use tokio::time::Instant;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_orchestrator() -> Orchestrator {
    Orchestrator::new(MockSettings {
        latency: Duration::ZERO,
        seed: Some(3),
    })
    .with_retry_policy(RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(2),
        max_delay: Duration::from_millis(10),
    })
}

fn config_for(provider: &str, server: &MockServer) -> GenerationConfig {
    GenerationConfig {
        provider_id: Some(provider.to_string()),
        api_key: Some("sk-test".to_string()),
        base_url: Some(server.uri()),
    }
}

#[tokio::test(start_paused = true)]
async fn test_demo_mode_end_to_end() {
    let orchestrator = Orchestrator::new(MockSettings::default());
    let request = GenerationRequest::new("Ada Lovelace", "Engineer", vec![0x89, 0x50, 0x4E, 0x47]);

    let started = Instant::now();
    let generation = orchestrator
        .generate(&request, &GenerationConfig::demo())
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(generation.provider, "mock");
    assert!(!generation.result.image_url.is_empty());
    assert!(generation.result.description.contains("Ada Lovelace"));
    assert!(generation.result.description.contains("Engineer"));

    let postcard = Postcard::new(&request, generation.result);
    let message = prompts::build_share_message(
        &postcard.name,
        &postcard.profession,
        &postcard.description,
        &postcard.image_url,
    );
    assert_eq!(message.split("\n\n").count(), 5);
}

#[tokio::test]
async fn test_openai_through_orchestrator() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "url": "https://cdn.example.com/hero.png" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Ada Lovelace inspira." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new("Ada Lovelace", "Analista de Datos", vec![0xFF, 0xD8, 0xFF]);
    let generation = fast_orchestrator()
        .generate(&request, &config_for("openai", &server))
        .await
        .unwrap();

    assert_eq!(generation.provider, "openai");
    assert_eq!(
        generation.result,
        GenerationResult {
            image_url: "https://cdn.example.com/hero.png".to_string(),
            description: "Ada Lovelace inspira.".to_string(),
        }
    );
}

#[tokio::test]
async fn test_stability_through_orchestrator_retries_server_errors() {
    let server = MockServer::start().await;

    // Both tiers fail on the first attempt, then image-to-image recovers.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/generation/stable-diffusion-xl-1024-v1-0/image-to-image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "artifacts": [{ "base64": "QUJD", "finishReason": "SUCCESS" }]
        })))
        .mount(&server)
        .await;

    let request = GenerationRequest::new("Grace Hopper", "Programadora", vec![0x89, 0x50, 0x4E, 0x47]);
    let generation = fast_orchestrator()
        .generate(&request, &config_for("stability", &server))
        .await
        .unwrap();

    assert_eq!(generation.provider, "stability");
    assert_eq!(generation.failure_count, 1);
    assert_eq!(generation.result.image_url, "data:image/png;base64,QUJD");
    assert!(generation.result.description.contains("Grace Hopper"));
}

#[tokio::test]
async fn test_rejected_key_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_api_key"))
        .mount(&server)
        .await;

    let request = GenerationRequest::new("Ada Lovelace", "Engineer", vec![]);
    let err = fast_orchestrator()
        .generate(&request, &config_for("openai", &server))
        .await
        .unwrap_err();

    assert_eq!(err.adapter_kind(), Some(ErrorKind::Auth));
    assert!(!err.to_string().contains("401"));

    // At most the image and text request of the single attempt
    let received = server.received_requests().await.unwrap();
    assert!(!received.is_empty() && received.len() <= 2);
}

#[tokio::test]
async fn test_unknown_provider_falls_back_to_mock() {
    let request = GenerationRequest::new("Ada Lovelace", "Engineer", vec![]);
    let config = GenerationConfig {
        provider_id: Some("not-a-provider".to_string()),
        api_key: Some("sk-test".to_string()),
        base_url: None,
    };

    let generation = fast_orchestrator().generate(&request, &config).await.unwrap();
    assert_eq!(generation.provider, "mock");

    let err = GeneratorFactory::default()
        .create("not-a-provider", "sk-test", None)
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Unknown);
}

#[tokio::test]
async fn test_scripted_retry_sequence() {
    let scripted = ScriptedGenerator::new()
        .with_error(AdapterError::RateLimit("slow down".to_string()))
        .with_error(AdapterError::InvalidResponse("garbage".to_string()));

    let request = GenerationRequest::new("José Núñez", "Chef", vec![]);
    let generation = fast_orchestrator()
        .generate_with(&request, || scripted.clone())
        .await
        .unwrap();

    assert_eq!(generation.failure_count, 2);
    assert_eq!(scripted.get_call_count(), 3);
    assert!(generation.result.description.contains("José Núñez"));
    assert_eq!(scripted.name(), "scripted");
}
