use std::net::TcpListener;
use std::time::Duration;

use veritas_core::config::GenerationSettings;
use veritas_core::traits::Generator;
use veritas_llm::ollama::GenerateResponse;
use veritas_llm::{get_default_generator, OllamaGenerator};

#[test]
fn generate_request_wire_format() {
    let settings = GenerationSettings { url: "http://localhost:11434/".into(), ..GenerationSettings::default() };
    let generator = OllamaGenerator::new(&settings, None).expect("client");
    assert_eq!(generator.endpoint(), "http://localhost:11434/api/generate");

    let body = serde_json::to_value(generator.request_body("Question: ?")).expect("serialize");
    assert_eq!(body["model"], "mistral-small");
    assert_eq!(body["prompt"], "Question: ?");
    assert_eq!(body["stream"], false);
    assert_eq!(body["options"]["num_predict"], 256);
    assert!((body["options"]["temperature"].as_f64().unwrap() - 0.5).abs() < 1e-6);

    let parsed: GenerateResponse = serde_json::from_str(r#"{"model":"mistral-small","response":"  15 days. ","done":true}"#).expect("parse");
    assert_eq!(parsed.response, "  15 days. ");
}

#[test]
fn generate_deadline_expires() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let settings = GenerationSettings { url: format!("http://{}", listener.local_addr().expect("addr")), ..GenerationSettings::default() };
    let generator = OllamaGenerator::new(&settings, Some(Duration::from_millis(200))).expect("client");
    let err = generator.generate("hello").unwrap_err();
    assert!(format!("{err:#}").contains("deadline"), "unexpected error: {err:#}");
    drop(listener);
}

#[test]
fn default_generator_builds_from_settings() {
    let port = TcpListener::bind("127.0.0.1:0").expect("bind").local_addr().expect("addr").port();
    let settings = GenerationSettings { url: format!("http://127.0.0.1:{port}"), timeout_secs: Some(5), ..GenerationSettings::default() };
    let generator = get_default_generator(&settings).expect("generator");
    assert!(generator.generate("hello").is_err(), "nothing listens on the port");
}
