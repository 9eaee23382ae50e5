// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use postgrab::infrastructure::translation::{GoogleTranslator, TextTranslator};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_translate_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("tl", "es"))
        .and(query_param("sl", "auto"))
        .and(query_param("q", "hello"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([[["hola", "hello", null, null, 10]], null, "en"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let translator = GoogleTranslator::new(server.uri());
    assert_eq!(translator.translate("hello", "es").await, "hola");
}

#[tokio::test]
async fn test_translate_provider_error_yields_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    let translator = GoogleTranslator::new(server.uri());
    assert_eq!(translator.translate("hello", "es").await, "");
}

#[tokio::test]
async fn test_translate_malformed_body_yields_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&server)
        .await;

    let translator = GoogleTranslator::new(server.uri());
    assert_eq!(translator.translate("hello", "es").await, "");
}

#[tokio::test]
async fn test_blank_text_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([[["x", " ", null, null, 10]], null, "en"])),
        )
        .expect(0)
        .mount(&server)
        .await;

    let translator = GoogleTranslator::new(server.uri());
    assert_eq!(translator.translate("", "es").await, "");
    assert_eq!(translator.translate("  \n ", "es").await, "");
}

#[tokio::test]
async fn test_translate_unreachable_provider_yields_empty_string() {
    // nothing listens on the discard port
    let translator = GoogleTranslator::new("http://127.0.0.1:9");
    assert_eq!(translator.translate("hello", "es").await, "");
}
