// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use postgrab::domain::models::post::PostRecord;
use postgrab::infrastructure::storage::ResultPersister;
use serde_json::json;

#[tokio::test]
async fn test_persist_extracted_record_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results").join("results.json");

    let payload = json!({
        "data": {
            "tweetResult": {
                "result": {
                    "__typename": "Tweet",
                    "rest_id": "1812345678901234567",
                    "core": { "user_results": { "result": { "legacy": { "screen_name": "facil_pay" } } } },
                    "legacy": {
                        "full_text": "Pagá fácil con código QR 📱",
                        "lang": "es",
                        "retweet_count": 2
                    }
                }
            }
        }
    });
    let expected = payload["data"]["tweetResult"]["result"].clone();

    let mut record = PostRecord::from_response(payload).unwrap();
    record.set_translation("Pay easily with a QR code 📱".to_string());

    ResultPersister::new().persist(&record, &output).await.unwrap();

    let raw = std::fs::read_to_string(&output).unwrap();
    assert!(raw.contains("Pagá fácil con código QR 📱"));

    let saved: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(saved["rest_id"], expected["rest_id"]);
    assert_eq!(saved["core"], expected["core"]);
    assert_eq!(saved["legacy"]["full_text"], expected["legacy"]["full_text"]);
    assert_eq!(
        saved["legacy"]["translated_text"],
        "Pay easily with a QR code 📱"
    );
}
