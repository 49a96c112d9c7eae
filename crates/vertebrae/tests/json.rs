//! Body pass-through: the transport delivers handler text unmodified and
//! leaves parsing to the request layer.

mod common;
use common::*;

use serde::Deserialize;
use vertebrae::{Request, RequestError, StatusText};

#[derive(Debug, Deserialize)]
struct Record {
    id: i64,
    test: String,
}

#[tokio::test(start_paused = true)]
async fn valid_json() {
    let client = json_client();
    let record: Record = client.get_json("/valid.json").await.unwrap();
    assert_eq!(record.id, 0);
    assert_eq!(record.test, "None");
}

#[tokio::test(start_paused = true)]
async fn valid_json_body_is_exact() {
    let client = json_client();
    let completion = client
        .transport()
        .fetch(Request::get("/valid.json"))
        .await
        .unwrap();

    assert_eq!(completion.status(), 200);
    assert_eq!(completion.status_text(), StatusText::Success);
    assert_eq!(
        completion.payload().unwrap().response_text,
        r#"{ "id": 0, "test": "None"}"#
    );
}

#[tokio::test(start_paused = true)]
async fn invalid_json_is_a_parse_error() {
    let client = json_client();
    let err = client.get_json::<Record>("/invalid.json").await.unwrap_err();
    assert!(matches!(err, RequestError::Parse(_)), "got {err:?}");
    assert!(err.to_string().starts_with("parsererror"));
}

#[tokio::test(start_paused = true)]
async fn invalid_json_is_still_delivered() {
    let client = json_client();
    let response = client.get("/invalid.json").await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"{ id: 0, test: "None"}"#);
}
