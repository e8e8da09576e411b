//! Tests for mood tracker handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::Role;
use crate::inbound::http::test_utils::{bearer, test_app};
use crate::test_support::Harness;

async fn post_mood(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    token: &str,
    body: Value,
) -> actix_web::dev::ServiceResponse {
    let req = actix_test::TestRequest::post()
        .uri("/api/mood-tracker")
        .insert_header(bearer(token))
        .set_json(body)
        .to_request();
    actix_test::call_service(app, req).await
}

#[actix_web::test]
async fn recording_derives_tone_and_energy() {
    let harness = Harness::new();
    let (user, token) = harness.seed_user("amara", Role::User).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let res = post_mood(
        &app,
        &token,
        json!({"mood": "anxious", "reason": "  exam tomorrow  ", "timestamp": "2026-03-01T09:30:00+01:00"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["mood"], "Anxious");
    assert_eq!(body["mood_tone"], "negative");
    assert_eq!(body["mood_energy"], "high");
    assert_eq!(body["cause"], "exam tomorrow");
    assert_eq!(body["timestamp"], "2026-03-01T08:30:00+00:00");
    assert_eq!(body["user_id"], user.id.to_string());
}

#[rstest]
#[case::missing_mood(json!({"cause": "x"}), "mood")]
#[case::unknown_mood(json!({"mood": "Hangry"}), "mood")]
#[case::long_cause(json!({"mood": "Calm", "cause": "x".repeat(501)}), "cause")]
#[case::bad_timestamp(json!({"mood": "Calm", "timestamp": "yesterday"}), "timestamp")]
#[actix_web::test]
async fn invalid_entries_are_rejected(#[case] body: Value, #[case] field: &str) {
    let harness = Harness::new();
    let (_, token) = harness.seed_user("amara", Role::User).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let res = post_mood(&app, &token, body).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(res).await;
    assert_eq!(payload["details"]["field"], field);
}

#[actix_web::test]
async fn history_is_private_and_newest_first() {
    let harness = Harness::new();
    let (_, amara) = harness.seed_user("amara", Role::User).await;
    let (_, bola) = harness.seed_user("bola", Role::User).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    for (mood, at) in [
        ("Calm", "2026-03-01T08:00:00Z"),
        ("Tired", "2026-03-02T08:00:00Z"),
        ("Joyful", "2026-03-03T08:00:00Z"),
    ] {
        let res = post_mood(&app, &amara, json!({"mood": mood, "timestamp": at})).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }
    post_mood(&app, &bola, json!({"mood": "Bored"})).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/mood-tracker?limit=2")
        .insert_header(bearer(&amara))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    let moods: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|entry| entry["mood"].as_str())
        .collect();
    assert_eq!(moods, ["Joyful", "Tired"]);
}

#[actix_web::test]
async fn stats_and_spiral_summarise_recent_entries() {
    let harness = Harness::new();
    let (_, token) = harness.seed_user("amara", Role::User).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    for mood in ["Calm", "Anxious", "Tired", "Anxious"] {
        post_mood(&app, &token, json!({"mood": mood})).await;
    }

    let req = actix_test::TestRequest::get()
        .uri("/api/mood-tracker/stats")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["days"], 30);
    assert_eq!(body["totalEntries"], 4);
    assert_eq!(
        body["stats"][0],
        json!({"mood": "Anxious", "count": 2, "tone": "negative", "energy": "high"})
    );

    let req = actix_test::TestRequest::get()
        .uri("/api/mood-tracker/spiral")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["spiral"], "downward");
    assert_eq!(body["strength"], "moderate");
    assert_eq!(body["negative_count"], 3);
    assert_eq!(body["positive_count"], 1);
}

#[actix_web::test]
async fn spiral_with_too_few_entries_is_insufficient() {
    let harness = Harness::new();
    let (_, token) = harness.seed_user("amara", Role::User).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;
    post_mood(&app, &token, json!({"mood": "Calm"})).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/mood-tracker/spiral?limit=5")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["spiral"], "insufficient_data");
    assert!(body.get("strength").is_none());
}

#[rstest]
#[case("/api/mood-tracker/stats?days=0")]
#[case("/api/mood-tracker/stats?days=366")]
#[case("/api/mood-tracker/spiral?limit=51")]
#[case("/api/mood-tracker/spiral?limit=-1")]
#[actix_web::test]
async fn out_of_range_windows_are_bad_requests(#[case] uri: &str) {
    let harness = Harness::new();
    let (_, token) = harness.seed_user("amara", Role::User).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let req = actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer(&token))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn only_the_owner_can_delete_an_entry() {
    let harness = Harness::new();
    let (_, amara) = harness.seed_user("amara", Role::User).await;
    let (_, bola) = harness.seed_user("bola", Role::User).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let res = post_mood(&app, &amara, json!({"mood": "Calm"})).await;
    let entry: Value = actix_test::read_body_json(res).await;
    let uri = format!("/api/mood-tracker/{}", entry["id"].as_str().expect("id"));

    let req = actix_test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&bola))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = actix_test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&amara))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Mood entry deleted successfully");
}
