mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::TestApp;
use event_admission::api::create_router;

fn router(app: &TestApp) -> Router {
    create_router(app.state.clone())
}

async fn send(router: &Router, method: Method, uri: &str, headers: &[(&str, &str)], body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

const ORGANIZER: [(&str, &str); 2] = [("x-user-id", "org-1"), ("x-user-role", "ORGANIZER")];

async fn create_event(router: &Router, max_players: i64) -> i64 {
    let (status, body) = send(
        router,
        Method::POST,
        "/api/events",
        &ORGANIZER,
        Some(json!({ "name": "Friday Moneyball", "maxPlayers": max_players })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "PLANNED");
    assert_eq!(body["confirmedRegistrationCount"], 0);
    body["id"].as_i64().unwrap()
}

async fn rsvp(router: &Router, event_id: i64, user: &str, status: &str) -> (StatusCode, Value) {
    send(
        router,
        Method::POST,
        &format!("/api/events/{event_id}/rsvp"),
        &[("x-user-id", user)],
        Some(json!({ "status": status })),
    )
    .await
}

#[tokio::test]
async fn rsvp_flow_confirms_waitlists_and_promotes() {
    let app = TestApp::new();
    let router = router(&app);
    let event_id = create_event(&router, 2).await;

    let (status, a) = rsvp(&router, event_id, "A", "IN").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(a["confirmed"], true);
    assert_eq!(a["message"], "Successfully registered!");

    rsvp(&router, event_id, "B", "IN").await;
    let (status, c) = rsvp(&router, event_id, "C", "IN").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(c["success"], true);
    assert_eq!(c["confirmed"], false);
    assert_eq!(c["waitlisted"], true);
    assert_eq!(c["message"], "Added to waitlist - you'll be notified if a spot opens up");

    let (_, out) = rsvp(&router, event_id, "A", "OUT").await;
    assert_eq!(out["message"], "Registration updated");
    assert_eq!(out["promoted"][0]["userId"], "C");

    let (status, list) = send(&router, Method::GET, &format!("/api/events/{event_id}/registrations"), &[], None).await;
    assert_eq!(status, StatusCode::OK);
    let users: Vec<(&str, bool)> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| (r["userId"].as_str().unwrap(), r["confirmed"].as_bool().unwrap()))
        .collect();
    assert_eq!(users, vec![("B", true), ("C", true), ("A", false)]);

    let (_, event) = send(&router, Method::GET, &format!("/api/events/{event_id}"), &[], None).await;
    assert_eq!(event["confirmedRegistrationCount"], 2);
    assert_eq!(event["maxPlayers"], 2);
}

#[tokio::test]
async fn rsvp_validation_errors() {
    let app = TestApp::new();
    let router = router(&app);
    let event_id = create_event(&router, 2).await;

    let (status, body) = rsvp(&router, event_id, "A", "SOMETIMES").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);

    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/api/events/{event_id}/rsvp"),
        &[],
        Some(json!({ "status": "IN" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = rsvp(&router, 9999, "A", "IN").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_requests_get_json_bad_request() {
    let app = TestApp::new();
    let router = router(&app);
    let event_id = create_event(&router, 2).await;

    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/api/events/{event_id}/rsvp"),
        &[("x-user-id", "A")],
        Some(json!({ "status": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);
    assert!(body["message"].is_string());

    let (status, body) = send(&router, Method::GET, "/api/events/latest", &[], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/api/events/{event_id}"),
        &ORGANIZER,
        Some(json!({ "maxPlayers": "many" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);
}

#[tokio::test]
async fn rsvp_for_another_user_requires_organizer() {
    let app = TestApp::new();
    let router = router(&app);
    let event_id = create_event(&router, 2).await;
    let uri = format!("/api/events/{event_id}/rsvp");

    let (status, _) = send(
        &router,
        Method::POST,
        &uri,
        &[("x-user-id", "A")],
        Some(json!({ "status": "IN", "userId": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&router, Method::POST, &uri, &[], Some(json!({ "status": "IN", "userId": "B" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&router, Method::POST, &uri, &ORGANIZER, Some(json!({ "status": "IN", "userId": "B" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration"]["userId"], "B");
}

#[tokio::test]
async fn closed_event_rejects_rsvp() {
    let app = TestApp::new();
    let router = router(&app);
    let event_id = create_event(&router, 2).await;

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/api/events/{event_id}"),
        &ORGANIZER,
        Some(json!({ "status": "ACTIVE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["status"], "ACTIVE");

    let (status, body) = rsvp(&router, event_id, "A", "IN").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("PLANNED"));
}

#[tokio::test]
async fn event_management_requires_organizer() {
    let app = TestApp::new();
    let router = router(&app);

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/events",
        &[("x-user-id", "p1")],
        Some(json!({ "name": "Open Play", "maxPlayers": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/events",
        &ORGANIZER,
        Some(json!({ "name": "Open Play", "maxPlayers": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/events",
        &[("x-user-role", "OWNER")],
        Some(json!({ "name": "Open Play", "maxPlayers": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn raising_capacity_over_http_promotes() {
    let app = TestApp::new();
    let router = router(&app);
    let event_id = create_event(&router, 1).await;

    for user in ["A", "B", "C"] {
        rsvp(&router, event_id, user, "IN").await;
    }

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/api/events/{event_id}"),
        &ORGANIZER,
        Some(json!({ "maxPlayers": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["confirmedRegistrationCount"], 2);
    assert_eq!(body["promoted"][0]["userId"], "B");

    let (status, _) = send(
        &router,
        Method::PATCH,
        &format!("/api/events/{event_id}"),
        &ORGANIZER,
        Some(json!({ "maxPlayers": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_and_delete_events() {
    let app = TestApp::new();
    let router = router(&app);
    let first = create_event(&router, 4).await;
    let second = create_event(&router, 4).await;

    let (_, list) = send(&router, Method::GET, "/api/events", &[], None).await;
    let ids: Vec<i64> = list.as_array().unwrap().iter().map(|e| e["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![second, first]);

    let (status, _) = send(&router, Method::DELETE, &format!("/api/events/{first}"), &ORGANIZER, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, Method::GET, &format!("/api/events/{first}"), &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn seeding_endpoint_ranks_results() {
    let app = TestApp::new();
    let router = router(&app);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/seeding/rank",
        &[],
        Some(json!({
            "results": [
                { "participantId": "X", "wins": 3, "losses": 1, "pointsFor": 40, "pointsAgainst": 30 },
                { "participantId": "Y", "wins": 3, "losses": 1, "pointsFor": 45, "pointsAgainst": 30 },
                { "participantId": "Z", "wins": 2, "losses": 2, "pointsFor": 50, "pointsAgainst": 30 }
            ],
            "criteria": ["wins", "pointDifferential", "pointsFor"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seeds"][0], json!({ "seed": 1, "participantId": "Y" }));
    assert_eq!(body["seeds"][1]["participantId"], "X");
    assert_eq!(body["seeds"][2]["participantId"], "Z");
}

#[tokio::test]
async fn seeding_endpoint_rejects_bad_criteria() {
    let app = TestApp::new();
    let router = router(&app);

    for criteria in [json!([]), json!(["wins", "elo"])] {
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/seeding/rank",
            &[],
            Some(json!({ "results": [], "criteria": criteria })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("invalid seeding criteria"));
    }
}

#[tokio::test]
async fn seeding_endpoint_tallies_games_with_default_criteria() {
    let app = TestApp::new();
    let router = router(&app);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/seeding/rank",
        &[],
        Some(json!({
            "games": [
                { "participantId": "A", "opponentId": "B", "scoreFor": 11, "scoreAgainst": 9 },
                { "participantId": "B", "opponentId": "C", "scoreFor": 11, "scoreAgainst": 2 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["criteria"], json!(["wins", "pointDifferential", "pointsFor"]));
    let order: Vec<&str> = body["seeds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["participantId"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["B", "A", "C"]);
}
