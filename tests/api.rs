use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use fitme::{ActivityStore, AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let store = ActivityStore::open_in_memory().expect("in-memory store");
    router(AppState::new(store))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn put_get_delete_lifecycle() {
    let app = app();

    let (status, created) = send(
        &app,
        "PUT",
        "/api/activities/2025-03-10",
        Some(json!({ "trainingType": "cardio", "diet": "good" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["date"], "2025-03-10");
    assert_eq!(created["trainingType"], "cardio");
    assert_eq!(created["diet"], "good");
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_string());

    let (status, grid) = send(&app, "GET", "/api/grid?year=2025", None).await;
    assert_eq!(status, StatusCode::OK);
    let day = grid["weeks"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|week| week["days"].as_array().unwrap().iter())
        .find(|day| day["date"] == "2025-03-10")
        .unwrap();
    assert_eq!(day["score"], 2);
    assert_eq!(day["color"], "level2");

    let (status, fetched) = send(&app, "GET", "/api/activities/2025-03-10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, deleted) = send(&app, "DELETE", "/api/activities/2025-03-10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "success": true }));

    let (status, missing) = send(&app, "GET", "/api/activities/2025-03-10", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(missing["error"].is_string());
}

#[tokio::test]
async fn put_replaces_instead_of_merging() {
    let app = app();
    send(
        &app,
        "PUT",
        "/api/activities/2025-03-10",
        Some(json!({ "diet": "good" })),
    )
    .await;

    let (status, updated) = send(
        &app,
        "PUT",
        "/api/activities/2025-03-10",
        Some(json!({ "trainingType": "physical" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["trainingType"], "physical");
    assert_eq!(updated["diet"], Value::Null);
}

#[tokio::test]
async fn put_without_body_stores_defaults() {
    let app = app();
    let (status, record) = send(&app, "PUT", "/api/activities/2025-07-04", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["trainingType"], "none");
    assert_eq!(record["diet"], Value::Null);
}

#[tokio::test]
async fn range_query_returns_sorted_january() {
    let app = app();
    for date in ["2025-02-01", "2025-01-20", "2024-12-31", "2025-01-01", "2025-01-31"] {
        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/activities/{date}"),
            Some(json!({ "trainingType": "physical" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, records) = send(
        &app,
        "GET",
        "/api/activities?start=2025-01-01&end=2025-01-31",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-01-01", "2025-01-20", "2025-01-31"]);

    let (_, all) = send(&app, "GET", "/api/activities", None).await;
    assert_eq!(all.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn invalid_input_is_rejected_without_writing() {
    let app = app();
    let cases = [
        ("/api/activities/2025-3-10", json!({ "trainingType": "cardio" })),
        ("/api/activities/2025-02-30", json!({ "trainingType": "cardio" })),
        ("/api/activities/2025-03-10", json!({ "trainingType": "yoga" })),
        ("/api/activities/2025-03-10", json!({ "diet": "great" })),
    ];
    for (uri, body) in cases {
        let (status, error) = send(&app, "PUT", uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(error["error"].is_string());
    }

    let (_, all) = send(&app, "GET", "/api/activities", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app();
    let request = Request::builder()
        .method("PUT")
        .uri("/api/activities/2025-03-10")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_missing_day_is_not_found_every_time() {
    let app = app();
    for _ in 0..2 {
        let (status, body) = send(&app, "DELETE", "/api/activities/2031-01-01", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Activity not found");
    }
}

#[tokio::test]
async fn malformed_range_bounds_are_rejected() {
    let app = app();
    let (status, _) = send(&app, "GET", "/api/activities?start=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn overview_reports_percentages() {
    let app = app();
    send(
        &app,
        "PUT",
        "/api/activities/2025-05-01",
        Some(json!({ "trainingType": "physical", "diet": "good" })),
    )
    .await;
    send(
        &app,
        "PUT",
        "/api/activities/2025-05-02",
        Some(json!({ "trainingType": "none", "diet": "bad" })),
    )
    .await;

    let (status, overview) = send(&app, "GET", "/api/overview?year=2025", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["activityCount"], 2);
    assert_eq!(overview["total"], 3);
    assert_eq!(overview["percentages"]["physical"], 33);
    assert_eq!(overview["percentages"]["goodDiet"], 33);
    assert_eq!(overview["percentages"]["restDays"], 33);
    assert_eq!(overview["percentages"]["cardio"], 0);
}

#[tokio::test]
async fn grid_for_leap_year_has_leap_day() {
    let app = app();
    let (status, grid) = send(&app, "GET", "/api/grid?year=2024", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grid["monthLabels"].as_array().unwrap().len(), 12);
    let leap = grid["weeks"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|week| week["days"].as_array().unwrap().iter())
        .find(|day| day["date"] == "2024-02-29")
        .unwrap();
    assert_eq!(leap["isInYear"], true);

    let (status, _) = send(&app, "GET", "/api/grid?year=twenty", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn index_page_renders() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/?year=2025").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("FitMe"));
    assert!(html.contains(r#"data-date="2025-12-31""#));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_puts_on_one_day_keep_one_row() {
    let app = app();
    let requests = (0..12).map(|index| {
        let app = app.clone();
        let training_type = if index % 2 == 0 { "cardio" } else { "physical" };
        tokio::spawn(async move {
            send(
                &app,
                "PUT",
                "/api/activities/2025-03-10",
                Some(json!({ "trainingType": training_type, "diet": "good" })),
            )
            .await
        })
    });
    let handles: Vec<_> = requests.collect();
    for handle in handles {
        let (status, record) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["diet"], "good");
    }

    let (status, all) = send(&app, "GET", "/api/activities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
}
