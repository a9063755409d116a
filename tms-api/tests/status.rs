use rocket::http::Status;
use rocket::local::asynchronous::Client;
use rocket::tokio;

use tms_api::orm::testing::test_rocket;

#[tokio::test]
async fn test_status_requires_no_login() {
    let client = Client::untracked(test_rocket()).await.unwrap();

    let response = client.get("/api/1/status").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["status"], "running");
    assert_eq!(body["service"], "tms-api");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let client = Client::untracked(test_rocket()).await.unwrap();

    let response = client.get("/api/1/nowhere").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);

    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["status"], 404);
    assert_eq!(body["path"], "/api/1/nowhere");
    assert!(body["error"].is_string());
}
