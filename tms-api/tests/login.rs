#[macro_use]
extern crate time_test;

use rocket::http::{SameSite, Status};
use rocket::local::asynchronous::Client;
use rocket::tokio;
use serde_json::json;

use tms_api::orm::testing::test_rocket;

#[tokio::test]
async fn test_login_success() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    time_test!("test_login_success");

    let response = client
        .post("/api/1/login")
        .json(&json!({
            "identifier": "turing@example.com",
            "secret": "facultypass"
        }))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);

    let cookie = response
        .cookies()
        .get("auth_token")
        .expect("auth_token cookie should be set")
        .clone();
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age().map(|d| d.whole_seconds()), Some(604_800));

    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["message"], "Login Successful");
    assert_eq!(body["identifier"], "turing@example.com");
    assert_eq!(body["role"], "faculty");
}

#[tokio::test]
async fn test_login_accepts_email_password_aliases() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    time_test!("test_login_accepts_email_password_aliases");

    let response = client
        .post("/api/1/login")
        .json(&json!({
            "email": "superadmin@example.com",
            "password": "admin"
        }))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["role"], "superadmin");
}

#[tokio::test]
async fn test_wrong_identifier_and_wrong_secret_look_the_same() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    time_test!("test_wrong_identifier_and_wrong_secret_look_the_same");

    let mut bodies = Vec::new();
    for (identifier, secret) in [
        ("nonexistent@example.com", "facultypass"),
        ("turing@example.com", "wrongpass"),
    ] {
        let response = client
            .post("/api/1/login")
            .json(&json!({ "identifier": identifier, "secret": secret }))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Unauthorized);
        assert!(response.cookies().get("auth_token").is_none());
        let body: serde_json::Value = response.into_json().await.unwrap();
        bodies.push(body);
    }

    assert_eq!(bodies[0], json!({ "error": "Invalid credentials" }));
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn test_empty_credentials() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    time_test!("test_empty_credentials");

    for body in [
        json!({ "identifier": "", "secret": "facultypass" }),
        json!({ "identifier": "turing@example.com", "secret": "" }),
        json!({}),
    ] {
        let response = client.post("/api/1/login").json(&body).dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    time_test!("test_malformed_body");

    let response = client
        .post("/api/1/login")
        .header(rocket::http::ContentType::JSON)
        .body("{ not json")
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
}

#[tokio::test]
async fn test_every_role_can_log_in() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    time_test!("test_every_role_can_log_in");

    for (identifier, secret, role) in [
        ("admin@example.com", "adminpass", "admin"),
        ("hopper@example.com", "facultypass", "faculty"),
        ("student@example.com", "studentpass", "student"),
        ("guest@example.com", "guestpass", "guest"),
    ] {
        let response = client
            .post("/api/1/login")
            .json(&json!({ "identifier": identifier, "secret": secret }))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok, "login as {}", identifier);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["role"], role);
    }
}

#[tokio::test]
async fn test_wrong_field_type_is_bad_request() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    time_test!("test_wrong_field_type_is_bad_request");

    let response = client
        .post("/api/1/login")
        .json(&json!({ "identifier": 5, "secret": "x" }))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    assert!(response.cookies().get("auth_token").is_none());
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Malformed request body")
    );
}
