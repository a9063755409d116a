#[macro_use]
extern crate rocket;

use rocket::figment::value::Map;
use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use rocket::fs::FileServer;
use rocket::http::Status;
use rocket::request::Request;
use rocket::serde::json::{Json, Value, json};
use rocket::{Build, Rocket};

pub mod admin_init_fairing;
pub mod api;
pub mod auth;
pub mod error;
pub mod logged_json;
pub mod models;
pub mod orm;
pub use orm::DbConn;
pub mod schema;
pub mod session_guards;

#[cfg(test)]
pub mod generate_types;

/// JSON error body shared by all catchers. A guard's recorded reason wins
/// over the generic status text.
fn catcher_body(status: Status, req: &Request, fallback: &str) -> Json<Value> {
    let message = session_guards::guard_failure_message(req).unwrap_or_else(|| fallback.to_string());
    Json(json!({
        "error": message,
        "path": req.uri().path().to_string(),
        "status": status.code
    }))
}

#[catch(400)]
fn bad_request(req: &Request) -> Json<Value> {
    catcher_body(Status::BadRequest, req, "Bad Request")
}

#[catch(401)]
fn unauthorized(req: &Request) -> Json<Value> {
    catcher_body(Status::Unauthorized, req, "Unauthorized")
}

#[catch(403)]
fn forbidden(req: &Request) -> Json<Value> {
    catcher_body(Status::Forbidden, req, "Forbidden")
}

#[catch(404)]
fn not_found(req: &Request) -> Json<Value> {
    catcher_body(Status::NotFound, req, "Not Found")
}

#[catch(422)]
fn unprocessable_entity(req: &Request) -> Json<Value> {
    catcher_body(Status::UnprocessableEntity, req, "Unprocessable Entity")
}

#[catch(500)]
fn internal_server_error(req: &Request) -> Json<Value> {
    catcher_body(Status::InternalServerError, req, "Internal Server Error")
}

#[catch(default)]
fn default_catcher(status: Status, req: &Request) -> Json<Value> {
    catcher_body(status, req, status.reason().unwrap_or("Unknown Error"))
}

/// Mounts the API under `/api` and registers the JSON catchers.
pub fn mount_api_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount("/api", api::routes()).register(
        "/",
        catchers![
            bad_request,
            unauthorized,
            forbidden,
            not_found,
            unprocessable_entity,
            internal_server_error,
            default_catcher
        ],
    )
}

fn log_rocket_info(rocket: &Rocket<Build>) {
    let figment = rocket.figment();

    if let Ok(address) = figment.extract_inner::<String>("address") {
        info!("Rocket is running at: {}", address);
    }

    if let Ok(port) = figment.extract_inner::<u16>("port") {
        info!("Rocket is listening on port: {}", port);
    }

    match figment.extract_inner::<Map<String, Value>>("databases.sqlite_db") {
        Ok(db_config) => {
            if let Some(Value::String(url)) = db_config.get("url") {
                info!("Database URL: {}", url);
            } else {
                warn!("Database URL not found in configuration");
            }
        }
        Err(e) => {
            warn!("Failed to extract database configuration: {}", e);
        }
    }
}

/// Builds the production server. Tests use `orm::testing::test_rocket`
/// instead, which swaps in an in-memory database.
pub fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let figment = Figment::from(rocket::Config::default())
        .merge(Toml::file("Rocket.toml").nested())
        .merge(Env::prefixed("ROCKET_").global())
        .merge(("databases.sqlite_db.url", database_url));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(orm::set_foreign_keys_fairing())
        .attach(orm::run_migrations_fairing())
        .attach(admin_init_fairing::admin_init_fairing())
        .attach(auth::token::token_keys_fairing());

    log_rocket_info(&rocket);

    let static_dir = std::env::var("TMS_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    mount_api_routes(rocket).mount("/", FileServer::from(static_dir).rank(10))
}
