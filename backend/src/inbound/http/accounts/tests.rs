//! Handler tests for the account endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{AnalyticsError, AnalyticsSink, TimeRange};
use crate::inbound::http::configure;
use crate::outbound::memory::InMemoryAnalyticsSink;
use crate::test_support::AccountHarness;

struct World {
    harness: AccountHarness,
    analytics: Arc<InMemoryAnalyticsSink>,
}

#[fixture]
fn world() -> World {
    World {
        harness: AccountHarness::new(),
        analytics: Arc::new(InMemoryAnalyticsSink::new()),
    }
}

impl World {
    fn state(&self) -> HttpState {
        self.harness.http_state(self.analytics.clone())
    }
}

fn ada() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "a@x.com",
        "password": "p@ss1",
        "persona": "creator"
    })
}

async fn call(
    state: HttpState,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).expect("response body is JSON");
    (status, value)
}

fn post(path: &str, body: &Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post().uri(path).set_json(body)
}

fn login_body() -> Value {
    json!({"email": "a@x.com", "password": "p@ss1"})
}

#[rstest]
#[actix_web::test]
async fn register_returns_the_new_user_id(world: World) {
    let (status, body) = call(world.state(), post("/auth/register", &ada())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let user_id = body["userId"].as_str().expect("userId");
    assert!(uuid::Uuid::parse_str(user_id).is_ok());
    assert_eq!(world.harness.users.len(), 1);

    let events = world.analytics.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "user_registered");
    assert_eq!(events[0].properties["userId"], json!(user_id));
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_a_bad_request(world: World) {
    let (first, _) = call(world.state(), post("/auth/register", &ada())).await;
    assert_eq!(first, StatusCode::OK);

    let mut shouting = ada();
    shouting["email"] = json!("A@X.COM");
    let (status, body) = call(world.state(), post("/auth/register", &shouting)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("duplicate_account"));
    assert_eq!(world.harness.users.len(), 1);
    assert_eq!(world.analytics.events().len(), 1);
}

#[rstest]
#[case("email", json!(""))]
#[case("password", json!(""))]
#[case("persona", json!("   "))]
#[actix_web::test]
async fn invalid_registration_names_the_field(
    world: World,
    #[case] field: &str,
    #[case] value: Value,
) {
    let mut request = ada();
    request[field] = value;
    let (status, body) = call(world.state(), post("/auth/register", &request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["field"], json!(field));
    assert!(world.harness.users.is_empty());
}

#[rstest]
#[actix_web::test]
async fn malformed_json_uses_the_error_envelope(world: World) {
    let request = actix_test::TestRequest::post()
        .uri("/auth/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"email\":");
    let (status, body) = call(world.state(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_request"));
}

#[rstest]
#[actix_web::test]
async fn login_returns_token_and_user(world: World) {
    let (_, registered) = call(world.state(), post("/auth/register", &ada())).await;
    let (status, body) = call(world.state(), post("/auth/login", &login_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(!body["token"].as_str().expect("token").is_empty());
    assert_eq!(
        body["user"],
        json!({"id": registered["userId"], "email": "a@x.com", "persona": "creator"})
    );

    let names: Vec<_> = world
        .analytics
        .events()
        .into_iter()
        .map(|event| event.name)
        .collect();
    assert_eq!(names, ["user_registered", "user_logged_in"]);
}

#[rstest]
#[actix_web::test]
async fn unknown_email_and_wrong_password_look_the_same(world: World) {
    call(world.state(), post("/auth/register", &ada())).await;

    let (wrong_status, wrong_body) = call(
        world.state(),
        post("/auth/login", &json!({"email": "a@x.com", "password": "nope"})),
    )
    .await;
    let (unknown_status, unknown_body) = call(
        world.state(),
        post("/auth/login", &json!({"email": "b@x.com", "password": "p@ss1"})),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["code"], json!("invalid_credentials"));
}

#[rstest]
#[case(json!({"email": "", "password": "p@ss1"}))]
#[case(json!({"email": "a@x.com"}))]
#[actix_web::test]
async fn incomplete_login_is_invalid_credentials(world: World, #[case] request: Value) {
    let (status, body) = call(world.state(), post("/auth/login", &request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_credentials"));
}

#[rstest]
#[actix_web::test]
async fn session_resolves_the_bearer_token(world: World) {
    call(world.state(), post("/auth/register", &ada())).await;
    let (_, login_json) = call(world.state(), post("/auth/login", &login_body())).await;
    let token = login_json["token"].as_str().expect("token");

    let request = actix_test::TestRequest::get()
        .uri("/auth/session")
        .insert_header(("Authorization", format!("Bearer {token}")));
    let (status, body) = call(world.state(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"], login_json["user"]);
}

#[rstest]
#[case(None)]
#[case(Some("Bearer not-a-token"))]
#[case(Some("Token abc"))]
#[actix_web::test]
async fn session_without_a_valid_token_is_unauthorized(
    world: World,
    #[case] header: Option<&str>,
) {
    let mut request = actix_test::TestRequest::get().uri("/auth/session");
    if let Some(value) = header {
        request = request.insert_header(("Authorization", value));
    }
    let (status, body) = call(world.state(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("unauthorized"));
}

#[rstest]
#[actix_web::test]
async fn expired_sessions_are_unauthorized(world: World) {
    call(world.state(), post("/auth/register", &ada())).await;
    let (_, login_json) = call(world.state(), post("/auth/login", &login_body())).await;
    let token = login_json["token"].as_str().expect("token").to_owned();
    world.harness.clock.advance_seconds(3 * 60 * 60);

    let request = actix_test::TestRequest::get()
        .uri("/auth/session")
        .insert_header(("Authorization", format!("Bearer {token}")));
    let (status, _) = call(world.state(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

struct RejectingSink;

#[async_trait]
impl AnalyticsSink for RejectingSink {
    async fn record_event(&self, _event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::write("sink offline"))
    }

    async fn query(&self, _range: &TimeRange) -> Result<Vec<AnalyticsEvent>, AnalyticsError> {
        Err(AnalyticsError::query("sink offline"))
    }
}

#[rstest]
#[actix_web::test]
async fn analytics_failures_do_not_fail_the_request() {
    let harness = AccountHarness::new();
    let state = harness.http_state(Arc::new(RejectingSink));

    let (status, body) = call(state, post("/auth/register", &ada())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(harness.users.len(), 1);
}

#[rstest]
fn register_request_defaults_missing_fields() {
    let request: RegisterRequest =
        serde_json::from_value(json!({"email": "a@x.com"})).expect("deserialises");
    assert_eq!(request.email, "a@x.com");
    assert!(request.first_name.is_empty());
    assert!(request.persona.is_empty());
}

#[rstest]
fn error_codes_serialise_as_snake_case() {
    assert_eq!(
        serde_json::to_value(ErrorCode::DuplicateAccount).expect("serialises"),
        json!("duplicate_account")
    );
}
