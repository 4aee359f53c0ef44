//! Integration tests for the send-otp and verify-otp endpoints

use std::sync::Arc;

use actix_web::{
    http::{header, StatusCode},
    test, web,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};

use nest_api::app::create_app;
use nest_api::routes::AppState;
use nest_core::repositories::UserRepository;
use nest_core::services::{
    AuthService, AuthServiceConfig, CodeDigester, ManualClock, OtpLedger, OtpLedgerConfig,
    TokenService, TokenServiceConfig,
};
use nest_infra::{ConsoleDelivery, ConsoleSmsService, InMemoryUserRepository, SmsNotificationSink};

type TestState = AppState<InMemoryUserRepository, SmsNotificationSink<ConsoleSmsService>>;

const MOBILE: &str = "9998887777";
const SEND_OTP: &str = "/api/v1/auth/send-otp";
const VERIFY_OTP: &str = "/api/v1/auth/verify-otp";

struct Harness {
    state: web::Data<TestState>,
    clock: Arc<ManualClock>,
    users: Arc<InMemoryUserRepository>,
    tokens: Arc<TokenService>,
}

fn harness(echo_code_in_response: bool) -> Harness {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
    ));
    let users = Arc::new(InMemoryUserRepository::new());
    let ledger = Arc::new(OtpLedger::with_clock(
        OtpLedgerConfig::default(),
        CodeDigester::new(b"api-route-tests-hmac-key-0123456").unwrap(),
        clock.clone(),
    ));
    let tokens = Arc::new(
        TokenService::new(TokenServiceConfig::new("api-route-tests-jwt-secret-0123")).unwrap(),
    );
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        Arc::new(SmsNotificationSink::new(ConsoleSmsService::new(
            ConsoleDelivery::Suppress,
        ))),
        ledger,
        tokens.clone(),
        AuthServiceConfig {
            echo_code_in_response,
        },
    ));

    Harness {
        state: web::Data::new(AppState::new(auth_service)),
        clock,
        users,
        tokens,
    }
}

fn send_request(mobile: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(SEND_OTP)
        .set_json(json!({ "mobile": mobile }))
}

fn verify_request(request_id: &str, mobile: &str, otp: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(VERIFY_OTP)
        .set_json(json!({ "request_id": request_id, "mobile": mobile, "otp": otp }))
}

fn other_code(code: &str) -> String {
    let value: u32 = code.parse().unwrap();
    format!("{:04}", (value + 1) % 10_000)
}

#[actix_web::test]
async fn test_send_otp_returns_created() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    let resp = test::call_service(&app, send_request(MOBILE).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let request_id = body["request_id"].as_str().unwrap();
    assert_eq!(request_id.len(), 32);
    assert!(request_id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(body["message"], "Verification code has been sent to your phone.");
    assert_eq!(body["expires_in"], 300);

    let dev_code = body["dev_code"].as_str().unwrap();
    assert_eq!(dev_code.len(), 4);
    assert!(dev_code.chars().all(|c| c.is_ascii_digit()));
}

#[actix_web::test]
async fn test_send_otp_hides_code_without_echo() {
    let h = harness(false);
    let app = test::init_service(create_app(h.state.clone())).await;

    let resp = test::call_service(&app, send_request(MOBILE).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("dev_code").is_none());
}

#[actix_web::test]
async fn test_send_otp_rejects_invalid_mobile() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    for mobile in ["5998887777", "99988877", "+919998887777"] {
        let resp = test::call_service(&app, send_request(mobile).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_MOBILE");
        assert_eq!(
            body["message"],
            "Please enter a valid 10-digit Indian mobile number."
        );
    }
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(SEND_OTP)
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"mobile\":")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_send_otp_rate_limited_after_three() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    for _ in 0..3 {
        let resp = test::call_service(&app, send_request(MOBILE).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = test::call_service(&app, send_request(MOBILE).to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers().get(header::RETRY_AFTER).unwrap(), "300");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOO_MANY_REQUESTS");
    assert_eq!(body["details"]["retry_after_seconds"], 300);
    assert_eq!(body["details"]["limit"], 3);

    // Another number is unaffected
    let resp = test::call_service(&app, send_request("8887776666").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_rate_limit_lifts_after_expiry() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    for _ in 0..3 {
        test::call_service(&app, send_request(MOBILE).to_request()).await;
    }
    h.clock.advance(Duration::minutes(6));

    let resp = test::call_service(&app, send_request(MOBILE).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_verify_otp_signs_in_once() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    let body: Value =
        test::read_body_json(test::call_service(&app, send_request(MOBILE).to_request()).await).await;
    let request_id = body["request_id"].as_str().unwrap().to_string();
    let code = body["dev_code"].as_str().unwrap().to_string();

    let resp = test::call_service(&app, verify_request(&request_id, MOBILE, &code).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "OTP verified successfully.");
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 3600);
    assert_eq!(body["user"]["mobile"], MOBILE);
    assert_eq!(body["user"]["is_new_user"], true);

    let claims = h
        .tokens
        .verify_access_token(body["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, MOBILE);
    assert_eq!(h.users.count().await, 1);

    let resp = test::call_service(&app, verify_request(&request_id, MOBILE, &code).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "OTP_ALREADY_USED");
    assert_eq!(body["message"], "This code was already used.");
}

#[actix_web::test]
async fn test_second_sign_in_is_not_new_user() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    for expected_new in [true, false] {
        let body: Value =
            test::read_body_json(test::call_service(&app, send_request(MOBILE).to_request()).await).await;
        let request_id = body["request_id"].as_str().unwrap().to_string();
        let code = body["dev_code"].as_str().unwrap().to_string();

        let body: Value = test::read_body_json(
            test::call_service(&app, verify_request(&request_id, MOBILE, &code).to_request()).await,
        )
        .await;
        assert_eq!(body["user"]["is_new_user"], expected_new);
    }

    assert_eq!(h.users.count().await, 1);
}

#[actix_web::test]
async fn test_wrong_code_then_attempts_exceeded() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    let body: Value =
        test::read_body_json(test::call_service(&app, send_request(MOBILE).to_request()).await).await;
    let request_id = body["request_id"].as_str().unwrap().to_string();
    let code = body["dev_code"].as_str().unwrap().to_string();
    let wrong = other_code(&code);

    let resp = test::call_service(&app, verify_request(&request_id, MOBILE, &wrong).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INCORRECT_CODE");
    assert_eq!(body["details"]["remaining_attempts"], 4);

    for _ in 0..4 {
        test::call_service(&app, verify_request(&request_id, MOBILE, &wrong).to_request()).await;
    }

    let resp = test::call_service(&app, verify_request(&request_id, MOBILE, &code).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "ATTEMPTS_EXCEEDED");
    assert_eq!(body["message"], "Maximum attempts exceeded. Request a new code.");
}

#[actix_web::test]
async fn test_verify_after_expiry() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    let body: Value =
        test::read_body_json(test::call_service(&app, send_request(MOBILE).to_request()).await).await;
    let request_id = body["request_id"].as_str().unwrap().to_string();
    let code = body["dev_code"].as_str().unwrap().to_string();

    h.clock.advance(Duration::minutes(5) + Duration::seconds(1));

    let resp = test::call_service(&app, verify_request(&request_id, MOBILE, &code).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "OTP_EXPIRED");
    assert_eq!(body["message"], "OTP expired. Tap Resend to get a new code.");
}

#[actix_web::test]
async fn test_verify_unknown_or_mismatched_challenge() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    let body: Value =
        test::read_body_json(test::call_service(&app, send_request(MOBILE).to_request()).await).await;
    let request_id = body["request_id"].as_str().unwrap().to_string();
    let code = body["dev_code"].as_str().unwrap().to_string();

    let resp = test::call_service(&app, verify_request(&request_id, "8887776666", &code).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "SUBJECT_MISMATCH");
    assert_eq!(body["message"], "Invalid request or mobile number.");

    let resp = test::call_service(
        &app,
        verify_request("00000000000000000000000000000000", MOBILE, &code).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CHALLENGE_NOT_FOUND");

    // The mismatch did not consume the challenge
    let resp = test::call_service(&app, verify_request(&request_id, MOBILE, &code).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_verify_rejects_malformed_fields() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    let resp = test::call_service(&app, verify_request("abc", MOBILE, "12a4").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "OTP must be a 4-digit numeric code.");
    assert_eq!(body["details"]["fields"], json!(["otp"]));

    let resp = test::call_service(&app, verify_request("", MOBILE, "1234").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"]["fields"], json!(["request_id"]));
}

#[actix_web::test]
async fn test_inactive_user_is_forbidden() {
    let h = harness(true);
    let app = test::init_service(create_app(h.state.clone())).await;

    let mut user = h.users.upsert_login(MOBILE).await.unwrap().user;
    user.deactivate();
    h.users.update(user).await.unwrap();

    let body: Value =
        test::read_body_json(test::call_service(&app, send_request(MOBILE).to_request()).await).await;
    let request_id = body["request_id"].as_str().unwrap().to_string();
    let code = body["dev_code"].as_str().unwrap().to_string();

    let resp = test::call_service(&app, verify_request(&request_id, MOBILE, &code).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "USER_INACTIVE");
}

#[actix_web::test]
async fn test_health_and_not_found() {
    let h = harness(false);
    let app = test::init_service(create_app(h.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/unknown").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}
