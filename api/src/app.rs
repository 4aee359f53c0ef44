//! Application state and factory
//!
//! Wires the configured services together and builds the Actix-web
//! application around them.

use std::sync::Arc;

use actix_web::{error::InternalError, web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use nest_core::errors::DomainResult;
use nest_core::repositories::UserRepository;
use nest_core::services::{
    AuthService, AuthServiceConfig, CodeDigester, NotificationSink, OtpLedger, OtpLedgerConfig,
    TokenService, TokenServiceConfig,
};
use nest_infra::{ConsoleDelivery, ConsoleSmsService, InMemoryUserRepository, SmsNotificationSink};
use nest_shared::{error_codes, AppConfig, ErrorResponse};

use crate::config::Secrets;
use crate::handlers::error::malformed_body_response;
use crate::routes::auth::{send_otp::send_otp, verify_otp::verify_otp, AppState};
use crate::routes::health::health_check;

/// Auth service over the in-process user store and console SMS
pub type DefaultAuthService =
    AuthService<InMemoryUserRepository, SmsNotificationSink<ConsoleSmsService>>;

/// Build the auth service and its collaborators from configuration
pub fn build_auth_service(config: &AppConfig, secrets: &Secrets) -> DomainResult<DefaultAuthService> {
    let otp_config = &config.auth.otp;

    let digester = CodeDigester::new(secrets.otp_hmac_key.as_bytes())?;
    let ledger = Arc::new(OtpLedger::new(OtpLedgerConfig::from(otp_config), digester));

    let token_service = Arc::new(TokenService::new(TokenServiceConfig::from_jwt_config(
        &config.auth.jwt,
        secrets.jwt_secret.as_str(),
    ))?);

    let sms = ConsoleSmsService::new(ConsoleDelivery::for_environment(config.environment));

    Ok(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(SmsNotificationSink::new(sms)),
        ledger,
        token_service,
        AuthServiceConfig::from(otp_config),
    ))
}

/// Create and configure the application with all dependencies
pub fn create_app<U, N>(
    app_state: web::Data<AppState<U, N>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    N: NotificationSink + 'static,
{
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = malformed_body_response(&err.to_string());
        InternalError::from_response(err, response).into()
    });

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .wrap(TracingLogger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/send-otp", web::post().to(send_otp::<U, N>))
                    .route("/verify-otp", web::post().to(verify_otp::<U, N>)),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
