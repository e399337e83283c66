//! Application state and factory
//!
//! This module builds the services from configuration and provides the
//! factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use anyhow::Context;
use rc_core::{
    BlockListRepository, Notifier, OriginGuard, RecordRepository, VerificationService,
    VerificationServiceConfig,
};
use rc_infra::{
    create_email_service, EmailNotifier, EmailService, EncryptedFileRecordRepository,
    JsonBlockListRepository,
};
use rc_shared::{AppConfig, StatusResponse};
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::handlers::json_error_handler;
use crate::middleware::security_headers;
use crate::routes::{admin::add_user, health::health_check, verify::verify, AppState};

/// Largest accepted JSON body
pub const JSON_BODY_LIMIT: usize = 16 * 1024;

/// State of the production server: encrypted file store, JSON block list and
/// the configured email transport
pub type ServerState =
    AppState<EncryptedFileRecordRepository, JsonBlockListRepository, EmailNotifier<dyn EmailService>>;

/// Build the production state from configuration
///
/// Opens (or creates) the record store and the block list, restores the
/// persisted blocks and picks the email transport.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<ServerState> {
    let records = EncryptedFileRecordRepository::open(
        &config.store.records_path,
        &config.store.encryption_key,
    )
    .await
    .with_context(|| {
        format!(
            "failed to open record store {}",
            config.store.records_path.display()
        )
    })?;

    let blocks = Arc::new(JsonBlockListRepository::from_config(&config.store));
    let guard = OriginGuard::load(blocks, config.guard, config.store.io_timeout())
        .await
        .with_context(|| {
            format!(
                "failed to load block list {}",
                config.store.block_list_path.display()
            )
        })?;

    let transport: Arc<dyn EmailService> = Arc::from(create_email_service(&config.notifier));
    info!(provider = transport.provider_name(), "Email transport ready");
    let notifier = Arc::new(EmailNotifier::new(transport));

    let service = VerificationService::new(
        Arc::new(records),
        guard,
        notifier,
        VerificationServiceConfig::from_app_config(config),
    )?;

    Ok(AppState {
        verification_service: Arc::new(service),
        trust_proxy_headers: config.server.trust_proxy_headers,
        admin_token: config.server.admin_token.clone(),
    })
}

/// Create and configure the application with all dependencies
pub fn create_app<R, B, N>(
    app_state: web::Data<AppState<R, B, N>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    R: RecordRepository + ?Sized + 'static,
    B: BlockListRepository + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_BODY_LIMIT)
                .error_handler(json_error_handler),
        )
        .wrap(security_headers())
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api")
                .route("/verify", web::post().to(verify::<R, B, N>))
                .route("/admin/add-user", web::post().to(add_user::<R, B, N>)),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(StatusResponse::failure("Not found"))
}
