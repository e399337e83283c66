use actix_web::HttpResponse;
use rc_shared::HealthResponse;

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy("rotacode-api", env!("CARGO_PKG_VERSION")))
}
