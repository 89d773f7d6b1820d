//! handlers/common.rs
//! Configuración de extractores y endpoints sin autenticación.

use actix_web::{error, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::error::AppError;

/// Errores de deserialización con el mismo formato JSON que el resto
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
            AppError::validation(format!("JSON inválido: {}", err)).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        AppError::validation(format!("Parámetros inválidos: {}", err)).into()
    })
}

/// GET /api/health
pub async fn health_endpoint() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
