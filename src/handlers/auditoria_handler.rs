//! handlers/auditoria_handler.rs

use actix_web::{web, HttpResponse};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::models::auditoria_model::{
    ActualizarAuditoriaRequest, CrearAuditoriaRequest, FiltroAuditorias,
};
use crate::models::common_model::{MessageResponse, PaginationQuery};
use crate::services::auditoria_service::AuditoriaService;

/// GET /api/auditorias
pub async fn list_auditorias_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AuditoriaService>,
    filtro: web::Query<FiltroAuditorias>,
    pagination: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let list = service
        .listar(user.organizacion()?, filtro.into_inner(), pagination.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// POST /api/auditorias
pub async fn create_auditoria_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AuditoriaService>,
    body: web::Json<CrearAuditoriaRequest>,
) -> Result<HttpResponse, AppError> {
    let aud = service.crear(user.organizacion()?, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(aud))
}

/// GET /api/auditorias/{id}
pub async fn get_auditoria_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AuditoriaService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let aud = service
        .obtener(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(aud))
}

/// PUT /api/auditorias/{id}
pub async fn update_auditoria_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AuditoriaService>,
    path: web::Path<String>,
    body: web::Json<ActualizarAuditoriaRequest>,
) -> Result<HttpResponse, AppError> {
    let aud = service
        .actualizar(user.organizacion()?, &path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(aud))
}

/// GET /api/auditorias/{id}/hallazgos
pub async fn hallazgos_auditoria_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AuditoriaService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let hallazgos = service
        .hallazgos(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(hallazgos))
}

/// DELETE /api/auditorias/{id}
pub async fn delete_auditoria_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AuditoriaService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service
        .eliminar(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Auditoría eliminada")))
}
