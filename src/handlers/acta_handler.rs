//! handlers/acta_handler.rs

use actix_web::{web, HttpResponse};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::models::acta_model::{ActualizarActaRequest, CrearActaRequest, FiltroActas};
use crate::models::common_model::{MessageResponse, PaginationQuery};
use crate::services::acta_service::ActaService;

/// GET /api/actas
pub async fn list_actas_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<ActaService>,
    filtro: web::Query<FiltroActas>,
    pagination: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let list = service
        .listar(user.organizacion()?, filtro.into_inner(), pagination.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// POST /api/actas
pub async fn create_acta_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<ActaService>,
    body: web::Json<CrearActaRequest>,
) -> Result<HttpResponse, AppError> {
    let acta = service.crear(user.organizacion()?, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(acta))
}

/// GET /api/actas/{id}
pub async fn get_acta_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<ActaService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let acta = service
        .obtener(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(acta))
}

/// PUT /api/actas/{id}
pub async fn update_acta_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<ActaService>,
    path: web::Path<String>,
    body: web::Json<ActualizarActaRequest>,
) -> Result<HttpResponse, AppError> {
    let acta = service
        .actualizar(user.organizacion()?, &path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(acta))
}

/// POST /api/actas/{id}/aprobar
pub async fn approve_acta_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<ActaService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let acta = service
        .aprobar(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(acta))
}

/// DELETE /api/actas/{id}
pub async fn delete_acta_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<ActaService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service
        .eliminar(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Acta eliminada")))
}
