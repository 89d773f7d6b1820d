//! handlers/accion_handler.rs

use actix_web::{web, HttpResponse};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::models::accion_model::{
    ActualizarAccionRequest, CambiarEstadoAccionRequest, CrearAccionRequest, FiltroAcciones,
};
use crate::models::common_model::{MessageResponse, PaginationQuery};
use crate::services::accion_service::AccionService;

/// GET /api/acciones
pub async fn list_acciones_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AccionService>,
    filtro: web::Query<FiltroAcciones>,
    pagination: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let list = service
        .listar(user.organizacion()?, filtro.into_inner(), pagination.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// GET /api/acciones/alertas
pub async fn alertas_acciones_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AccionService>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.alertas(user.organizacion()?).await?))
}

/// POST /api/acciones
pub async fn create_accion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AccionService>,
    body: web::Json<CrearAccionRequest>,
) -> Result<HttpResponse, AppError> {
    let accion = service.crear(user.organizacion()?, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(accion))
}

/// GET /api/acciones/{id}
pub async fn get_accion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AccionService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let accion = service
        .obtener(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(accion))
}

/// PUT /api/acciones/{id}
pub async fn update_accion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AccionService>,
    path: web::Path<String>,
    body: web::Json<ActualizarAccionRequest>,
) -> Result<HttpResponse, AppError> {
    let accion = service
        .actualizar(user.organizacion()?, &path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(accion))
}

/// PATCH /api/acciones/{id}/estado
pub async fn change_accion_estado_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AccionService>,
    path: web::Path<String>,
    body: web::Json<CambiarEstadoAccionRequest>,
) -> Result<HttpResponse, AppError> {
    let accion = service
        .cambiar_estado(user.organizacion()?, &path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(accion))
}

/// DELETE /api/acciones/{id}
pub async fn delete_accion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AccionService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service
        .eliminar(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Acción eliminada")))
}
