//! handlers/capacitacion_handler.rs

use actix_web::{web, HttpResponse};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::models::capacitacion_model::{
    ActualizarCapacitacionRequest, CrearCapacitacionRequest, FiltroCapacitaciones,
};
use crate::models::common_model::{MessageResponse, PaginationQuery};
use crate::services::capacitacion_service::CapacitacionService;

/// GET /api/capacitaciones
pub async fn list_capacitaciones_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<CapacitacionService>,
    filtro: web::Query<FiltroCapacitaciones>,
    pagination: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let list = service
        .listar(user.organizacion()?, filtro.into_inner(), pagination.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// POST /api/capacitaciones
pub async fn create_capacitacion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<CapacitacionService>,
    body: web::Json<CrearCapacitacionRequest>,
) -> Result<HttpResponse, AppError> {
    let cap = service.crear(user.organizacion()?, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(cap))
}

/// GET /api/capacitaciones/{id}
pub async fn get_capacitacion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<CapacitacionService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let cap = service
        .obtener(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(cap))
}

/// PUT /api/capacitaciones/{id}
pub async fn update_capacitacion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<CapacitacionService>,
    path: web::Path<String>,
    body: web::Json<ActualizarCapacitacionRequest>,
) -> Result<HttpResponse, AppError> {
    let cap = service
        .actualizar(user.organizacion()?, &path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(cap))
}

/// DELETE /api/capacitaciones/{id}
pub async fn delete_capacitacion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<CapacitacionService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service
        .eliminar(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Capacitación eliminada")))
}
