//! handlers/hallazgo_handler.rs

use actix_web::{web, HttpResponse};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::models::common_model::{MessageResponse, PaginationQuery};
use crate::models::hallazgo_model::{
    ActualizarHallazgoRequest, CrearHallazgoRequest, FiltroHallazgos,
};
use crate::services::hallazgo_service::HallazgoService;

/// GET /api/hallazgos
pub async fn list_hallazgos_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<HallazgoService>,
    filtro: web::Query<FiltroHallazgos>,
    pagination: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let list = service
        .listar(user.organizacion()?, filtro.into_inner(), pagination.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// POST /api/hallazgos
pub async fn create_hallazgo_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<HallazgoService>,
    body: web::Json<CrearHallazgoRequest>,
) -> Result<HttpResponse, AppError> {
    let hallazgo = service.crear(user.organizacion()?, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(hallazgo))
}

/// GET /api/hallazgos/{id}
pub async fn get_hallazgo_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<HallazgoService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let hallazgo = service
        .obtener(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(hallazgo))
}

/// PUT /api/hallazgos/{id}
pub async fn update_hallazgo_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<HallazgoService>,
    path: web::Path<String>,
    body: web::Json<ActualizarHallazgoRequest>,
) -> Result<HttpResponse, AppError> {
    let hallazgo = service
        .actualizar(user.organizacion()?, &path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(hallazgo))
}

/// GET /api/hallazgos/{id}/acciones
pub async fn acciones_hallazgo_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<HallazgoService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let acciones = service
        .listar_acciones(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(acciones))
}

/// DELETE /api/hallazgos/{id}
pub async fn delete_hallazgo_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<HallazgoService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service
        .eliminar(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Hallazgo eliminado")))
}
