//! handlers/registro_handler.rs

use actix_web::{web, HttpResponse};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::models::common_model::{MessageResponse, PaginationQuery};
use crate::models::registro_model::{
    ActualizarRegistroRequest, CambiarEstadoRegistroRequest, CrearRegistroRequest,
    FiltroRegistros,
};
use crate::services::registro_service::RegistroService;

/// GET /api/registros
pub async fn list_registros_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<RegistroService>,
    filtro: web::Query<FiltroRegistros>,
    pagination: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let list = service
        .listar(user.organizacion()?, filtro.into_inner(), pagination.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// GET /api/registros/alertas
pub async fn alertas_registros_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<RegistroService>,
) -> Result<HttpResponse, AppError> {
    let alertas = service.alertas(user.organizacion()?).await?;
    Ok(HttpResponse::Ok().json(alertas))
}

/// POST /api/registros
pub async fn create_registro_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<RegistroService>,
    body: web::Json<CrearRegistroRequest>,
) -> Result<HttpResponse, AppError> {
    let registro = service.crear(user.organizacion()?, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(registro))
}

/// GET /api/registros/{id}
pub async fn get_registro_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<RegistroService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let registro = service
        .obtener(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(registro))
}

/// PUT /api/registros/{id}
pub async fn update_registro_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<RegistroService>,
    path: web::Path<String>,
    body: web::Json<ActualizarRegistroRequest>,
) -> Result<HttpResponse, AppError> {
    let registro = service
        .actualizar(user.organizacion()?, &path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(registro))
}

/// PATCH /api/registros/{id}/estado
pub async fn change_registro_estado_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<RegistroService>,
    path: web::Path<String>,
    body: web::Json<CambiarEstadoRegistroRequest>,
) -> Result<HttpResponse, AppError> {
    let registro = service
        .cambiar_estado(
            user.organizacion()?,
            &path.into_inner(),
            &user.id,
            body.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(registro))
}

/// GET /api/registros/{id}/historial
pub async fn historial_registro_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<RegistroService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let historial = service
        .historial(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(historial))
}

/// DELETE /api/registros/{id}
pub async fn delete_registro_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<RegistroService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service
        .eliminar(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Registro eliminado")))
}
