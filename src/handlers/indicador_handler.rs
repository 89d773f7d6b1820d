//! handlers/indicador_handler.rs

use actix_web::{web, HttpResponse};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::models::common_model::{MessageResponse, PaginationQuery};
use crate::models::indicador_model::{
    ActualizarIndicadorRequest, CrearIndicadorRequest, CrearMedicionRequest, FiltroIndicadores,
};
use crate::services::indicador_service::IndicadorService;

/// GET /api/indicadores
pub async fn list_indicadores_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<IndicadorService>,
    filtro: web::Query<FiltroIndicadores>,
    pagination: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let list = service
        .listar(user.organizacion()?, filtro.into_inner(), pagination.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// POST /api/indicadores
pub async fn create_indicador_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<IndicadorService>,
    body: web::Json<CrearIndicadorRequest>,
) -> Result<HttpResponse, AppError> {
    let indicador = service.crear(user.organizacion()?, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(indicador))
}

/// GET /api/indicadores/{id}
pub async fn get_indicador_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<IndicadorService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let detalle = service
        .obtener_detalle(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(detalle))
}

/// PUT /api/indicadores/{id}
pub async fn update_indicador_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<IndicadorService>,
    path: web::Path<String>,
    body: web::Json<ActualizarIndicadorRequest>,
) -> Result<HttpResponse, AppError> {
    let indicador = service
        .actualizar(user.organizacion()?, &path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(indicador))
}

/// DELETE /api/indicadores/{id}
pub async fn delete_indicador_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<IndicadorService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service
        .eliminar(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Indicador eliminado")))
}

/// GET /api/indicadores/{id}/mediciones
pub async fn list_mediciones_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<IndicadorService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mediciones = service
        .listar_mediciones(user.organizacion()?, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(mediciones))
}

/// POST /api/indicadores/{id}/mediciones
pub async fn create_medicion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<IndicadorService>,
    path: web::Path<String>,
    body: web::Json<CrearMedicionRequest>,
) -> Result<HttpResponse, AppError> {
    let medicion = service
        .registrar_medicion(user.organizacion()?, &path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(medicion))
}

/// DELETE /api/indicadores/{id}/mediciones/{medicion_id}
pub async fn delete_medicion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<IndicadorService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (indicador_id, medicion_id) = path.into_inner();
    let indicador = service
        .eliminar_medicion(user.organizacion()?, &indicador_id, &medicion_id)
        .await?;
    Ok(HttpResponse::Ok().json(indicador))
}
