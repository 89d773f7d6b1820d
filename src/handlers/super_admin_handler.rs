//! handlers/super_admin_handler.rs
//! Consola de super-admin: organizaciones, usuarios de todos los tenants,
//! estadísticas y visor de esquema.

use actix_web::{web, HttpResponse};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::models::organizacion_model::{
    ActualizarOrganizacionRequest, CambiarEstadoOrganizacionRequest, CrearOrganizacionRequest,
};
use crate::models::usuario_model::{CrearUsuarioRequest, FiltroUsuarios};
use crate::services::organizacion_service::OrganizacionService;
use crate::services::super_admin_service::SuperAdminService;
use crate::services::usuario_service::UsuarioService;

/// GET /api/super-admin/organizaciones
pub async fn list_organizaciones_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<OrganizacionService>,
) -> Result<HttpResponse, AppError> {
    user.requerir_super_admin()?;
    Ok(HttpResponse::Ok().json(service.listar().await?))
}

/// POST /api/super-admin/organizaciones
pub async fn create_organizacion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<OrganizacionService>,
    body: web::Json<CrearOrganizacionRequest>,
) -> Result<HttpResponse, AppError> {
    user.requerir_super_admin()?;
    let org = service.crear(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(org))
}

/// GET /api/super-admin/organizaciones/{id}
pub async fn get_organizacion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<OrganizacionService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    user.requerir_super_admin()?;
    Ok(HttpResponse::Ok().json(service.obtener(&path.into_inner()).await?))
}

/// PUT /api/super-admin/organizaciones/{id}
pub async fn update_organizacion_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<OrganizacionService>,
    path: web::Path<String>,
    body: web::Json<ActualizarOrganizacionRequest>,
) -> Result<HttpResponse, AppError> {
    user.requerir_super_admin()?;
    let org = service
        .actualizar(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(org))
}

/// PATCH /api/super-admin/organizaciones/{id}/estado
pub async fn change_organizacion_estado_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<OrganizacionService>,
    path: web::Path<String>,
    body: web::Json<CambiarEstadoOrganizacionRequest>,
) -> Result<HttpResponse, AppError> {
    user.requerir_super_admin()?;
    let org = service
        .cambiar_estado(&path.into_inner(), body.activa)
        .await?;
    Ok(HttpResponse::Ok().json(org))
}

/// GET /api/super-admin/organizaciones/{id}/usuarios
pub async fn list_usuarios_organizacion_endpoint(
    user: UsuarioAutenticado,
    org_service: web::Data<OrganizacionService>,
    usuario_service: web::Data<UsuarioService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    user.requerir_super_admin()?;
    let org = org_service.obtener(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(usuario_service.listar(Some(&org.id)).await?))
}

/// POST /api/super-admin/organizaciones/{id}/usuarios
pub async fn create_usuario_organizacion_endpoint(
    user: UsuarioAutenticado,
    org_service: web::Data<OrganizacionService>,
    usuario_service: web::Data<UsuarioService>,
    path: web::Path<String>,
    body: web::Json<CrearUsuarioRequest>,
) -> Result<HttpResponse, AppError> {
    user.requerir_super_admin()?;
    let org = org_service.obtener(&path.into_inner()).await?;
    let usuario = usuario_service.crear(&org.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(usuario))
}

/// GET /api/super-admin/usuarios
pub async fn list_all_usuarios_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<UsuarioService>,
    filtro: web::Query<FiltroUsuarios>,
) -> Result<HttpResponse, AppError> {
    user.requerir_super_admin()?;
    let usuarios = service.listar(filtro.organizacion_id.as_deref()).await?;
    Ok(HttpResponse::Ok().json(usuarios))
}

/// GET /api/super-admin/estadisticas
pub async fn estadisticas_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<SuperAdminService>,
) -> Result<HttpResponse, AppError> {
    user.requerir_super_admin()?;
    Ok(HttpResponse::Ok().json(service.estadisticas().await?))
}

/// GET /api/super-admin/esquema
pub async fn esquema_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<SuperAdminService>,
) -> Result<HttpResponse, AppError> {
    user.requerir_super_admin()?;
    Ok(HttpResponse::Ok().json(service.esquema().await?))
}
