//! handlers/usuario_handler.rs
//! Gestión de usuarios de la propia organización (rol admin).

use actix_web::{web, HttpResponse};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::models::usuario_model::{ActualizarUsuarioRequest, CrearUsuarioRequest};
use crate::services::usuario_service::UsuarioService;

/// GET /api/usuarios
pub async fn list_usuarios_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<UsuarioService>,
) -> Result<HttpResponse, AppError> {
    user.requerir_admin()?;
    let usuarios = service.listar(Some(user.organizacion()?)).await?;
    Ok(HttpResponse::Ok().json(usuarios))
}

/// POST /api/usuarios
pub async fn create_usuario_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<UsuarioService>,
    body: web::Json<CrearUsuarioRequest>,
) -> Result<HttpResponse, AppError> {
    user.requerir_admin()?;
    let usuario = service.crear(user.organizacion()?, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(usuario))
}

/// PUT /api/usuarios/{id}
pub async fn update_usuario_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<UsuarioService>,
    path: web::Path<String>,
    body: web::Json<ActualizarUsuarioRequest>,
) -> Result<HttpResponse, AppError> {
    user.requerir_admin()?;
    let usuario = service
        .actualizar(user.organizacion()?, &path.into_inner(), body.into_inner(), &user.id)
        .await?;
    Ok(HttpResponse::Ok().json(usuario))
}
