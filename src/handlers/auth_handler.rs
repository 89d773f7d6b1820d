//! handlers/auth_handler.rs

use actix_web::{web, HttpResponse, ResponseError};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::models::common_model::MessageResponse;
use crate::models::usuario_model::{CambiarPasswordRequest, LoginRequest};
use crate::services::auth_service::AuthService;

/// POST /api/auth/login
pub async fn login_endpoint(
    auth_service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    match auth_service.login(body.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(e) => e.error_response(),
    }
}

/// GET /api/auth/me
pub async fn me_endpoint(
    user: UsuarioAutenticado,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let usuario = auth_service.perfil(&user.id).await?;
    Ok(HttpResponse::Ok().json(usuario))
}

/// PUT /api/auth/password
pub async fn change_password_endpoint(
    user: UsuarioAutenticado,
    auth_service: web::Data<AuthService>,
    body: web::Json<CambiarPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    auth_service
        .cambiar_password(&user.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Contraseña actualizada")))
}
