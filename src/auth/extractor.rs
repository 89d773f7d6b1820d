//! auth/extractor.rs
//! Extractor de actix que valida el bearer token de cada petición.

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::error::{AppError, Result};
use crate::models::usuario_model::Rol;
use crate::services::auth_service::AuthService;

#[derive(Debug, Clone)]
pub struct UsuarioAutenticado {
    pub id: String,
    pub organizacion_id: Option<String>,
    pub rol: Rol,
}

impl UsuarioAutenticado {
    /// Organización sobre la que opera el usuario
    pub fn organizacion(&self) -> Result<&str> {
        self.organizacion_id.as_deref().ok_or_else(|| {
            AppError::Forbidden("El usuario no pertenece a ninguna organización".to_string())
        })
    }

    pub fn requerir_admin(&self) -> Result<()> {
        match self.rol {
            Rol::Admin | Rol::SuperAdmin => Ok(()),
            Rol::Usuario => Err(AppError::Forbidden(
                "Se requiere rol de administrador".to_string(),
            )),
        }
    }

    pub fn requerir_super_admin(&self) -> Result<()> {
        if self.rol != Rol::SuperAdmin {
            return Err(AppError::Forbidden(
                "Se requiere rol de super-admin".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromRequest for UsuarioAutenticado {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_service = req.app_data::<web::Data<AuthService>>().cloned();
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Box::pin(async move {
            let auth_service = auth_service.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("AuthService no registrado en la app"))
            })?;

            let token = header
                .as_deref()
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| AppError::Unauthorized("Token no proporcionado".to_string()))?;

            auth_service.verificar_sesion(token).await
        })
    }
}
