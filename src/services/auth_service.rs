//! services/auth_service.rs
//! Inicio de sesión y validación de tokens.

use crate::auth::extractor::UsuarioAutenticado;
use crate::auth::jwt::{create_token, verify_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, Result};
use crate::models::usuario_model::{AuthResponse, CambiarPasswordRequest, LoginRequest, Usuario};
use crate::services::organizacion_service::OrganizacionService;
use crate::services::usuario_service::{validar_password, UsuarioService};

const CREDENCIALES_INVALIDAS: &str = "Credenciales inválidas";

#[derive(Clone, Debug)]
pub struct AuthService {
    usuario_service: UsuarioService,
    organizacion_service: OrganizacionService,
    jwt_secret: String,
    jwt_expiracion_horas: i64,
}

impl AuthService {
    pub fn new(
        usuario_service: UsuarioService,
        organizacion_service: OrganizacionService,
        jwt_secret: String,
        jwt_expiracion_horas: i64,
    ) -> Self {
        Self {
            usuario_service,
            organizacion_service,
            jwt_secret,
            jwt_expiracion_horas,
        }
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let usuario = match self.usuario_service.buscar_por_email(&req.email).await? {
            Some(u) => u,
            None => {
                log::warn!("Login rechazado: email desconocido");
                return Err(AppError::Unauthorized(CREDENCIALES_INVALIDAS.to_string()));
            }
        };

        if !verify_password(&req.password, &usuario.password_hash)? {
            log::warn!("Login rechazado: contraseña incorrecta usuario={}", usuario.id);
            return Err(AppError::Unauthorized(CREDENCIALES_INVALIDAS.to_string()));
        }

        self.verificar_acceso(&usuario).await?;

        let token = create_token(
            &self.jwt_secret,
            &usuario.id,
            usuario.organizacion_id.as_deref(),
            usuario.rol,
            self.jwt_expiracion_horas,
        )?;
        self.usuario_service.registrar_acceso(&usuario.id).await?;

        Ok(AuthResponse { token, usuario })
    }

    /// Valida el token y que el usuario y su organización sigan activos
    pub async fn verificar_sesion(&self, token: &str) -> Result<UsuarioAutenticado> {
        let claims = verify_token(&self.jwt_secret, token).map_err(|e| {
            log::warn!("{}", e);
            AppError::Unauthorized("Token inválido o expirado".to_string())
        })?;

        let usuario = match self.usuario_service.obtener(&claims.sub).await {
            Ok(u) => u,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Unauthorized("Usuario no encontrado".to_string()))
            }
            Err(e) => return Err(e),
        };
        self.verificar_acceso(&usuario).await?;

        // El rol y la organización salen de la base, no del token
        Ok(UsuarioAutenticado {
            id: usuario.id,
            organizacion_id: usuario.organizacion_id,
            rol: usuario.rol,
        })
    }

    pub async fn perfil(&self, usuario_id: &str) -> Result<Usuario> {
        self.usuario_service.obtener(usuario_id).await
    }

    pub async fn cambiar_password(
        &self,
        usuario_id: &str,
        req: CambiarPasswordRequest,
    ) -> Result<()> {
        let usuario = self.usuario_service.obtener(usuario_id).await?;

        if !verify_password(&req.password_actual, &usuario.password_hash)? {
            return Err(AppError::validation("La contraseña actual es incorrecta"));
        }
        validar_password(&req.password_nuevo)?;

        let nuevo_hash = hash_password(&req.password_nuevo)?;
        self.usuario_service
            .actualizar_password_hash(usuario_id, &nuevo_hash)
            .await?;

        log::info!("Contraseña actualizada usuario={}", usuario_id);
        Ok(())
    }

    /// Crea el super-admin inicial si no existe. Devuelve true si lo creó.
    pub async fn bootstrap_super_admin(&self, email: &str, password: &str) -> Result<bool> {
        if self.usuario_service.buscar_por_email(email).await?.is_some() {
            return Ok(false);
        }
        self.usuario_service.crear_super_admin(email, password).await?;
        log::info!("Super-admin inicial creado: {}", email);
        Ok(true)
    }

    async fn verificar_acceso(&self, usuario: &Usuario) -> Result<()> {
        if !usuario.activo {
            return Err(AppError::Unauthorized("Usuario desactivado".to_string()));
        }
        if let Some(org_id) = &usuario.organizacion_id {
            let org = self.organizacion_service.obtener(org_id).await?;
            if !org.activa {
                return Err(AppError::Forbidden("La organización está desactivada".to_string()));
            }
        }
        Ok(())
    }
}
