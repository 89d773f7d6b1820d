//! services/usuario_service.rs

use chrono::Utc;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::auth::password::{hash_password, LONGITUD_MINIMA};
use crate::error::{AppError, Result};
use crate::models::usuario_model::{ActualizarUsuarioRequest, CrearUsuarioRequest, Rol, Usuario};
use crate::services::comun::texto_requerido;

#[derive(Clone, Debug)]
pub struct UsuarioService {
    db_pool: Pool<Sqlite>,
}

impl UsuarioService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        UsuarioService { db_pool }
    }

    /// Sin organización lista los usuarios de todo el despliegue
    pub async fn listar(&self, organizacion_id: Option<&str>) -> Result<Vec<Usuario>> {
        let usuarios = match organizacion_id {
            Some(org) => {
                sqlx::query_as::<_, Usuario>(
                    "SELECT * FROM usuarios WHERE organizacion_id = ?1 ORDER BY nombre",
                )
                .bind(org)
                .fetch_all(&self.db_pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Usuario>(
                    "SELECT * FROM usuarios ORDER BY organizacion_id, nombre",
                )
                .fetch_all(&self.db_pool)
                .await?
            }
        };
        Ok(usuarios)
    }

    pub async fn obtener(&self, id: &str) -> Result<Usuario> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found("Usuario no encontrado"))
    }

    pub async fn obtener_en_organizacion(&self, organizacion_id: &str, id: &str) -> Result<Usuario> {
        sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE id = ?1 AND organizacion_id = ?2",
        )
        .bind(id)
        .bind(organizacion_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Usuario no encontrado"))
    }

    pub async fn buscar_por_email(&self, email: &str) -> Result<Option<Usuario>> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = ?1")
            .bind(normalizar_email(email))
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(usuario)
    }

    /// Crea un usuario de una organización. El rol super_admin no se asigna por aquí.
    pub async fn crear(&self, organizacion_id: &str, req: CrearUsuarioRequest) -> Result<Usuario> {
        let rol = req.rol.unwrap_or(Rol::Usuario);
        if rol == Rol::SuperAdmin {
            return Err(AppError::Forbidden(
                "No se puede asignar el rol super_admin".to_string(),
            ));
        }
        self.insertar(Some(organizacion_id), req, rol).await
    }

    pub async fn crear_super_admin(&self, email: &str, password: &str) -> Result<Usuario> {
        let req = CrearUsuarioRequest {
            nombre: "Super Admin".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            rol: Some(Rol::SuperAdmin),
        };
        self.insertar(None, req, Rol::SuperAdmin).await
    }

    async fn insertar(
        &self,
        organizacion_id: Option<&str>,
        req: CrearUsuarioRequest,
        rol: Rol,
    ) -> Result<Usuario> {
        let nombre = texto_requerido("nombre", &req.nombre)?;
        let email = normalizar_email(&req.email);
        if !email_valido(&email) {
            return Err(AppError::validation("El email no es válido"));
        }
        validar_password(&req.password)?;

        if self.buscar_por_email(&email).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Ya existe un usuario con el email '{}'",
                email
            )));
        }

        let id = Uuid::new_v4().to_string();
        let password_hash = hash_password(&req.password)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO usuarios (
                id, organizacion_id, nombre, email, password_hash,
                rol, activo, ultimo_acceso, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, TRUE, NULL, ?7, ?7)
            "#,
        )
        .bind(&id)
        .bind(organizacion_id)
        .bind(&nombre)
        .bind(&email)
        .bind(&password_hash)
        .bind(rol)
        .bind(now)
        .execute(&self.db_pool)
        .await?;

        log::info!("Usuario creado id={} rol={}", id, rol.as_str());
        self.obtener(&id).await
    }

    /// `solicitante_id` es quien hace el cambio; no puede desactivarse a sí mismo
    pub async fn actualizar(
        &self,
        organizacion_id: &str,
        id: &str,
        req: ActualizarUsuarioRequest,
        solicitante_id: &str,
    ) -> Result<Usuario> {
        let mut usuario = self.obtener_en_organizacion(organizacion_id, id).await?;

        if let Some(nombre) = req.nombre {
            usuario.nombre = texto_requerido("nombre", &nombre)?;
        }
        if let Some(rol) = req.rol {
            if rol == Rol::SuperAdmin {
                return Err(AppError::Forbidden(
                    "No se puede asignar el rol super_admin".to_string(),
                ));
            }
            usuario.rol = rol;
        }
        if let Some(activo) = req.activo {
            if !activo && id == solicitante_id {
                return Err(AppError::validation("No puede desactivar su propio usuario"));
            }
            usuario.activo = activo;
        }

        sqlx::query(
            r#"
            UPDATE usuarios
            SET nombre = ?2, rol = ?3, activo = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&usuario.nombre)
        .bind(usuario.rol)
        .bind(usuario.activo)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        self.obtener(id).await
    }

    pub async fn actualizar_password_hash(&self, id: &str, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE usuarios SET password_hash = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(password_hash)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }

    pub async fn registrar_acceso(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE usuarios SET ultimo_acceso = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }

    /// Destinatarios de las alertas por correo
    pub async fn admins_activos(&self, organizacion_id: &str) -> Result<Vec<Usuario>> {
        let admins = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT * FROM usuarios
            WHERE organizacion_id = ?1 AND rol = ?2 AND activo = TRUE
            ORDER BY nombre
            "#,
        )
        .bind(organizacion_id)
        .bind(Rol::Admin)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(admins)
    }
}

pub fn normalizar_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_valido(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, dominio)) => {
            !local.is_empty() && dominio.contains('.') && !dominio.starts_with('.')
        }
        None => false,
    }
}

pub fn validar_password(password: &str) -> Result<()> {
    if password.chars().count() < LONGITUD_MINIMA {
        return Err(AppError::validation(format!(
            "La contraseña debe tener al menos {} caracteres",
            LONGITUD_MINIMA
        )));
    }
    Ok(())
}
