//! models/usuario_model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Rol {
    SuperAdmin,
    Admin,
    Usuario,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::SuperAdmin => "super_admin",
            Rol::Admin => "admin",
            Rol::Usuario => "usuario",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Usuario {
    pub id: String,
    pub organizacion_id: Option<String>,
    pub nombre: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub rol: Rol,
    pub activo: bool,
    pub ultimo_acceso: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearUsuarioRequest {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub rol: Option<Rol>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarUsuarioRequest {
    pub nombre: Option<String>,
    pub rol: Option<Rol>,
    pub activo: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FiltroUsuarios {
    pub organizacion_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub usuario: Usuario,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CambiarPasswordRequest {
    pub password_actual: String,
    pub password_nuevo: String,
}
