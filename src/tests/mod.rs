//! tests/mod.rs
//! Utilidades compartidas por las pruebas: base SQLite en memoria y datos base.

mod auth_tests;
mod dashboard_tests;
mod indicador_tests;
mod registro_tests;
mod super_admin_tests;

use sqlx::{Pool, Sqlite};

use crate::config::app_config::AppConfig;
use crate::db;
use crate::models::organizacion_model::CrearOrganizacionRequest;
use crate::models::usuario_model::{CrearUsuarioRequest, Rol, Usuario};
use crate::services::organizacion_service::OrganizacionService;
use crate::services::usuario_service::UsuarioService;

pub const PASSWORD_PRUEBA: &str = "clave-segura-123";

// Una sola conexión: cada conexión a ":memory:" abre una base distinta
pub async fn pool_de_prueba() -> Pool<Sqlite> {
    let pool = db::conectar("sqlite::memory:", 1)
        .await
        .expect("No se pudo abrir SQLite en memoria");
    db::run_migrations(&pool)
        .await
        .expect("Fallo en migraciones de prueba");
    pool
}

/// Base en disco con varias conexiones, para pruebas de concurrencia.
/// El `TempDir` debe vivir mientras se use el pool.
pub async fn pool_en_archivo() -> (tempfile::TempDir, Pool<Sqlite>) {
    let dir = tempfile::tempdir().expect("No se pudo crear directorio temporal");
    let url = format!("sqlite:{}", dir.path().join("sgc-test.db").display());
    let pool = db::conectar(&url, 5)
        .await
        .expect("No se pudo abrir SQLite en disco");
    db::run_migrations(&pool)
        .await
        .expect("Fallo en migraciones de prueba");
    (dir, pool)
}

pub fn config_de_prueba() -> AppConfig {
    AppConfig {
        jwt_secret: "secreto-de-pruebas".to_string(),
        ..AppConfig::default()
    }
}

pub async fn crear_organizacion(pool: &Pool<Sqlite>, nombre: &str) -> String {
    OrganizacionService::new(pool.clone())
        .crear(CrearOrganizacionRequest {
            nombre: nombre.to_string(),
            nit: None,
            plan: None,
        })
        .await
        .expect("No se pudo crear la organización")
        .id
}

pub async fn crear_usuario(pool: &Pool<Sqlite>, org: &str, email: &str, rol: Rol) -> Usuario {
    UsuarioService::new(pool.clone())
        .crear(
            org,
            CrearUsuarioRequest {
                nombre: "Usuario de prueba".to_string(),
                email: email.to_string(),
                password: PASSWORD_PRUEBA.to_string(),
                rol: Some(rol),
            },
        )
        .await
        .expect("No se pudo crear el usuario")
}
