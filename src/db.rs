//! db.rs
//! Conexión a SQLite y migraciones.

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Abre el pool. Para rutas en disco crea la carpeta contenedora si falta.
pub async fn conectar(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    if let Some(ruta) = database_url.strip_prefix("sqlite:") {
        let ruta = ruta.trim_start_matches("//");
        if !ruta.starts_with(":memory:") {
            if let Some(dir) = std::path::Path::new(ruta).parent() {
                if !dir.as_os_str().is_empty() {
                    std::fs::create_dir_all(dir)
                        .with_context(|| format!("No se pudo crear directorio {:?}", dir))?;
                }
            }
        }
    }

    let opciones = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("DATABASE_URL inválida: {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(opciones)
        .await
        .with_context(|| format!("No se pudo conectar a {}", database_url))?;

    Ok(pool)
}

/// Corre migraciones con sqlx
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Fallo en migraciones")?;
    Ok(())
}
