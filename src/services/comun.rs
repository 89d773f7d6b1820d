//! services/comun.rs
//! Validaciones y consultas que repiten todos los servicios.

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Sqlite};

use crate::error::{AppError, Result};

pub fn hoy() -> NaiveDate {
    Utc::now().date_naive()
}

/// Recorta y exige contenido
pub fn texto_requerido(campo: &str, valor: &str) -> Result<String> {
    let limpio = valor.trim();
    if limpio.is_empty() {
        return Err(AppError::validation(format!(
            "El campo '{}' es obligatorio",
            campo
        )));
    }
    Ok(limpio.to_string())
}

/// Recorta; una cadena vacía equivale a no enviar el campo
pub fn texto_opcional(valor: Option<String>) -> Option<String> {
    valor
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn validar_rango_fechas(
    inicio: NaiveDate,
    fin: NaiveDate,
    campo_inicio: &str,
    campo_fin: &str,
) -> Result<()> {
    if fin < inicio {
        return Err(AppError::validation(format!(
            "'{}' no puede ser anterior a '{}'",
            campo_fin, campo_inicio
        )));
    }
    Ok(())
}

pub fn validar_numero(campo: &str, valor: f64) -> Result<()> {
    if !valor.is_finite() {
        return Err(AppError::validation(format!(
            "El campo '{}' debe ser un número válido",
            campo
        )));
    }
    Ok(())
}

/// El código de un registro es único dentro de la organización.
/// `tabla` siempre es un literal del propio servicio.
pub async fn verificar_codigo_unico(
    db_pool: &Pool<Sqlite>,
    tabla: &'static str,
    organizacion_id: &str,
    codigo: &str,
    excluir_id: Option<&str>,
) -> Result<()> {
    let sql = format!(
        "SELECT COUNT(*) FROM {tabla} WHERE organizacion_id = ?1 AND codigo = ?2 AND id != ?3"
    );
    let (existentes,): (i64,) = sqlx::query_as(&sql)
        .bind(organizacion_id)
        .bind(codigo)
        .bind(excluir_id.unwrap_or(""))
        .fetch_one(db_pool)
        .await?;

    if existentes > 0 {
        return Err(AppError::conflict(format!(
            "Ya existe un elemento con el código '{}'",
            codigo
        )));
    }
    Ok(())
}

/// Verifica que `id` exista en `tabla` para la organización.
pub async fn existe_en_organizacion(
    db_pool: &Pool<Sqlite>,
    tabla: &'static str,
    organizacion_id: &str,
    id: &str,
) -> Result<bool> {
    let sql = format!("SELECT COUNT(*) FROM {tabla} WHERE organizacion_id = ?1 AND id = ?2");
    let (n,): (i64,) = sqlx::query_as(&sql)
        .bind(organizacion_id)
        .bind(id)
        .fetch_one(db_pool)
        .await?;
    Ok(n > 0)
}
