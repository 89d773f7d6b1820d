//! models/common_model.rs
//! Estructuras compartidas por todos los módulos: paginación, listas, alertas.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

pub const PAGE_SIZE_DEFAULT: u64 = 20;
pub const PAGE_SIZE_MAX: u64 = 100;

#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PaginationQuery {
    /// (page, page_size) normalizados
    pub fn normalizar(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(PAGE_SIZE_DEFAULT)
            .clamp(1, PAGE_SIZE_MAX);
        (page, page_size)
    }

    /// LIMIT y OFFSET para SQLite. Un `page` cuyo offset no cabe en i64 es inválido.
    pub fn limit_offset(&self) -> Result<(i64, i64)> {
        let (page, page_size) = self.normalizar();
        let offset = (page - 1)
            .checked_mul(page_size)
            .and_then(|o| i64::try_from(o).ok())
            .ok_or_else(|| AppError::validation(format!("page fuera de rango: {}", page)))?;
        Ok((page_size as i64, offset))
    }
}

/// Para campos de PATCH/PUT donde `null` borra el valor y la ausencia lo conserva.
/// Se usa junto con `#[serde(default)]`.
pub fn campo_anulable<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Para listar con paginación
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(total: i64, pagination: &PaginationQuery, items: Vec<T>) -> Self {
        let (page, page_size) = pagination.normalizar();
        ListResponse {
            total: total.max(0) as u64,
            page,
            page_size,
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        MessageResponse {
            success: true,
            message: message.into(),
        }
    }
}

/// Situación de un elemento con fecha límite respecto a hoy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alerta {
    Vencido,
    PorVencer,
    EnPlazo,
    SinFecha,
    Cerrado,
}

/// Calcula la alerta y los días que faltan para `fecha_limite`.
///
/// Un elemento cerrado nunca alerta. Sin fecha límite no hay días restantes.
pub fn calcular_alerta(
    cerrado: bool,
    fecha_limite: Option<NaiveDate>,
    hoy: NaiveDate,
    dias_aviso: i64,
) -> (Alerta, Option<i64>) {
    let Some(limite) = fecha_limite else {
        return if cerrado {
            (Alerta::Cerrado, None)
        } else {
            (Alerta::SinFecha, None)
        };
    };

    let dias_restantes = (limite - hoy).num_days();
    if cerrado {
        return (Alerta::Cerrado, Some(dias_restantes));
    }

    let alerta = if dias_restantes < 0 {
        Alerta::Vencido
    } else if dias_restantes <= dias_aviso {
        Alerta::PorVencer
    } else {
        Alerta::EnPlazo
    };
    (alerta, Some(dias_restantes))
}
