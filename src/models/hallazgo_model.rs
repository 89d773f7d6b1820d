//! models/hallazgo_model.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TipoHallazgo {
    NoConformidadMayor,
    NoConformidadMenor,
    Observacion,
    OportunidadMejora,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EstadoHallazgo {
    Abierto,
    EnTratamiento,
    Cerrado,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Hallazgo {
    pub id: String,
    pub organizacion_id: String,
    pub auditoria_id: Option<String>,
    pub codigo: String,
    pub tipo: TipoHallazgo,
    pub descripcion: String,
    pub proceso: String,
    /// Cláusula de la norma afectada
    pub requisito: Option<String>,
    pub estado: EstadoHallazgo,
    pub fecha_deteccion: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearHallazgoRequest {
    pub codigo: String,
    pub auditoria_id: Option<String>,
    pub tipo: TipoHallazgo,
    pub descripcion: String,
    pub proceso: String,
    pub requisito: Option<String>,
    pub fecha_deteccion: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarHallazgoRequest {
    pub codigo: Option<String>,
    pub auditoria_id: Option<String>,
    pub tipo: Option<TipoHallazgo>,
    pub descripcion: Option<String>,
    pub proceso: Option<String>,
    pub requisito: Option<String>,
    pub estado: Option<EstadoHallazgo>,
    pub fecha_deteccion: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroHallazgos {
    pub estado: Option<EstadoHallazgo>,
    pub tipo: Option<TipoHallazgo>,
    pub auditoria_id: Option<String>,
}
