//! models/auditoria_model.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const NORMA_DEFAULT: &str = "ISO 9001:2015";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TipoAuditoria {
    Interna,
    Externa,
    Certificacion,
    Seguimiento,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EstadoAuditoria {
    Planificada,
    EnCurso,
    Completada,
    Cancelada,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Auditoria {
    pub id: String,
    pub organizacion_id: String,
    pub codigo: String,
    pub tipo: TipoAuditoria,
    pub norma: String,
    pub alcance: String,
    pub auditor_lider: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub estado: EstadoAuditoria,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearAuditoriaRequest {
    pub codigo: String,
    pub tipo: TipoAuditoria,
    pub norma: Option<String>,
    pub alcance: String,
    pub auditor_lider: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub estado: Option<EstadoAuditoria>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarAuditoriaRequest {
    pub codigo: Option<String>,
    pub tipo: Option<TipoAuditoria>,
    pub norma: Option<String>,
    pub alcance: Option<String>,
    pub auditor_lider: Option<String>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub estado: Option<EstadoAuditoria>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroAuditorias {
    pub estado: Option<EstadoAuditoria>,
    pub tipo: Option<TipoAuditoria>,
}
