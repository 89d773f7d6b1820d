//! models/registro_model.rs
//! Registros de procesos: incidentes, no conformidades, reclamos...

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::common_model::{campo_anulable, Alerta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TipoRegistro {
    Incidente,
    NoConformidad,
    HallazgoAuditoria,
    AccionCorrectiva,
    Reclamo,
    Mejora,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Prioridad {
    Baja,
    Media,
    Alta,
    Critica,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EstadoRegistro {
    Abierto,
    EnProgreso,
    Cerrado,
}

impl EstadoRegistro {
    pub fn puede_pasar_a(&self, nuevo: EstadoRegistro) -> bool {
        use EstadoRegistro::*;
        matches!(
            (self, nuevo),
            (Abierto, EnProgreso)
                | (Abierto, Cerrado)
                | (EnProgreso, Cerrado)
                | (EnProgreso, Abierto)
                | (Cerrado, Abierto)
        )
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Registro {
    pub id: String,
    pub organizacion_id: String,
    pub codigo: String,
    pub tipo: TipoRegistro,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub proceso: String,
    pub responsable: Option<String>,
    pub prioridad: Prioridad,
    pub estado: EstadoRegistro,
    pub fecha_apertura: NaiveDate,
    pub fecha_limite: Option<NaiveDate>,
    pub fecha_cierre: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registro con su alerta de vencimiento calculada al momento de la lectura
#[derive(Debug, Clone, Serialize)]
pub struct RegistroConAlerta {
    #[serde(flatten)]
    pub registro: Registro,
    pub alerta: Alerta,
    pub dias_restantes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HistorialRegistro {
    pub id: String,
    pub registro_id: String,
    pub estado_anterior: EstadoRegistro,
    pub estado_nuevo: EstadoRegistro,
    pub usuario_id: String,
    pub comentario: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearRegistroRequest {
    pub codigo: String,
    pub tipo: TipoRegistro,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub proceso: String,
    pub responsable: Option<String>,
    pub prioridad: Option<Prioridad>,
    pub fecha_apertura: Option<NaiveDate>,
    pub fecha_limite: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarRegistroRequest {
    pub codigo: Option<String>,
    pub tipo: Option<TipoRegistro>,
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    pub proceso: Option<String>,
    pub responsable: Option<String>,
    pub prioridad: Option<Prioridad>,
    pub fecha_apertura: Option<NaiveDate>,
    /// Ausente: no cambia. `null`: quita la fecha límite.
    #[serde(default, deserialize_with = "campo_anulable")]
    pub fecha_limite: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CambiarEstadoRegistroRequest {
    pub estado: EstadoRegistro,
    pub comentario: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroRegistros {
    pub estado: Option<EstadoRegistro>,
    pub tipo: Option<TipoRegistro>,
    pub prioridad: Option<Prioridad>,
    pub proceso: Option<String>,
    pub q: Option<String>,
}
