//! models/accion_model.rs
//! Acciones correctivas, preventivas y de mejora.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::common_model::Alerta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TipoAccion {
    Correctiva,
    Preventiva,
    Mejora,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EstadoAccion {
    Pendiente,
    EnProgreso,
    Completada,
    Verificada,
    Cancelada,
}

impl EstadoAccion {
    pub fn puede_pasar_a(&self, nuevo: EstadoAccion) -> bool {
        use EstadoAccion::*;
        matches!(
            (self, nuevo),
            (Pendiente, EnProgreso)
                | (Pendiente, Completada)
                | (Pendiente, Cancelada)
                | (EnProgreso, Completada)
                | (EnProgreso, Cancelada)
                | (EnProgreso, Pendiente)
                | (Completada, Verificada)
                | (Completada, EnProgreso)
        )
    }

    /// Ya no requiere seguimiento de plazos
    pub fn es_final(&self) -> bool {
        matches!(
            self,
            EstadoAccion::Completada | EstadoAccion::Verificada | EstadoAccion::Cancelada
        )
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Accion {
    pub id: String,
    pub organizacion_id: String,
    pub hallazgo_id: Option<String>,
    pub codigo: String,
    pub tipo: TipoAccion,
    pub descripcion: String,
    pub causa_raiz: Option<String>,
    pub responsable: String,
    pub fecha_compromiso: NaiveDate,
    pub fecha_cierre: Option<NaiveDate>,
    pub estado: EstadoAccion,
    pub eficacia: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccionConAlerta {
    #[serde(flatten)]
    pub accion: Accion,
    pub alerta: Alerta,
    pub dias_restantes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearAccionRequest {
    pub codigo: String,
    pub hallazgo_id: Option<String>,
    pub tipo: TipoAccion,
    pub descripcion: String,
    pub causa_raiz: Option<String>,
    pub responsable: String,
    pub fecha_compromiso: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarAccionRequest {
    pub codigo: Option<String>,
    pub hallazgo_id: Option<String>,
    pub tipo: Option<TipoAccion>,
    pub descripcion: Option<String>,
    pub causa_raiz: Option<String>,
    pub responsable: Option<String>,
    pub fecha_compromiso: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CambiarEstadoAccionRequest {
    pub estado: EstadoAccion,
    pub eficacia: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroAcciones {
    pub estado: Option<EstadoAccion>,
    pub tipo: Option<TipoAccion>,
    pub hallazgo_id: Option<String>,
}
