//! models/acta_model.rs
//! Actas de reunión (revisión por la dirección, comités...).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TipoReunion {
    RevisionDireccion,
    ComiteCalidad,
    Seguimiento,
    Otra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EstadoActa {
    Borrador,
    Aprobada,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acuerdo {
    pub descripcion: String,
    pub responsable: Option<String>,
    pub fecha_limite: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Acta {
    pub id: String,
    pub organizacion_id: String,
    pub codigo: String,
    pub titulo: String,
    pub tipo_reunion: TipoReunion,
    pub fecha: NaiveDate,
    pub lugar: Option<String>,
    pub participantes: Json<Vec<String>>,
    pub temas: String,
    pub acuerdos: Json<Vec<Acuerdo>>,
    pub estado: EstadoActa,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearActaRequest {
    pub codigo: String,
    pub titulo: String,
    pub tipo_reunion: TipoReunion,
    pub fecha: NaiveDate,
    pub lugar: Option<String>,
    #[serde(default)]
    pub participantes: Vec<String>,
    pub temas: String,
    #[serde(default)]
    pub acuerdos: Vec<Acuerdo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarActaRequest {
    pub codigo: Option<String>,
    pub titulo: Option<String>,
    pub tipo_reunion: Option<TipoReunion>,
    pub fecha: Option<NaiveDate>,
    pub lugar: Option<String>,
    pub participantes: Option<Vec<String>>,
    pub temas: Option<String>,
    pub acuerdos: Option<Vec<Acuerdo>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroActas {
    pub estado: Option<EstadoActa>,
    pub tipo_reunion: Option<TipoReunion>,
}
