//! models/capacitacion_model.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Modalidad {
    Presencial,
    Virtual,
    Mixta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EstadoCapacitacion {
    Programada,
    EnCurso,
    Completada,
    Cancelada,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Capacitacion {
    pub id: String,
    pub organizacion_id: String,
    pub codigo: String,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub instructor: Option<String>,
    pub modalidad: Modalidad,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub duracion_horas: f64,
    pub estado: EstadoCapacitacion,
    pub participantes: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearCapacitacionRequest {
    pub codigo: String,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub instructor: Option<String>,
    pub modalidad: Modalidad,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub duracion_horas: f64,
    pub estado: Option<EstadoCapacitacion>,
    #[serde(default)]
    pub participantes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarCapacitacionRequest {
    pub codigo: Option<String>,
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    pub instructor: Option<String>,
    pub modalidad: Option<Modalidad>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub duracion_horas: Option<f64>,
    pub estado: Option<EstadoCapacitacion>,
    pub participantes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroCapacitaciones {
    pub estado: Option<EstadoCapacitacion>,
}
