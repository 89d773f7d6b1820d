//! models/indicador_model.rs
//! Indicadores de calidad y sus mediciones.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Frecuencia {
    Mensual,
    Trimestral,
    Semestral,
    Anual,
}

/// Hacia dónde mejora el indicador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Sentido {
    /// Mayor es mejor
    Ascendente,
    /// Menor es mejor
    Descendente,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Tendencia {
    Subiendo,
    Bajando,
    Estable,
    SinDatos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EstadoIndicador {
    Cumple,
    Alerta,
    Critico,
    SinDatos,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Indicador {
    pub id: String,
    pub organizacion_id: String,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub proceso: String,
    pub unidad: String,
    pub frecuencia: Frecuencia,
    pub sentido: Sentido,
    pub meta: f64,
    pub umbral_critico: f64,
    pub responsable: Option<String>,
    pub valor_actual: Option<f64>,
    pub valor_anterior: Option<f64>,
    pub tendencia: Tendencia,
    pub estado: EstadoIndicador,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Medicion {
    pub id: String,
    pub organizacion_id: String,
    pub indicador_id: String,
    pub valor: f64,
    pub fecha: NaiveDate,
    pub observaciones: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Indicador con su historial reciente
#[derive(Debug, Clone, Serialize)]
pub struct IndicadorDetalle {
    #[serde(flatten)]
    pub indicador: Indicador,
    /// Variación porcentual entre las dos últimas mediciones
    pub variacion_porcentual: Option<f64>,
    pub mediciones: Vec<Medicion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearIndicadorRequest {
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub proceso: String,
    pub unidad: String,
    pub frecuencia: Frecuencia,
    pub sentido: Sentido,
    pub meta: f64,
    pub umbral_critico: f64,
    pub responsable: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarIndicadorRequest {
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub proceso: Option<String>,
    pub unidad: Option<String>,
    pub frecuencia: Option<Frecuencia>,
    pub sentido: Option<Sentido>,
    pub meta: Option<f64>,
    pub umbral_critico: Option<f64>,
    pub responsable: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearMedicionRequest {
    pub valor: f64,
    pub fecha: NaiveDate,
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroIndicadores {
    pub proceso: Option<String>,
    pub estado: Option<EstadoIndicador>,
    pub q: Option<String>,
}
