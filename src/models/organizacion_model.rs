//! models/organizacion_model.rs
//! Organizaciones (tenants) y estructuras de la consola de super-admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Plan {
    Basico,
    Profesional,
    Empresarial,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Organizacion {
    pub id: String,
    pub nombre: String,
    pub nit: Option<String>,
    pub plan: Plan,
    pub activa: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearOrganizacionRequest {
    pub nombre: String,
    pub nit: Option<String>,
    pub plan: Option<Plan>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarOrganizacionRequest {
    pub nombre: Option<String>,
    pub nit: Option<String>,
    pub plan: Option<Plan>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CambiarEstadoOrganizacionRequest {
    pub activa: bool,
}

/// Conteos por organización para el panel de super-admin
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EstadisticaOrganizacion {
    pub organizacion_id: String,
    pub nombre: String,
    pub activa: bool,
    pub usuarios: i64,
    pub indicadores: i64,
    pub registros: i64,
    pub registros_abiertos: i64,
    pub acciones: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EstadisticasGlobales {
    pub organizaciones: i64,
    pub organizaciones_activas: i64,
    pub usuarios: i64,
    pub indicadores: i64,
    pub registros: i64,
    pub acciones: i64,
    pub detalle: Vec<EstadisticaOrganizacion>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ColumnaEsquema {
    pub nombre: String,
    pub tipo: String,
    pub no_nulo: bool,
    pub clave_primaria: bool,
}

/// Tabla de la base de datos tal como la ve el visor de esquema
#[derive(Debug, Clone, Serialize)]
pub struct TablaEsquema {
    pub nombre: String,
    pub filas: i64,
    pub columnas: Vec<ColumnaEsquema>,
}
