//! models/dashboard_model.rs

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResumenIndicadores {
    pub total: i64,
    pub cumple: i64,
    pub alerta: i64,
    pub critico: i64,
    pub sin_datos: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    pub indicadores: ResumenIndicadores,
    pub registros_abiertos: i64,
    pub registros_vencidos: i64,
    pub registros_por_vencer: i64,
    pub acciones_pendientes: i64,
    pub acciones_vencidas: i64,
    pub capacitaciones_programadas: i64,
    pub auditorias_planificadas: i64,
    pub hallazgos_abiertos: i64,
    pub actas_borrador: i64,
}
