//! services/dashboard_service.rs
//! Conteos para la pantalla principal de cada organización.

use sqlx::{Pool, Sqlite};

use crate::error::Result;
use crate::models::common_model::Alerta;
use crate::models::dashboard_model::{Dashboard, ResumenIndicadores};
use crate::models::indicador_model::EstadoIndicador;
use crate::services::accion_service::AccionService;
use crate::services::registro_service::RegistroService;

#[derive(Clone, Debug)]
pub struct DashboardService {
    db_pool: Pool<Sqlite>,
    registro_service: RegistroService,
    accion_service: AccionService,
}

impl DashboardService {
    pub fn new(
        db_pool: Pool<Sqlite>,
        registro_service: RegistroService,
        accion_service: AccionService,
    ) -> Self {
        Self {
            db_pool,
            registro_service,
            accion_service,
        }
    }

    async fn contar(&self, sql: &str, org: &str) -> Result<i64> {
        let (n,): (i64,) = sqlx::query_as(sql)
            .bind(org)
            .fetch_one(&self.db_pool)
            .await?;
        Ok(n)
    }

    pub async fn resumen(&self, org: &str) -> Result<Dashboard> {
        let por_estado: Vec<(EstadoIndicador, i64)> = sqlx::query_as(
            "SELECT estado, COUNT(*) FROM indicadores WHERE organizacion_id = ?1 GROUP BY estado",
        )
        .bind(org)
        .fetch_all(&self.db_pool)
        .await?;

        let mut indicadores = ResumenIndicadores::default();
        for (estado, n) in por_estado {
            indicadores.total += n;
            match estado {
                EstadoIndicador::Cumple => indicadores.cumple = n,
                EstadoIndicador::Alerta => indicadores.alerta = n,
                EstadoIndicador::Critico => indicadores.critico = n,
                EstadoIndicador::SinDatos => indicadores.sin_datos = n,
            }
        }

        let alertas_registros = self.registro_service.alertas(org).await?;
        let alertas_acciones = self.accion_service.alertas(org).await?;

        Ok(Dashboard {
            indicadores,
            registros_abiertos: self
                .contar(
                    "SELECT COUNT(*) FROM registros WHERE organizacion_id = ?1 AND estado != 'cerrado'",
                    org,
                )
                .await?,
            registros_vencidos: alertas_registros
                .iter()
                .filter(|r| r.alerta == Alerta::Vencido)
                .count() as i64,
            registros_por_vencer: alertas_registros
                .iter()
                .filter(|r| r.alerta == Alerta::PorVencer)
                .count() as i64,
            acciones_pendientes: self
                .contar(
                    "SELECT COUNT(*) FROM acciones WHERE organizacion_id = ?1 AND estado IN ('pendiente', 'en_progreso')",
                    org,
                )
                .await?,
            acciones_vencidas: alertas_acciones
                .iter()
                .filter(|a| a.alerta == Alerta::Vencido)
                .count() as i64,
            capacitaciones_programadas: self
                .contar(
                    "SELECT COUNT(*) FROM capacitaciones WHERE organizacion_id = ?1 AND estado = 'programada'",
                    org,
                )
                .await?,
            auditorias_planificadas: self
                .contar(
                    "SELECT COUNT(*) FROM auditorias WHERE organizacion_id = ?1 AND estado = 'planificada'",
                    org,
                )
                .await?,
            hallazgos_abiertos: self
                .contar(
                    "SELECT COUNT(*) FROM hallazgos WHERE organizacion_id = ?1 AND estado != 'cerrado'",
                    org,
                )
                .await?,
            actas_borrador: self
                .contar(
                    "SELECT COUNT(*) FROM actas WHERE organizacion_id = ?1 AND estado = 'borrador'",
                    org,
                )
                .await?,
        })
    }
}
