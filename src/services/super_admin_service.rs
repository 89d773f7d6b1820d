//! services/super_admin_service.rs
//! Estadísticas globales y visor de esquema para la consola de super-admin.

use sqlx::{Pool, Sqlite};

use crate::error::Result;
use crate::models::organizacion_model::{
    ColumnaEsquema, EstadisticaOrganizacion, EstadisticasGlobales, TablaEsquema,
};

#[derive(Clone, Debug)]
pub struct SuperAdminService {
    db_pool: Pool<Sqlite>,
}

impl SuperAdminService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        SuperAdminService { db_pool }
    }

    pub async fn estadisticas(&self) -> Result<EstadisticasGlobales> {
        let detalle = sqlx::query_as::<_, EstadisticaOrganizacion>(
            r#"
            SELECT
                o.id AS organizacion_id,
                o.nombre,
                o.activa,
                (SELECT COUNT(*) FROM usuarios u WHERE u.organizacion_id = o.id) AS usuarios,
                (SELECT COUNT(*) FROM indicadores i WHERE i.organizacion_id = o.id) AS indicadores,
                (SELECT COUNT(*) FROM registros r WHERE r.organizacion_id = o.id) AS registros,
                (SELECT COUNT(*) FROM registros r
                    WHERE r.organizacion_id = o.id AND r.estado != 'cerrado') AS registros_abiertos,
                (SELECT COUNT(*) FROM acciones a WHERE a.organizacion_id = o.id) AS acciones
            FROM organizaciones o
            ORDER BY o.nombre
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        let (usuarios,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usuarios")
            .fetch_one(&self.db_pool)
            .await?;

        Ok(EstadisticasGlobales {
            organizaciones: detalle.len() as i64,
            organizaciones_activas: detalle.iter().filter(|d| d.activa).count() as i64,
            usuarios,
            indicadores: detalle.iter().map(|d| d.indicadores).sum(),
            registros: detalle.iter().map(|d| d.registros).sum(),
            acciones: detalle.iter().map(|d| d.acciones).sum(),
            detalle,
        })
    }

    /// Tablas de la base con sus columnas y cantidad de filas
    pub async fn esquema(&self) -> Result<Vec<TablaEsquema>> {
        let tablas: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        let mut resultado = Vec::with_capacity(tablas.len());
        for (nombre,) in tablas {
            let columnas = sqlx::query_as::<_, ColumnaEsquema>(
                r#"
                SELECT name AS nombre, type AS tipo, "notnull" AS no_nulo, pk > 0 AS clave_primaria
                FROM pragma_table_info(?1)
                ORDER BY cid
                "#,
            )
            .bind(&nombre)
            .fetch_all(&self.db_pool)
            .await?;

            // el nombre sale de sqlite_master, no de la petición
            let sql = format!("SELECT COUNT(*) FROM \"{}\"", nombre.replace('"', "\"\""));
            let (filas,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.db_pool).await?;

            resultado.push(TablaEsquema {
                nombre,
                filas,
                columnas,
            });
        }
        Ok(resultado)
    }
}
