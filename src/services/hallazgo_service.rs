//! services/hallazgo_service.rs

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::accion_model::{Accion, EstadoAccion};
use crate::models::common_model::{ListResponse, PaginationQuery};
use crate::models::hallazgo_model::{
    ActualizarHallazgoRequest, CrearHallazgoRequest, EstadoHallazgo, FiltroHallazgos, Hallazgo,
};
use crate::services::comun::{
    existe_en_organizacion, hoy, texto_opcional, texto_requerido, verificar_codigo_unico,
};

#[derive(Clone, Debug)]
pub struct HallazgoService {
    db_pool: Pool<Sqlite>,
}

impl HallazgoService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        HallazgoService { db_pool }
    }

    fn aplicar_filtros(qb: &mut QueryBuilder<'_, Sqlite>, org: &str, filtro: &FiltroHallazgos) {
        qb.push(" WHERE organizacion_id = ").push_bind(org.to_string());
        if let Some(estado) = filtro.estado {
            qb.push(" AND estado = ").push_bind(estado);
        }
        if let Some(tipo) = filtro.tipo {
            qb.push(" AND tipo = ").push_bind(tipo);
        }
        if let Some(auditoria_id) = &filtro.auditoria_id {
            qb.push(" AND auditoria_id = ").push_bind(auditoria_id.clone());
        }
    }

    pub async fn listar(
        &self,
        org: &str,
        filtro: FiltroHallazgos,
        pagination: PaginationQuery,
    ) -> Result<ListResponse<Hallazgo>> {
        let (limit, offset) = pagination.limit_offset()?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM hallazgos");
        Self::aplicar_filtros(&mut count_qb, org, &filtro);
        let (total,): (i64,) = count_qb.build_query_as().fetch_one(&self.db_pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM hallazgos");
        Self::aplicar_filtros(&mut qb, org, &filtro);
        qb.push(" ORDER BY fecha_deteccion DESC, codigo LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let items = qb
            .build_query_as::<Hallazgo>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(ListResponse::new(total, &pagination, items))
    }

    pub async fn obtener(&self, org: &str, id: &str) -> Result<Hallazgo> {
        sqlx::query_as::<_, Hallazgo>(
            "SELECT * FROM hallazgos WHERE id = ?1 AND organizacion_id = ?2",
        )
        .bind(id)
        .bind(org)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Hallazgo no encontrado"))
    }

    /// La auditoría referenciada debe ser de la misma organización
    async fn validar_auditoria(&self, org: &str, auditoria_id: Option<&str>) -> Result<()> {
        if let Some(aud_id) = auditoria_id {
            if !existe_en_organizacion(&self.db_pool, "auditorias", org, aud_id).await? {
                return Err(AppError::validation("La auditoría indicada no existe"));
            }
        }
        Ok(())
    }

    pub async fn crear(&self, org: &str, req: CrearHallazgoRequest) -> Result<Hallazgo> {
        let codigo = texto_requerido("codigo", &req.codigo)?;
        let descripcion = texto_requerido("descripcion", &req.descripcion)?;
        let proceso = texto_requerido("proceso", &req.proceso)?;
        let auditoria_id = texto_opcional(req.auditoria_id);
        self.validar_auditoria(org, auditoria_id.as_deref()).await?;
        verificar_codigo_unico(&self.db_pool, "hallazgos", org, &codigo, None).await?;

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO hallazgos (
                id, organizacion_id, auditoria_id, codigo, tipo, descripcion, proceso,
                requisito, estado, fecha_deteccion, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            "#,
        )
        .bind(&id)
        .bind(org)
        .bind(&auditoria_id)
        .bind(&codigo)
        .bind(req.tipo)
        .bind(&descripcion)
        .bind(&proceso)
        .bind(texto_opcional(req.requisito))
        .bind(EstadoHallazgo::Abierto)
        .bind(req.fecha_deteccion.unwrap_or_else(hoy))
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        log::info!("Hallazgo creado org={} codigo={}", org, codigo);
        self.obtener(org, &id).await
    }

    pub async fn actualizar(
        &self,
        org: &str,
        id: &str,
        req: ActualizarHallazgoRequest,
    ) -> Result<Hallazgo> {
        let mut hal = self.obtener(org, id).await?;

        if let Some(codigo) = req.codigo {
            let codigo = texto_requerido("codigo", &codigo)?;
            if codigo != hal.codigo {
                verificar_codigo_unico(&self.db_pool, "hallazgos", org, &codigo, Some(id)).await?;
            }
            hal.codigo = codigo;
        }
        if req.auditoria_id.is_some() {
            hal.auditoria_id = texto_opcional(req.auditoria_id);
            self.validar_auditoria(org, hal.auditoria_id.as_deref()).await?;
        }
        if let Some(tipo) = req.tipo {
            hal.tipo = tipo;
        }
        if let Some(descripcion) = req.descripcion {
            hal.descripcion = texto_requerido("descripcion", &descripcion)?;
        }
        if let Some(proceso) = req.proceso {
            hal.proceso = texto_requerido("proceso", &proceso)?;
        }
        if req.requisito.is_some() {
            hal.requisito = texto_opcional(req.requisito);
        }
        if let Some(fecha) = req.fecha_deteccion {
            hal.fecha_deteccion = fecha;
        }
        if let Some(estado) = req.estado {
            if estado == EstadoHallazgo::Cerrado && hal.estado != EstadoHallazgo::Cerrado {
                self.verificar_acciones_cerradas(org, id).await?;
            }
            hal.estado = estado;
        }

        // Al cerrar, las acciones pendientes se comprueban otra vez dentro del mismo UPDATE
        let actualizadas = sqlx::query(
            r#"
            UPDATE hallazgos
            SET codigo = ?3, auditoria_id = ?4, tipo = ?5, descripcion = ?6, proceso = ?7,
                requisito = ?8, estado = ?9, fecha_deteccion = ?10, updated_at = ?11
            WHERE id = ?1 AND organizacion_id = ?2
              AND (?9 <> ?12 OR NOT EXISTS (
                  SELECT 1 FROM acciones
                  WHERE hallazgo_id = ?1 AND organizacion_id = ?2
                    AND estado IN (?13, ?14)
              ))
            "#,
        )
        .bind(id)
        .bind(org)
        .bind(&hal.codigo)
        .bind(&hal.auditoria_id)
        .bind(hal.tipo)
        .bind(&hal.descripcion)
        .bind(&hal.proceso)
        .bind(&hal.requisito)
        .bind(hal.estado)
        .bind(hal.fecha_deteccion)
        .bind(Utc::now())
        .bind(EstadoHallazgo::Cerrado)
        .bind(EstadoAccion::Pendiente)
        .bind(EstadoAccion::EnProgreso)
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        if actualizadas != 1 {
            self.verificar_acciones_cerradas(org, id).await?;
            return Err(AppError::not_found("Hallazgo no encontrado"));
        }

        self.obtener(org, id).await
    }

    /// Un hallazgo solo se cierra cuando todas sus acciones terminaron
    async fn verificar_acciones_cerradas(&self, org: &str, id: &str) -> Result<()> {
        let abiertas = self
            .acciones(org, id)
            .await?
            .into_iter()
            .filter(|a| !a.estado.es_final())
            .count();

        if abiertas > 0 {
            return Err(AppError::conflict(format!(
                "El hallazgo tiene {} acción(es) sin terminar",
                abiertas
            )));
        }
        Ok(())
    }

    pub async fn acciones(&self, org: &str, id: &str) -> Result<Vec<Accion>> {
        let items = sqlx::query_as::<_, Accion>(
            r#"
            SELECT * FROM acciones
            WHERE hallazgo_id = ?1 AND organizacion_id = ?2
            ORDER BY fecha_compromiso, codigo
            "#,
        )
        .bind(id)
        .bind(org)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(items)
    }

    pub async fn listar_acciones(&self, org: &str, id: &str) -> Result<Vec<Accion>> {
        self.obtener(org, id).await?;
        self.acciones(org, id).await
    }

    pub async fn eliminar(&self, org: &str, id: &str) -> Result<()> {
        self.obtener(org, id).await?;

        let acciones = self.acciones(org, id).await?;
        if !acciones.is_empty() {
            return Err(AppError::conflict(format!(
                "El hallazgo tiene {} acción(es) asociadas",
                acciones.len()
            )));
        }

        sqlx::query("DELETE FROM hallazgos WHERE id = ?1 AND organizacion_id = ?2")
            .bind(id)
            .bind(org)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }
}
