//! services/auditoria_service.rs

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::auditoria_model::{
    ActualizarAuditoriaRequest, Auditoria, CrearAuditoriaRequest, EstadoAuditoria,
    FiltroAuditorias, NORMA_DEFAULT,
};
use crate::models::common_model::{ListResponse, PaginationQuery};
use crate::models::hallazgo_model::Hallazgo;
use crate::services::comun::{
    texto_opcional, texto_requerido, validar_rango_fechas, verificar_codigo_unico,
};

#[derive(Clone, Debug)]
pub struct AuditoriaService {
    db_pool: Pool<Sqlite>,
}

impl AuditoriaService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        AuditoriaService { db_pool }
    }

    fn aplicar_filtros(qb: &mut QueryBuilder<'_, Sqlite>, org: &str, filtro: &FiltroAuditorias) {
        qb.push(" WHERE organizacion_id = ").push_bind(org.to_string());
        if let Some(estado) = filtro.estado {
            qb.push(" AND estado = ").push_bind(estado);
        }
        if let Some(tipo) = filtro.tipo {
            qb.push(" AND tipo = ").push_bind(tipo);
        }
    }

    pub async fn listar(
        &self,
        org: &str,
        filtro: FiltroAuditorias,
        pagination: PaginationQuery,
    ) -> Result<ListResponse<Auditoria>> {
        let (limit, offset) = pagination.limit_offset()?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM auditorias");
        Self::aplicar_filtros(&mut count_qb, org, &filtro);
        let (total,): (i64,) = count_qb.build_query_as().fetch_one(&self.db_pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM auditorias");
        Self::aplicar_filtros(&mut qb, org, &filtro);
        qb.push(" ORDER BY fecha_inicio DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let items = qb
            .build_query_as::<Auditoria>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(ListResponse::new(total, &pagination, items))
    }

    pub async fn obtener(&self, org: &str, id: &str) -> Result<Auditoria> {
        sqlx::query_as::<_, Auditoria>(
            "SELECT * FROM auditorias WHERE id = ?1 AND organizacion_id = ?2",
        )
        .bind(id)
        .bind(org)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Auditoría no encontrada"))
    }

    pub async fn crear(&self, org: &str, req: CrearAuditoriaRequest) -> Result<Auditoria> {
        let codigo = texto_requerido("codigo", &req.codigo)?;
        let alcance = texto_requerido("alcance", &req.alcance)?;
        let auditor_lider = texto_requerido("auditor_lider", &req.auditor_lider)?;
        let norma = texto_opcional(req.norma).unwrap_or_else(|| NORMA_DEFAULT.to_string());
        validar_rango_fechas(req.fecha_inicio, req.fecha_fin, "fecha_inicio", "fecha_fin")?;
        verificar_codigo_unico(&self.db_pool, "auditorias", org, &codigo, None).await?;

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO auditorias (
                id, organizacion_id, codigo, tipo, norma, alcance, auditor_lider,
                fecha_inicio, fecha_fin, estado, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            "#,
        )
        .bind(&id)
        .bind(org)
        .bind(&codigo)
        .bind(req.tipo)
        .bind(&norma)
        .bind(&alcance)
        .bind(&auditor_lider)
        .bind(req.fecha_inicio)
        .bind(req.fecha_fin)
        .bind(req.estado.unwrap_or(EstadoAuditoria::Planificada))
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        log::info!("Auditoría creada org={} codigo={}", org, codigo);
        self.obtener(org, &id).await
    }

    pub async fn actualizar(
        &self,
        org: &str,
        id: &str,
        req: ActualizarAuditoriaRequest,
    ) -> Result<Auditoria> {
        let mut aud = self.obtener(org, id).await?;

        if let Some(codigo) = req.codigo {
            let codigo = texto_requerido("codigo", &codigo)?;
            if codigo != aud.codigo {
                verificar_codigo_unico(&self.db_pool, "auditorias", org, &codigo, Some(id))
                    .await?;
            }
            aud.codigo = codigo;
        }
        if let Some(tipo) = req.tipo {
            aud.tipo = tipo;
        }
        if let Some(norma) = req.norma {
            aud.norma = texto_requerido("norma", &norma)?;
        }
        if let Some(alcance) = req.alcance {
            aud.alcance = texto_requerido("alcance", &alcance)?;
        }
        if let Some(auditor) = req.auditor_lider {
            aud.auditor_lider = texto_requerido("auditor_lider", &auditor)?;
        }
        if let Some(fecha) = req.fecha_inicio {
            aud.fecha_inicio = fecha;
        }
        if let Some(fecha) = req.fecha_fin {
            aud.fecha_fin = fecha;
        }
        if let Some(estado) = req.estado {
            aud.estado = estado;
        }
        validar_rango_fechas(aud.fecha_inicio, aud.fecha_fin, "fecha_inicio", "fecha_fin")?;

        sqlx::query(
            r#"
            UPDATE auditorias
            SET codigo = ?3, tipo = ?4, norma = ?5, alcance = ?6, auditor_lider = ?7,
                fecha_inicio = ?8, fecha_fin = ?9, estado = ?10, updated_at = ?11
            WHERE id = ?1 AND organizacion_id = ?2
            "#,
        )
        .bind(id)
        .bind(org)
        .bind(&aud.codigo)
        .bind(aud.tipo)
        .bind(&aud.norma)
        .bind(&aud.alcance)
        .bind(&aud.auditor_lider)
        .bind(aud.fecha_inicio)
        .bind(aud.fecha_fin)
        .bind(aud.estado)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        self.obtener(org, id).await
    }

    pub async fn hallazgos(&self, org: &str, id: &str) -> Result<Vec<Hallazgo>> {
        self.obtener(org, id).await?;
        let items = sqlx::query_as::<_, Hallazgo>(
            r#"
            SELECT * FROM hallazgos
            WHERE auditoria_id = ?1 AND organizacion_id = ?2
            ORDER BY codigo
            "#,
        )
        .bind(id)
        .bind(org)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(items)
    }

    pub async fn eliminar(&self, org: &str, id: &str) -> Result<()> {
        self.obtener(org, id).await?;

        let (hallazgos,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM hallazgos WHERE auditoria_id = ?1 AND organizacion_id = ?2",
        )
        .bind(id)
        .bind(org)
        .fetch_one(&self.db_pool)
        .await?;
        if hallazgos > 0 {
            return Err(AppError::conflict(format!(
                "La auditoría tiene {} hallazgo(s) asociados",
                hallazgos
            )));
        }

        sqlx::query("DELETE FROM auditorias WHERE id = ?1 AND organizacion_id = ?2")
            .bind(id)
            .bind(org)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }
}
