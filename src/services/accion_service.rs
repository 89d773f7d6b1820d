//! services/accion_service.rs
//! Acciones correctivas/preventivas/de mejora y su verificación de eficacia.

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::accion_model::{
    Accion, AccionConAlerta, ActualizarAccionRequest, CambiarEstadoAccionRequest,
    CrearAccionRequest, EstadoAccion, FiltroAcciones,
};
use crate::models::common_model::{calcular_alerta, Alerta, ListResponse, PaginationQuery};
use crate::services::comun::{
    existe_en_organizacion, hoy, texto_opcional, texto_requerido, verificar_codigo_unico,
};

#[derive(Clone, Debug)]
pub struct AccionService {
    db_pool: Pool<Sqlite>,
    dias_aviso: i64,
}

pub fn con_alerta(accion: Accion, hoy: NaiveDate, dias_aviso: i64) -> AccionConAlerta {
    let (alerta, dias_restantes) = calcular_alerta(
        accion.estado.es_final(),
        Some(accion.fecha_compromiso),
        hoy,
        dias_aviso,
    );
    AccionConAlerta {
        accion,
        alerta,
        dias_restantes,
    }
}

impl AccionService {
    pub fn new(db_pool: Pool<Sqlite>, dias_aviso: i64) -> Self {
        AccionService {
            db_pool,
            dias_aviso,
        }
    }

    fn aplicar_filtros(qb: &mut QueryBuilder<'_, Sqlite>, org: &str, filtro: &FiltroAcciones) {
        qb.push(" WHERE organizacion_id = ").push_bind(org.to_string());
        if let Some(estado) = filtro.estado {
            qb.push(" AND estado = ").push_bind(estado);
        }
        if let Some(tipo) = filtro.tipo {
            qb.push(" AND tipo = ").push_bind(tipo);
        }
        if let Some(hallazgo_id) = &filtro.hallazgo_id {
            qb.push(" AND hallazgo_id = ").push_bind(hallazgo_id.clone());
        }
    }

    pub async fn listar(
        &self,
        org: &str,
        filtro: FiltroAcciones,
        pagination: PaginationQuery,
    ) -> Result<ListResponse<AccionConAlerta>> {
        let (limit, offset) = pagination.limit_offset()?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM acciones");
        Self::aplicar_filtros(&mut count_qb, org, &filtro);
        let (total,): (i64,) = count_qb.build_query_as().fetch_one(&self.db_pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM acciones");
        Self::aplicar_filtros(&mut qb, org, &filtro);
        qb.push(" ORDER BY fecha_compromiso, codigo LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = qb
            .build_query_as::<Accion>()
            .fetch_all(&self.db_pool)
            .await?;

        let hoy = hoy();
        let items = rows
            .into_iter()
            .map(|a| con_alerta(a, hoy, self.dias_aviso))
            .collect();
        Ok(ListResponse::new(total, &pagination, items))
    }

    async fn obtener_accion(&self, org: &str, id: &str) -> Result<Accion> {
        sqlx::query_as::<_, Accion>("SELECT * FROM acciones WHERE id = ?1 AND organizacion_id = ?2")
            .bind(id)
            .bind(org)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found("Acción no encontrada"))
    }

    pub async fn obtener(&self, org: &str, id: &str) -> Result<AccionConAlerta> {
        let accion = self.obtener_accion(org, id).await?;
        Ok(con_alerta(accion, hoy(), self.dias_aviso))
    }

    async fn validar_hallazgo(&self, org: &str, hallazgo_id: Option<&str>) -> Result<()> {
        if let Some(hid) = hallazgo_id {
            if !existe_en_organizacion(&self.db_pool, "hallazgos", org, hid).await? {
                return Err(AppError::validation("El hallazgo indicado no existe"));
            }
        }
        Ok(())
    }

    pub async fn crear(&self, org: &str, req: CrearAccionRequest) -> Result<AccionConAlerta> {
        let codigo = texto_requerido("codigo", &req.codigo)?;
        let descripcion = texto_requerido("descripcion", &req.descripcion)?;
        let responsable = texto_requerido("responsable", &req.responsable)?;
        let hallazgo_id = texto_opcional(req.hallazgo_id);
        self.validar_hallazgo(org, hallazgo_id.as_deref()).await?;
        verificar_codigo_unico(&self.db_pool, "acciones", org, &codigo, None).await?;

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO acciones (
                id, organizacion_id, hallazgo_id, codigo, tipo, descripcion, causa_raiz,
                responsable, fecha_compromiso, fecha_cierre, estado, eficacia,
                created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, ?10, NULL, ?11, ?11)
            "#,
        )
        .bind(&id)
        .bind(org)
        .bind(&hallazgo_id)
        .bind(&codigo)
        .bind(req.tipo)
        .bind(&descripcion)
        .bind(texto_opcional(req.causa_raiz))
        .bind(&responsable)
        .bind(req.fecha_compromiso)
        .bind(EstadoAccion::Pendiente)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        log::info!("Acción creada org={} codigo={}", org, codigo);
        self.obtener(org, &id).await
    }

    pub async fn actualizar(
        &self,
        org: &str,
        id: &str,
        req: ActualizarAccionRequest,
    ) -> Result<AccionConAlerta> {
        let mut acc = self.obtener_accion(org, id).await?;

        if let Some(codigo) = req.codigo {
            let codigo = texto_requerido("codigo", &codigo)?;
            if codigo != acc.codigo {
                verificar_codigo_unico(&self.db_pool, "acciones", org, &codigo, Some(id)).await?;
            }
            acc.codigo = codigo;
        }
        if req.hallazgo_id.is_some() {
            acc.hallazgo_id = texto_opcional(req.hallazgo_id);
            self.validar_hallazgo(org, acc.hallazgo_id.as_deref()).await?;
        }
        if let Some(tipo) = req.tipo {
            acc.tipo = tipo;
        }
        if let Some(descripcion) = req.descripcion {
            acc.descripcion = texto_requerido("descripcion", &descripcion)?;
        }
        if req.causa_raiz.is_some() {
            acc.causa_raiz = texto_opcional(req.causa_raiz);
        }
        if let Some(responsable) = req.responsable {
            acc.responsable = texto_requerido("responsable", &responsable)?;
        }
        if let Some(fecha) = req.fecha_compromiso {
            acc.fecha_compromiso = fecha;
        }

        sqlx::query(
            r#"
            UPDATE acciones
            SET codigo = ?3, hallazgo_id = ?4, tipo = ?5, descripcion = ?6, causa_raiz = ?7,
                responsable = ?8, fecha_compromiso = ?9, updated_at = ?10
            WHERE id = ?1 AND organizacion_id = ?2
            "#,
        )
        .bind(id)
        .bind(org)
        .bind(&acc.codigo)
        .bind(&acc.hallazgo_id)
        .bind(acc.tipo)
        .bind(&acc.descripcion)
        .bind(&acc.causa_raiz)
        .bind(&acc.responsable)
        .bind(acc.fecha_compromiso)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        self.obtener(org, id).await
    }

    pub async fn cambiar_estado(
        &self,
        org: &str,
        id: &str,
        req: CambiarEstadoAccionRequest,
    ) -> Result<AccionConAlerta> {
        let acc = self.obtener_accion(org, id).await?;
        let nuevo = req.estado;

        if !acc.estado.puede_pasar_a(nuevo) {
            return Err(AppError::validation(format!(
                "Transición no permitida: {:?} → {:?}",
                acc.estado, nuevo
            )));
        }

        let mut eficacia = acc.eficacia.clone();
        if nuevo == EstadoAccion::Verificada {
            eficacia = Some(texto_requerido("eficacia", req.eficacia.as_deref().unwrap_or(""))?);
        }

        let fecha_cierre = match nuevo {
            EstadoAccion::Completada => Some(hoy()),
            EstadoAccion::Verificada => acc.fecha_cierre,
            _ => None,
        };

        let actualizadas = sqlx::query(
            r#"
            UPDATE acciones SET estado = ?3, fecha_cierre = ?4, eficacia = ?5, updated_at = ?6
            WHERE id = ?1 AND organizacion_id = ?2 AND estado = ?7
            "#,
        )
        .bind(id)
        .bind(org)
        .bind(nuevo)
        .bind(fecha_cierre)
        .bind(&eficacia)
        .bind(Utc::now())
        .bind(acc.estado)
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        if actualizadas != 1 {
            let actual = self.obtener_accion(org, id).await?;
            if !actual.estado.puede_pasar_a(nuevo) {
                return Err(AppError::validation(format!(
                    "Transición no permitida: {:?} → {:?}",
                    actual.estado, nuevo
                )));
            }
            return Err(AppError::conflict(
                "La acción cambió de estado mientras se procesaba la solicitud",
            ));
        }

        log::info!(
            "Acción {} cambia de estado {:?} → {:?}",
            acc.codigo,
            acc.estado,
            nuevo
        );
        self.obtener(org, id).await
    }

    pub async fn eliminar(&self, org: &str, id: &str) -> Result<()> {
        let borradas = sqlx::query("DELETE FROM acciones WHERE id = ?1 AND organizacion_id = ?2")
            .bind(id)
            .bind(org)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if borradas == 0 {
            return Err(AppError::not_found("Acción no encontrada"));
        }
        Ok(())
    }

    /// Acciones abiertas vencidas o por vencer
    pub async fn alertas(&self, org: &str) -> Result<Vec<AccionConAlerta>> {
        let rows = sqlx::query_as::<_, Accion>(
            r#"
            SELECT * FROM acciones
            WHERE organizacion_id = ?1 AND estado IN (?2, ?3)
            ORDER BY fecha_compromiso, codigo
            "#,
        )
        .bind(org)
        .bind(EstadoAccion::Pendiente)
        .bind(EstadoAccion::EnProgreso)
        .fetch_all(&self.db_pool)
        .await?;

        let hoy = hoy();
        Ok(rows
            .into_iter()
            .map(|a| con_alerta(a, hoy, self.dias_aviso))
            .filter(|a| matches!(a.alerta, Alerta::Vencido | Alerta::PorVencer))
            .collect())
    }
}
