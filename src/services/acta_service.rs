//! services/acta_service.rs
//! Actas de reunión. Un acta aprobada ya no se modifica.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::acta_model::{
    Acta, Acuerdo, ActualizarActaRequest, CrearActaRequest, EstadoActa, FiltroActas,
};
use crate::models::common_model::{ListResponse, PaginationQuery};
use crate::services::comun::{texto_opcional, texto_requerido, verificar_codigo_unico};

#[derive(Clone, Debug)]
pub struct ActaService {
    db_pool: Pool<Sqlite>,
}

fn limpiar_participantes(participantes: Vec<String>) -> Vec<String> {
    participantes
        .into_iter()
        .filter_map(|p| texto_opcional(Some(p)))
        .collect()
}

fn validar_acuerdos(acuerdos: Vec<Acuerdo>) -> Result<Vec<Acuerdo>> {
    acuerdos
        .into_iter()
        .map(|a| {
            Ok(Acuerdo {
                descripcion: texto_requerido("acuerdos.descripcion", &a.descripcion)?,
                responsable: texto_opcional(a.responsable),
                fecha_limite: a.fecha_limite,
            })
        })
        .collect()
}

fn exigir_borrador(acta: &Acta) -> Result<()> {
    if acta.estado == EstadoActa::Aprobada {
        return Err(AppError::conflict("El acta ya fue aprobada y no puede modificarse"));
    }
    Ok(())
}

impl ActaService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        ActaService { db_pool }
    }

    fn verificar_aprobable(acta: &Acta) -> Result<()> {
        exigir_borrador(acta)?;
        if acta.participantes.0.is_empty() {
            return Err(AppError::validation(
                "El acta necesita al menos un participante para aprobarse",
            ));
        }
        Ok(())
    }

    fn aplicar_filtros(qb: &mut QueryBuilder<'_, Sqlite>, org: &str, filtro: &FiltroActas) {
        qb.push(" WHERE organizacion_id = ").push_bind(org.to_string());
        if let Some(estado) = filtro.estado {
            qb.push(" AND estado = ").push_bind(estado);
        }
        if let Some(tipo) = filtro.tipo_reunion {
            qb.push(" AND tipo_reunion = ").push_bind(tipo);
        }
    }

    pub async fn listar(
        &self,
        org: &str,
        filtro: FiltroActas,
        pagination: PaginationQuery,
    ) -> Result<ListResponse<Acta>> {
        let (limit, offset) = pagination.limit_offset()?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM actas");
        Self::aplicar_filtros(&mut count_qb, org, &filtro);
        let (total,): (i64,) = count_qb.build_query_as().fetch_one(&self.db_pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM actas");
        Self::aplicar_filtros(&mut qb, org, &filtro);
        qb.push(" ORDER BY fecha DESC, codigo LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let items = qb.build_query_as::<Acta>().fetch_all(&self.db_pool).await?;

        Ok(ListResponse::new(total, &pagination, items))
    }

    pub async fn obtener(&self, org: &str, id: &str) -> Result<Acta> {
        sqlx::query_as::<_, Acta>("SELECT * FROM actas WHERE id = ?1 AND organizacion_id = ?2")
            .bind(id)
            .bind(org)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found("Acta no encontrada"))
    }

    pub async fn crear(&self, org: &str, req: CrearActaRequest) -> Result<Acta> {
        let codigo = texto_requerido("codigo", &req.codigo)?;
        let titulo = texto_requerido("titulo", &req.titulo)?;
        let temas = texto_requerido("temas", &req.temas)?;
        let acuerdos = validar_acuerdos(req.acuerdos)?;
        verificar_codigo_unico(&self.db_pool, "actas", org, &codigo, None).await?;

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO actas (
                id, organizacion_id, codigo, titulo, tipo_reunion, fecha, lugar,
                participantes, temas, acuerdos, estado, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
            "#,
        )
        .bind(&id)
        .bind(org)
        .bind(&codigo)
        .bind(&titulo)
        .bind(req.tipo_reunion)
        .bind(req.fecha)
        .bind(texto_opcional(req.lugar))
        .bind(Json(limpiar_participantes(req.participantes)))
        .bind(&temas)
        .bind(Json(acuerdos))
        .bind(EstadoActa::Borrador)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        log::info!("Acta creada org={} codigo={}", org, codigo);
        self.obtener(org, &id).await
    }

    pub async fn actualizar(
        &self,
        org: &str,
        id: &str,
        req: ActualizarActaRequest,
    ) -> Result<Acta> {
        let mut acta = self.obtener(org, id).await?;
        exigir_borrador(&acta)?;

        if let Some(codigo) = req.codigo {
            let codigo = texto_requerido("codigo", &codigo)?;
            if codigo != acta.codigo {
                verificar_codigo_unico(&self.db_pool, "actas", org, &codigo, Some(id)).await?;
            }
            acta.codigo = codigo;
        }
        if let Some(titulo) = req.titulo {
            acta.titulo = texto_requerido("titulo", &titulo)?;
        }
        if let Some(tipo) = req.tipo_reunion {
            acta.tipo_reunion = tipo;
        }
        if let Some(fecha) = req.fecha {
            acta.fecha = fecha;
        }
        if req.lugar.is_some() {
            acta.lugar = texto_opcional(req.lugar);
        }
        if let Some(participantes) = req.participantes {
            acta.participantes = Json(limpiar_participantes(participantes));
        }
        if let Some(temas) = req.temas {
            acta.temas = texto_requerido("temas", &temas)?;
        }
        if let Some(acuerdos) = req.acuerdos {
            acta.acuerdos = Json(validar_acuerdos(acuerdos)?);
        }

        let actualizadas = sqlx::query(
            r#"
            UPDATE actas
            SET codigo = ?3, titulo = ?4, tipo_reunion = ?5, fecha = ?6, lugar = ?7,
                participantes = ?8, temas = ?9, acuerdos = ?10, updated_at = ?11
            WHERE id = ?1 AND organizacion_id = ?2 AND estado = ?12
            "#,
        )
        .bind(id)
        .bind(org)
        .bind(&acta.codigo)
        .bind(&acta.titulo)
        .bind(acta.tipo_reunion)
        .bind(acta.fecha)
        .bind(&acta.lugar)
        .bind(&acta.participantes)
        .bind(&acta.temas)
        .bind(&acta.acuerdos)
        .bind(Utc::now())
        .bind(EstadoActa::Borrador)
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        if actualizadas != 1 {
            return Err(AppError::conflict("El acta ya fue aprobada y no puede modificarse"));
        }

        self.obtener(org, id).await
    }

    pub async fn aprobar(&self, org: &str, id: &str) -> Result<Acta> {
        let acta = self.obtener(org, id).await?;
        Self::verificar_aprobable(&acta)?;

        // Las mismas condiciones se repiten en el UPDATE por si el acta cambió entre medio
        let actualizadas = sqlx::query(
            r#"
            UPDATE actas SET estado = ?3, updated_at = ?4
            WHERE id = ?1 AND organizacion_id = ?2 AND estado = ?5
              AND json_array_length(participantes) > 0
            "#,
        )
        .bind(id)
        .bind(org)
        .bind(EstadoActa::Aprobada)
        .bind(Utc::now())
        .bind(EstadoActa::Borrador)
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        if actualizadas != 1 {
            Self::verificar_aprobable(&self.obtener(org, id).await?)?;
            return Err(AppError::conflict(
                "El acta cambió mientras se procesaba la aprobación",
            ));
        }

        log::info!("Acta aprobada org={} codigo={}", org, acta.codigo);
        self.obtener(org, id).await
    }

    pub async fn eliminar(&self, org: &str, id: &str) -> Result<()> {
        let acta = self.obtener(org, id).await?;
        exigir_borrador(&acta)?;

        let borradas =
            sqlx::query("DELETE FROM actas WHERE id = ?1 AND organizacion_id = ?2 AND estado = ?3")
                .bind(id)
                .bind(org)
                .bind(EstadoActa::Borrador)
                .execute(&self.db_pool)
                .await?
                .rows_affected();

        if borradas != 1 {
            return Err(AppError::conflict("El acta ya fue aprobada y no puede modificarse"));
        }
        Ok(())
    }
}
