//! services/capacitacion_service.rs

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::capacitacion_model::{
    ActualizarCapacitacionRequest, Capacitacion, CrearCapacitacionRequest, EstadoCapacitacion,
    FiltroCapacitaciones,
};
use crate::models::common_model::{ListResponse, PaginationQuery};
use crate::services::comun::{
    texto_opcional, texto_requerido, validar_numero, validar_rango_fechas, verificar_codigo_unico,
};

#[derive(Clone, Debug)]
pub struct CapacitacionService {
    db_pool: Pool<Sqlite>,
}

fn limpiar_participantes(participantes: Vec<String>) -> Vec<String> {
    participantes
        .into_iter()
        .filter_map(|p| texto_opcional(Some(p)))
        .collect()
}

fn validar(cap: &Capacitacion) -> Result<()> {
    validar_rango_fechas(cap.fecha_inicio, cap.fecha_fin, "fecha_inicio", "fecha_fin")?;
    validar_numero("duracion_horas", cap.duracion_horas)?;
    if cap.duracion_horas <= 0.0 {
        return Err(AppError::validation("La duración debe ser mayor que cero"));
    }
    Ok(())
}

impl CapacitacionService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        CapacitacionService { db_pool }
    }

    fn aplicar_filtros(
        qb: &mut QueryBuilder<'_, Sqlite>,
        org: &str,
        filtro: &FiltroCapacitaciones,
    ) {
        qb.push(" WHERE organizacion_id = ").push_bind(org.to_string());
        if let Some(estado) = filtro.estado {
            qb.push(" AND estado = ").push_bind(estado);
        }
    }

    pub async fn listar(
        &self,
        org: &str,
        filtro: FiltroCapacitaciones,
        pagination: PaginationQuery,
    ) -> Result<ListResponse<Capacitacion>> {
        let (limit, offset) = pagination.limit_offset()?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM capacitaciones");
        Self::aplicar_filtros(&mut count_qb, org, &filtro);
        let (total,): (i64,) = count_qb.build_query_as().fetch_one(&self.db_pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM capacitaciones");
        Self::aplicar_filtros(&mut qb, org, &filtro);
        qb.push(" ORDER BY fecha_inicio DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let items = qb
            .build_query_as::<Capacitacion>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(ListResponse::new(total, &pagination, items))
    }

    pub async fn obtener(&self, org: &str, id: &str) -> Result<Capacitacion> {
        sqlx::query_as::<_, Capacitacion>(
            "SELECT * FROM capacitaciones WHERE id = ?1 AND organizacion_id = ?2",
        )
        .bind(id)
        .bind(org)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Capacitación no encontrada"))
    }

    pub async fn crear(&self, org: &str, req: CrearCapacitacionRequest) -> Result<Capacitacion> {
        let now = Utc::now();
        let cap = Capacitacion {
            id: Uuid::new_v4().to_string(),
            organizacion_id: org.to_string(),
            codigo: texto_requerido("codigo", &req.codigo)?,
            titulo: texto_requerido("titulo", &req.titulo)?,
            descripcion: texto_opcional(req.descripcion),
            instructor: texto_opcional(req.instructor),
            modalidad: req.modalidad,
            fecha_inicio: req.fecha_inicio,
            fecha_fin: req.fecha_fin,
            duracion_horas: req.duracion_horas,
            estado: req.estado.unwrap_or(EstadoCapacitacion::Programada),
            participantes: Json(limpiar_participantes(req.participantes)),
            created_at: now,
            updated_at: now,
        };
        validar(&cap)?;
        verificar_codigo_unico(&self.db_pool, "capacitaciones", org, &cap.codigo, None).await?;

        sqlx::query(
            r#"
            INSERT INTO capacitaciones (
                id, organizacion_id, codigo, titulo, descripcion, instructor, modalidad,
                fecha_inicio, fecha_fin, duracion_horas, estado, participantes,
                created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
            "#,
        )
        .bind(&cap.id)
        .bind(org)
        .bind(&cap.codigo)
        .bind(&cap.titulo)
        .bind(&cap.descripcion)
        .bind(&cap.instructor)
        .bind(cap.modalidad)
        .bind(cap.fecha_inicio)
        .bind(cap.fecha_fin)
        .bind(cap.duracion_horas)
        .bind(cap.estado)
        .bind(&cap.participantes)
        .bind(now)
        .execute(&self.db_pool)
        .await?;

        log::info!("Capacitación creada org={} codigo={}", org, cap.codigo);
        self.obtener(org, &cap.id).await
    }

    pub async fn actualizar(
        &self,
        org: &str,
        id: &str,
        req: ActualizarCapacitacionRequest,
    ) -> Result<Capacitacion> {
        let mut cap = self.obtener(org, id).await?;

        if let Some(codigo) = req.codigo {
            let codigo = texto_requerido("codigo", &codigo)?;
            if codigo != cap.codigo {
                verificar_codigo_unico(&self.db_pool, "capacitaciones", org, &codigo, Some(id))
                    .await?;
            }
            cap.codigo = codigo;
        }
        if let Some(titulo) = req.titulo {
            cap.titulo = texto_requerido("titulo", &titulo)?;
        }
        if req.descripcion.is_some() {
            cap.descripcion = texto_opcional(req.descripcion);
        }
        if req.instructor.is_some() {
            cap.instructor = texto_opcional(req.instructor);
        }
        if let Some(modalidad) = req.modalidad {
            cap.modalidad = modalidad;
        }
        if let Some(fecha) = req.fecha_inicio {
            cap.fecha_inicio = fecha;
        }
        if let Some(fecha) = req.fecha_fin {
            cap.fecha_fin = fecha;
        }
        if let Some(horas) = req.duracion_horas {
            cap.duracion_horas = horas;
        }
        if let Some(estado) = req.estado {
            cap.estado = estado;
        }
        if let Some(participantes) = req.participantes {
            cap.participantes = Json(limpiar_participantes(participantes));
        }
        validar(&cap)?;

        sqlx::query(
            r#"
            UPDATE capacitaciones
            SET codigo = ?3, titulo = ?4, descripcion = ?5, instructor = ?6, modalidad = ?7,
                fecha_inicio = ?8, fecha_fin = ?9, duracion_horas = ?10, estado = ?11,
                participantes = ?12, updated_at = ?13
            WHERE id = ?1 AND organizacion_id = ?2
            "#,
        )
        .bind(id)
        .bind(org)
        .bind(&cap.codigo)
        .bind(&cap.titulo)
        .bind(&cap.descripcion)
        .bind(&cap.instructor)
        .bind(cap.modalidad)
        .bind(cap.fecha_inicio)
        .bind(cap.fecha_fin)
        .bind(cap.duracion_horas)
        .bind(cap.estado)
        .bind(&cap.participantes)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        self.obtener(org, id).await
    }

    pub async fn eliminar(&self, org: &str, id: &str) -> Result<()> {
        let borradas = sqlx::query("DELETE FROM capacitaciones WHERE id = ?1 AND organizacion_id = ?2")
            .bind(id)
            .bind(org)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if borradas == 0 {
            return Err(AppError::not_found("Capacitación no encontrada"));
        }
        Ok(())
    }
}
