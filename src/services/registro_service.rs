//! services/registro_service.rs
//! Registros de procesos con ciclo de vida abierto → en progreso → cerrado
//! y alertas de vencimiento.

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::common_model::{calcular_alerta, Alerta, ListResponse, PaginationQuery};
use crate::models::registro_model::{
    ActualizarRegistroRequest, CambiarEstadoRegistroRequest, CrearRegistroRequest,
    EstadoRegistro, FiltroRegistros, HistorialRegistro, Prioridad, Registro, RegistroConAlerta,
};
use crate::services::comun::{
    hoy, texto_opcional, texto_requerido, validar_rango_fechas, verificar_codigo_unico,
};

#[derive(Clone, Debug)]
pub struct RegistroService {
    db_pool: Pool<Sqlite>,
    dias_aviso: i64,
}

pub fn con_alerta(registro: Registro, hoy: NaiveDate, dias_aviso: i64) -> RegistroConAlerta {
    let (alerta, dias_restantes) = calcular_alerta(
        registro.estado == EstadoRegistro::Cerrado,
        registro.fecha_limite,
        hoy,
        dias_aviso,
    );
    RegistroConAlerta {
        registro,
        alerta,
        dias_restantes,
    }
}

fn validar_fechas(fecha_apertura: NaiveDate, fecha_limite: Option<NaiveDate>) -> Result<()> {
    match fecha_limite {
        Some(limite) => validar_rango_fechas(fecha_apertura, limite, "fecha_apertura", "fecha_limite"),
        None => Ok(()),
    }
}

impl RegistroService {
    pub fn new(db_pool: Pool<Sqlite>, dias_aviso: i64) -> Self {
        RegistroService {
            db_pool,
            dias_aviso,
        }
    }

    fn aplicar_filtros(qb: &mut QueryBuilder<'_, Sqlite>, org: &str, filtro: &FiltroRegistros) {
        qb.push(" WHERE organizacion_id = ").push_bind(org.to_string());
        if let Some(estado) = filtro.estado {
            qb.push(" AND estado = ").push_bind(estado);
        }
        if let Some(tipo) = filtro.tipo {
            qb.push(" AND tipo = ").push_bind(tipo);
        }
        if let Some(prioridad) = filtro.prioridad {
            qb.push(" AND prioridad = ").push_bind(prioridad);
        }
        if let Some(proceso) = &filtro.proceso {
            qb.push(" AND proceso = ").push_bind(proceso.clone());
        }
        if let Some(q) = texto_opcional(filtro.q.clone()) {
            let patron = format!("%{}%", q);
            qb.push(" AND (codigo LIKE ")
                .push_bind(patron.clone())
                .push(" OR titulo LIKE ")
                .push_bind(patron)
                .push(")");
        }
    }

    pub async fn listar(
        &self,
        org: &str,
        filtro: FiltroRegistros,
        pagination: PaginationQuery,
    ) -> Result<ListResponse<RegistroConAlerta>> {
        let (limit, offset) = pagination.limit_offset()?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM registros");
        Self::aplicar_filtros(&mut count_qb, org, &filtro);
        let (total,): (i64,) = count_qb.build_query_as().fetch_one(&self.db_pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM registros");
        Self::aplicar_filtros(&mut qb, org, &filtro);
        qb.push(" ORDER BY fecha_apertura DESC, created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = qb
            .build_query_as::<Registro>()
            .fetch_all(&self.db_pool)
            .await?;

        let hoy = hoy();
        let items = rows
            .into_iter()
            .map(|r| con_alerta(r, hoy, self.dias_aviso))
            .collect();
        Ok(ListResponse::new(total, &pagination, items))
    }

    async fn obtener_registro(&self, org: &str, id: &str) -> Result<Registro> {
        sqlx::query_as::<_, Registro>(
            "SELECT * FROM registros WHERE id = ?1 AND organizacion_id = ?2",
        )
        .bind(id)
        .bind(org)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Registro no encontrado"))
    }

    pub async fn obtener(&self, org: &str, id: &str) -> Result<RegistroConAlerta> {
        let registro = self.obtener_registro(org, id).await?;
        Ok(con_alerta(registro, hoy(), self.dias_aviso))
    }

    pub async fn crear(&self, org: &str, req: CrearRegistroRequest) -> Result<RegistroConAlerta> {
        let codigo = texto_requerido("codigo", &req.codigo)?;
        let titulo = texto_requerido("titulo", &req.titulo)?;
        let proceso = texto_requerido("proceso", &req.proceso)?;
        let fecha_apertura = req.fecha_apertura.unwrap_or_else(hoy);
        validar_fechas(fecha_apertura, req.fecha_limite)?;
        verificar_codigo_unico(&self.db_pool, "registros", org, &codigo, None).await?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO registros (
                id, organizacion_id, codigo, tipo, titulo, descripcion, proceso,
                responsable, prioridad, estado, fecha_apertura, fecha_limite,
                fecha_cierre, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, NULL, ?13, ?13)
            "#,
        )
        .bind(&id)
        .bind(org)
        .bind(&codigo)
        .bind(req.tipo)
        .bind(&titulo)
        .bind(texto_opcional(req.descripcion))
        .bind(&proceso)
        .bind(texto_opcional(req.responsable))
        .bind(req.prioridad.unwrap_or(Prioridad::Media))
        .bind(EstadoRegistro::Abierto)
        .bind(fecha_apertura)
        .bind(req.fecha_limite)
        .bind(now)
        .execute(&self.db_pool)
        .await?;

        log::info!("Registro creado org={} codigo={}", org, codigo);
        self.obtener(org, &id).await
    }

    /// No toca el estado; eso va por `cambiar_estado`
    pub async fn actualizar(
        &self,
        org: &str,
        id: &str,
        req: ActualizarRegistroRequest,
    ) -> Result<RegistroConAlerta> {
        let mut reg = self.obtener_registro(org, id).await?;

        if let Some(codigo) = req.codigo {
            let codigo = texto_requerido("codigo", &codigo)?;
            if codigo != reg.codigo {
                verificar_codigo_unico(&self.db_pool, "registros", org, &codigo, Some(id)).await?;
            }
            reg.codigo = codigo;
        }
        if let Some(tipo) = req.tipo {
            reg.tipo = tipo;
        }
        if let Some(titulo) = req.titulo {
            reg.titulo = texto_requerido("titulo", &titulo)?;
        }
        if req.descripcion.is_some() {
            reg.descripcion = texto_opcional(req.descripcion);
        }
        if let Some(proceso) = req.proceso {
            reg.proceso = texto_requerido("proceso", &proceso)?;
        }
        if req.responsable.is_some() {
            reg.responsable = texto_opcional(req.responsable);
        }
        if let Some(prioridad) = req.prioridad {
            reg.prioridad = prioridad;
        }
        if let Some(fecha) = req.fecha_apertura {
            reg.fecha_apertura = fecha;
        }
        if let Some(fecha_limite) = req.fecha_limite {
            reg.fecha_limite = fecha_limite;
        }
        validar_fechas(reg.fecha_apertura, reg.fecha_limite)?;

        sqlx::query(
            r#"
            UPDATE registros
            SET codigo = ?3, tipo = ?4, titulo = ?5, descripcion = ?6, proceso = ?7,
                responsable = ?8, prioridad = ?9, fecha_apertura = ?10, fecha_limite = ?11,
                updated_at = ?12
            WHERE id = ?1 AND organizacion_id = ?2
            "#,
        )
        .bind(id)
        .bind(org)
        .bind(&reg.codigo)
        .bind(reg.tipo)
        .bind(&reg.titulo)
        .bind(&reg.descripcion)
        .bind(&reg.proceso)
        .bind(&reg.responsable)
        .bind(reg.prioridad)
        .bind(reg.fecha_apertura)
        .bind(reg.fecha_limite)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        self.obtener(org, id).await
    }

    pub async fn cambiar_estado(
        &self,
        org: &str,
        id: &str,
        usuario_id: &str,
        req: CambiarEstadoRegistroRequest,
    ) -> Result<RegistroConAlerta> {
        let reg = self.obtener_registro(org, id).await?;
        let nuevo = req.estado;

        if !reg.estado.puede_pasar_a(nuevo) {
            return Err(AppError::validation(format!(
                "Transición no permitida: {:?} → {:?}",
                reg.estado, nuevo
            )));
        }

        let fecha_cierre = match nuevo {
            EstadoRegistro::Cerrado => Some(hoy()),
            _ => None,
        };
        let now = Utc::now();

        // El UPDATE abre la transacción y solo aplica si el estado sigue siendo el leído
        let mut tx = self.db_pool.begin().await?;
        let actualizadas = sqlx::query(
            r#"
            UPDATE registros SET estado = ?3, fecha_cierre = ?4, updated_at = ?5
            WHERE id = ?1 AND organizacion_id = ?2 AND estado = ?6
            "#,
        )
        .bind(id)
        .bind(org)
        .bind(nuevo)
        .bind(fecha_cierre)
        .bind(now)
        .bind(reg.estado)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if actualizadas != 1 {
            tx.rollback().await?;
            let actual = self.obtener_registro(org, id).await?;
            if !actual.estado.puede_pasar_a(nuevo) {
                return Err(AppError::validation(format!(
                    "Transición no permitida: {:?} → {:?}",
                    actual.estado, nuevo
                )));
            }
            return Err(AppError::conflict(
                "El registro cambió de estado mientras se procesaba la solicitud",
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO registro_historial (
                id, organizacion_id, registro_id, estado_anterior, estado_nuevo,
                usuario_id, comentario, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(org)
        .bind(id)
        .bind(reg.estado)
        .bind(nuevo)
        .bind(usuario_id)
        .bind(texto_opcional(req.comentario))
        .bind(now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        log::info!(
            "Registro {} cambia de estado {:?} → {:?}",
            reg.codigo,
            reg.estado,
            nuevo
        );
        self.obtener(org, id).await
    }

    pub async fn historial(&self, org: &str, id: &str) -> Result<Vec<HistorialRegistro>> {
        self.obtener_registro(org, id).await?;
        let items = sqlx::query_as::<_, HistorialRegistro>(
            r#"
            SELECT id, registro_id, estado_anterior, estado_nuevo, usuario_id, comentario, created_at
            FROM registro_historial
            WHERE registro_id = ?1 AND organizacion_id = ?2
            ORDER BY created_at, rowid
            "#,
        )
        .bind(id)
        .bind(org)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(items)
    }

    pub async fn eliminar(&self, org: &str, id: &str) -> Result<()> {
        self.obtener_registro(org, id).await?;

        let mut tx = self.db_pool.begin().await?;
        sqlx::query("DELETE FROM registro_historial WHERE registro_id = ?1 AND organizacion_id = ?2")
            .bind(id)
            .bind(org)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM registros WHERE id = ?1 AND organizacion_id = ?2")
            .bind(id)
            .bind(org)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Registros vencidos o por vencer, primero los de fecha límite más cercana
    pub async fn alertas(&self, org: &str) -> Result<Vec<RegistroConAlerta>> {
        let rows = sqlx::query_as::<_, Registro>(
            r#"
            SELECT * FROM registros
            WHERE organizacion_id = ?1 AND estado != ?2 AND fecha_limite IS NOT NULL
            ORDER BY fecha_limite, codigo
            "#,
        )
        .bind(org)
        .bind(EstadoRegistro::Cerrado)
        .fetch_all(&self.db_pool)
        .await?;

        let hoy = hoy();
        Ok(rows
            .into_iter()
            .map(|r| con_alerta(r, hoy, self.dias_aviso))
            .filter(|r| matches!(r.alerta, Alerta::Vencido | Alerta::PorVencer))
            .collect())
    }
}
