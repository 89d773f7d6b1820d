//! services/indicador_service.rs
//! Indicadores de calidad: umbrales, mediciones, tendencia y estado de cumplimiento.

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::common_model::{ListResponse, PaginationQuery};
use crate::models::indicador_model::{
    ActualizarIndicadorRequest, CrearIndicadorRequest, CrearMedicionRequest, EstadoIndicador,
    FiltroIndicadores, Indicador, IndicadorDetalle, Medicion, Sentido, Tendencia,
};
use crate::services::comun::{
    texto_opcional, texto_requerido, validar_numero, verificar_codigo_unico,
};

/// Por debajo de este cambio porcentual la tendencia es "estable"
pub const UMBRAL_ESTABILIDAD_PCT: f64 = 5.0;

const MEDICIONES_EN_DETALLE: i64 = 12;

/// Cambio porcentual de `anterior` a `actual`; sin base de comparación no hay variación
pub fn variacion_porcentual(anterior: Option<f64>, actual: Option<f64>) -> Option<f64> {
    match (anterior, actual) {
        (Some(a), Some(b)) if a != 0.0 => Some((b - a) / a.abs() * 100.0),
        _ => None,
    }
}

pub fn calcular_tendencia(anterior: Option<f64>, actual: Option<f64>) -> Tendencia {
    let (Some(anterior), Some(actual)) = (anterior, actual) else {
        return Tendencia::SinDatos;
    };

    if anterior == 0.0 {
        return if actual == 0.0 {
            Tendencia::Estable
        } else if actual > 0.0 {
            Tendencia::Subiendo
        } else {
            Tendencia::Bajando
        };
    }

    let pct = (actual - anterior) / anterior.abs() * 100.0;
    if pct.abs() < UMBRAL_ESTABILIDAD_PCT {
        Tendencia::Estable
    } else if pct > 0.0 {
        Tendencia::Subiendo
    } else {
        Tendencia::Bajando
    }
}

pub fn evaluar_estado(
    valor: Option<f64>,
    meta: f64,
    umbral_critico: f64,
    sentido: Sentido,
) -> EstadoIndicador {
    let Some(v) = valor else {
        return EstadoIndicador::SinDatos;
    };

    match sentido {
        Sentido::Ascendente if v >= meta => EstadoIndicador::Cumple,
        Sentido::Ascendente if v > umbral_critico => EstadoIndicador::Alerta,
        Sentido::Descendente if v <= meta => EstadoIndicador::Cumple,
        Sentido::Descendente if v < umbral_critico => EstadoIndicador::Alerta,
        _ => EstadoIndicador::Critico,
    }
}

/// El umbral crítico queda del lado "malo" de la meta
pub fn validar_umbrales(meta: f64, umbral_critico: f64, sentido: Sentido) -> Result<()> {
    validar_numero("meta", meta)?;
    validar_numero("umbral_critico", umbral_critico)?;

    match sentido {
        Sentido::Ascendente if umbral_critico >= meta => Err(AppError::validation(
            "En un indicador ascendente el umbral crítico debe ser menor que la meta",
        )),
        Sentido::Descendente if umbral_critico <= meta => Err(AppError::validation(
            "En un indicador descendente el umbral crítico debe ser mayor que la meta",
        )),
        _ => Ok(()),
    }
}

#[derive(Clone, Debug)]
pub struct IndicadorService {
    db_pool: Pool<Sqlite>,
}

impl IndicadorService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        IndicadorService { db_pool }
    }

    fn aplicar_filtros(qb: &mut QueryBuilder<'_, Sqlite>, org: &str, filtro: &FiltroIndicadores) {
        qb.push(" WHERE organizacion_id = ").push_bind(org.to_string());
        if let Some(proceso) = &filtro.proceso {
            qb.push(" AND proceso = ").push_bind(proceso.clone());
        }
        if let Some(estado) = filtro.estado {
            qb.push(" AND estado = ").push_bind(estado);
        }
        if let Some(q) = texto_opcional(filtro.q.clone()) {
            let patron = format!("%{}%", q);
            qb.push(" AND (codigo LIKE ")
                .push_bind(patron.clone())
                .push(" OR nombre LIKE ")
                .push_bind(patron)
                .push(")");
        }
    }

    pub async fn listar(
        &self,
        org: &str,
        filtro: FiltroIndicadores,
        pagination: PaginationQuery,
    ) -> Result<ListResponse<Indicador>> {
        let (limit, offset) = pagination.limit_offset()?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM indicadores");
        Self::aplicar_filtros(&mut count_qb, org, &filtro);
        let (total,): (i64,) = count_qb.build_query_as().fetch_one(&self.db_pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM indicadores");
        Self::aplicar_filtros(&mut qb, org, &filtro);
        qb.push(" ORDER BY codigo LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let items = qb
            .build_query_as::<Indicador>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(ListResponse::new(total, &pagination, items))
    }

    pub async fn obtener(&self, org: &str, id: &str) -> Result<Indicador> {
        sqlx::query_as::<_, Indicador>(
            "SELECT * FROM indicadores WHERE id = ?1 AND organizacion_id = ?2",
        )
        .bind(id)
        .bind(org)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Indicador no encontrado"))
    }

    pub async fn obtener_detalle(&self, org: &str, id: &str) -> Result<IndicadorDetalle> {
        let indicador = self.obtener(org, id).await?;
        let mediciones = self
            .listar_mediciones_limit(org, id, MEDICIONES_EN_DETALLE)
            .await?;

        Ok(IndicadorDetalle {
            variacion_porcentual: variacion_porcentual(
                indicador.valor_anterior,
                indicador.valor_actual,
            ),
            indicador,
            mediciones,
        })
    }

    pub async fn crear(&self, org: &str, req: CrearIndicadorRequest) -> Result<Indicador> {
        let codigo = texto_requerido("codigo", &req.codigo)?;
        let nombre = texto_requerido("nombre", &req.nombre)?;
        let proceso = texto_requerido("proceso", &req.proceso)?;
        let unidad = texto_requerido("unidad", &req.unidad)?;
        validar_umbrales(req.meta, req.umbral_critico, req.sentido)?;
        verificar_codigo_unico(&self.db_pool, "indicadores", org, &codigo, None).await?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO indicadores (
                id, organizacion_id, codigo, nombre, descripcion, proceso, unidad,
                frecuencia, sentido, meta, umbral_critico, responsable,
                valor_actual, valor_anterior, tendencia, estado, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, NULL, NULL, ?13, ?14, ?15, ?15)
            "#,
        )
        .bind(&id)
        .bind(org)
        .bind(&codigo)
        .bind(&nombre)
        .bind(texto_opcional(req.descripcion))
        .bind(&proceso)
        .bind(&unidad)
        .bind(req.frecuencia)
        .bind(req.sentido)
        .bind(req.meta)
        .bind(req.umbral_critico)
        .bind(texto_opcional(req.responsable))
        .bind(Tendencia::SinDatos)
        .bind(EstadoIndicador::SinDatos)
        .bind(now)
        .execute(&self.db_pool)
        .await?;

        log::info!("Indicador creado org={} codigo={}", org, codigo);
        self.obtener(org, &id).await
    }

    pub async fn actualizar(
        &self,
        org: &str,
        id: &str,
        req: ActualizarIndicadorRequest,
    ) -> Result<Indicador> {
        let mut ind = self.obtener(org, id).await?;

        if let Some(codigo) = req.codigo {
            let codigo = texto_requerido("codigo", &codigo)?;
            if codigo != ind.codigo {
                verificar_codigo_unico(&self.db_pool, "indicadores", org, &codigo, Some(id))
                    .await?;
            }
            ind.codigo = codigo;
        }
        if let Some(nombre) = req.nombre {
            ind.nombre = texto_requerido("nombre", &nombre)?;
        }
        if req.descripcion.is_some() {
            ind.descripcion = texto_opcional(req.descripcion);
        }
        if let Some(proceso) = req.proceso {
            ind.proceso = texto_requerido("proceso", &proceso)?;
        }
        if let Some(unidad) = req.unidad {
            ind.unidad = texto_requerido("unidad", &unidad)?;
        }
        if let Some(frecuencia) = req.frecuencia {
            ind.frecuencia = frecuencia;
        }
        if let Some(sentido) = req.sentido {
            ind.sentido = sentido;
        }
        if let Some(meta) = req.meta {
            ind.meta = meta;
        }
        if let Some(umbral) = req.umbral_critico {
            ind.umbral_critico = umbral;
        }
        if req.responsable.is_some() {
            ind.responsable = texto_opcional(req.responsable);
        }

        validar_umbrales(ind.meta, ind.umbral_critico, ind.sentido)?;

        let mut tx = self.db_pool.begin().await?;
        sqlx::query(
            r#"
            UPDATE indicadores
            SET codigo = ?3, nombre = ?4, descripcion = ?5, proceso = ?6, unidad = ?7,
                frecuencia = ?8, sentido = ?9, meta = ?10, umbral_critico = ?11,
                responsable = ?12, updated_at = ?13
            WHERE id = ?1 AND organizacion_id = ?2
            "#,
        )
        .bind(id)
        .bind(org)
        .bind(&ind.codigo)
        .bind(&ind.nombre)
        .bind(&ind.descripcion)
        .bind(&ind.proceso)
        .bind(&ind.unidad)
        .bind(ind.frecuencia)
        .bind(ind.sentido)
        .bind(ind.meta)
        .bind(ind.umbral_critico)
        .bind(&ind.responsable)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        // meta, umbral o sentido pueden haber cambiado
        recalcular_indicador(&mut tx, id).await?;
        tx.commit().await?;

        self.obtener(org, id).await
    }

    pub async fn eliminar(&self, org: &str, id: &str) -> Result<()> {
        self.obtener(org, id).await?;

        let mut tx = self.db_pool.begin().await?;
        sqlx::query("DELETE FROM mediciones WHERE indicador_id = ?1 AND organizacion_id = ?2")
            .bind(id)
            .bind(org)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM indicadores WHERE id = ?1 AND organizacion_id = ?2")
            .bind(id)
            .bind(org)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        log::info!("Indicador eliminado org={} id={}", org, id);
        Ok(())
    }

    pub async fn listar_mediciones(&self, org: &str, indicador_id: &str) -> Result<Vec<Medicion>> {
        self.obtener(org, indicador_id).await?;
        self.listar_mediciones_limit(org, indicador_id, -1).await
    }

    /// Más recientes primero. `limit` negativo devuelve todas.
    async fn listar_mediciones_limit(
        &self,
        org: &str,
        indicador_id: &str,
        limit: i64,
    ) -> Result<Vec<Medicion>> {
        let mediciones = sqlx::query_as::<_, Medicion>(
            r#"
            SELECT * FROM mediciones
            WHERE indicador_id = ?1 AND organizacion_id = ?2
            ORDER BY fecha DESC, created_at DESC
            LIMIT ?3
            "#,
        )
        .bind(indicador_id)
        .bind(org)
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(mediciones)
    }

    /// Guarda la medición y recalcula valor actual, tendencia y estado del indicador
    pub async fn registrar_medicion(
        &self,
        org: &str,
        indicador_id: &str,
        req: CrearMedicionRequest,
    ) -> Result<Medicion> {
        validar_numero("valor", req.valor)?;
        let indicador = self.obtener(org, indicador_id).await?;

        let id = Uuid::new_v4().to_string();
        let mut tx = self.db_pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO mediciones (id, organizacion_id, indicador_id, valor, fecha, observaciones, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(org)
        .bind(indicador_id)
        .bind(req.valor)
        .bind(req.fecha)
        .bind(texto_opcional(req.observaciones))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        recalcular_indicador(&mut tx, indicador_id).await?;
        tx.commit().await?;

        log::info!(
            "Medición registrada indicador={} valor={} fecha={}",
            indicador.codigo,
            req.valor,
            req.fecha
        );

        let medicion = sqlx::query_as::<_, Medicion>("SELECT * FROM mediciones WHERE id = ?1")
            .bind(&id)
            .fetch_one(&self.db_pool)
            .await?;
        Ok(medicion)
    }

    pub async fn eliminar_medicion(
        &self,
        org: &str,
        indicador_id: &str,
        medicion_id: &str,
    ) -> Result<Indicador> {
        self.obtener(org, indicador_id).await?;
        let mut tx = self.db_pool.begin().await?;

        let borradas = sqlx::query(
            "DELETE FROM mediciones WHERE id = ?1 AND indicador_id = ?2 AND organizacion_id = ?3",
        )
        .bind(medicion_id)
        .bind(indicador_id)
        .bind(org)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if borradas == 0 {
            return Err(AppError::not_found("Medición no encontrada"));
        }

        recalcular_indicador(&mut tx, indicador_id).await?;
        tx.commit().await?;

        self.obtener(org, indicador_id).await
    }
}

/// Toma las dos mediciones más recientes y actualiza los campos derivados.
/// Umbrales y sentido se leen dentro de la transacción, después de la escritura que la abrió.
async fn recalcular_indicador(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    indicador_id: &str,
) -> Result<()> {
    let (meta, umbral_critico, sentido): (f64, f64, Sentido) = sqlx::query_as(
        "SELECT meta, umbral_critico, sentido FROM indicadores WHERE id = ?1",
    )
    .bind(indicador_id)
    .fetch_one(&mut **tx)
    .await?;

    let ultimos: Vec<(f64,)> = sqlx::query_as(
        r#"
        SELECT valor FROM mediciones
        WHERE indicador_id = ?1
        ORDER BY fecha DESC, created_at DESC
        LIMIT 2
        "#,
    )
    .bind(indicador_id)
    .fetch_all(&mut **tx)
    .await?;

    let actual = ultimos.first().map(|(v,)| *v);
    let anterior = ultimos.get(1).map(|(v,)| *v);
    let tendencia = calcular_tendencia(anterior, actual);
    let estado = evaluar_estado(actual, meta, umbral_critico, sentido);

    sqlx::query(
        r#"
        UPDATE indicadores
        SET valor_actual = ?2, valor_anterior = ?3, tendencia = ?4, estado = ?5, updated_at = ?6
        WHERE id = ?1
        "#,
    )
    .bind(indicador_id)
    .bind(actual)
    .bind(anterior)
    .bind(tendencia)
    .bind(estado)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    Ok(())
}
