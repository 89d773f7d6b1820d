//! services/organizacion_service.rs
//! Alta y mantenimiento de organizaciones (tenants).

use chrono::Utc;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::organizacion_model::{
    ActualizarOrganizacionRequest, CrearOrganizacionRequest, Organizacion, Plan,
};
use crate::services::comun::{texto_opcional, texto_requerido};

#[derive(Clone, Debug)]
pub struct OrganizacionService {
    db_pool: Pool<Sqlite>,
}

impl OrganizacionService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        OrganizacionService { db_pool }
    }

    pub async fn listar(&self) -> Result<Vec<Organizacion>> {
        let orgs = sqlx::query_as::<_, Organizacion>("SELECT * FROM organizaciones ORDER BY nombre")
            .fetch_all(&self.db_pool)
            .await?;
        Ok(orgs)
    }

    pub async fn listar_activas(&self) -> Result<Vec<Organizacion>> {
        let orgs = sqlx::query_as::<_, Organizacion>(
            "SELECT * FROM organizaciones WHERE activa = TRUE ORDER BY nombre",
        )
        .fetch_all(&self.db_pool)
        .await?;
        Ok(orgs)
    }

    pub async fn obtener(&self, id: &str) -> Result<Organizacion> {
        sqlx::query_as::<_, Organizacion>("SELECT * FROM organizaciones WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found("Organización no encontrada"))
    }

    pub async fn crear(&self, req: CrearOrganizacionRequest) -> Result<Organizacion> {
        let nombre = texto_requerido("nombre", &req.nombre)?;
        self.verificar_nombre_unico(&nombre, None).await?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO organizaciones (id, nombre, nit, plan, activa, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, TRUE, ?5, ?5)
            "#,
        )
        .bind(&id)
        .bind(&nombre)
        .bind(texto_opcional(req.nit))
        .bind(req.plan.unwrap_or(Plan::Basico))
        .bind(now)
        .execute(&self.db_pool)
        .await?;

        log::info!("Organización creada id={} nombre={}", id, nombre);
        self.obtener(&id).await
    }

    pub async fn actualizar(
        &self,
        id: &str,
        req: ActualizarOrganizacionRequest,
    ) -> Result<Organizacion> {
        let mut org = self.obtener(id).await?;

        if let Some(nombre) = req.nombre {
            let nombre = texto_requerido("nombre", &nombre)?;
            self.verificar_nombre_unico(&nombre, Some(id)).await?;
            org.nombre = nombre;
        }
        if req.nit.is_some() {
            org.nit = texto_opcional(req.nit);
        }
        if let Some(plan) = req.plan {
            org.plan = plan;
        }

        sqlx::query(
            "UPDATE organizaciones SET nombre = ?2, nit = ?3, plan = ?4, updated_at = ?5 WHERE id = ?1",
        )
        .bind(id)
        .bind(&org.nombre)
        .bind(&org.nit)
        .bind(org.plan)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        self.obtener(id).await
    }

    /// Una organización inactiva pierde el acceso de todos sus usuarios
    pub async fn cambiar_estado(&self, id: &str, activa: bool) -> Result<Organizacion> {
        self.obtener(id).await?;

        sqlx::query("UPDATE organizaciones SET activa = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(activa)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await?;

        log::info!("Organización id={} activa={}", id, activa);
        self.obtener(id).await
    }

    async fn verificar_nombre_unico(&self, nombre: &str, excluir_id: Option<&str>) -> Result<()> {
        let (n,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM organizaciones WHERE lower(nombre) = lower(?1) AND id != ?2",
        )
        .bind(nombre)
        .bind(excluir_id.unwrap_or(""))
        .fetch_one(&self.db_pool)
        .await?;

        if n > 0 {
            return Err(AppError::conflict(format!(
                "Ya existe una organización llamada '{}'",
                nombre
            )));
        }
        Ok(())
    }
}
