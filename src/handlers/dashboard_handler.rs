//! handlers/dashboard_handler.rs
//! Dashboard de la organización y envío manual de alertas.

use actix_web::{web, HttpResponse};

use crate::auth::UsuarioAutenticado;
use crate::error::AppError;
use crate::services::alerta_service::AlertaService;
use crate::services::dashboard_service::DashboardService;

/// GET /api/dashboard
pub async fn dashboard_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<DashboardService>,
) -> Result<HttpResponse, AppError> {
    let resumen = service.resumen(user.organizacion()?).await?;
    Ok(HttpResponse::Ok().json(resumen))
}

/// POST /api/alertas/notificar
pub async fn notify_alertas_endpoint(
    user: UsuarioAutenticado,
    service: web::Data<AlertaService>,
) -> Result<HttpResponse, AppError> {
    user.requerir_admin()?;
    let resultado = service.notificar_organizacion(user.organizacion()?).await?;
    Ok(HttpResponse::Ok().json(resultado))
}
