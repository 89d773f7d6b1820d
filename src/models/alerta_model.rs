//! models/alerta_model.rs

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NotificacionAlertasResponse {
    pub success: bool,
    pub organizacion_id: String,
    pub registros: usize,
    pub acciones: usize,
    pub destinatarios: Vec<String>,
    /// false cuando no había nada que avisar o no hay destinatarios
    pub enviado: bool,
}
