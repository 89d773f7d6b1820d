//! services/mod.rs
//! Módulo que agrupa los servicios (capa de negocio) de la app.

pub mod accion_service;
pub mod acta_service;
pub mod alerta_service;
pub mod auditoria_service;
pub mod auth_service;
pub mod capacitacion_service;
pub mod comun;
pub mod dashboard_service;
pub mod hallazgo_service;
pub mod indicador_service;
pub mod organizacion_service;
pub mod registro_service;
pub mod super_admin_service;
pub mod usuario_service;
