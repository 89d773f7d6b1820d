//! handlers/mod.rs
//! Módulo que agrupa los handlers HTTP de cada módulo del SGC.

pub mod accion_handler;
pub mod acta_handler;
pub mod auditoria_handler;
pub mod auth_handler;
pub mod capacitacion_handler;
pub mod common;
pub mod dashboard_handler;
pub mod hallazgo_handler;
pub mod indicador_handler;
pub mod registro_handler;
pub mod super_admin_handler;
pub mod usuario_handler;
