//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod accion_model;
pub mod acta_model;
pub mod alerta_model;
pub mod auditoria_model;
pub mod capacitacion_model;
pub mod common_model;
pub mod dashboard_model;
pub mod hallazgo_model;
pub mod indicador_model;
pub mod organizacion_model;
pub mod registro_model;
pub mod usuario_model;
