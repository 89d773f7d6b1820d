//! app.rs
use crate::handlers::{
    accion_handler, acta_handler, auditoria_handler, auth_handler, capacitacion_handler, common,
    dashboard_handler, hallazgo_handler, indicador_handler, registro_handler,
    super_admin_handler, usuario_handler,
};
use crate::config::app_config::AppConfig;
use crate::services::{
    accion_service::AccionService, acta_service::ActaService, alerta_service::AlertaService,
    auditoria_service::AuditoriaService, auth_service::AuthService,
    capacitacion_service::CapacitacionService, dashboard_service::DashboardService,
    hallazgo_service::HallazgoService, indicador_service::IndicadorService,
    organizacion_service::OrganizacionService, registro_service::RegistroService,
    super_admin_service::SuperAdminService, usuario_service::UsuarioService,
};
use actix_web::web;
use sqlx::{Pool, Sqlite};

/// Servicios compartidos por todos los workers
#[derive(Clone)]
pub struct AppServices {
    pub usuario: UsuarioService,
    pub organizacion: OrganizacionService,
    pub auth: AuthService,
    pub indicador: IndicadorService,
    pub registro: RegistroService,
    pub capacitacion: CapacitacionService,
    pub auditoria: AuditoriaService,
    pub hallazgo: HallazgoService,
    pub accion: AccionService,
    pub acta: ActaService,
    pub dashboard: DashboardService,
    pub super_admin: SuperAdminService,
    pub alerta: AlertaService,
}

impl AppServices {
    pub fn new(db_pool: Pool<Sqlite>, config: &AppConfig) -> Self {
        let dias_aviso = config.dias_aviso_vencimiento;

        let usuario = UsuarioService::new(db_pool.clone());
        let organizacion = OrganizacionService::new(db_pool.clone());
        let auth = AuthService::new(
            usuario.clone(),
            organizacion.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiracion_horas,
        );
        let registro = RegistroService::new(db_pool.clone(), dias_aviso);
        let accion = AccionService::new(db_pool.clone(), dias_aviso);
        let dashboard = DashboardService::new(db_pool.clone(), registro.clone(), accion.clone());
        let alerta = AlertaService::new(
            config.smtp.clone(),
            registro.clone(),
            accion.clone(),
            usuario.clone(),
            organizacion.clone(),
        );

        AppServices {
            indicador: IndicadorService::new(db_pool.clone()),
            capacitacion: CapacitacionService::new(db_pool.clone()),
            auditoria: AuditoriaService::new(db_pool.clone()),
            hallazgo: HallazgoService::new(db_pool.clone()),
            acta: ActaService::new(db_pool.clone()),
            super_admin: SuperAdminService::new(db_pool),
            usuario,
            organizacion,
            auth,
            registro,
            accion,
            dashboard,
            alerta,
        }
    }

    /// Registra cada servicio como `web::Data` para los extractores
    pub fn registrar(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.usuario.clone()))
            .app_data(web::Data::new(self.organizacion.clone()))
            .app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.indicador.clone()))
            .app_data(web::Data::new(self.registro.clone()))
            .app_data(web::Data::new(self.capacitacion.clone()))
            .app_data(web::Data::new(self.auditoria.clone()))
            .app_data(web::Data::new(self.hallazgo.clone()))
            .app_data(web::Data::new(self.accion.clone()))
            .app_data(web::Data::new(self.acta.clone()))
            .app_data(web::Data::new(self.dashboard.clone()))
            .app_data(web::Data::new(self.super_admin.clone()))
            .app_data(web::Data::new(self.alerta.clone()));
    }
}

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(common::json_config())
        .app_data(common::query_config())
        .service(
            web::scope("/api")
                .route("/health", web::get().to(common::health_endpoint))
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(auth_handler::login_endpoint))
                        .route("/me", web::get().to(auth_handler::me_endpoint))
                        .route(
                            "/password",
                            web::put().to(auth_handler::change_password_endpoint),
                        ),
                )
                .route("/dashboard", web::get().to(dashboard_handler::dashboard_endpoint))
                .route(
                    "/alertas/notificar",
                    web::post().to(dashboard_handler::notify_alertas_endpoint),
                )
                .service(
                    web::scope("/usuarios")
                        .route("", web::get().to(usuario_handler::list_usuarios_endpoint))
                        .route("", web::post().to(usuario_handler::create_usuario_endpoint))
                        .route(
                            "/{id}",
                            web::put().to(usuario_handler::update_usuario_endpoint),
                        ),
                )
                .service(
                    web::scope("/indicadores")
                        .route(
                            "",
                            web::get().to(indicador_handler::list_indicadores_endpoint),
                        )
                        .route(
                            "",
                            web::post().to(indicador_handler::create_indicador_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::get().to(indicador_handler::get_indicador_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::put().to(indicador_handler::update_indicador_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::delete().to(indicador_handler::delete_indicador_endpoint),
                        )
                        .route(
                            "/{id}/mediciones",
                            web::get().to(indicador_handler::list_mediciones_endpoint),
                        )
                        .route(
                            "/{id}/mediciones",
                            web::post().to(indicador_handler::create_medicion_endpoint),
                        )
                        .route(
                            "/{id}/mediciones/{medicion_id}",
                            web::delete().to(indicador_handler::delete_medicion_endpoint),
                        ),
                )
                .service(
                    web::scope("/registros")
                        .route("", web::get().to(registro_handler::list_registros_endpoint))
                        .route("", web::post().to(registro_handler::create_registro_endpoint))
                        .route(
                            "/alertas",
                            web::get().to(registro_handler::alertas_registros_endpoint),
                        )
                        .route("/{id}", web::get().to(registro_handler::get_registro_endpoint))
                        .route(
                            "/{id}",
                            web::put().to(registro_handler::update_registro_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::delete().to(registro_handler::delete_registro_endpoint),
                        )
                        .route(
                            "/{id}/estado",
                            web::patch().to(registro_handler::change_registro_estado_endpoint),
                        )
                        .route(
                            "/{id}/historial",
                            web::get().to(registro_handler::historial_registro_endpoint),
                        ),
                )
                .service(
                    web::scope("/capacitaciones")
                        .route(
                            "",
                            web::get().to(capacitacion_handler::list_capacitaciones_endpoint),
                        )
                        .route(
                            "",
                            web::post().to(capacitacion_handler::create_capacitacion_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::get().to(capacitacion_handler::get_capacitacion_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::put().to(capacitacion_handler::update_capacitacion_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::delete().to(capacitacion_handler::delete_capacitacion_endpoint),
                        ),
                )
                .service(
                    web::scope("/auditorias")
                        .route(
                            "",
                            web::get().to(auditoria_handler::list_auditorias_endpoint),
                        )
                        .route(
                            "",
                            web::post().to(auditoria_handler::create_auditoria_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::get().to(auditoria_handler::get_auditoria_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::put().to(auditoria_handler::update_auditoria_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::delete().to(auditoria_handler::delete_auditoria_endpoint),
                        )
                        .route(
                            "/{id}/hallazgos",
                            web::get().to(auditoria_handler::hallazgos_auditoria_endpoint),
                        ),
                )
                .service(
                    web::scope("/hallazgos")
                        .route("", web::get().to(hallazgo_handler::list_hallazgos_endpoint))
                        .route("", web::post().to(hallazgo_handler::create_hallazgo_endpoint))
                        .route("/{id}", web::get().to(hallazgo_handler::get_hallazgo_endpoint))
                        .route(
                            "/{id}",
                            web::put().to(hallazgo_handler::update_hallazgo_endpoint),
                        )
                        .route(
                            "/{id}",
                            web::delete().to(hallazgo_handler::delete_hallazgo_endpoint),
                        )
                        .route(
                            "/{id}/acciones",
                            web::get().to(hallazgo_handler::acciones_hallazgo_endpoint),
                        ),
                )
                .service(
                    web::scope("/acciones")
                        .route("", web::get().to(accion_handler::list_acciones_endpoint))
                        .route("", web::post().to(accion_handler::create_accion_endpoint))
                        .route(
                            "/alertas",
                            web::get().to(accion_handler::alertas_acciones_endpoint),
                        )
                        .route("/{id}", web::get().to(accion_handler::get_accion_endpoint))
                        .route("/{id}", web::put().to(accion_handler::update_accion_endpoint))
                        .route(
                            "/{id}",
                            web::delete().to(accion_handler::delete_accion_endpoint),
                        )
                        .route(
                            "/{id}/estado",
                            web::patch().to(accion_handler::change_accion_estado_endpoint),
                        ),
                )
                .service(
                    web::scope("/actas")
                        .route("", web::get().to(acta_handler::list_actas_endpoint))
                        .route("", web::post().to(acta_handler::create_acta_endpoint))
                        .route("/{id}", web::get().to(acta_handler::get_acta_endpoint))
                        .route("/{id}", web::put().to(acta_handler::update_acta_endpoint))
                        .route("/{id}", web::delete().to(acta_handler::delete_acta_endpoint))
                        .route(
                            "/{id}/aprobar",
                            web::post().to(acta_handler::approve_acta_endpoint),
                        ),
                )
                .service(
                    web::scope("/super-admin")
                        .route(
                            "/organizaciones",
                            web::get().to(super_admin_handler::list_organizaciones_endpoint),
                        )
                        .route(
                            "/organizaciones",
                            web::post().to(super_admin_handler::create_organizacion_endpoint),
                        )
                        .route(
                            "/organizaciones/{id}",
                            web::get().to(super_admin_handler::get_organizacion_endpoint),
                        )
                        .route(
                            "/organizaciones/{id}",
                            web::put().to(super_admin_handler::update_organizacion_endpoint),
                        )
                        .route(
                            "/organizaciones/{id}/estado",
                            web::patch()
                                .to(super_admin_handler::change_organizacion_estado_endpoint),
                        )
                        .route(
                            "/organizaciones/{id}/usuarios",
                            web::get()
                                .to(super_admin_handler::list_usuarios_organizacion_endpoint),
                        )
                        .route(
                            "/organizaciones/{id}/usuarios",
                            web::post()
                                .to(super_admin_handler::create_usuario_organizacion_endpoint),
                        )
                        .route(
                            "/usuarios",
                            web::get().to(super_admin_handler::list_all_usuarios_endpoint),
                        )
                        .route(
                            "/estadisticas",
                            web::get().to(super_admin_handler::estadisticas_endpoint),
                        )
                        .route("/esquema", web::get().to(super_admin_handler::esquema_endpoint)),
                ),
        );
}
