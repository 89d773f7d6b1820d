use std::time::Duration;

use actix_web::{middleware::Logger, App, HttpServer};
use dotenv::dotenv;

use crate::app::AppServices;
use crate::config::app_config::AppConfig;
use crate::logger::init_logger;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = AppConfig::from_env().map_err(to_io)?;

    log::info!("Conectando a SQLite en {}", config.database_url);
    let db_pool = db::conectar(&config.database_url, config.db_max_connections)
        .await
        .map_err(to_io)?;
    db::run_migrations(&db_pool).await.map_err(to_io)?;

    let services = AppServices::new(db_pool, &config);

    if let (Some(email), Some(password)) =
        (&config.super_admin_email, &config.super_admin_password)
    {
        if let Err(e) = services.auth.bootstrap_super_admin(email, password).await {
            log::error!("No se pudo crear el super-admin inicial: {}", e);
        }
    }

    // Resumen periódico de vencimientos por correo
    if services.alerta.smtp_configurado() {
        let alerta_service = services.alerta.clone();
        let intervalo = Duration::from_secs(config.alertas_intervalo_horas.max(1) * 3600);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(intervalo).await;
                if let Err(e) = alerta_service.notificar_todas().await {
                    log::error!("Error en envío periódico de alertas: {}", e);
                }
            }
        });
    } else {
        log::warn!("SMTP no configurado: el envío de alertas por correo está deshabilitado");
    }

    let static_dir = config
        .static_dir
        .clone()
        .filter(|dir| std::path::Path::new(dir).is_dir());
    if let Some(dir) = &static_dir {
        log::info!("Sirviendo la SPA desde {}", dir);
    }

    log::info!("Levantando servidor en {}:{}", config.host, config.port);
    let bind = (config.host.clone(), config.port);
    HttpServer::new(move || {
        let services = services.clone();
        let mut app = App::new()
            .wrap(Logger::default())
            .configure(move |cfg| services.registrar(cfg))
            .configure(app::init_app);

        if let Some(dir) = &static_dir {
            app = app.service(actix_files::Files::new("/", dir).index_file("index.html"));
        }
        app
    })
    .bind(bind)?
    .run()
    .await
}

fn to_io(e: anyhow::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{:#}", e))
}
