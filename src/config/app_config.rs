//! config/app_config.rs
//! Configuración global del servicio, leída de variables de entorno (.env).

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

const JWT_SECRET_DESARROLLO: &str = "sgc-jwt-secret-solo-para-desarrollo";

/// Datos del servidor SMTP para el envío de alertas.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiracion_horas: i64,
    /// Días antes de la fecha límite en que un registro pasa a "por_vencer"
    pub dias_aviso_vencimiento: i64,
    /// Carpeta con el build de la SPA
    pub static_dir: Option<String>,
    pub super_admin_email: Option<String>,
    pub super_admin_password: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub alertas_intervalo_horas: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 5030,
            database_url: "sqlite:data/sgc.db".to_string(),
            db_max_connections: 5,
            jwt_secret: JWT_SECRET_DESARROLLO.to_string(),
            jwt_expiracion_horas: 12,
            dias_aviso_vencimiento: 7,
            static_dir: None,
            super_admin_email: None,
            super_admin_password: None,
            smtp: None,
            alertas_intervalo_horas: 24,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = AppConfig::default();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => {
                log::warn!("JWT_SECRET no definido, usando secreto de desarrollo");
                defaults.jwt_secret
            }
        };

        let smtp = match (
            opcional("SMTP_HOST"),
            opcional("SMTP_USER"),
            opcional("SMTP_PASS"),
            opcional("SMTP_FROM"),
        ) {
            (Some(host), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: parse_or("SMTP_PORT", 587)?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(AppConfig {
            host: opcional("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", defaults.port)?,
            database_url: opcional("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            jwt_secret,
            jwt_expiracion_horas: parse_or("JWT_EXPIRACION_HORAS", defaults.jwt_expiracion_horas)?,
            dias_aviso_vencimiento: parse_or(
                "DIAS_AVISO_VENCIMIENTO",
                defaults.dias_aviso_vencimiento,
            )?,
            static_dir: opcional("STATIC_DIR"),
            super_admin_email: opcional("SUPER_ADMIN_EMAIL"),
            super_admin_password: opcional("SUPER_ADMIN_PASSWORD"),
            smtp,
            alertas_intervalo_horas: parse_or(
                "ALERTAS_INTERVALO_HORAS",
                defaults.alertas_intervalo_horas,
            )?,
        })
    }
}

fn opcional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match opcional(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Valor inválido para {}: '{}'", key, raw)),
        None => Ok(default),
    }
}
