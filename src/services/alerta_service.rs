//! services/alerta_service.rs
//! Resumen por correo de registros y acciones vencidos o por vencer.

use std::time::Duration;

use anyhow::Context;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::app_config::SmtpConfig;
use crate::error::{AppError, Result};
use crate::models::accion_model::AccionConAlerta;
use crate::models::alerta_model::NotificacionAlertasResponse;
use crate::models::common_model::Alerta;
use crate::models::registro_model::RegistroConAlerta;
use crate::services::accion_service::AccionService;
use crate::services::organizacion_service::OrganizacionService;
use crate::services::registro_service::RegistroService;
use crate::services::usuario_service::UsuarioService;

const SMTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct AlertaService {
    smtp: Option<SmtpConfig>,
    registro_service: RegistroService,
    accion_service: AccionService,
    usuario_service: UsuarioService,
    organizacion_service: OrganizacionService,
}

fn describir_plazo(alerta: Alerta, dias: Option<i64>) -> String {
    match (alerta, dias) {
        (Alerta::Vencido, Some(d)) => format!("VENCIDO hace {} día(s)", -d),
        (Alerta::PorVencer, Some(0)) => "vence hoy".to_string(),
        (Alerta::PorVencer, Some(d)) => format!("vence en {} día(s)", d),
        _ => String::new(),
    }
}

/// Texto plano del correo; `None` si no hay nada que avisar
pub fn construir_resumen(
    organizacion: &str,
    registros: &[RegistroConAlerta],
    acciones: &[AccionConAlerta],
) -> Option<String> {
    if registros.is_empty() && acciones.is_empty() {
        return None;
    }

    let mut cuerpo = format!("Resumen de vencimientos - {}\n", organizacion);

    if !registros.is_empty() {
        cuerpo.push_str(&format!("\nRegistros ({}):\n", registros.len()));
        for r in registros {
            cuerpo.push_str(&format!(
                "  - [{}] {} | límite {} | {}\n",
                r.registro.codigo,
                r.registro.titulo,
                r.registro
                    .fecha_limite
                    .map(|f| f.to_string())
                    .unwrap_or_default(),
                describir_plazo(r.alerta, r.dias_restantes)
            ));
        }
    }

    if !acciones.is_empty() {
        cuerpo.push_str(&format!("\nAcciones ({}):\n", acciones.len()));
        for a in acciones {
            cuerpo.push_str(&format!(
                "  - [{}] {} | responsable {} | compromiso {} | {}\n",
                a.accion.codigo,
                a.accion.descripcion,
                a.accion.responsable,
                a.accion.fecha_compromiso,
                describir_plazo(a.alerta, a.dias_restantes)
            ));
        }
    }

    Some(cuerpo)
}

impl AlertaService {
    pub fn new(
        smtp: Option<SmtpConfig>,
        registro_service: RegistroService,
        accion_service: AccionService,
        usuario_service: UsuarioService,
        organizacion_service: OrganizacionService,
    ) -> Self {
        Self {
            smtp,
            registro_service,
            accion_service,
            usuario_service,
            organizacion_service,
        }
    }

    pub fn smtp_configurado(&self) -> bool {
        self.smtp.is_some()
    }

    pub async fn notificar_organizacion(&self, org_id: &str) -> Result<NotificacionAlertasResponse> {
        let smtp = self.smtp.as_ref().ok_or_else(|| {
            AppError::validation("El envío de correos no está configurado (SMTP)")
        })?;

        let org = self.organizacion_service.obtener(org_id).await?;
        let registros = self.registro_service.alertas(org_id).await?;
        let acciones = self.accion_service.alertas(org_id).await?;
        let destinatarios: Vec<String> = self
            .usuario_service
            .admins_activos(org_id)
            .await?
            .into_iter()
            .map(|u| u.email)
            .collect();

        let mut respuesta = NotificacionAlertasResponse {
            success: true,
            organizacion_id: org_id.to_string(),
            registros: registros.len(),
            acciones: acciones.len(),
            destinatarios: destinatarios.clone(),
            enviado: false,
        };

        let Some(cuerpo) = construir_resumen(&org.nombre, &registros, &acciones) else {
            log::info!("Sin vencimientos para org={}, no se envía correo", org_id);
            return Ok(respuesta);
        };
        if destinatarios.is_empty() {
            log::warn!("org={} no tiene administradores activos para alertas", org_id);
            return Ok(respuesta);
        }

        let asunto = format!("[SGC] Vencimientos pendientes - {}", org.nombre);
        enviar_smtp(smtp, &destinatarios, &asunto, &cuerpo).await?;
        respuesta.enviado = true;

        log::info!(
            "Alertas enviadas org={} registros={} acciones={} destinatarios={}",
            org_id,
            registros.len(),
            acciones.len(),
            destinatarios.len()
        );
        Ok(respuesta)
    }

    /// Recorre las organizaciones activas; un fallo no detiene a las demás
    pub async fn notificar_todas(&self) -> Result<()> {
        for org in self.organizacion_service.listar_activas().await? {
            if let Err(e) = self.notificar_organizacion(&org.id).await {
                log::error!("Error enviando alertas org={}: {}", org.id, e);
            }
        }
        Ok(())
    }
}

async fn enviar_smtp(
    smtp: &SmtpConfig,
    destinatarios: &[String],
    asunto: &str,
    cuerpo: &str,
) -> Result<()> {
    let from: Mailbox = smtp.from.parse().context("Remitente SMTP_FROM inválido")?;

    let tls_params = TlsParameters::new(smtp.host.clone()).context("Parámetros TLS inválidos")?;
    let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
        .context("No se pudo crear el transporte SMTP")?
        .port(smtp.port)
        .credentials(Credentials::new(smtp.user.clone(), smtp.pass.clone()))
        .tls(Tls::Required(tls_params))
        .build();

    // Un correo por destinatario
    for destinatario in destinatarios {
        let to: Mailbox = destinatario
            .parse()
            .with_context(|| format!("Destinatario inválido: {}", destinatario))?;
        let message = Message::builder()
            .from(from.clone())
            .to(to)
            .subject(asunto)
            .header(ContentType::TEXT_PLAIN)
            .body(cuerpo.to_string())
            .context("No se pudo construir el mensaje")?;

        tokio::time::timeout(Duration::from_secs(SMTP_TIMEOUT_SECS), mailer.send(message))
            .await
            .context("Tiempo de espera SMTP agotado")?
            .context("Fallo al enviar correo")?;
    }
    Ok(())
}
