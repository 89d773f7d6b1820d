//! tests/dashboard_tests.rs
//! Resumen del dashboard y armado del correo de alertas.

use chrono::{Duration, Utc};

use crate::app::AppServices;
use crate::config::app_config::SmtpConfig;
use crate::error::AppError;
use crate::models::accion_model::{CrearAccionRequest, TipoAccion};
use crate::models::common_model::calcular_alerta;
use crate::models::indicador_model::{
    CrearIndicadorRequest, CrearMedicionRequest, Frecuencia, Sentido,
};
use crate::models::registro_model::{
    CrearRegistroRequest, EstadoRegistro, Prioridad, Registro, RegistroConAlerta, TipoRegistro,
};
use crate::services::alerta_service::{construir_resumen, AlertaService};
use crate::services::comun::hoy;
use crate::tests::{config_de_prueba, crear_organizacion, pool_de_prueba};

fn registro(codigo: &str, dias: i64) -> RegistroConAlerta {
    let limite = hoy() + Duration::days(dias);
    let (alerta, dias_restantes) = calcular_alerta(false, Some(limite), hoy(), 7);
    RegistroConAlerta {
        registro: Registro {
            id: codigo.to_lowercase(),
            organizacion_id: "org".to_string(),
            codigo: codigo.to_string(),
            tipo: TipoRegistro::Reclamo,
            titulo: "Reclamo de cliente".to_string(),
            descripcion: None,
            proceso: "Ventas".to_string(),
            responsable: None,
            prioridad: Prioridad::Alta,
            estado: EstadoRegistro::Abierto,
            fecha_apertura: hoy() - Duration::days(20),
            fecha_limite: Some(limite),
            fecha_cierre: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        alerta,
        dias_restantes,
    }
}

#[test]
fn resumen_vacio_no_genera_correo() {
    assert!(construir_resumen("Acme", &[], &[]).is_none());
}

#[test]
fn resumen_describe_cada_plazo() {
    let cuerpo = construir_resumen("Acme", &[registro("RC-1", -2), registro("RC-2", 0)], &[])
        .unwrap();
    assert!(cuerpo.contains("Acme"));
    assert!(cuerpo.contains("Registros (2)"));
    assert!(cuerpo.contains("[RC-1]"));
    assert!(cuerpo.contains("VENCIDO hace 2 día(s)"));
    assert!(cuerpo.contains("vence hoy"));
    assert!(!cuerpo.contains("Acciones"));
}

#[actix_rt::test]
async fn dashboard_cuenta_por_estado_y_vencimiento() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Dashboard").await;
    let otra = crear_organizacion(&pool, "Org Ajena").await;
    let services = AppServices::new(pool, &config_de_prueba());

    let ind = |codigo: &str| CrearIndicadorRequest {
        codigo: codigo.to_string(),
        nombre: "Entregas a tiempo".to_string(),
        descripcion: None,
        proceso: "Logística".to_string(),
        unidad: "%".to_string(),
        frecuencia: Frecuencia::Mensual,
        sentido: Sentido::Ascendente,
        meta: 95.0,
        umbral_critico: 85.0,
        responsable: None,
    };
    let i1 = services.indicador.crear(&org, ind("OTD")).await.unwrap();
    services.indicador.crear(&org, ind("OTIF")).await.unwrap();
    services.indicador.crear(&otra, ind("OTD")).await.unwrap();
    services
        .indicador
        .registrar_medicion(
            &org,
            &i1.id,
            CrearMedicionRequest {
                valor: 80.0,
                fecha: hoy(),
                observaciones: None,
            },
        )
        .await
        .unwrap();

    let reg = |codigo: &str, dias: i64| CrearRegistroRequest {
        codigo: codigo.to_string(),
        tipo: TipoRegistro::Incidente,
        titulo: "Incidente".to_string(),
        descripcion: None,
        proceso: "Logística".to_string(),
        responsable: None,
        prioridad: None,
        fecha_apertura: Some(hoy() - Duration::days(30)),
        fecha_limite: Some(hoy() + Duration::days(dias)),
    };
    services.registro.crear(&org, reg("INC-1", -1)).await.unwrap();
    services.registro.crear(&org, reg("INC-2", 3)).await.unwrap();
    services.registro.crear(&org, reg("INC-3", 30)).await.unwrap();

    services
        .accion
        .crear(
            &org,
            CrearAccionRequest {
                codigo: "AC-1".to_string(),
                hallazgo_id: None,
                tipo: TipoAccion::Mejora,
                descripcion: "Revisar rutas".to_string(),
                causa_raiz: None,
                responsable: "Logística".to_string(),
                fecha_compromiso: hoy() - Duration::days(5),
            },
        )
        .await
        .unwrap();

    let d = services.dashboard.resumen(&org).await.unwrap();
    assert_eq!(d.indicadores.total, 2);
    assert_eq!(d.indicadores.critico, 1);
    assert_eq!(d.indicadores.sin_datos, 1);
    assert_eq!(d.registros_abiertos, 3);
    assert_eq!(d.registros_vencidos, 1);
    assert_eq!(d.registros_por_vencer, 1);
    assert_eq!(d.acciones_pendientes, 1);
    assert_eq!(d.acciones_vencidas, 1);
    assert_eq!(d.actas_borrador, 0);
}

#[actix_rt::test]
async fn notificar_sin_smtp_es_error_de_validacion() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Sin SMTP").await;
    let services = AppServices::new(pool, &config_de_prueba());

    assert!(!services.alerta.smtp_configurado());
    let err = services.alerta.notificar_organizacion(&org).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_rt::test]
async fn notificar_sin_vencimientos_no_envia() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Al Día").await;
    let services = AppServices::new(pool, &config_de_prueba());

    let alertas = AlertaService::new(
        Some(SmtpConfig {
            host: "smtp.invalid".to_string(),
            port: 587,
            user: "user".to_string(),
            pass: "pass".to_string(),
            from: "sgc@example.com".to_string(),
        }),
        services.registro.clone(),
        services.accion.clone(),
        services.usuario.clone(),
        services.organizacion.clone(),
    );

    let resp = alertas.notificar_organizacion(&org).await.unwrap();
    assert!(resp.success);
    assert!(!resp.enviado);
    assert_eq!(resp.registros, 0);
    assert_eq!(resp.acciones, 0);
}
