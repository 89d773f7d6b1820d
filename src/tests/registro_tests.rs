//! tests/registro_tests.rs
//! Alertas de vencimiento y ciclo de vida de `RegistroService`.

use chrono::{Duration, NaiveDate};

use crate::error::AppError;
use crate::models::common_model::{calcular_alerta, Alerta, PaginationQuery};
use crate::models::registro_model::{
    ActualizarRegistroRequest, CambiarEstadoRegistroRequest, CrearRegistroRequest, EstadoRegistro, FiltroRegistros,
    TipoRegistro,
};
use crate::services::comun::hoy;
use crate::services::registro_service::RegistroService;
use crate::tests::{crear_organizacion, pool_de_prueba, pool_en_archivo};

fn registro_req(codigo: &str, fecha_limite: Option<NaiveDate>) -> CrearRegistroRequest {
    CrearRegistroRequest {
        codigo: codigo.to_string(),
        tipo: TipoRegistro::NoConformidad,
        titulo: format!("Registro {}", codigo),
        descripcion: None,
        proceso: "Compras".to_string(),
        responsable: None,
        prioridad: None,
        fecha_apertura: Some(hoy() - Duration::days(30)),
        fecha_limite,
    }
}

fn estado(estado: EstadoRegistro) -> CambiarEstadoRegistroRequest {
    CambiarEstadoRegistroRequest {
        estado,
        comentario: Some("cambio de prueba".to_string()),
    }
}

#[test]
fn alerta_segun_dias_restantes() {
    let hoy = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let dia = |d: u32| NaiveDate::from_ymd_opt(2024, 6, d);

    assert_eq!(calcular_alerta(false, None, hoy, 7), (Alerta::SinFecha, None));
    assert_eq!(calcular_alerta(false, dia(9), hoy, 7), (Alerta::Vencido, Some(-1)));
    assert_eq!(calcular_alerta(false, dia(10), hoy, 7), (Alerta::PorVencer, Some(0)));
    assert_eq!(calcular_alerta(false, dia(17), hoy, 7), (Alerta::PorVencer, Some(7)));
    assert_eq!(calcular_alerta(false, dia(18), hoy, 7), (Alerta::EnPlazo, Some(8)));
}

#[test]
fn cerrado_no_alerta_pero_conserva_dias() {
    let hoy = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let limite = NaiveDate::from_ymd_opt(2024, 6, 1);

    assert_eq!(calcular_alerta(true, limite, hoy, 7), (Alerta::Cerrado, Some(-9)));
    assert_eq!(calcular_alerta(true, None, hoy, 7), (Alerta::Cerrado, None));
}

#[test]
fn transiciones_de_registro() {
    use EstadoRegistro::*;
    assert!(Abierto.puede_pasar_a(EnProgreso));
    assert!(Abierto.puede_pasar_a(Cerrado));
    assert!(EnProgreso.puede_pasar_a(Abierto));
    assert!(Cerrado.puede_pasar_a(Abierto));
    assert!(!Cerrado.puede_pasar_a(EnProgreso));
    assert!(!Abierto.puede_pasar_a(Abierto));
}

#[actix_rt::test]
async fn crear_registro_arranca_abierto() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Registros").await;
    let service = RegistroService::new(pool, 7);

    let reg = service
        .crear(&org, registro_req("NC-001", Some(hoy() + Duration::days(3))))
        .await
        .unwrap();
    assert_eq!(reg.registro.estado, EstadoRegistro::Abierto);
    assert_eq!(reg.alerta, Alerta::PorVencer);
    assert_eq!(reg.dias_restantes, Some(3));
    assert!(reg.registro.fecha_cierre.is_none());

    let mut sin_apertura = registro_req("NC-002", None);
    sin_apertura.fecha_apertura = None;
    let reg = service.crear(&org, sin_apertura).await.unwrap();
    assert_eq!(reg.registro.fecha_apertura, hoy());
    assert_eq!(reg.alerta, Alerta::SinFecha);
}

#[actix_rt::test]
async fn fecha_limite_no_puede_ser_anterior_a_la_apertura() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Fechas").await;
    let service = RegistroService::new(pool, 7);

    let err = service
        .crear(&org, registro_req("NC-010", Some(hoy() - Duration::days(60))))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_rt::test]
async fn cambio_de_estado_deja_historial_y_fecha_cierre() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Historial").await;
    let service = RegistroService::new(pool, 7);

    let reg = service
        .crear(&org, registro_req("INC-1", Some(hoy() - Duration::days(2))))
        .await
        .unwrap();
    let id = reg.registro.id.clone();
    assert_eq!(reg.alerta, Alerta::Vencido);

    let reg = service
        .cambiar_estado(&org, &id, "usuario-1", estado(EstadoRegistro::Cerrado))
        .await
        .unwrap();
    assert_eq!(reg.registro.estado, EstadoRegistro::Cerrado);
    assert_eq!(reg.registro.fecha_cierre, Some(hoy()));
    assert_eq!(reg.alerta, Alerta::Cerrado);

    let err = service
        .cambiar_estado(&org, &id, "usuario-1", estado(EstadoRegistro::EnProgreso))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let reg = service
        .cambiar_estado(&org, &id, "usuario-2", estado(EstadoRegistro::Abierto))
        .await
        .unwrap();
    assert!(reg.registro.fecha_cierre.is_none());

    let historial = service.historial(&org, &id).await.unwrap();
    let pasos: Vec<(EstadoRegistro, EstadoRegistro, &str)> = historial
        .iter()
        .map(|h| (h.estado_anterior, h.estado_nuevo, h.usuario_id.as_str()))
        .collect();
    assert_eq!(
        pasos,
        vec![
            (EstadoRegistro::Abierto, EstadoRegistro::Cerrado, "usuario-1"),
            (EstadoRegistro::Cerrado, EstadoRegistro::Abierto, "usuario-2"),
        ]
    );
}

#[actix_rt::test]
async fn alertas_solo_incluyen_vencidos_y_por_vencer_abiertos() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Alertas").await;
    let service = RegistroService::new(pool, 7);

    service
        .crear(&org, registro_req("R-VENCIDO", Some(hoy() - Duration::days(1))))
        .await
        .unwrap();
    service
        .crear(&org, registro_req("R-PRONTO", Some(hoy() + Duration::days(5))))
        .await
        .unwrap();
    service
        .crear(&org, registro_req("R-LEJOS", Some(hoy() + Duration::days(40))))
        .await
        .unwrap();
    service.crear(&org, registro_req("R-SIN", None)).await.unwrap();
    let cerrado = service
        .crear(&org, registro_req("R-CERRADO", Some(hoy() - Duration::days(3))))
        .await
        .unwrap();
    service
        .cambiar_estado(&org, &cerrado.registro.id, "u", estado(EstadoRegistro::Cerrado))
        .await
        .unwrap();

    let alertas = service.alertas(&org).await.unwrap();
    let codigos: Vec<&str> = alertas.iter().map(|r| r.registro.codigo.as_str()).collect();
    assert_eq!(codigos, vec!["R-VENCIDO", "R-PRONTO"]);

    let abiertos = service
        .listar(
            &org,
            FiltroRegistros {
                estado: Some(EstadoRegistro::Abierto),
                ..Default::default()
            },
            PaginationQuery {
                page: Some(1),
                page_size: Some(2),
            },
        )
        .await
        .unwrap();
    assert_eq!(abiertos.total, 4);
    assert_eq!(abiertos.items.len(), 2);
}

#[actix_rt::test]
async fn cierres_simultaneos_solo_aplican_uno() {
    let (_dir, pool) = pool_en_archivo().await;
    let org = crear_organizacion(&pool, "Org Concurrencia").await;
    let service = RegistroService::new(pool, 7);

    let reg = service.crear(&org, registro_req("NC-100", None)).await.unwrap();
    let id = reg.registro.id.clone();

    let (a, b) = tokio::join!(
        service.cambiar_estado(&org, &id, "u1", estado(EstadoRegistro::Cerrado)),
        service.cambiar_estado(&org, &id, "u2", estado(EstadoRegistro::Cerrado)),
    );

    let errores: Vec<AppError> = [a, b].into_iter().filter_map(|r| r.err()).collect();
    assert_eq!(errores.len(), 1);
    assert!(matches!(errores[0], AppError::Validation(_)));

    let historial = service.historial(&org, &id).await.unwrap();
    assert_eq!(historial.len(), 1);
    assert_eq!(historial[0].estado_anterior, EstadoRegistro::Abierto);
    assert_eq!(historial[0].estado_nuevo, EstadoRegistro::Cerrado);
}

#[actix_rt::test]
async fn fecha_limite_null_la_quita() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Sin Fecha").await;
    let service = RegistroService::new(pool, 7);

    let reg = service
        .crear(&org, registro_req("R-FECHA", Some(hoy() + Duration::days(3))))
        .await
        .unwrap();
    let id = reg.registro.id.clone();

    let sin_cambios: ActualizarRegistroRequest =
        serde_json::from_value(serde_json::json!({ "titulo": "Nuevo título" })).unwrap();
    assert!(sin_cambios.fecha_limite.is_none());
    let reg = service.actualizar(&org, &id, sin_cambios).await.unwrap();
    assert_eq!(reg.registro.fecha_limite, Some(hoy() + Duration::days(3)));

    let quitar: ActualizarRegistroRequest =
        serde_json::from_value(serde_json::json!({ "fecha_limite": null })).unwrap();
    assert_eq!(quitar.fecha_limite, Some(None));
    let reg = service.actualizar(&org, &id, quitar).await.unwrap();
    assert!(reg.registro.fecha_limite.is_none());
    assert_eq!(reg.alerta, Alerta::SinFecha);
    assert_eq!(reg.dias_restantes, None);
}

#[actix_rt::test]
async fn eliminar_registro_borra_su_historial() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Borrado").await;
    let service = RegistroService::new(pool.clone(), 7);

    let reg = service.crear(&org, registro_req("R-BORRAR", None)).await.unwrap();
    let id = reg.registro.id.clone();
    service
        .cambiar_estado(&org, &id, "u", estado(EstadoRegistro::EnProgreso))
        .await
        .unwrap();

    service.eliminar(&org, &id).await.unwrap();

    let (restantes,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM registro_historial WHERE registro_id = ?1")
            .bind(&id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(restantes, 0);
    assert!(matches!(
        service.obtener(&org, &id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[test]
fn pagina_fuera_de_rango_es_invalida() {
    let enorme = PaginationQuery {
        page: Some(u64::MAX),
        page_size: Some(20),
    };
    assert!(matches!(enorme.limit_offset(), Err(AppError::Validation(_))));

    // No desborda u64 pero el offset no cabe en i64
    let sobre_i64 = PaginationQuery {
        page: Some(10_000_000_000_000_000_000),
        page_size: Some(1),
    };
    assert!(matches!(sobre_i64.limit_offset(), Err(AppError::Validation(_))));

    let normal = PaginationQuery {
        page: Some(3),
        page_size: Some(10),
    };
    assert_eq!(normal.limit_offset().unwrap(), (10, 20));
}

#[actix_rt::test]
async fn listar_con_pagina_enorme_devuelve_error() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Paginas").await;
    let service = RegistroService::new(pool, 7);

    let err = service
        .listar(
            &org,
            FiltroRegistros::default(),
            PaginationQuery {
                page: Some(u64::MAX),
                page_size: Some(100),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
