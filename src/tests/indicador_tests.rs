//! tests/indicador_tests.rs
//! Pruebas de `IndicadorService`: tendencia, estado y recálculo por mediciones.

use chrono::NaiveDate;

use crate::error::AppError;
use crate::models::common_model::PaginationQuery;
use crate::models::indicador_model::{
    ActualizarIndicadorRequest, CrearIndicadorRequest, CrearMedicionRequest, EstadoIndicador,
    FiltroIndicadores, Frecuencia, Sentido, Tendencia,
};
use crate::services::indicador_service::{
    calcular_tendencia, evaluar_estado, validar_umbrales, variacion_porcentual, IndicadorService,
};
use crate::tests::{crear_organizacion, pool_de_prueba};

fn fecha(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn indicador_req(codigo: &str, sentido: Sentido, meta: f64, umbral_critico: f64) -> CrearIndicadorRequest {
    CrearIndicadorRequest {
        codigo: codigo.to_string(),
        nombre: format!("Indicador {}", codigo),
        descripcion: None,
        proceso: "Producción".to_string(),
        unidad: "%".to_string(),
        frecuencia: Frecuencia::Mensual,
        sentido,
        meta,
        umbral_critico,
        responsable: Some("Calidad".to_string()),
    }
}

fn medicion(valor: f64, fecha: NaiveDate) -> CrearMedicionRequest {
    CrearMedicionRequest {
        valor,
        fecha,
        observaciones: None,
    }
}

#[test]
fn tendencia_usa_banda_de_estabilidad() {
    assert_eq!(calcular_tendencia(None, Some(10.0)), Tendencia::SinDatos);
    assert_eq!(calcular_tendencia(Some(10.0), None), Tendencia::SinDatos);
    assert_eq!(calcular_tendencia(Some(100.0), Some(104.0)), Tendencia::Estable);
    assert_eq!(calcular_tendencia(Some(100.0), Some(96.0)), Tendencia::Estable);
    assert_eq!(calcular_tendencia(Some(100.0), Some(110.0)), Tendencia::Subiendo);
    assert_eq!(calcular_tendencia(Some(100.0), Some(80.0)), Tendencia::Bajando);
}

#[test]
fn tendencia_con_valor_anterior_cero() {
    assert_eq!(calcular_tendencia(Some(0.0), Some(0.0)), Tendencia::Estable);
    assert_eq!(calcular_tendencia(Some(0.0), Some(3.0)), Tendencia::Subiendo);
    assert_eq!(calcular_tendencia(Some(0.0), Some(-1.0)), Tendencia::Bajando);
    assert_eq!(variacion_porcentual(Some(0.0), Some(3.0)), None);
}

#[test]
fn variacion_relativa_al_valor_anterior() {
    let v = variacion_porcentual(Some(80.0), Some(100.0)).unwrap();
    assert!((v - 25.0).abs() < 1e-9);
    let v = variacion_porcentual(Some(-50.0), Some(-25.0)).unwrap();
    assert!((v - 50.0).abs() < 1e-9);
}

#[test]
fn estado_ascendente() {
    let s = Sentido::Ascendente;
    assert_eq!(evaluar_estado(None, 90.0, 70.0, s), EstadoIndicador::SinDatos);
    assert_eq!(evaluar_estado(Some(95.0), 90.0, 70.0, s), EstadoIndicador::Cumple);
    assert_eq!(evaluar_estado(Some(90.0), 90.0, 70.0, s), EstadoIndicador::Cumple);
    assert_eq!(evaluar_estado(Some(80.0), 90.0, 70.0, s), EstadoIndicador::Alerta);
    assert_eq!(evaluar_estado(Some(70.0), 90.0, 70.0, s), EstadoIndicador::Critico);
}

#[test]
fn estado_descendente() {
    let s = Sentido::Descendente;
    assert_eq!(evaluar_estado(Some(4.0), 5.0, 10.0, s), EstadoIndicador::Cumple);
    assert_eq!(evaluar_estado(Some(7.5), 5.0, 10.0, s), EstadoIndicador::Alerta);
    assert_eq!(evaluar_estado(Some(12.0), 5.0, 10.0, s), EstadoIndicador::Critico);
}

#[test]
fn umbral_critico_del_lado_malo_de_la_meta() {
    assert!(validar_umbrales(90.0, 70.0, Sentido::Ascendente).is_ok());
    assert!(validar_umbrales(90.0, 90.0, Sentido::Ascendente).is_err());
    assert!(validar_umbrales(5.0, 10.0, Sentido::Descendente).is_ok());
    assert!(validar_umbrales(5.0, 2.0, Sentido::Descendente).is_err());
    assert!(validar_umbrales(f64::NAN, 2.0, Sentido::Descendente).is_err());
}

#[actix_rt::test]
async fn crear_rechaza_umbrales_invertidos_y_codigo_repetido() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Indicadores").await;
    let service = IndicadorService::new(pool);

    let err = service
        .crear(&org, indicador_req("IND-1", Sentido::Ascendente, 80.0, 95.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let ind = service
        .crear(&org, indicador_req("IND-1", Sentido::Ascendente, 95.0, 80.0))
        .await
        .unwrap();
    assert_eq!(ind.estado, EstadoIndicador::SinDatos);
    assert_eq!(ind.tendencia, Tendencia::SinDatos);

    let err = service
        .crear(&org, indicador_req("IND-1", Sentido::Ascendente, 95.0, 80.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[actix_rt::test]
async fn mediciones_recalculan_valor_tendencia_y_estado() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Mediciones").await;
    let service = IndicadorService::new(pool);

    let ind = service
        .crear(&org, indicador_req("SAT", Sentido::Ascendente, 90.0, 70.0))
        .await
        .unwrap();

    service
        .registrar_medicion(&org, &ind.id, medicion(80.0, fecha(2024, 1, 31)))
        .await
        .unwrap();
    let m2 = service
        .registrar_medicion(&org, &ind.id, medicion(95.0, fecha(2024, 2, 29)))
        .await
        .unwrap();

    let actual = service.obtener(&org, &ind.id).await.unwrap();
    assert_eq!(actual.valor_actual, Some(95.0));
    assert_eq!(actual.valor_anterior, Some(80.0));
    assert_eq!(actual.tendencia, Tendencia::Subiendo);
    assert_eq!(actual.estado, EstadoIndicador::Cumple);

    // Una medición con fecha anterior no desplaza al valor actual
    service
        .registrar_medicion(&org, &ind.id, medicion(60.0, fecha(2023, 12, 31)))
        .await
        .unwrap();
    let actual = service.obtener(&org, &ind.id).await.unwrap();
    assert_eq!(actual.valor_actual, Some(95.0));

    let detalle = service.obtener_detalle(&org, &ind.id).await.unwrap();
    assert_eq!(detalle.mediciones.len(), 3);
    assert_eq!(detalle.mediciones[0].valor, 95.0);
    assert!(detalle.variacion_porcentual.is_some());

    let despues = service
        .eliminar_medicion(&org, &ind.id, &m2.id)
        .await
        .unwrap();
    assert_eq!(despues.valor_actual, Some(80.0));
    assert_eq!(despues.valor_anterior, Some(60.0));
    assert_eq!(despues.tendencia, Tendencia::Subiendo);
    assert_eq!(despues.estado, EstadoIndicador::Alerta);
}

#[actix_rt::test]
async fn cambiar_meta_reevalua_estado() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Meta").await;
    let service = IndicadorService::new(pool);

    let ind = service
        .crear(&org, indicador_req("REC", Sentido::Descendente, 5.0, 10.0))
        .await
        .unwrap();
    service
        .registrar_medicion(&org, &ind.id, medicion(8.0, fecha(2024, 3, 31)))
        .await
        .unwrap();
    assert_eq!(
        service.obtener(&org, &ind.id).await.unwrap().estado,
        EstadoIndicador::Alerta
    );

    let ind = service
        .actualizar(
            &org,
            &ind.id,
            ActualizarIndicadorRequest {
                meta: Some(8.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ind.estado, EstadoIndicador::Cumple);
}

#[actix_rt::test]
async fn indicadores_aislados_por_organizacion() {
    let pool = pool_de_prueba().await;
    let org_a = crear_organizacion(&pool, "Org A").await;
    let org_b = crear_organizacion(&pool, "Org B").await;
    let service = IndicadorService::new(pool);

    let ind = service
        .crear(&org_a, indicador_req("COMP", Sentido::Ascendente, 90.0, 70.0))
        .await
        .unwrap();
    // El mismo código es válido en otra organización
    service
        .crear(&org_b, indicador_req("COMP", Sentido::Ascendente, 90.0, 70.0))
        .await
        .unwrap();

    let err = service.obtener(&org_b, &ind.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = service
        .registrar_medicion(&org_b, &ind.id, medicion(1.0, fecha(2024, 1, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let lista = service
        .listar(&org_a, FiltroIndicadores::default(), PaginationQuery::default())
        .await
        .unwrap();
    assert_eq!(lista.total, 1);
    assert_eq!(lista.page_size, 20);
}

#[actix_rt::test]
async fn eliminar_indicador_borra_sus_mediciones() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Borrado Indicador").await;
    let service = IndicadorService::new(pool.clone());

    let ind = service
        .crear(&org, indicador_req("DEL", Sentido::Ascendente, 90.0, 70.0))
        .await
        .unwrap();
    for (valor, dia) in [(80.0, 1), (85.0, 2)] {
        service
            .registrar_medicion(&org, &ind.id, medicion(valor, fecha(2024, 1, dia)))
            .await
            .unwrap();
    }

    service.eliminar(&org, &ind.id).await.unwrap();

    let (restantes,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM mediciones WHERE indicador_id = ?1")
            .bind(&ind.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(restantes, 0);
    assert!(matches!(
        service.eliminar(&org, &ind.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[actix_rt::test]
async fn cambiar_sentido_recalcula_con_las_mediciones_guardadas() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Sentido").await;
    let service = IndicadorService::new(pool);

    let ind = service
        .crear(&org, indicador_req("SEN", Sentido::Ascendente, 90.0, 70.0))
        .await
        .unwrap();
    service
        .registrar_medicion(&org, &ind.id, medicion(60.0, fecha(2024, 2, 29)))
        .await
        .unwrap();
    assert_eq!(
        service.obtener(&org, &ind.id).await.unwrap().estado,
        EstadoIndicador::Critico
    );

    let ind = service
        .actualizar(
            &org,
            &ind.id,
            ActualizarIndicadorRequest {
                sentido: Some(Sentido::Descendente),
                meta: Some(65.0),
                umbral_critico: Some(80.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ind.valor_actual, Some(60.0));
    assert_eq!(ind.estado, EstadoIndicador::Cumple);
}
