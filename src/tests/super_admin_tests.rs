//! tests/super_admin_tests.rs
//! Organizaciones, estadísticas globales y visor de esquema.

use crate::error::AppError;
use crate::models::organizacion_model::{
    ActualizarOrganizacionRequest, CrearOrganizacionRequest, Plan,
};
use crate::models::usuario_model::Rol;
use crate::services::organizacion_service::OrganizacionService;
use crate::services::super_admin_service::SuperAdminService;
use crate::services::usuario_service::UsuarioService;
use crate::tests::{crear_organizacion, crear_usuario, pool_de_prueba};

#[actix_rt::test]
async fn nombre_de_organizacion_unico_sin_importar_mayusculas() {
    let pool = pool_de_prueba().await;
    let service = OrganizacionService::new(pool);

    let org = service
        .crear(CrearOrganizacionRequest {
            nombre: "Acme Ltda".to_string(),
            nit: Some("900123456".to_string()),
            plan: Some(Plan::Profesional),
        })
        .await
        .unwrap();
    assert!(org.activa);
    assert_eq!(org.plan, Plan::Profesional);

    let err = service
        .crear(CrearOrganizacionRequest {
            nombre: "ACME LTDA".to_string(),
            nit: None,
            plan: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let org = service
        .actualizar(
            &org.id,
            ActualizarOrganizacionRequest {
                plan: Some(Plan::Empresarial),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(org.plan, Plan::Empresarial);
    assert_eq!(org.nombre, "Acme Ltda");
}

#[actix_rt::test]
async fn organizaciones_desactivadas_no_cuentan_como_activas() {
    let pool = pool_de_prueba().await;
    let a = crear_organizacion(&pool, "Alfa").await;
    crear_organizacion(&pool, "Beta").await;
    let service = OrganizacionService::new(pool);

    let org = service.cambiar_estado(&a, false).await.unwrap();
    assert!(!org.activa);

    let activas = service.listar_activas().await.unwrap();
    assert_eq!(activas.len(), 1);
    assert_eq!(activas[0].nombre, "Beta");
    assert_eq!(service.listar().await.unwrap().len(), 2);
}

#[actix_rt::test]
async fn estadisticas_por_organizacion() {
    let pool = pool_de_prueba().await;
    let a = crear_organizacion(&pool, "Alfa").await;
    let b = crear_organizacion(&pool, "Beta").await;
    crear_usuario(&pool, &a, "uno@alfa.com", Rol::Admin).await;
    crear_usuario(&pool, &a, "dos@alfa.com", Rol::Usuario).await;
    crear_usuario(&pool, &b, "uno@beta.com", Rol::Admin).await;
    UsuarioService::new(pool.clone())
        .crear_super_admin("root@sgc.com", "super-clave-123")
        .await
        .unwrap();
    OrganizacionService::new(pool.clone())
        .cambiar_estado(&b, false)
        .await
        .unwrap();

    let stats = SuperAdminService::new(pool).estadisticas().await.unwrap();
    assert_eq!(stats.organizaciones, 2);
    assert_eq!(stats.organizaciones_activas, 1);
    // El super-admin no pertenece a ninguna organización pero sí cuenta en el total
    assert_eq!(stats.usuarios, 4);

    let alfa = stats.detalle.iter().find(|d| d.organizacion_id == a).unwrap();
    assert_eq!(alfa.usuarios, 2);
    assert_eq!(alfa.indicadores, 0);
    assert!(alfa.activa);
}

#[actix_rt::test]
async fn esquema_lista_tablas_y_columnas() {
    let pool = pool_de_prueba().await;
    crear_organizacion(&pool, "Alfa").await;

    let tablas = SuperAdminService::new(pool).esquema().await.unwrap();
    let nombres: Vec<&str> = tablas.iter().map(|t| t.nombre.as_str()).collect();
    for esperada in ["acciones", "actas", "indicadores", "organizaciones", "usuarios"] {
        assert!(nombres.contains(&esperada), "falta la tabla {}", esperada);
    }
    assert!(!nombres.iter().any(|n| n.starts_with("_sqlx")));

    let orgs = tablas.iter().find(|t| t.nombre == "organizaciones").unwrap();
    assert_eq!(orgs.filas, 1);
    let id = orgs.columnas.iter().find(|c| c.nombre == "id").unwrap();
    assert!(id.clave_primaria);
    assert!(id.no_nulo);
}
