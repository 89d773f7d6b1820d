//! tests/auth_tests.rs
//! Inicio de sesión, sesiones, contraseñas y gestión de usuarios.

use crate::auth::jwt::{create_token, verify_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::usuario_model::{
    ActualizarUsuarioRequest, CambiarPasswordRequest, CrearUsuarioRequest, LoginRequest, Rol,
};
use crate::services::auth_service::AuthService;
use crate::services::organizacion_service::OrganizacionService;
use crate::services::usuario_service::{normalizar_email, UsuarioService};
use crate::tests::{crear_organizacion, crear_usuario, pool_de_prueba, PASSWORD_PRUEBA};
use sqlx::{Pool, Sqlite};

fn auth_service(pool: &Pool<Sqlite>) -> AuthService {
    AuthService::new(
        UsuarioService::new(pool.clone()),
        OrganizacionService::new(pool.clone()),
        "secreto-de-pruebas".to_string(),
        12,
    )
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn token_guarda_usuario_organizacion_y_rol() {
    let token = create_token("s3cr3t", "u-1", Some("org-1"), Rol::Admin, 1).unwrap();
    let claims = verify_token("s3cr3t", &token).unwrap();
    assert_eq!(claims.sub, "u-1");
    assert_eq!(claims.organizacion_id.as_deref(), Some("org-1"));
    assert_eq!(claims.rol, Rol::Admin);
    assert!(claims.exp > claims.iat);

    assert!(verify_token("otro-secreto", &token).is_err());
}

#[test]
fn password_hash_no_guarda_texto_plano() {
    let hash = hash_password("una-clave-larga").unwrap();
    assert_ne!(hash, "una-clave-larga");
    assert!(verify_password("una-clave-larga", &hash).unwrap());
    assert!(!verify_password("otra-clave", &hash).unwrap());
}

#[test]
fn email_normalizado() {
    assert_eq!(normalizar_email("  Ana.Perez@Empresa.COM "), "ana.perez@empresa.com");
}

#[actix_rt::test]
async fn login_y_verificacion_de_sesion() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Login").await;
    let usuario = crear_usuario(&pool, &org, "admin@org.com", Rol::Admin).await;
    let auth = auth_service(&pool);

    let err = auth
        .login(login("admin@org.com", "incorrecta"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    let err = auth
        .login(login("nadie@org.com", PASSWORD_PRUEBA))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let resp = auth
        .login(login("ADMIN@org.com", PASSWORD_PRUEBA))
        .await
        .unwrap();
    assert_eq!(resp.usuario.id, usuario.id);

    let sesion = auth.verificar_sesion(&resp.token).await.unwrap();
    assert_eq!(sesion.id, usuario.id);
    assert_eq!(sesion.organizacion_id.as_deref(), Some(org.as_str()));
    assert_eq!(sesion.rol, Rol::Admin);

    let perfil = auth.perfil(&usuario.id).await.unwrap();
    assert!(perfil.ultimo_acceso.is_some());

    let err = auth.verificar_sesion("no-es-un-token").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[actix_rt::test]
async fn organizacion_desactivada_bloquea_acceso() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Suspendida").await;
    crear_usuario(&pool, &org, "user@org.com", Rol::Usuario).await;
    let auth = auth_service(&pool);

    let token = auth
        .login(login("user@org.com", PASSWORD_PRUEBA))
        .await
        .unwrap()
        .token;

    OrganizacionService::new(pool.clone())
        .cambiar_estado(&org, false)
        .await
        .unwrap();

    let err = auth.verificar_sesion(&token).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = auth
        .login(login("user@org.com", PASSWORD_PRUEBA))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[actix_rt::test]
async fn usuario_desactivado_pierde_la_sesion() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Bajas").await;
    let admin = crear_usuario(&pool, &org, "admin@bajas.com", Rol::Admin).await;
    let user = crear_usuario(&pool, &org, "user@bajas.com", Rol::Usuario).await;
    let usuarios = UsuarioService::new(pool.clone());
    let auth = auth_service(&pool);

    let token = auth
        .login(login("user@bajas.com", PASSWORD_PRUEBA))
        .await
        .unwrap()
        .token;

    let desactivar = ActualizarUsuarioRequest {
        activo: Some(false),
        ..Default::default()
    };
    let err = usuarios
        .actualizar(&org, &admin.id, desactivar.clone(), &admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    usuarios
        .actualizar(&org, &user.id, desactivar, &admin.id)
        .await
        .unwrap();
    let err = auth.verificar_sesion(&token).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[actix_rt::test]
async fn cambio_de_password() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Password").await;
    let usuario = crear_usuario(&pool, &org, "pw@org.com", Rol::Usuario).await;
    let auth = auth_service(&pool);

    let err = auth
        .cambiar_password(
            &usuario.id,
            CambiarPasswordRequest {
                password_actual: "equivocada".to_string(),
                password_nuevo: "nueva-clave-segura".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = auth
        .cambiar_password(
            &usuario.id,
            CambiarPasswordRequest {
                password_actual: PASSWORD_PRUEBA.to_string(),
                password_nuevo: "corta".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    auth.cambiar_password(
        &usuario.id,
        CambiarPasswordRequest {
            password_actual: PASSWORD_PRUEBA.to_string(),
            password_nuevo: "nueva-clave-segura".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(auth.login(login("pw@org.com", PASSWORD_PRUEBA)).await.is_err());
    assert!(auth
        .login(login("pw@org.com", "nueva-clave-segura"))
        .await
        .is_ok());
}

#[actix_rt::test]
async fn reglas_de_alta_de_usuarios() {
    let pool = pool_de_prueba().await;
    let org = crear_organizacion(&pool, "Org Altas").await;
    let usuarios = UsuarioService::new(pool.clone());

    let req = |email: &str, rol: Option<Rol>| CrearUsuarioRequest {
        nombre: "Nuevo".to_string(),
        email: email.to_string(),
        password: PASSWORD_PRUEBA.to_string(),
        rol,
    };

    let err = usuarios
        .crear(&org, req("root@org.com", Some(Rol::SuperAdmin)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = usuarios.crear(&org, req("sin-arroba", None)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let nuevo = usuarios.crear(&org, req("nuevo@org.com", None)).await.unwrap();
    assert_eq!(nuevo.rol, Rol::Usuario);
    assert!(nuevo.activo);

    let err = usuarios
        .crear(&org, req("Nuevo@Org.com", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let otra = crear_organizacion(&pool, "Otra Org").await;
    let err = usuarios
        .obtener_en_organizacion(&otra, &nuevo.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_rt::test]
async fn bootstrap_de_super_admin_es_idempotente() {
    let pool = pool_de_prueba().await;
    let auth = auth_service(&pool);

    assert!(auth
        .bootstrap_super_admin("root@sgc.com", "super-clave-123")
        .await
        .unwrap());
    assert!(!auth
        .bootstrap_super_admin("root@sgc.com", "super-clave-123")
        .await
        .unwrap());

    let resp = auth
        .login(login("root@sgc.com", "super-clave-123"))
        .await
        .unwrap();
    assert_eq!(resp.usuario.rol, Rol::SuperAdmin);
    assert!(resp.usuario.organizacion_id.is_none());

    let sesion = auth.verificar_sesion(&resp.token).await.unwrap();
    assert!(sesion.requerir_super_admin().is_ok());
    assert!(matches!(sesion.organizacion(), Err(AppError::Forbidden(_))));
}
