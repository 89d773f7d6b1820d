//! auth/jwt.rs

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::usuario_model::Rol;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // usuario_id
    pub organizacion_id: Option<String>,
    pub rol: Rol,
    pub exp: usize,
    pub iat: usize,
}

pub fn create_token(
    secret: &str,
    usuario_id: &str,
    organizacion_id: Option<&str>,
    rol: Rol,
    horas_validez: i64,
) -> Result<String> {
    let ahora = Utc::now();
    let expiration = ahora
        .checked_add_signed(Duration::hours(horas_validez))
        .ok_or_else(|| anyhow!("No se pudo calcular la expiración del token"))?
        .timestamp() as usize;

    let claims = Claims {
        sub: usuario_id.to_string(),
        organizacion_id: organizacion_id.map(str::to_string),
        rol,
        exp: expiration,
        iat: ahora.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow!("No se pudo crear el token: {}", e))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| anyhow!("Token inválido: {}", e))
}
