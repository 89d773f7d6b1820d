//! auth/password.rs

use anyhow::{anyhow, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

pub const LONGITUD_MINIMA: usize = 8;

pub fn hash_password(password: &str) -> Result<String> {
    hash(password, DEFAULT_COST).map_err(|e| anyhow!("No se pudo generar el hash: {}", e))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    verify(password, hash).map_err(|e| anyhow!("No se pudo verificar la contraseña: {}", e))
}
