//! auth/mod.rs
//! Tokens JWT, hashing de contraseñas y el extractor del usuario autenticado.

pub mod extractor;
pub mod jwt;
pub mod password;

pub use extractor::UsuarioAutenticado;
