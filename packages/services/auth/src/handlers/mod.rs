//! HTTP 핸들러

pub mod apikeys;
pub mod health;
pub mod passwords;
pub mod sigv4;
pub mod tokens;
