pub mod jwt;
pub mod tokens;
