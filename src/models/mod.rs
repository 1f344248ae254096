pub mod dive;
pub mod dive_site;
pub mod experience_level;
pub mod refresh_token;
pub mod user;
