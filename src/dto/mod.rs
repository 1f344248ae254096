pub mod auth;
pub mod dive_sites;
pub mod dives;
