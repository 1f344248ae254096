pub mod auth;
pub mod dive_sites;
pub mod dives;
pub mod experience_levels;
