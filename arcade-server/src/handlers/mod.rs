pub mod games;
pub mod healthcheck;
pub mod params;
