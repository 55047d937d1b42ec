pub mod app;
pub mod config;
pub mod dataverse;
pub mod runtime;
pub mod shared;
pub mod vault;
