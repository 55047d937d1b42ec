pub mod errors;
pub mod ids;
pub mod serde_ext;
