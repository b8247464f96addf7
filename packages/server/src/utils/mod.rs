pub mod credentials;
pub mod filename;
