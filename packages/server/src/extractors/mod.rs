pub mod auth;
pub mod multipart;
pub mod path;
