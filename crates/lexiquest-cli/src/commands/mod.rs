pub mod import;
pub mod init;
pub mod play;
pub mod sessions;
pub mod stats;
pub mod validate;
