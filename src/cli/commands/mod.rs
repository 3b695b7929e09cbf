//! Command implementations

pub mod create;
pub mod init;
pub mod plan;
pub mod projects;
pub mod review;
pub mod validate;
