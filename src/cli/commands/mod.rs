//! CLI command modules

pub mod authorize;
pub mod convert;
pub mod info;
pub mod init;
pub mod microservice;
pub mod profiles;
pub mod queue;
pub mod validate;
