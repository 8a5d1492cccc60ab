//! Route handlers organized by resource

pub mod assets;
pub mod files;
pub mod health;
pub mod upload;
