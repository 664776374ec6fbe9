// Library exports for agora-core
// The embedding application (HTTP layer, templates) lives outside this crate.

pub mod config;
pub mod db;
pub mod hashtag;
pub mod pagination;
pub mod service;
