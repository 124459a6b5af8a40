pub mod branch;
pub mod entity;
pub mod ping;
pub mod repository;
