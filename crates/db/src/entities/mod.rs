pub mod branch;
pub mod repository;
