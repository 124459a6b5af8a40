pub mod branch;
pub mod mapper;
pub mod repository;

pub use mapper::{ApiModel, EntityMapper, MapperError, MapperErrorKind, SaveOutcome};
