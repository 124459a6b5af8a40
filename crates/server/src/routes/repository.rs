use axum::Router;
use services::repository::RepositoryMapper;

use crate::{AppState, routes::entity};

pub fn router() -> Router<AppState> {
    entity::router::<RepositoryMapper>()
}
