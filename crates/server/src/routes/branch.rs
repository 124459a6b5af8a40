use axum::Router;
use services::branch::BranchMapper;

use crate::{AppState, routes::entity};

pub fn router() -> Router<AppState> {
    entity::router::<BranchMapper>()
}
