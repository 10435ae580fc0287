mod api;
mod post;

pub use api::HealthResponse;
pub use post::{Post, User, UserId, find_user};
