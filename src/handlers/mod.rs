mod health;
mod posts;

pub use health::{health_check, readiness_check};
pub use posts::{PostBody, create_post};
