pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{Tendency, TendencyBook};
pub use repository::TendencyRepository;
