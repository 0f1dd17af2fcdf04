//! User storage layer
//! PostgreSQL 实现用于生产，内存实现用于本地开发与测试

pub mod memory;
pub mod user_repo;

pub use memory::InMemoryUserStore;
pub use user_repo::{PgUserRepository, UserStore};
