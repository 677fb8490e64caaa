pub mod base;
pub mod history;
pub mod metadata;
pub mod user;

pub use base::BaseDao;
