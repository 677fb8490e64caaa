mod history;
mod metadata;
mod user;

pub use history::*;
pub use metadata::*;
pub use user::*;
