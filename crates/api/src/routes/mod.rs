pub mod enrichment;
pub mod history;
pub mod metadata;
pub mod status;
pub mod upload;
pub mod user;
