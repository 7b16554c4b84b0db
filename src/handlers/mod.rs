pub mod analytics;
pub mod entries;
pub mod finances;
pub mod health;
pub mod notes;
