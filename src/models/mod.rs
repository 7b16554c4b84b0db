pub mod entry;
pub mod finance;
pub mod note;
