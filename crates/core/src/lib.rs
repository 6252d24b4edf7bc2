pub mod abstract_sheet;
pub mod catalog;
pub mod docx;
pub mod error;
pub mod format;
pub mod reference;
pub mod roles;
pub mod search;
pub mod slug;
pub mod types;
pub mod upload;
