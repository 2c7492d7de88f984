pub mod entities;
pub mod html2md;
pub mod list;
pub mod reviews;
