pub mod csv2library;
pub mod date;
