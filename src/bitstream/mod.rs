pub mod bitreader;
pub mod bitwriter;
