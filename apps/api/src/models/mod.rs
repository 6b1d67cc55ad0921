pub mod image;
pub mod match_record;
