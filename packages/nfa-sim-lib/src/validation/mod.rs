pub mod limits;
pub mod same_language;
