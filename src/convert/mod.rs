pub mod converter;
pub mod document;
pub mod grouping;


pub use converter::*;
pub use grouping::group_branch;
