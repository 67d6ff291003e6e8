pub mod identity;
pub mod input;
pub mod outcome;
pub mod paging;
pub mod parse;
