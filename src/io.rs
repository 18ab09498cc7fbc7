pub mod output;
pub mod plant;
pub mod weather;
