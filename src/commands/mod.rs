pub mod extract;
pub mod repair;
pub mod rows;

mod run;
