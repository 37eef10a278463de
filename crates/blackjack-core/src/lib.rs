#![deny(warnings)]
pub mod count;
pub mod model;
pub mod strategy;
