pub mod actuator;
pub mod app;
pub mod config;
pub mod feed;
pub mod logging;
pub mod operator;
pub mod report;
