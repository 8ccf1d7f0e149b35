pub mod observer;
pub mod query;
pub mod runner;
pub mod schema;
