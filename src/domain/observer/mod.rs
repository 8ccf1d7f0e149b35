pub mod query_observer;
