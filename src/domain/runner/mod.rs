pub mod query_runner_service;
