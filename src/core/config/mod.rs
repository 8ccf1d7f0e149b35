pub mod runner_config_entity;
pub mod runner_config_input;
