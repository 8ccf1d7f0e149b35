pub mod mackerel_api_trait;
pub mod mackerel_client;
pub mod mackerel_dto;
