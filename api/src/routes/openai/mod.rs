pub mod openai_config_route;
pub mod openai_test_route;
