pub mod chat_turn_request;
pub mod chat_turn_response;
pub mod chat_turn_route;
