pub mod compact_request;
pub mod compact_response;
pub mod compact_route;
