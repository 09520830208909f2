pub mod respond_request;
pub mod respond_response;
pub mod respond_route;
