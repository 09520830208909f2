pub mod request_headers;
