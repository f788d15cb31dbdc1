pub mod auth;
pub mod link_request;
pub mod track_request;
