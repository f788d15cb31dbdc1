pub mod auth_handlers;
pub mod health_handlers;
pub mod link_handlers;
pub mod page_handlers;
pub mod tracking_handlers;
