pub mod link;
pub mod tracking_event;
