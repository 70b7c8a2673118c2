//! Status server HTTP handlers.

mod data;
mod event;
mod status;

pub use data::data_handler;
pub use event::event_handler;
pub use status::status_handler;
