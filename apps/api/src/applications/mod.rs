// Job applications: store access, list filtering/sorting, form checks and handlers.

pub mod handlers;
pub mod listing;
pub mod service;
pub mod validation;

pub use service::ApplicationService;
