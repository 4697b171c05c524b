//! Request context passed explicitly through dispatch

pub mod context;

pub use context::RequestContext;
