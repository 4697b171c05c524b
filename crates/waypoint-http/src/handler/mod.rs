//! # Handlers
//!
//! A handler is either a closure with an explicit parameter list, or a
//! `(type, method)` pair whose owning type is built fresh for every call.
//! The [`ArgumentResolver`] turns the declared parameters into concrete
//! arguments for one dispatch.

pub mod handler_ref;
pub mod params;
pub mod resolver;

pub use handler_ref::{ActionRegistry, CallableHandler, HandlerFn, HandlerRef, MethodRef};
pub use params::{Argument, Arguments, ParamKind, ParamSpec};
pub use resolver::{ArgumentResolver, ResolvedHandler};
