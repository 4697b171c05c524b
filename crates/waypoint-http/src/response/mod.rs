//! Response value written by middleware and handlers

pub mod response;

pub use response::{Response, ResponseBody};
