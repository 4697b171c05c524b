pub mod descriptor;
pub mod registry;

pub use descriptor::ServiceId;
pub use registry::{ProviderFn, ProviderRegistry};
