//! Default configuration values

pub struct DispatchDefaults;

impl DispatchDefaults {
    pub const API_VERSION: &'static str = "1";
    pub const API_PREFIX: &'static str = "/api";
    pub const NOT_FOUND_BODY: &'static str = "Not Found";
    pub const REDIRECT_STATUS: u16 = 302;
}
