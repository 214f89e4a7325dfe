//! Configuration, filesystem layout and logging bootstrap for the campus client.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    compile_time_api_url, Config, API_PATH, DEFAULT_LOG_LEVEL, DEFAULT_ORIGIN,
};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::Paths;
