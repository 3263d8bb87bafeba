pub mod release;
pub mod version;

use semrel_core::ContainerRuntime;

/// The runtime compiled into this binary, if any.
///
/// `engine_timeout_ms` bounds how long the Dagger engine session may take to
/// start; `None` keeps the SDK default.
pub fn default_runtime(engine_timeout_ms: Option<u64>) -> Option<Box<dyn ContainerRuntime>> {
    #[cfg(feature = "dagger-backend")]
    {
        let config = semrel_dagger::RuntimeConfig {
            timeout_ms: engine_timeout_ms,
        };
        Some(Box::new(semrel_dagger::DaggerRuntime::with_config(config)))
    }
    #[cfg(not(feature = "dagger-backend"))]
    {
        let _ = engine_timeout_ms;
        None
    }
}
