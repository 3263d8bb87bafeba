use tracing::instrument;

#[instrument]
pub fn get_version_info() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let description = env!("CARGO_PKG_DESCRIPTION");

    tracing::debug!(package_version = version, "Gathering package information");

    format!(
        "semrel {version} - {description}\n\
        Default image: {}\n\
        Correlation ID: {}",
        semrel_core::SEMANTIC_RELEASE_IMAGE,
        crate::tracing::correlation_id()
    )
}
