//! Structured logging setup
//!
//! Filter directives built from [`LoggingConfig`](crate::config::LoggingConfig)
//! and the per-request span used by the HTTP layer.

pub mod middleware;

pub use middleware::{generate_request_id, make_request_span};

/// Build filter directives string from LoggingConfig
///
/// The base level comes first, followed by one `phineas::<component>=<level>`
/// directive per configured component. Components are emitted in name order
/// so the result is stable.
///
/// # Examples
///
/// ```
/// use phineas::config::{LogFormat, LoggingConfig};
/// use phineas::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("scoring".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Pretty,
///     component_levels: Some(component_levels),
/// };
///
/// let filter_str = build_filter_directives(&config);
/// assert_eq!(filter_str, "info,phineas::scoring=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",phineas::{}={}", component, level));
        }
    }

    filter_str
}
