//! Dotted path resolution for model declarations

use crate::application::errors::PluginError;

/// Resolve `name` against the package `package`.
///
/// Names without leading dots are already absolute. Each leading dot climbs
/// one level, with a single dot meaning `package` itself.
pub fn resolve_name(name: &str, package: &str) -> Result<String, PluginError> {
    let rest = name.trim_start_matches('.');
    let level = name.len() - rest.len();

    if level == 0 {
        return Ok(name.to_string());
    }

    let beyond = || PluginError::BeyondTopLevel {
        name: name.to_string(),
        package: package.to_string(),
    };

    if package.is_empty() {
        return Err(beyond());
    }

    let parts: Vec<&str> = package.rsplitn(level, '.').collect();
    if parts.len() < level {
        return Err(beyond());
    }

    let base = parts[parts.len() - 1];
    if rest.is_empty() {
        Ok(base.to_string())
    } else {
        Ok(format!("{}.{}", base, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_passthrough() {
        assert_eq!(resolve_name("aerich.models", "example.example_cog").unwrap(), "aerich.models");
    }

    #[test]
    fn test_single_dot_is_anchor() {
        assert_eq!(resolve_name(".", "example.example_cog").unwrap(), "example.example_cog");
    }

    #[test]
    fn test_child_of_anchor() {
        assert_eq!(resolve_name(".models", "example").unwrap(), "example.models");
        assert_eq!(resolve_name(".models", "example.example_cog").unwrap(), "example.example_cog.models");
    }

    #[test]
    fn test_parent_levels() {
        assert_eq!(resolve_name("..models", "a.b.c").unwrap(), "a.b.models");
        assert_eq!(resolve_name("...models", "a.b.c").unwrap(), "a.models");
        assert_eq!(resolve_name("..", "a.b").unwrap(), "a");
    }

    #[test]
    fn test_beyond_top_level() {
        let err = resolve_name("...models", "a.b").unwrap_err();
        assert!(matches!(err, PluginError::BeyondTopLevel { .. }));
        assert!(resolve_name(".models", "").is_err());
    }
}
