// ============================================================================
// Constants
// ============================================================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COMMIT: &str = match option_env!("BUILD_COMMIT") {
    Some(c) => c,
    None => "unknown",
};

/// Get the full version string including commit.
pub fn version_string() -> String {
    format!("{} (commit: {})", VERSION, COMMIT)
}

/// User-Agent header sent with every API request.
pub fn user_agent() -> String {
    format!("queryquest/{}", VERSION)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string_format() {
        let vs = version_string();
        assert!(vs.contains(VERSION));
        assert!(vs.contains("commit:"));
    }

    #[test]
    fn test_user_agent_names_crate() {
        assert!(user_agent().starts_with("queryquest/"));
        assert!(user_agent().ends_with(VERSION));
    }
}
