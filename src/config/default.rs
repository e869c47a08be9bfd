// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Default configuration values.

/// Generate an example configuration file.
pub fn example_config() -> &'static str {
    r#"# gitrel configuration file

# How git is invoked
[git]
program = "git"
# Capture git's stderr so failures can report it
quiet = true

# Environment overrides applied to every git invocation
[git.env]
GIT_TERMINAL_PROMPT = "0"

# Release workflow settings
[release]
remote = "origin"
# Fail instead of warning when tags cannot be listed
strict_tags = false
commit_message_file = "gitrel-commit.txt"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, GitrelConfig};

    #[test]
    fn test_example_config_parses() {
        let config = parse_config(example_config()).unwrap();
        assert_eq!(config.release.remote, GitrelConfig::default().release.remote);
        assert_eq!(config.git.env["GIT_TERMINAL_PROMPT"], "0");
    }
}
