//! Driver configuration.
//!
//! Small enough that one optional TOML file covers it. `pl0c.toml` in the
//! working directory is picked up automatically; `--config` overrides
//! which file to read. Absent either, the defaults apply.

use std::path::Path;

use serde::{Deserialize, Serialize};

use pl0c_vm::DEFAULT_MAX_STACK;

const CONFIG_FILE_NAME: &str = "pl0c.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Ceiling on VM stack depth, in words.
    #[serde(default = "default_max_stack")]
    pub max_stack: usize,
}

fn default_max_stack() -> usize {
    DEFAULT_MAX_STACK
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_stack: default_max_stack(),
        }
    }
}

impl Config {
    /// Loads `explicit_path` if given; otherwise `./pl0c.toml` if it
    /// exists; otherwise the defaults.
    pub fn load(explicit_path: Option<&Path>) -> anyhow::Result<Self> {
        match explicit_path {
            Some(path) => Self::load_from_path(path),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::load_from_path(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("could not read config '{}': {e}", path.display()))?;
        toml::from_str(&text)
            .map_err(|e| anyhow::anyhow!("could not parse config '{}': {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_vm_default_stack_size() {
        assert_eq!(Config::default().max_stack, DEFAULT_MAX_STACK);
    }

    #[test]
    fn parses_a_minimal_config_file() {
        let config: Config = toml::from_str("max_stack = 1024").unwrap();
        assert_eq!(config.max_stack, 1024);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        assert!(Config::load(Some(Path::new("/does/not/exist/pl0c.toml"))).is_err());
    }
}
