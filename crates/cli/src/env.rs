use crate::error::CliError;
use expression_engine::{Captures, parse_captured_value};
use model::core::value::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Captured variables loaded from `KEY=VALUE` files, typed on load.
#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    vars: Captures,
}

impl EnvManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load variables from a .env style file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)?;
        debug!(path = %path.display(), count = self.vars.len(), "Loaded captured variables");
        Ok(())
    }

    pub fn captures(&self) -> &Captures {
        &self.vars
    }

    pub fn into_captures(self) -> Captures {
        self.vars
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars.insert(key.to_string(), Self::typed_value(value));
        }

        Ok(())
    }

    /// Single quotes always mean text; everything else is inferred.
    fn typed_value(value: &str) -> Value {
        let value = value.trim();

        if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
            return Value::String(value[1..value.len() - 1].to_string());
        }

        parse_captured_value(value)
    }
}
