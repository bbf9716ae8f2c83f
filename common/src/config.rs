use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use hocon::{Hocon, HoconLoader};

const ENV_PREFIX: &str = "WIDGET_";

/// Scoped view over a HOCON document.
///
/// Lookups try `<scope>.<name>` first and then `<name>` at the top level. An
/// environment variable named `WIDGET_<NAME>` always wins over the document.
#[derive(Debug)]
pub struct ConfigLoader {
    hocon: Hocon,
    env: HashMap<String, String>,
    scope: String,
}

impl ConfigLoader {
    pub fn new(path: impl AsRef<Path>, scope: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();

        let hocon = HoconLoader::new()
            .load_file(path)
            .with_context(|| format!("Failed to find or load config file at: {:?}", path))?
            .hocon()
            .with_context(|| format!("Failed to resolve config file at: {:?}", path))?;

        Ok(Self::from_hocon(hocon, scope.into(), std::env::vars().collect()))
    }

    pub fn from_str(source: &str, scope: impl Into<String>) -> Result<Self> {
        let hocon = HoconLoader::new()
            .load_str(source)
            .context("Failed to parse config source")?
            .hocon()
            .context("Failed to resolve config source")?;

        Ok(Self::from_hocon(hocon, scope.into(), std::env::vars().collect()))
    }

    /// Replaces the captured process environment. Mostly useful in tests.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    fn from_hocon(hocon: Hocon, scope: String, env: HashMap<String, String>) -> Self {
        Self { hocon, env, scope }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let env_key = format!("{}{}", ENV_PREFIX, name.to_uppercase());
        if let Some(value) = self.env.get(&env_key) {
            return Some(Value::String(value.clone()));
        }

        let scope = &self.hocon[self.scope.as_str()];
        if matches!(scope, Hocon::Hash(_)) {
            if let Some(value) = Self::map_hocon(scope, name) {
                return Some(value);
            }
        }

        Self::map_hocon(&self.hocon, name)
    }

    pub fn load<T: Config>(&self) -> Result<T> {
        T::load(self).with_context(|| format!("Failed to load config scope '{}'", self.scope))
    }

    fn map_hocon(hocon: &Hocon, name: &str) -> Option<Value> {
        match &hocon[name] {
            Hocon::Real(real) => Some(Value::Float(*real)),
            Hocon::Integer(integer) => Some(Value::Integer(*integer)),
            Hocon::String(string) => Some(Value::String(string.clone())),
            Hocon::Boolean(boolean) => Some(Value::Boolean(*boolean)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(val) => Some(*val),
            Value::String(val) => match val.trim() {
                "true" | "yes" | "on" => Some(true),
                "false" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(val) => u64::try_from(*val).ok(),
            Value::String(val) => val.trim().parse::<u64>().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(val) => Some(*val),
            Value::Integer(val) => Some(*val as f64),
            Value::String(val) => val.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::String(val) => Some(val.clone()),
            Value::Boolean(val) => Some(val.to_string()),
            Value::Float(val) => Some(val.to_string()),
            Value::Integer(val) => Some(val.to_string()),
        }
    }
}

pub trait Config {
    fn load(config: &ConfigLoader) -> Result<Self>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        poll_interval_ms = 500
        label = "top"
        chess {
            poll_interval_ms = 100
            session_game = false
        }
    "#;

    fn loader(scope: &str) -> ConfigLoader {
        ConfigLoader::from_str(SOURCE, scope)
            .unwrap()
            .with_env(HashMap::new())
    }

    #[test]
    fn test_scoped_value_wins_over_top_level() {
        let config = loader("chess");

        assert_eq!(config.get("poll_interval_ms"), Some(Value::Integer(100)));
        assert_eq!(config.get("session_game").and_then(|v| v.as_bool()), Some(false));
    }

    #[test]
    fn test_falls_back_to_top_level() {
        let config = loader("mancala");

        assert_eq!(config.get("poll_interval_ms").and_then(|v| v.as_u64()), Some(500));
        assert_eq!(config.get("label").and_then(|v| v.as_string()), Some("top".to_string()));
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn test_env_override() {
        let env = HashMap::from([("WIDGET_POLL_INTERVAL_MS".to_string(), "42".to_string())]);
        let config = loader("chess").with_env(env);

        assert_eq!(config.get("poll_interval_ms").and_then(|v| v.as_u64()), Some(42));
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::String("on".to_string()).as_bool(), Some(true));
        assert_eq!(Value::Integer(-1).as_u64(), None);
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Boolean(true).as_string(), Some("true".to_string()));
    }
}
