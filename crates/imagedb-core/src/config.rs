//! Configuration loader and path helpers.
//!
//! Figment merge of `imagedb.toml` + `imagedb.<env>.toml` + `IMAGEDB_*`
//! environment variables, plus a helper expanding `~` and `${VAR}` in
//! user-provided paths.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::env;
use std::path::PathBuf;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("IMAGEDB_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("imagedb.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("imagedb.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("imagedb.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("imagedb.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("IMAGEDB_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("failed to get '{}': {}", key, e))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

