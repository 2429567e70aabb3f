//! Small filesystem helpers.

use anyhow::{Context as _, Error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn load_toml<T, P>(path: P) -> Result<T, Error>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let text = fs::read_to_string(path.as_ref())
        .with_context(|| format!("can't read file {}", path.as_ref().display()))?;
    toml::from_str(&text)
        .with_context(|| format!("can't parse TOML content of {}", path.as_ref().display()))
}

pub fn save_toml<T, P>(value: &T, path: P) -> Result<(), Error>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let text = toml::to_string(value).context("can't convert value to TOML format")?;
    fs::write(path.as_ref(), text)
        .with_context(|| format!("can't write to file {}", path.as_ref().display()))
}
