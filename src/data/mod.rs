use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::BufRead;

mod run;

pub use run::*;

/// Reads a JSON value from the reader.
///
/// # Errors
/// - If the reader fails or its content is not a valid `T`.
pub fn deserialize<T: DeserializeOwned>(reader: &mut impl BufRead) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(reader)?)
}

/// Writes the value as compact JSON.
///
/// # Errors
/// - If the value cannot be serialized.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?)
}
