use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::file_format::FileFormat;

pub type Result<T> = anyhow::Result<T>;

pub fn serialize<T: Serialize>(value: &T, format: FileFormat) -> Result<String> {
    let text = match format {
        FileFormat::Yaml => serde_yml::to_string(value)?,
        FileFormat::Json => serde_json::to_string_pretty(value)?,
    };
    Ok(text)
}

pub fn deserialize<T: DeserializeOwned + 'static>(serialized: &[u8], format: FileFormat) -> Result<T> {
    let text = std::str::from_utf8(serialized)?;
    match format {
        FileFormat::Yaml => Ok(serde_yml::from_str(text)?),
        FileFormat::Json => Ok(serde_json::from_str(text)?),
    }
}

/// Reads and deserializes a file, picking the format from its extension.
pub fn read_file<T: DeserializeOwned + 'static>(path: &Path) -> Result<T> {
    let format = FileFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    deserialize(&bytes, format)
}

pub fn write_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let format = FileFormat::from_path(path)?;
    std::fs::write(path, serialize(value, format)?)?;
    Ok(())
}
