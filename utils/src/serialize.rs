
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;

use super::error::*;

pub use serde::{Serialize, Deserialize};

///
/// Writes the value as a JSON blob to the given path, creating any 
/// missing parent directories first.
///
pub fn save<T: Serialize> (path: & Path, value: & T) -> Result<()>
{
    if let Some(parent) = path.parent()
    {
        if ! parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context(format!("Failed to create directory '{}'.", parent.display()))?;
        }
    }

    let file = File::create(path).context(format!("Failed to create '{}'.", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(& mut writer, value).context(format!("Failed to serialize into '{}'.", path.display()))?;
    writer.flush()?;

    Ok(())
}

///
/// Reads a JSON blob previously written by save().
///
pub fn load<T: DeserializeOwned> (path: & Path) -> Result<T>
{
    let file = File::open(path).context(format!("Failed to open '{}'.", path.display()))?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader).context(format!("Failed to deserialize '{}'.", path.display()))?;

    Ok(value)
}
