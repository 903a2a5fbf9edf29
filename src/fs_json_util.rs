use std::{
    io::{BufReader, BufWriter, Read, Write},
    path::PathBuf,
};

use anyhow::Context;
use fs_err::File;
use serde::{Deserialize, Serialize};

pub fn read_json<P: Into<PathBuf>, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<T> {
    read_with(path.into(), |file| {
        Ok(serde_json::from_reader(BufReader::new(file))?)
    })
}

/// Writes `value` as two-space indented JSON followed by a newline.
pub fn write_json<P: Into<PathBuf>, T: Serialize>(path: P, value: &T) -> anyhow::Result<()> {
    let path = path.into();
    (|| {
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        anyhow::Ok(())
    })()
    .with_context(|| format!("While trying to write {path:?}"))
}

pub fn read_toml<P: Into<PathBuf>, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<T> {
    read_with(path.into(), |mut file| {
        let mut text = String::new();
        file.read_to_string(&mut text)?;
        Ok(toml::from_str(&text)?)
    })
}

/// Opens `path` and parses it, naming the file and the target type on failure.
fn read_with<T>(
    path: PathBuf,
    parse: impl FnOnce(File) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    File::open(&path)
        .map_err(anyhow::Error::new)
        .and_then(parse)
        .with_context(|| {
            format!(
                "While trying to parse {path:?} as {}",
                std::any::type_name::<T>()
            )
        })
}
