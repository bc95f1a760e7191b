//! Serializes rendered objects as YAML or JSON manifests.
use std::io::Write;

use serde::Serialize;
use serde_json::{Value, json};
use snafu::{ResultExt, Snafu};

use crate::object::K8sObj;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to serialize YAML"))]
    SerializeYaml { source: serde_yaml::Error },

    #[snafu(display("failed to serialize JSON"))]
    SerializeJson { source: serde_json::Error },

    #[snafu(display("failed to write YAML document separator"))]
    WriteDocumentSeparator { source: std::io::Error },

    #[snafu(display("failed to write trailing newline"))]
    WriteNewline { source: std::io::Error },

    #[snafu(display("failed to parse bytes as valid UTF-8 string"))]
    ParseUtf8Bytes { source: std::string::FromUtf8Error },
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Provides configurable options during YAML serialization.
pub struct SerializeOptions {
    /// Adds leading triple dashes (`---`) to every document.
    pub explicit_document: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            explicit_document: true,
        }
    }
}

/// Writes `objects` to `writer` in the given `format`.
///
/// YAML output contains one document per object. JSON output is the object itself if there is
/// exactly one, and a `v1/List` of all objects otherwise.
pub fn write_manifests<W>(objects: &[K8sObj], format: OutputFormat, mut writer: W) -> Result<()>
where
    W: Write,
{
    match format {
        OutputFormat::Yaml => {
            for object in objects {
                serialize_yaml(object, &mut writer, &SerializeOptions::default())?;
            }
        }
        OutputFormat::Json => {
            let value = match objects {
                [object] => object.dump(),
                objects => list(objects),
            };
            serde_json::to_writer_pretty(&mut writer, &value).context(SerializeJsonSnafu)?;
            writer.write_all(b"\n").context(WriteNewlineSnafu)?;
        }
    }

    Ok(())
}

/// Renders `objects` into a [`String`], see [`write_manifests`].
pub fn to_string(objects: &[K8sObj], format: OutputFormat) -> Result<String> {
    let mut buffer = Vec::new();
    write_manifests(objects, format, &mut buffer)?;
    String::from_utf8(buffer).context(ParseUtf8BytesSnafu)
}

/// Serializes the given data structure as YAML and writes it to a [`Writer`](Write).
pub fn serialize_yaml<T, W>(value: &T, mut writer: W, options: &SerializeOptions) -> Result<()>
where
    T: Serialize,
    W: Write,
{
    if options.explicit_document {
        writer
            .write_all(b"---\n")
            .context(WriteDocumentSeparatorSnafu)?;
    }

    let mut serializer = serde_yaml::Serializer::new(writer);
    value
        .serialize(&mut serializer)
        .context(SerializeYamlSnafu)
}

fn list(objects: &[K8sObj]) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "List",
        "items": objects.iter().map(K8sObj::dump).collect::<Vec<_>>(),
    })
}

impl K8sObj {
    pub fn to_yaml(&self) -> Result<String> {
        to_string(std::slice::from_ref(self), OutputFormat::Yaml)
    }

    pub fn to_json(&self) -> Result<String> {
        to_string(std::slice::from_ref(self), OutputFormat::Json)
    }
}
