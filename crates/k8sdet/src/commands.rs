use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use kadet_k8s::{
    document,
    model::Model,
    object::K8sObj,
    output::{self, OutputFormat},
    resource::ResourceKind,
};
use snafu::{ResultExt, Snafu};
use strum::IntoEnumIterator;
use tracing::{info, instrument};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Reads the parameter documents from stdin instead of a file.
const STDIN_PATH: &str = "-";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read {path:?}"))]
    ReadFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to read stdin"))]
    ReadStdin { source: std::io::Error },

    #[snafu(display("failed to load parameter documents from {path:?}"))]
    LoadDocuments {
        source: document::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to write manifests"))]
    WriteManifests { source: output::Error },

    #[snafu(display("failed to write to output"))]
    WriteOutput { source: std::io::Error },
}

/// Renders the parameter documents in `files` and writes the manifests to `out`.
///
/// `stdin` is only read if one of the files is `-`.
#[instrument(skip(stdin, out))]
pub fn render<R, W>(files: &[PathBuf], format: OutputFormat, mut stdin: R, out: W) -> Result<()>
where
    R: Read,
    W: Write,
{
    let mut objects: Vec<K8sObj> = Vec::new();

    for path in files {
        let input = if path == Path::new(STDIN_PATH) {
            let mut input = String::new();
            stdin
                .read_to_string(&mut input)
                .context(ReadStdinSnafu)?;
            input
        } else {
            fs::read_to_string(path).context(ReadFileSnafu { path })?
        };

        objects.extend(document::from_str(&input).context(LoadDocumentsSnafu { path })?);
    }

    info!(count = objects.len(), %format, "rendering manifests");
    output::write_manifests(&objects, format, out).context(WriteManifestsSnafu)
}

pub fn list_models<W: Write>(mut out: W) -> Result<()> {
    for model in Model::iter() {
        writeln!(out, "{model}").context(WriteOutputSnafu)?;
    }
    Ok(())
}

pub fn list_kinds<W: Write>(mut out: W) -> Result<()> {
    for kind in ResourceKind::iter() {
        let schema = kind.schema();
        writeln!(out, "{kind} ({model})", model = schema.model).context(WriteOutputSnafu)?;

        for field in schema.fields {
            let required = if field.required { " (required)" } else { "" };
            writeln!(out, "  {name}: {ty}{required}", name = field.name, ty = field.ty)
                .context(WriteOutputSnafu)?;
        }
    }
    Ok(())
}
