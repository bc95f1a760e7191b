use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kadet_k8s::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "k8sdet",
    author,
    version,
    about = "Render Kubernetes manifests from kadet-k8s parameter documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render parameter documents into Kubernetes manifests.
    Render(RenderArguments),

    /// List the supported model names.
    Models,

    /// List the resource kinds and the params they accept.
    Kinds,
}

#[derive(Debug, Args)]
pub struct RenderArguments {
    /// Parameter documents to render, `-` reads from stdin.
    #[arg(default_value = "-")]
    pub files: Vec<PathBuf>,

    /// The format the manifests are written in.
    #[arg(short, long, value_enum, default_value_t, env = "K8SDET_OUTPUT")]
    pub output: OutputFormat,
}
