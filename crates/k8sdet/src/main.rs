use std::io;

use clap::Parser;
use kadet_k8s::logging;
use snafu::{ResultExt, Snafu};

use crate::cli::{Cli, Command};

mod cli;
mod commands;

const APP_NAME: &str = "k8sdet";
const LOG_ENV: &str = "K8SDET_LOG";

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to render manifests"))]
    Render { source: commands::Error },

    #[snafu(display("failed to list {what}"))]
    List {
        source: commands::Error,
        what: &'static str,
    },
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    logging::initialize_logging(LOG_ENV, APP_NAME);

    let stdout = io::stdout().lock();
    match cli.command {
        Command::Render(args) => {
            commands::render(&args.files, args.output, io::stdin().lock(), stdout)
                .context(RenderSnafu)
        }
        Command::Models => commands::list_models(stdout).context(ListSnafu { what: "models" }),
        Command::Kinds => {
            commands::list_kinds(stdout).context(ListSnafu { what: "resource kinds" })
        }
    }
}
