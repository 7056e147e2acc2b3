use anyhow::{Result, anyhow};
use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use aieditor::completion::OpenAiClient;
use aieditor::config::Credentials;
use aieditor::file_host::FileEditorHost;
use aieditor::http_client::ReqwestHttpClient;
use aieditor::orchestrator::CommandOrchestrator;
use aieditor::prompt::RequestKind;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let matches = Command::new("aied")
        .about("AI-assisted code editing - rewrite a selection or insert new code")
        .subcommand_required(true)
        .subcommand(
            Command::new("modify")
                .about("Rewrite the selected lines according to an instruction")
                .arg(Arg::new("file").help("File to edit").required(true).value_name("FILE"))
                .arg(
                    Arg::new("lines")
                        .long("lines")
                        .help("1-based inclusive line range treated as the selection")
                        .required(true)
                        .value_name("START-END"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Insert generated code at the end of the selection")
                .arg(Arg::new("file").help("File to edit").required(true).value_name("FILE"))
                .arg(
                    Arg::new("lines")
                        .long("lines")
                        .help("Anchor range; defaults to the end of the file")
                        .value_name("START-END"),
                ),
        )
        .get_matches();

    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("No command given"))?;

    // The request kind is fixed here, at registration time; an unknown
    // command name fails before any file or network activity.
    let kind = RequestKind::parse(name)?;

    let file = sub
        .get_one::<String>("file")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("No file given"))?;
    let lines = sub
        .get_one::<String>("lines")
        .map(|raw| parse_line_range(raw))
        .transpose()?;

    let credentials = Credentials::load()?;
    let client = OpenAiClient::new(Arc::new(ReqwestHttpClient::new()), credentials);
    let host = FileEditorHost::open(&file, lines)?;

    let outcome = CommandOrchestrator::new(kind, host, client).run().await?;
    info!("Invocation finished: {:?}", outcome);

    Ok(())
}

/// Parses "START-END" (or a bare "LINE") into a 1-based inclusive range.
fn parse_line_range(raw: &str) -> Result<(usize, usize)> {
    let (start, end) = raw.split_once('-').unwrap_or((raw, raw));
    let start = start
        .trim()
        .parse::<usize>()
        .map_err(|_| anyhow!("Invalid line range: {}", raw))?;
    let end = end
        .trim()
        .parse::<usize>()
        .map_err(|_| anyhow!("Invalid line range: {}", raw))?;
    Ok((start, end))
}
