use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use jiramark_core::jira::StageOutput;
use jiramark_core::request::{transform_request_with, ConvertOutput, ConvertRequest};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

#[derive(Debug, clap::Args, Clone)]
pub struct ConvertOptions {
    /// Markdown text to convert. Read from --file or stdin when omitted
    #[clap(env = "JIRAMARK_MARKDOWN")]
    pub markdown: Option<String>,

    /// Read Markdown from a file
    #[arg(short, long, env = "JIRAMARK_FILE", conflicts_with = "markdown")]
    pub file: Option<PathBuf>,

    /// Output as JSON ({"jira": "..."})
    #[arg(long)]
    pub json: bool,

    /// Print the text produced by every conversion stage to stderr
    #[arg(long)]
    pub trace: bool,
}

pub async fn run(options: ConvertOptions, global: crate::Global) -> Result<()> {
    let markdown = read_input(&options).await?;

    if global.verbose {
        eprintln!(
            "Converting {} bytes of Markdown...",
            markdown.as_deref().map_or(0, str::len)
        );
    }

    let request = ConvertRequest {
        markdown,
        text: None,
    };
    let output = convert_request(&request, options.trace)?;

    if options.json {
        output_json(&output)?;
    } else {
        output_plain(&output);
    }

    Ok(())
}

/// Resolve the Markdown source: positional argument, then `--file`, then a
/// piped stdin. Returns `None` when there is nothing to read.
async fn read_input(options: &ConvertOptions) -> Result<Option<String>> {
    if let Some(markdown) = &options.markdown {
        return Ok(Some(markdown.clone()));
    }

    if let Some(path) = &options.file {
        let markdown = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Read {
                path: path.display().to_string(),
                source,
            })?;
        return Ok(Some(markdown));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut markdown = String::new();
    tokio::io::stdin()
        .read_to_string(&mut markdown)
        .await
        .map_err(Error::Stdin)?;
    Ok(Some(markdown))
}

fn convert_request(request: &ConvertRequest, trace: bool) -> Result<ConvertOutput> {
    let output = transform_request_with(request, |out| {
        log::debug!("stage {} produced {} bytes", out.stage, out.text.len());
        if trace {
            print_stage(&out);
        }
    })
    .map_err(Error::from)?;

    Ok(output)
}

fn print_stage(out: &StageOutput<'_>) {
    eprintln!("{}", format!("── {} ──", out.stage).bold().cyan());
    eprintln!("{}", out.printable());
}

fn output_json(output: &ConvertOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(output).wrap_err("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn output_plain(output: &ConvertOutput) {
    if output.jira.ends_with('\n') {
        anstream::print!("{}", output.jira);
    } else {
        println!("{}", output.jira);
    }
}
