use crate::prelude::{eprintln, *};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub async fn run_stdio(global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Starting MCP server with stdio transport...");
        eprintln!();
    }

    let reader = BufReader::new(tokio::io::stdin());
    let handled = serve(reader, tokio::io::stdout(), &global).await?;

    log::info!("stdin closed after {handled} requests");
    Ok(())
}

/// Answer one JSON-RPC request per non-blank input line until EOF, returning
/// the number of requests handled.
pub async fn serve<R, W>(mut reader: R, mut writer: W, global: &crate::Global) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    let mut handled = 0;

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if global.verbose {
            eprintln!("Received: {trimmed}");
        }

        let response = super::handle_request(trimmed, global).await;
        let response_json =
            serde_json::to_string(&response).wrap_err("Failed to serialize response")?;

        if global.verbose {
            eprintln!("Sending: {response_json}");
        }

        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}
