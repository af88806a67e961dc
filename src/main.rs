//! outbound-request
//!
//! Builds a request from command-line arguments and prints its HTTP/1.1 wire
//! form to stdout. With `--stream` the body is split into chunks and written
//! with chunked transfer encoding, pulled one chunk at a time.
//!
//! ```text
//! outbound-request POST http://api.local/items?draft=1 \
//!     -H content-type:application/json -b session=abc --data '{"a":1}'
//! ```

use std::path::PathBuf;

use bytes::{Bytes, BytesMut};
use clap::Parser;
use futures_util::StreamExt;
use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use tokio::io::AsyncWriteExt;

use outbound_request::config::{load_config, ClientConfig};
use outbound_request::observability::logging::init_logging;
use outbound_request::request::{ChunkStream, ClientCookie, Request, RequestFactory};
use outbound_request::wire::ToWire;

#[derive(Parser)]
#[command(name = "outbound-request")]
#[command(about = "Print the HTTP/1.1 wire form of a request", long_about = None)]
struct Cli {
    /// Request method, standard or custom (e.g. GET, PURGE)
    method: String,

    /// Absolute or relative request URI
    uri: String,

    /// Header as name:value (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Cookie as name=value (repeatable)
    #[arg(short = 'b', long = "cookie", value_parser = parse_cookie)]
    cookies: Vec<(String, String)>,

    /// Request body
    #[arg(short, long)]
    data: Option<String>,

    /// Send the body as chunks of this many bytes
    #[arg(short, long, requires = "data", value_parser = clap::value_parser!(u64).range(1..))]
    stream: Option<u64>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_header(arg: &str) -> Result<(String, String), String> {
    arg.split_once(':')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected name:value, got '{}'", arg))
}

fn parse_cookie(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", arg))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    init_logging(&config.observability)?;

    let factory = RequestFactory::new(&config)?;
    let mut request = factory.custom(&cli.method, cli.uri.as_str())?;
    for (name, value) in &cli.headers {
        request.append_header(name, value)?;
    }
    let cookies: Vec<ClientCookie> = cli
        .cookies
        .iter()
        .map(|(name, value)| ClientCookie::new(name.as_str(), value.as_str()))
        .collect();
    request.add_cookies(&cookies)?;

    tracing::info!(request = %request, cookies = cookies.len(), "Request built");

    let mut stdout = tokio::io::stdout();
    match (cli.data, cli.stream) {
        (Some(data), Some(chunk_size)) => {
            set_chunked_body(&mut request, Bytes::from(data), chunk_size as usize)?;
            write_streamed(&request, &mut stdout).await?;
        }
        (data, _) => {
            if let Some(data) = data {
                request.header(CONTENT_LENGTH.as_str(), &data.len().to_string())?;
                request.set_bytes(data);
            }
            let full = request.to_full_request()?;
            stdout.write_all(&full.to_bytes()).await?;
        }
    }
    stdout.flush().await?;

    Ok(())
}

fn set_chunked_body(
    request: &mut Request,
    data: Bytes,
    chunk_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect();
    request.header(TRANSFER_ENCODING.as_str(), "chunked")?;
    request.set_chunks(ChunkStream::from_chunks(chunks));
    Ok(())
}

async fn write_streamed(
    request: &Request,
    out: &mut tokio::io::Stdout,
) -> Result<(), Box<dyn std::error::Error>> {
    let (head, mut chunks) = request.to_streamed_request()?.into_parts();
    out.write_all(&head.to_bytes()).await?;

    let mut sent = 0usize;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(|e| e as Box<dyn std::error::Error>)?;
        let mut frame = BytesMut::with_capacity(chunk.len() + 16);
        frame.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        frame.extend_from_slice(&chunk);
        frame.extend_from_slice(b"\r\n");
        out.write_all(&frame).await?;
        sent += 1;
    }
    out.write_all(b"0\r\n\r\n").await?;

    tracing::debug!(chunks = sent, "Streamed body written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_stream_requires_data() {
        let err = Cli::try_parse_from(["outbound-request", "POST", "/upload", "--stream", "4"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from([
            "outbound-request", "POST", "/upload", "--stream", "4", "--data", "abcdef",
        ])
        .unwrap();
        assert_eq!(cli.stream, Some(4));
        assert_eq!(cli.data.as_deref(), Some("abcdef"));
    }

    #[test]
    fn test_header_and_cookie_args() {
        let cli = Cli::try_parse_from([
            "outbound-request", "GET", "/", "-H", "accept: text/plain", "-b", "s=1",
        ])
        .unwrap();
        assert_eq!(cli.headers, [("accept".to_string(), "text/plain".to_string())]);
        assert_eq!(cli.cookies, [("s".to_string(), "1".to_string())]);
        assert!(parse_header("no-colon").is_err());
    }
}
