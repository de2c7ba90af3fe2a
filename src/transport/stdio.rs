use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use thiserror::Error;

use crate::mcp::{
    rpc::{encode_response, json_rpc_error, PARSE_ERROR},
    server::handle_line,
};
use crate::AppState;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("stdio failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("response encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

pub async fn serve_stdio(state: &AppState) -> Result<(), TransportError> {
    serve(state, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Handles one line at a time until end of input. A bad line yields an error response,
/// never an early exit; only I/O failures on the streams themselves stop the loop.
pub async fn serve<R, W>(
    state: &AppState,
    mut reader: R,
    mut writer: W,
) -> Result<(), TransportError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let bytes_read = reader.read_until(b'\n', &mut buffer).await?;
        if bytes_read == 0 {
            info!("input closed, shutting down");
            break;
        }

        let response = match std::str::from_utf8(&buffer) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!(bytes = line.len(), "request line received");
                handle_line(state, line).await
            }
            Err(err) => {
                warn!(error = %err, "request line is not valid UTF-8");
                Some(json_rpc_error(
                    None,
                    PARSE_ERROR,
                    &format!("Parse error: invalid UTF-8 ({err})"),
                ))
            }
        };
        let Some(response) = response else {
            continue;
        };

        let encoded = encode_response(&response)?;
        writer.write_all(encoded.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}
