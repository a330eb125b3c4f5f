//! Line-oriented serve loop
//!
//! Reads raw request lines, answers each one in order except reloads,
//! which run in the background and answer when they finish. A single
//! writer task owns the output so responses never interleave.

use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::handlers::{decode, encode, respond};
use crate::service::LookupService;

const RESPONSE_QUEUE: usize = 1024;

/// Serve requests from `reader` until input ends or `shutdown` resolves.
///
/// Returns the writer once every pending response has been written. A read
/// error stops the loop but pending responses are still flushed before it
/// is returned.
pub async fn serve<R, W, F>(
    service: Arc<LookupService>,
    mut reader: R,
    writer: W,
    shutdown: F,
) -> io::Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
    F: Future<Output = ()>,
{
    let (tx, mut rx) = mpsc::channel::<String>(RESPONSE_QUEUE);
    let writer = tokio::spawn(async move {
        let mut out = writer;
        while let Some(line) = rx.recv().await {
            let written = async {
                out.write_all(line.as_bytes()).await?;
                out.write_all(b"\n").await?;
                out.flush().await
            };
            if let Err(e) = written.await {
                error!(error = %e, "Failed to write response, stopping");
                break;
            }
        }
        out
    });

    tokio::pin!(shutdown);
    let mut buf = Vec::new();
    let mut outcome = Ok(());

    loop {
        buf.clear();
        let read = tokio::select! {
            read = reader.read_until(b'\n', &mut buf) => read,
            _ = &mut shutdown => break,
        };
        match read {
            Ok(0) => {
                info!("Input closed");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "Failed to read request, stopping");
                outcome = Err(e);
                break;
            }
        }

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        let envelope = match decode(line) {
            Ok(envelope) => envelope,
            Err(response) => {
                if tx.send(encode(None, &response)).await.is_err() {
                    break;
                }
                continue;
            }
        };

        if envelope.is_background() {
            let service = Arc::clone(&service);
            let tx = tx.clone();
            tokio::spawn(async move {
                let response = respond(&service, envelope).await;
                if tx.send(response).await.is_err() {
                    warn!("Writer gone, dropping reload response");
                }
            });
        } else {
            let response = respond(&service, envelope).await;
            if tx.send(response).await.is_err() {
                break;
            }
        }
    }

    // Pending reloads still hold a sender; the writer drains them first.
    drop(tx);
    let out = writer.await.map_err(io::Error::other)?;
    outcome.map(|()| out)
}
