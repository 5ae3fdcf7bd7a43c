use std::{net::SocketAddr, time::Duration};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use crate::{core::SampleStore, prelude::*, protocol::answer};

const RESPONSE_HEADER: &[u8] = b"HTTP/1.1 200 OK\r\n\n";

/// Pause after a failed accept, before accepting again.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Serve the connections one by one, until the listener fails.
pub async fn serve(listener: TcpListener, store: &SampleStore, receive_buffer_size: usize) -> Result {
    info!(address = %listener.local_addr()?, "serving…");
    loop {
        let (mut stream, address) = match listener.accept().await {
            Ok(connection) => connection,
            Err(error) => {
                error!("failed to accept a connection: {error:#}");
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        if let Err(error) = handle(&mut stream, address, store, receive_buffer_size).await {
            error!(%address, "failed to handle the connection: {error:#}");
        }
    }
}

/// Handle a single request: send the header right away, then read the request and answer it.
#[instrument(skip(stream, store, receive_buffer_size))]
async fn handle(
    stream: &mut TcpStream,
    address: SocketAddr,
    store: &SampleStore,
    receive_buffer_size: usize,
) -> Result {
    stream.write_all(RESPONSE_HEADER).await.context("failed to send the header")?;

    let mut buffer = vec![0; receive_buffer_size];
    let n_bytes = stream.read(&mut buffer).await.context("failed to receive the request")?;
    let request = String::from_utf8_lossy(&buffer[..n_bytes]);
    debug!(n_bytes, "received");

    let mut body = answer(store, &request)?;
    body.push('\n');
    stream.write_all(body.as_bytes()).await.context("failed to send the response")?;
    stream.shutdown().await.context("failed to close the connection")?;
    Ok(())
}
