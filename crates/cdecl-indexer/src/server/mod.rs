//! RPC session over a TCP stream.

mod build;
mod handler;

pub use build::{BuildMessages, BuildReport, BuildRunner};
pub use handler::{Control, ServerState, SessionError, dispatch};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::info;

use crate::config::ServerConfig;

const RECEIVE_BUFFER_LEN: usize = 4096;

/// One connected client and the state it operates on.
pub struct Session {
    stream: TcpStream,
    state: ServerState,
}

impl Session {
    pub fn new(stream: TcpStream, config: ServerConfig) -> Self {
        Self {
            stream,
            state: ServerState::new(config),
        }
    }

    /// Serve requests until the client disconnects or sends `Exit`.
    ///
    /// Each read is assumed to deliver exactly one whole request;
    /// requests fit comfortably in a single segment and the client
    /// waits for the response before sending the next one.
    pub async fn run(mut self) -> Result<(), SessionError> {
        let mut buf = vec![0u8; RECEIVE_BUFFER_LEN];
        loop {
            let read = self.stream.read(&mut buf).await?;
            if read == 0 {
                info!("client closed the connection");
                return Ok(());
            }
            let (response, control) = dispatch(&mut self.state, &buf[..read]).await?;
            self.stream.write_all(&response).await?;
            if matches!(control, Control::Exit) {
                info!("exit requested, ending session");
                return Ok(());
            }
        }
    }
}
