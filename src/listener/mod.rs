//! Listener bootstrap: bind the configured port, or the next free one.

use std::io;
use std::net::{IpAddr, SocketAddr};

use tokio::net::TcpListener;

/// No port could be bound within the attempt ceiling.
#[derive(Debug)]
pub struct BindError {
    pub first_port: u16,
    pub attempts: u16,
    pub last_error: Option<io::Error>,
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "could not find an available port after {} attempts starting at {}",
            self.attempts, self.first_port
        )?;
        if let Some(err) = &self.last_error {
            write!(f, " (last error: {})", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.last_error
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Bind `host:port`, moving on to `port + 1`, `port + 2`, ... while binding
/// fails, for at most `max_attempts` tries.
pub async fn bind_with_fallback(
    host: IpAddr,
    port: u16,
    max_attempts: u16,
) -> Result<TcpListener, BindError> {
    let mut last_error = None;
    let mut attempts = 0;

    while attempts < max_attempts {
        let Some(candidate) = port.checked_add(attempts) else {
            break;
        };
        attempts += 1;

        match TcpListener::bind(SocketAddr::new(host, candidate)).await {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                tracing::warn!(
                    "Port {} is unavailable ({}), trying {}",
                    candidate,
                    e,
                    candidate.wrapping_add(1)
                );
                last_error = Some(e);
            }
        }
    }

    Err(BindError {
        first_port: port,
        attempts,
        last_error,
    })
}
