use super::request::HttpRequest;
use crate::network::Connection;
use crate::network::error::Error;

/// Sends built requests over a connection.
///
/// Response handling is left to the caller, which reads from the connection
/// directly (see [`Client::connection_mut`]).
#[derive(Debug)]
pub struct Client<C: Connection> {
    connection: C,
}

impl<C: Connection> Client<C> {
    /// Wrap a connection.
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    /// Write the whole request to the connection and flush it.
    ///
    /// Returns the number of bytes sent.
    ///
    /// # Errors
    ///
    /// * [`Error::WriteError`] - the connection failed or stopped accepting bytes
    /// * [`Error::ProtocolError`] - the request is empty
    pub fn send(&mut self, request: &HttpRequest<'_>) -> Result<usize, Error> {
        let bytes = request.as_bytes();
        if bytes.is_empty() {
            return Err(Error::ProtocolError);
        }

        let mut sent = 0;
        while sent < bytes.len() {
            match self.connection.write(&bytes[sent..]) {
                Ok(0) => return Err(Error::WriteError),
                Ok(n) => sent += n,
                Err(_) => return Err(Error::WriteError),
            }
        }
        self.connection.flush().map_err(|_| Error::WriteError)?;
        Ok(sent)
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Get a mutable reference to the underlying connection
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Give the connection back.
    pub fn into_inner(self) -> C {
        self.connection
    }
}

/// Async twin of [`Client`].
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct AsyncClient<C: crate::network::AsyncConnection> {
    connection: C,
}

#[cfg(feature = "async")]
impl<C: crate::network::AsyncConnection> AsyncClient<C> {
    /// Wrap a connection.
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    /// Write the whole request to the connection and flush it.
    pub async fn send(&mut self, request: &HttpRequest<'_>) -> Result<usize, Error> {
        let bytes = request.as_bytes();
        if bytes.is_empty() {
            return Err(Error::ProtocolError);
        }

        let mut sent = 0;
        while sent < bytes.len() {
            match self.connection.write(&bytes[sent..]).await {
                Ok(0) => return Err(Error::WriteError),
                Ok(n) => sent += n,
                Err(_) => return Err(Error::WriteError),
            }
        }
        self.connection.flush().await.map_err(|_| Error::WriteError)?;
        Ok(sent)
    }

    /// Give the connection back.
    pub fn into_inner(self) -> C {
        self.connection
    }
}
