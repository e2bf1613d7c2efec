use core::{fmt::Debug, net::SocketAddr};

use embedded_nal::{nb, TcpClientStack, TcpError, TcpErrorKind};

use super::{Close, Read, Write};
use crate::{
    error::{Error, IoResult, Partial},
    trace::debug,
};

/// A connected TCP socket of an `embedded-nal` stack, seen as a blocking
/// stream.
///
/// Reads and writes wait out `WouldBlock`. A peer that closed its side reads
/// as [`Error::Eof`] and refuses writes with [`Error::ClosedPipe`].
pub struct TcpStream<'a, T>
where
    T: TcpClientStack + 'a,
{
    stack: &'a mut T,
    socket: Option<T::TcpSocket>,
}

impl<'a, T> TcpStream<'a, T>
where
    T: TcpClientStack + 'a,
    T::Error: Send + Sync + 'static,
{
    /// Open a socket on `stack` and connect it to `remote`.
    pub fn connect(stack: &'a mut T, remote: SocketAddr) -> Result<Self, Error> {
        let mut socket = stack.socket().map_err(Error::stream)?;

        if let Err(e) = nb::block!(stack.connect(&mut socket, remote)) {
            let _ = stack.close(socket);
            return Err(Error::stream(e));
        }

        Ok(Self {
            stack,
            socket: Some(socket),
        })
    }
}

impl<'a, T> TcpStream<'a, T>
where
    T: TcpClientStack + 'a,
{
    /// Wrap a socket that is already connected.
    pub fn from_socket(stack: &'a mut T, socket: T::TcpSocket) -> Self {
        Self {
            stack,
            socket: Some(socket),
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }
}

impl<'a, T> Drop for TcpStream<'a, T>
where
    T: TcpClientStack + 'a,
{
    fn drop(&mut self) {
        if let Some(socket) = self.socket.take() {
            let _ = self.stack.close(socket);
        }
    }
}

impl<'a, T> Debug for TcpStream<'a, T>
where
    T: TcpClientStack + 'a,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "TcpStream {{ open: {} }}", self.is_open())
    }
}

impl<'a, T> Read for TcpStream<'a, T>
where
    T: TcpClientStack + 'a,
    T::Error: Send + Sync + 'static,
{
    fn read(&mut self, buffer: &mut [u8]) -> IoResult {
        let socket = self.socket.as_mut().ok_or(Error::ClosedPipe)?;
        if buffer.is_empty() {
            return Ok(0);
        }

        match nb::block!(self.stack.receive(socket, buffer)) {
            // an orderly shutdown of the peer shows up as an empty receive
            Ok(0) => Err(Error::Eof.into()),
            Ok(n) => Ok(n),
            Err(e) if e.kind() == TcpErrorKind::PipeClosed => Err(Error::Eof.into()),
            Err(e) => Err(Error::stream(e).into()),
        }
    }
}

impl<'a, T> Write for TcpStream<'a, T>
where
    T: TcpClientStack + 'a,
    T::Error: Send + Sync + 'static,
{
    /// Sends until the whole buffer is out, as a blocking socket would.
    fn write(&mut self, buffer: &[u8]) -> IoResult {
        let socket = self.socket.as_mut().ok_or(Error::ClosedPipe)?;
        let mut sent = 0;

        while sent < buffer.len() {
            match nb::block!(self.stack.send(socket, &buffer[sent..])) {
                Ok(0) => return Err(Partial::new(sent, Error::ShortWrite)),
                Ok(n) => sent += n,
                Err(e) if e.kind() == TcpErrorKind::PipeClosed => {
                    return Err(Partial::new(sent, Error::ClosedPipe))
                }
                Err(e) => return Err(Partial::new(sent, Error::stream(e))),
            }
        }
        Ok(sent)
    }
}

impl<'a, T> Close for TcpStream<'a, T>
where
    T: TcpClientStack + 'a,
    T::Error: Send + Sync + 'static,
{
    /// Close the socket. Closing again fails with [`Error::ClosedPipe`].
    fn close(&mut self) -> Result<(), Error> {
        let socket = self.socket.take().ok_or(Error::ClosedPipe)?;
        debug!("tcp stream: closing");
        self.stack.close(socket).map_err(Error::stream)
    }
}
