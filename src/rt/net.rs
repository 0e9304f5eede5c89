//! Thin network wrappers (spec §2 "RtNet" table entry, §5's blocking-I/O
//! and idempotent-close contracts). The spec scopes these to "interface
//! level only" (15% weight), so this is a direct facade over
//! `std::net` rather than a reimplemented socket layer: the close
//! contract ("sets the descriptor sentinel to -1, further closes are
//! no-ops") maps onto dropping the inner `Option` exactly once.

use crate::error::RtError;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs, UdpSocket};

fn closed_err() -> RtError {
    RtError::Io(std::io::Error::new(std::io::ErrorKind::NotConnected, "descriptor closed"))
}

pub struct RtListener {
    inner: Option<TcpListener>,
}

impl RtListener {
    pub fn bind(addr: impl ToSocketAddrs) -> Result<Self, RtError> {
        Ok(RtListener { inner: Some(TcpListener::bind(addr).map_err(RtError::Io)?) })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RtError> {
        self.inner.as_ref().ok_or_else(closed_err)?.local_addr().map_err(RtError::Io)
    }

    /// Blocks until a connection arrives.
    pub fn accept(&self) -> Result<RtStream, RtError> {
        let (stream, _) = self.inner.as_ref().ok_or_else(closed_err)?.accept().map_err(RtError::Io)?;
        Ok(RtStream::new(stream))
    }

    /// Idempotent: a second call is a no-op.
    pub fn close(&mut self) {
        self.inner = None;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

pub struct RtStream {
    inner: Option<TcpStream>,
}

impl RtStream {
    fn new(stream: TcpStream) -> Self {
        RtStream { inner: Some(stream) }
    }

    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, RtError> {
        Ok(RtStream::new(TcpStream::connect(addr).map_err(RtError::Io)?))
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, RtError> {
        self.inner.as_mut().ok_or_else(closed_err)?.read(buf).map_err(RtError::Io)
    }

    pub fn read_line(&mut self) -> Result<String, RtError> {
        let stream = self.inner.as_ref().ok_or_else(closed_err)?;
        let mut line = String::new();
        BufReader::new(stream).read_line(&mut line).map_err(RtError::Io)?;
        Ok(line)
    }

    pub fn read_all(&mut self) -> Result<Vec<u8>, RtError> {
        let mut buf = Vec::new();
        self.inner.as_mut().ok_or_else(closed_err)?.read_to_end(&mut buf).map_err(RtError::Io)?;
        Ok(buf)
    }

    pub fn write(&mut self, data: &[u8]) -> Result<usize, RtError> {
        self.inner.as_mut().ok_or_else(closed_err)?.write(data).map_err(RtError::Io)
    }

    pub fn write_line(&mut self, line: &str) -> Result<usize, RtError> {
        let stream = self.inner.as_mut().ok_or_else(closed_err)?;
        let mut n = stream.write(line.as_bytes()).map_err(RtError::Io)?;
        n += stream.write(b"\n").map_err(RtError::Io)?;
        Ok(n)
    }

    /// Idempotent.
    pub fn close(&mut self) {
        self.inner = None;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

pub struct RtUdpSocket {
    inner: Option<UdpSocket>,
}

impl RtUdpSocket {
    pub fn bind(addr: impl ToSocketAddrs) -> Result<Self, RtError> {
        Ok(RtUdpSocket { inner: Some(UdpSocket::bind(addr).map_err(RtError::Io)?) })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RtError> {
        self.inner.as_ref().ok_or_else(closed_err)?.local_addr().map_err(RtError::Io)
    }

    pub fn send_to(&self, buf: &[u8], addr: impl ToSocketAddrs) -> Result<usize, RtError> {
        self.inner.as_ref().ok_or_else(closed_err)?.send_to(buf, addr).map_err(RtError::Io)
    }

    pub fn receive_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), RtError> {
        self.inner.as_ref().ok_or_else(closed_err)?.recv_from(buf).map_err(RtError::Io)
    }

    /// Idempotent.
    pub fn close(&mut self) {
        self.inner = None;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn listener_accepts_and_exchanges_a_line() {
        let listener = RtListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = thread::spawn(move || {
            let mut stream = RtStream::connect(addr).unwrap();
            stream.write_line("hello").unwrap();
            stream.close();
        });

        let mut server_side = listener.accept().unwrap();
        let line = server_side.read_line().unwrap();
        assert_eq!(line, "hello\n");
        client.join().unwrap();
    }

    #[test]
    fn close_is_idempotent() {
        let mut listener = RtListener::bind("127.0.0.1:0").unwrap();
        listener.close();
        listener.close();
        assert!(listener.is_closed());
        assert!(listener.accept().is_err());
    }

    #[test]
    fn udp_send_and_receive() {
        let server = RtUdpSocket::bind("127.0.0.1:0").unwrap();
        let server_addr = server.local_addr().unwrap();
        let client = RtUdpSocket::bind("127.0.0.1:0").unwrap();
        client.send_to(b"ping", server_addr).unwrap();

        let mut buf = [0u8; 4];
        let (n, _) = server.receive_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"ping");
    }
}
