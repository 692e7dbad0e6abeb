//! Flaschen-Taschen display over UDP: one datagram per frame.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, info};

use super::{Canvas, Display, FrameBuffer, Offset};
use crate::color::Color;
use crate::{Error, Result};

pub const DEFAULT_PORT: u16 = 1337;
pub const DEFAULT_HOST: &str = "localhost";
/// Environment variable naming the display when no host is given
pub const DISPLAY_ENV: &str = "FT_DISPLAY";

/// Host to use: the explicit one, then `FT_DISPLAY`, then localhost.
pub fn resolve_host(host: Option<&str>) -> String {
    host.map(str::to_string)
        .or_else(|| std::env::var(DISPLAY_ENV).ok().filter(|h| !h.is_empty()))
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
}

/// Split `host`, `host:port`, `[v6]:port` or a bare IPv6 address.
fn split_host_port(target: &str) -> (&str, u16) {
    if let Some(rest) = target.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            let port = tail
                .strip_prefix(':')
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT);
            return (host, port);
        }
    }
    match target.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => match port.parse() {
            Ok(port) => (host, port),
            Err(_) => (target, DEFAULT_PORT),
        },
        _ => (target, DEFAULT_PORT),
    }
}

/// Open a UDP socket connected to the display host.
pub async fn open_connection(host: Option<&str>) -> Result<UdpSocket> {
    let target = resolve_host(host);
    let (name, port) = split_host_port(&target);
    let connection_error = |source: io::Error| Error::Connection {
        host: target.clone(),
        source,
    };

    let addr = lookup_host((name, port))
        .await
        .map_err(connection_error)?
        .next()
        .ok_or_else(|| {
            connection_error(io::Error::new(io::ErrorKind::NotFound, "no address for host"))
        })?;

    let local: SocketAddr = if addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local).await.map_err(connection_error)?;
    socket.connect(addr).await.map_err(connection_error)?;

    info!(host = %target, %addr, "Connected to display");
    Ok(socket)
}

/// Display that sends its buffer to a Flaschen-Taschen server.
pub struct UdpDisplay {
    socket: UdpSocket,
    buffer: FrameBuffer,
    offset: Offset,
}

impl UdpDisplay {
    pub fn new(socket: UdpSocket, width: i32, height: i32) -> Self {
        Self {
            socket,
            buffer: FrameBuffer::new(width, height),
            offset: Offset::default(),
        }
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }
}

impl Canvas for UdpDisplay {
    fn width(&self) -> i32 {
        self.buffer.width()
    }

    fn height(&self) -> i32 {
        self.buffer.height()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.buffer.set_pixel(x, y, color);
    }

    fn fill(&mut self, color: Color) {
        self.buffer.fill(color);
    }
}

#[async_trait]
impl Display for UdpDisplay {
    fn set_offset(&mut self, offset: Offset) {
        self.offset = offset;
    }

    async fn send(&mut self) -> Result<()> {
        let frame = self.buffer.encode(self.offset);
        self.socket.send(&frame).await.map_err(Error::Transport)?;
        Ok(())
    }

    fn release(self) {
        debug!(peer = ?self.socket.peer_addr().ok(), "Closing display socket");
        drop(self.socket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("ft.noise"), ("ft.noise", 1337));
        assert_eq!(split_host_port("ft.noise:1400"), ("ft.noise", 1400));
        assert_eq!(split_host_port("[::1]:1500"), ("::1", 1500));
        assert_eq!(split_host_port("[::1]"), ("::1", 1337));
        assert_eq!(split_host_port("::1"), ("::1", 1337));
        assert_eq!(split_host_port("host:abc"), ("host:abc", 1337));
    }

    #[test]
    fn test_resolve_explicit_host() {
        assert_eq!(resolve_host(Some("matrix.local")), "matrix.local");
    }

    #[tokio::test]
    async fn test_send_frame_over_loopback() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = server.local_addr().unwrap().port();

        let target = format!("127.0.0.1:{}", port);
        let socket = open_connection(Some(target.as_str())).await.unwrap();
        let mut display = UdpDisplay::new(socket, 2, 1);
        display.set_offset(Offset { x: 1, y: 2, z: 3 });
        display.set_pixel(1, 0, Color::WHITE);
        display.send().await.unwrap();

        let mut buf = [0u8; 64];
        let len = server.recv(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], &display.buffer().encode(Offset { x: 1, y: 2, z: 3 })[..]);
        assert!(buf[..len].starts_with(b"P6\n2 1\n255\n"));
        assert!(buf[..len].ends_with(b"\n1 2 3\n"));

        display.release();
    }

    #[tokio::test]
    async fn test_unresolvable_host() {
        let err = open_connection(Some("no-such-host.invalid")).await.unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
        assert_eq!(err.kind(), crate::ErrorKind::Connection);
    }
}
