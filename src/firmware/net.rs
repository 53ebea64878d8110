use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_net::{IpAddress, Stack};
use embassy_time::{with_timeout, Duration, Timer};
use embedded_io_async::Write;

use crate::encode::RequestSpec;
use crate::hal::{Collector, Pacer};
use crate::types::TransportError;

pub(super) const HTTP_RW_BUF: usize = 1024;
const HTTP_SOCKET_TIMEOUT_SECS: u64 = 10;
const DHCP_WAIT_TIMEOUT_SECS: u64 = 15;
const STATUS_LINE_MAX: usize = 128;

pub struct EmbassyPacer;

impl Pacer for EmbassyPacer {
    async fn pause_ms(&mut self, ms: u32) {
        Timer::after(Duration::from_millis(ms as u64)).await;
    }
}

pub struct HttpCollector {
    stack: Stack<'static>,
    rx_buffer: &'static mut [u8; HTTP_RW_BUF],
    tx_buffer: &'static mut [u8; HTTP_RW_BUF],
}

impl HttpCollector {
    pub(super) fn new(
        stack: Stack<'static>,
        rx_buffer: &'static mut [u8; HTTP_RW_BUF],
        tx_buffer: &'static mut [u8; HTTP_RW_BUF],
    ) -> Self {
        Self {
            stack,
            rx_buffer,
            tx_buffer,
        }
    }

    async fn resolve(&self, host: &str) -> Result<IpAddress, TransportError> {
        if let Ok(addr) = host.parse::<core::net::Ipv4Addr>() {
            return Ok(IpAddress::Ipv4(addr));
        }
        let answers = self
            .stack
            .dns_query(host, DnsQueryType::A)
            .await
            .map_err(|_| TransportError::Resolve)?;
        answers.first().copied().ok_or(TransportError::Resolve)
    }
}

impl Collector for HttpCollector {
    async fn send(&mut self, request: &RequestSpec) -> Result<(), TransportError> {
        // Association can outrun the DHCP lease; don't dial without one.
        with_timeout(
            Duration::from_secs(DHCP_WAIT_TIMEOUT_SECS),
            self.stack.wait_config_up(),
        )
        .await
        .map_err(|_| TransportError::Connect)?;

        let addr = self.resolve(request.host).await?;

        let mut socket = TcpSocket::new(
            self.stack,
            &mut self.rx_buffer[..],
            &mut self.tx_buffer[..],
        );
        socket.set_timeout(Some(Duration::from_secs(HTTP_SOCKET_TIMEOUT_SECS)));

        socket
            .connect((addr, request.port))
            .await
            .map_err(|_| TransportError::Connect)?;

        let result = exchange(&mut socket, request).await;
        let _ = with_timeout(Duration::from_millis(250), socket.flush()).await;
        socket.close();
        result
    }
}

async fn exchange(
    socket: &mut TcpSocket<'_>,
    request: &RequestSpec,
) -> Result<(), TransportError> {
    socket
        .write_all(b"GET ")
        .await
        .map_err(|_| TransportError::Write)?;
    socket
        .write_all(request.path.as_bytes())
        .await
        .map_err(|_| TransportError::Write)?;
    socket
        .write_all(b" HTTP/1.1\r\nHost: ")
        .await
        .map_err(|_| TransportError::Write)?;
    socket
        .write_all(request.host.as_bytes())
        .await
        .map_err(|_| TransportError::Write)?;
    socket
        .write_all(b"\r\nConnection: close\r\n\r\n")
        .await
        .map_err(|_| TransportError::Write)?;
    socket.flush().await.map_err(|_| TransportError::Write)?;

    let mut head = [0u8; STATUS_LINE_MAX];
    let mut filled = 0usize;
    loop {
        if filled == head.len() {
            break;
        }
        let n = socket
            .read(&mut head[filled..])
            .await
            .map_err(|_| TransportError::Read)?;
        if n == 0 {
            break;
        }
        filled += n;
        if head[..filled].windows(2).any(|pair| pair == b"\r\n") {
            break;
        }
    }

    // The response body is never inspected; the status class is the whole
    // success signal.
    match parse_status_code(&head[..filled]) {
        Some(code) if (200..300).contains(&code) => Ok(()),
        Some(_) => Err(TransportError::BadStatus),
        None => Err(TransportError::Read),
    }
}

// Pulls the numeric code out of `HTTP/1.x NNN ...`.
fn parse_status_code(head: &[u8]) -> Option<u16> {
    let rest = head.strip_prefix(b"HTTP/")?;
    let space = rest.iter().position(|&b| b == b' ')?;
    let digits = rest.get(space + 1..space + 4)?;
    let mut code: u16 = 0;
    for &digit in digits {
        if !digit.is_ascii_digit() {
            return None;
        }
        code = code * 10 + u16::from(digit - b'0');
    }
    Some(code)
}
