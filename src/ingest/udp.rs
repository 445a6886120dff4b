use super::sink::IngestSink;
use crate::record::Record;
use serde_json::Value;
use std::io;
use tokio::net::UdpSocket;
use tracing::{error, info, warn};

/// Parses a datagram of the form `<source> <payload>`.
///
/// The text before the first space is the source, the trimmed remainder is
/// carried as a raw string payload. A datagram with no space has no payload
/// and cannot name a source reliably, so it is rejected.
pub(crate) fn parse_datagram(text: &str) -> Option<Record> {
    let (source, payload) = text.split_once(' ')?;
    Some(Record::new(
        source.trim(),
        Value::String(payload.trim().to_string()),
    ))
}

/// Binds `addr` and runs the UDP submission listener.
pub async fn run_udp_listener(addr: String, sink: IngestSink) -> io::Result<()> {
    let socket = UdpSocket::bind(&addr).await?;
    info!("UDP listener listening on {addr}");
    serve_udp(socket, sink).await
}

/// Serves UDP submissions on an already bound socket.
///
/// UDP submitters are fire-and-forget, so a bad datagram is logged and
/// dropped rather than answered.
pub async fn serve_udp(socket: UdpSocket, sink: IngestSink) -> io::Result<()> {
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                error!("UDP receive failed: {e}");
                continue;
            }
        };

        let text = String::from_utf8_lossy(&buf[..len]);
        match parse_datagram(&text) {
            Some(record) => {
                if let Err(e) = sink.accept(record) {
                    warn!("rejected datagram from {peer}: {e}");
                }
            }
            None => warn!("malformed datagram from {peer}: {text:?}"),
        }
    }
}
