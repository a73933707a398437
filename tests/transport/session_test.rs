//! Request/response exchange over mock and duplex pipes.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use gnokii_supervisor::command::CommandSpec;
use gnokii_supervisor::transport::{
    FrameOutcome, FrameSettings, FramedTransport, Liveness, TransportError, TransportState,
    DEFAULT_PROMPT,
};
use tokio::io::{AsyncRead, ReadBuf};
use tokio_test::io::Builder;

struct AlwaysAlive;

impl Liveness for AlwaysAlive {
    fn is_alive(&mut self) -> bool {
        true
    }
}

/// Alive for the first `n` liveness checks, dead afterwards.
struct DiesAfter(usize);

impl Liveness for DiesAfter {
    fn is_alive(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }
}

fn settings(read_timeout_ms: u64) -> FrameSettings {
    FrameSettings {
        prompt: DEFAULT_PROMPT.to_string(),
        read_timeout: Duration::from_millis(read_timeout_ms),
        poll_interval: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn immediate_prompt_returns_payload() {
    let mock = Builder::new()
        .write(b"--version\n")
        .read(b"v1.0\ngnokii> ")
        .build();
    let (reader, writer) = tokio::io::split(mock);
    let mut transport = FramedTransport::new(reader, writer, settings(500));

    let response = transport
        .send(&CommandSpec::new("--version"), &mut AlwaysAlive)
        .await
        .unwrap();

    assert_eq!(response.text, "v1.0");
    assert_eq!(response.outcome, FrameOutcome::Matched);
    assert_eq!(transport.state(), TransportState::Idle);
}

#[tokio::test]
async fn echoed_command_is_removed() {
    let mock = Builder::new()
        .write(b"--identify\n")
        .read(b"--identify\nIMEI: 350000000000000\nModel: RH-12\ngnokii> ")
        .build();
    let (reader, writer) = tokio::io::split(mock);
    let mut transport = FramedTransport::new(reader, writer, settings(500));

    let response = transport
        .send(&CommandSpec::new("--identify"), &mut AlwaysAlive)
        .await
        .unwrap();

    assert_eq!(response.text, "IMEI: 350000000000000\nModel: RH-12");
}

#[tokio::test]
async fn chunks_split_across_reads_are_reassembled() {
    let mock = Builder::new()
        .write(b"--version\n")
        .read(b"partial")
        .wait(Duration::from_millis(30))
        .read(b" line\ngnok")
        .wait(Duration::from_millis(30))
        .read(b"ii> ")
        .build();
    let (reader, writer) = tokio::io::split(mock);
    let mut transport = FramedTransport::new(reader, writer, settings(500));

    let response = transport
        .send(&CommandSpec::new("--version"), &mut AlwaysAlive)
        .await
        .unwrap();

    assert_eq!(response.text, "partial line");
    assert!(response.is_complete());
}

#[tokio::test]
async fn payload_block_is_written_after_line() {
    let mock = Builder::new()
        .write(b"--sendsms 600111222\nHola\n\x03\n")
        .read(b"Send succeeded!\ngnokii> ")
        .build();
    let (reader, writer) = tokio::io::split(mock);
    let mut transport = FramedTransport::new(reader, writer, settings(500));
    let command = CommandSpec::new("--sendsms").arg("600111222").payload("Hola");

    let response = transport.send(&command, &mut AlwaysAlive).await.unwrap();
    assert_eq!(response.text, "Send succeeded!");
}

#[tokio::test]
async fn silence_times_out_with_empty_text() {
    let (client, _peer) = tokio::io::duplex(64);
    let mut transport = FramedTransport::new(client, Vec::new(), settings(100));

    let response = transport
        .send(&CommandSpec::new("--monitor").arg("once"), &mut AlwaysAlive)
        .await
        .unwrap();

    assert_eq!(response.outcome, FrameOutcome::TimedOut);
    assert!(response.is_timeout());
    assert!(response.text.is_empty());
    assert_eq!(transport.state(), TransportState::Idle);
    assert_eq!(transport.stats().timed_out, 1);
}

#[tokio::test]
async fn timeout_keeps_partial_text() {
    let (client, mut peer) = tokio::io::duplex(64);
    tokio::io::AsyncWriteExt::write_all(&mut peer, b"Waiting for phone")
        .await
        .unwrap();
    let mut transport = FramedTransport::new(client, Vec::new(), settings(100));

    let response = transport
        .send(&CommandSpec::new("--identify"), &mut AlwaysAlive)
        .await
        .unwrap();

    assert_eq!(response.outcome, FrameOutcome::TimedOut);
    assert_eq!(response.text, "Waiting for phone");
}

#[tokio::test]
async fn eof_mid_response_returns_partial() {
    let reader: &[u8] = b"partial";
    let mut transport = FramedTransport::new(reader, Vec::new(), settings(500));

    let response = transport
        .send(&CommandSpec::new("--getsms").arg("SM").arg(1), &mut AlwaysAlive)
        .await
        .unwrap();

    assert_eq!(response.outcome, FrameOutcome::ProcessExited);
    assert_eq!(response.text, "partial");
    assert_eq!(transport.stats().exited, 1);
}

#[tokio::test]
async fn dead_process_is_detected_while_idle() {
    let (client, mut peer) = tokio::io::duplex(64);
    tokio::io::AsyncWriteExt::write_all(&mut peer, b"Bus error")
        .await
        .unwrap();
    let mut transport = FramedTransport::new(client, Vec::new(), settings(2000));

    // Alive for the pre-send check only.
    let response = transport
        .send(&CommandSpec::new("--identify"), &mut DiesAfter(1))
        .await
        .unwrap();

    assert_eq!(response.outcome, FrameOutcome::ProcessExited);
    assert_eq!(response.text, "Bus error");
}

#[tokio::test]
async fn read_error_propagates() {
    let mock = Builder::new()
        .write(b"--version\n")
        .read_error(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        .build();
    let (reader, writer) = tokio::io::split(mock);
    let mut transport = FramedTransport::new(reader, writer, settings(500));

    let err = transport
        .send(&CommandSpec::new("--version"), &mut AlwaysAlive)
        .await
        .unwrap_err();

    match err {
        TransportError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected Io error, got {other:?}"),
    }
    assert_eq!(transport.state(), TransportState::Idle);
}

/// Reports `WouldBlock` once, then yields its data.
struct NotReadyOnce {
    data: &'static [u8],
    signalled: bool,
}

impl AsyncRead for NotReadyOnce {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if !self.signalled {
            self.signalled = true;
            return Poll::Ready(Err(io::ErrorKind::WouldBlock.into()));
        }
        let n = self.data.len().min(buf.remaining());
        buf.put_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn would_block_is_retried() {
    let reader = NotReadyOnce {
        data: b"v1.0\ngnokii> ",
        signalled: false,
    };
    let mut transport = FramedTransport::new(reader, Vec::new(), settings(500));

    let response = transport
        .send(&CommandSpec::new("--version"), &mut AlwaysAlive)
        .await
        .unwrap();

    assert_eq!(response.text, "v1.0");
    assert!(response.is_complete());
}

#[tokio::test]
async fn consecutive_requests_reuse_the_pipe() {
    let mock = Builder::new()
        .write(b"--version\n")
        .read(b"v1.0\ngnokii> ")
        .write(b"--getactiveprofile\n")
        .read(b"1. General\ngnokii> ")
        .build();
    let (reader, writer) = tokio::io::split(mock);
    let mut transport = FramedTransport::new(reader, writer, settings(500));

    let first = transport
        .send(&CommandSpec::new("--version"), &mut AlwaysAlive)
        .await
        .unwrap();
    let second = transport
        .send(&CommandSpec::new("--getactiveprofile"), &mut AlwaysAlive)
        .await
        .unwrap();

    assert_eq!(first.text, "v1.0");
    assert_eq!(second.text, "1. General");
    assert_eq!(transport.stats().requests, 2);
    assert_eq!(transport.stats().matched, 2);
}

#[tokio::test]
async fn get_result_reads_greeting() {
    let reader: &[u8] = b"GNOKII Version 0.6.31\ngnokii> ";
    let mut transport = FramedTransport::new(reader, Vec::new(), settings(500));

    let greeting = transport.get_result(&mut AlwaysAlive).await.unwrap();
    assert_eq!(greeting.text, "GNOKII Version 0.6.31");
    assert_eq!(transport.stats().requests, 0);
}
