//! Tests of the sequenced-packet socket link.
#![cfg(target_os = "linux")]

use eisv_cosim::common::TransportError;
use eisv_cosim::cosim::transport::NAME_MAXLEN;
use eisv_cosim::cosim::{Bridge, CoreInputs, CoreOutputs, SeqPacketSocket, Transport};
use std::thread;
use std::time::Duration;

fn unique_name(tag: &str) -> String {
    format!("eisv-{}-{}", tag, std::process::id())
}

/// Tests one clock-edge exchange between a harness and a stand-in core.
#[test]
fn test_exchange_over_socket() {
    let name = unique_name("xchg");
    let server_name = name.clone();

    let core = thread::spawn(move || {
        let sock = SeqPacketSocket::listen(&server_name).unwrap();
        let mut hw: Bridge<_, CoreOutputs, CoreInputs> = Bridge::new(sock);
        let inputs = hw.receive().unwrap();
        hw.send(&CoreOutputs {
            imem_addr: inputs.imem_rdata.wrapping_add(4),
            imem_ren: inputs.rst_n,
            dmem_byte_enable: 0b1001,
            ..Default::default()
        })
        .unwrap();
        inputs
    });

    let sock = SeqPacketSocket::connect(&name, Duration::from_millis(5)).unwrap();
    let mut tb: Bridge<SeqPacketSocket> = Bridge::new(sock);
    assert_eq!(tb.buffer_sizes(), (67, 103));

    let sent = CoreInputs {
        rst_n: true,
        imem_rdata: 0x100,
        timer_irq: true,
        ..Default::default()
    };
    let reply = tb.exchange(&sent).unwrap();
    assert_eq!(reply.imem_addr, 0x104);
    assert!(reply.imem_ren);
    assert_eq!(reply.dmem_byte_enable, 0b1001);
    assert_eq!(tb.exchanges(), 1);

    assert_eq!(core.join().unwrap(), sent);
}

/// Tests that record boundaries are checked on receive.
#[test]
fn test_wrong_record_size() {
    let name = unique_name("size");
    let server_name = name.clone();

    let peer = thread::spawn(move || {
        let mut sock = SeqPacketSocket::listen(&server_name).unwrap();
        sock.send(&[2u8; 12]).unwrap();
    });

    let mut sock = SeqPacketSocket::connect(&name, Duration::from_millis(5)).unwrap();
    let mut buf = [0u8; 103];
    let err = sock.recv(&mut buf).unwrap_err();
    assert!(matches!(
        err,
        TransportError::Length {
            expected: 103,
            actual: 12
        }
    ));
    peer.join().unwrap();
}

/// Tests that a record longer than the buffer is rejected, not truncated.
#[test]
fn test_oversized_record() {
    let name = unique_name("long");
    let server_name = name.clone();

    let peer = thread::spawn(move || {
        let mut sock = SeqPacketSocket::listen(&server_name).unwrap();
        sock.send(&[2u8; 110]).unwrap();
    });

    let mut sock = SeqPacketSocket::connect(&name, Duration::from_millis(5)).unwrap();
    let mut buf = [0u8; 103];
    let err = sock.recv(&mut buf).unwrap_err();
    assert!(matches!(
        err,
        TransportError::Length {
            expected: 103,
            actual: 110
        }
    ));
    peer.join().unwrap();
}

/// Tests that a vanished peer is reported as closed.
#[test]
fn test_peer_closed() {
    let name = unique_name("close");
    let server_name = name.clone();

    let peer = thread::spawn(move || {
        drop(SeqPacketSocket::listen(&server_name).unwrap());
    });

    let mut sock = SeqPacketSocket::connect(&name, Duration::from_millis(5)).unwrap();
    peer.join().unwrap();
    let mut buf = [0u8; 4];
    assert!(matches!(sock.recv(&mut buf), Err(TransportError::Closed)));
}

/// Tests that over-long names are refused.
#[test]
fn test_name_too_long() {
    let name = "n".repeat(NAME_MAXLEN + 1);
    assert!(matches!(
        SeqPacketSocket::connect(&name, Duration::from_millis(1)),
        Err(TransportError::NameTooLong(33))
    ));
}
