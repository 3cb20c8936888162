//! Integration tests for reading foreign memory through a capability

mod common;

use common::{FakeProcess, FakeSystem};
use procpeek::config::Config;
use procpeek::{Address, ErrorKind, MemoryError, ScopedSession, SessionOptions};

const NTDLL: usize = 0x7FFA_0000_0000;

fn in_notepad<R>(
    system: &FakeSystem,
    options: SessionOptions,
    callback: impl FnOnce(&procpeek::Capability) -> Result<R, MemoryError>,
) -> Result<R, MemoryError> {
    ScopedSession::new(system, options).run("notepad.exe", callback)
}

#[test]
fn test_read_module_header() {
    let system = FakeSystem::typical();
    let buffer = in_notepad(&system, SessionOptions::default(), |p| {
        let base = p.resolve_module_base("ntdll.dll")?;
        p.read_memory(base, 4)
    })
    .unwrap();

    assert_eq!(buffer.len(), 4);
    assert_eq!(buffer.address(), Address::new(NTDLL));
    assert_eq!(&buffer[..2], b"MZ");
    assert_eq!(buffer.to_hex(), "4d5a9000");
}

#[test]
fn test_read_at_offset_from_base() {
    let system = FakeSystem::typical();
    let bytes = in_notepad(&system, SessionOptions::default(), |p| {
        let base = p.resolve_module_base("ntdll.dll")?;
        p.read_memory(base.checked_add(0x100)?, 3)
    })
    .unwrap()
    .into_vec();
    let expected: Vec<u8> = (0x100..0x103).map(|i| (i % 251) as u8).collect();
    assert_eq!(bytes, expected);
}

#[test]
fn test_zero_length_rejected_without_os_call() {
    let system = FakeSystem::typical();
    let err = in_notepad(&system, SessionOptions::default(), |p| {
        p.read_memory(Address::new(NTDLL), 0)
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(system.counters.reads.get(), 0);
}

#[test]
fn test_bad_address_text_is_invalid_argument() {
    for text in ["", "-16", "0xZZ", "twelve"] {
        let err = text.parse::<Address>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "input {:?}", text);
    }
}

#[test]
fn test_read_running_off_module_is_partial() {
    let system = FakeSystem::typical();
    let err = in_notepad(&system, SessionOptions::default(), |p| {
        p.read_memory(Address::new(NTDLL + 0x2000 - 2), 8)
    })
    .unwrap_err();
    match err {
        MemoryError::PartialRead {
            requested, copied, ..
        } => {
            assert_eq!(requested, 8);
            assert_eq!(copied, 2);
        }
        other => panic!("Expected PartialRead, got {other:?}"),
    }
}

#[test]
fn test_unmapped_read_is_access_violation() {
    let system = FakeSystem::typical();
    let err = in_notepad(&system, SessionOptions::default(), |p| {
        p.read_memory(Address::new(0x10), 4)
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessViolation);
    assert_eq!(system.counters.open_handles(), 0);
}

#[test]
fn test_unbounded_read_limit_rejected_without_panicking() {
    let system = FakeSystem::typical();
    let options = SessionOptions {
        max_read_size: usize::MAX,
        ..SessionOptions::default()
    };
    let calls = std::cell::Cell::new(0);

    let err = in_notepad(&system, options, |p| {
        calls.set(calls.get() + 1);
        p.read_memory(Address::new(0x10), usize::MAX - 0x10)
    })
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(calls.get(), 0);
    assert_eq!(system.counters.opened.get(), 0);
    assert_eq!(system.counters.reads.get(), 0);
}

#[test]
fn test_configured_read_limit_applies() {
    let system = FakeSystem::new(vec![
        FakeProcess::new("notepad.exe", 1).with_module("ntdll.dll", NTDLL, 0x2000)
    ]);
    let mut config = Config::default();
    config.memory.max_read_size = 16;

    let options = SessionOptions::from(&config);
    let (small, large) = in_notepad(&system, options, |p| {
        Ok((
            p.read_memory(Address::new(NTDLL), 16),
            p.read_memory(Address::new(NTDLL), 17),
        ))
    })
    .unwrap();

    assert!(small.is_ok());
    assert_eq!(large.unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(system.counters.reads.get(), 1);
}
