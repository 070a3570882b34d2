//! tests/stream_tests.rs
//! Behavior of the `Write`/`Read` facades themselves: lazy header emission,
//! post-header immutability, idempotent finalization, and trait plumbing.

mod common;

use aescrypt_stream::{AescryptError, Decryptor, Encryptor, Extension, Options};
use common::{password, payload};
use std::cell::RefCell;
use std::io::{Cursor, Read, Write};
use std::rc::Rc;

/// A clonable byte sink so the container stays inspectable while an
/// encryptor still owns a handle to it.
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    fn len(&self) -> usize {
        self.0.borrow().len()
    }

    fn bytes(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn header_is_emitted_on_first_write_not_construction() {
    let sink = SharedBuf::default();
    let mut encryptor = Encryptor::new(sink.clone(), &password()).unwrap();
    assert_eq!(sink.len(), 0, "construction must not touch the stream");

    encryptor.write_plaintext(b"x").unwrap();
    assert!(sink.len() > 0, "first write emits the header");
    encryptor.finish().unwrap();
}

#[test]
fn version_and_extensions_lock_once_the_header_is_out() {
    let sink = SharedBuf::default();
    let mut encryptor = Encryptor::new(sink.clone(), &password()).unwrap();

    // both are free to change before any output
    encryptor.set_version(1).unwrap();
    encryptor.set_version(2).unwrap();
    encryptor.extensions_mut().unwrap().clear();

    encryptor.write_plaintext(b"data").unwrap();
    assert!(matches!(
        encryptor.set_version(1),
        Err(AescryptError::Argument(_))
    ));
    assert!(matches!(
        encryptor.extensions_mut(),
        Err(AescryptError::Argument(_))
    ));
    encryptor.finish().unwrap();
}

#[test]
fn unsupported_stream_versions_are_rejected_up_front() {
    let options = Options {
        version: 3,
        ..Options::default()
    };
    assert!(matches!(
        Encryptor::with_options(Vec::new(), &password(), &options),
        Err(AescryptError::Argument(_))
    ));

    // version 0 needs the payload length before the header goes out
    let options = Options {
        version: 0,
        ..Options::default()
    };
    assert!(matches!(
        Encryptor::with_options(Vec::new(), &password(), &options),
        Err(AescryptError::Argument(_))
    ));

    let mut encryptor = Encryptor::new(Vec::new(), &password()).unwrap();
    assert!(matches!(
        encryptor.set_version(0),
        Err(AescryptError::Argument(_))
    ));
}

#[test]
fn finish_is_idempotent_and_writes_reject_afterwards() {
    let sink = SharedBuf::default();
    let mut encryptor = Encryptor::new(sink.clone(), &password()).unwrap();
    encryptor.write_plaintext(b"payload").unwrap();
    encryptor.finish().unwrap();
    let len_after_first = sink.len();

    encryptor.finish().unwrap();
    assert_eq!(sink.len(), len_after_first, "second finish must be a no-op");

    assert!(matches!(
        encryptor.write_plaintext(b"more"),
        Err(AescryptError::Argument(_))
    ));
}

#[test]
fn dropped_encryptor_still_produces_a_valid_empty_container() {
    let sink = SharedBuf::default();
    {
        let _encryptor = Encryptor::new(sink.clone(), &password()).unwrap();
        // dropped without an explicit write or finish
    }

    let container = sink.bytes();
    assert!(!container.is_empty());

    let mut decryptor = Decryptor::new(&password(), Cursor::new(&container)).unwrap();
    let mut plaintext = Vec::new();
    decryptor.read_to_end(&mut plaintext).unwrap();
    assert!(plaintext.is_empty());
}

#[test]
fn odd_sized_writes_and_one_byte_reads_roundtrip() {
    let plaintext = payload(1009);
    let sink = SharedBuf::default();
    {
        let mut encryptor = Encryptor::new(sink.clone(), &password()).unwrap();
        // 7 bytes at a time through the io::Write impl
        for chunk in plaintext.chunks(7) {
            encryptor.write_all(chunk).unwrap();
        }
        encryptor.finish().unwrap();
    }

    let container = sink.bytes();
    let mut decryptor = Decryptor::new(&password(), Cursor::new(&container)).unwrap();
    let mut decrypted = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match decryptor.read(&mut byte).unwrap() {
            0 => break,
            n => decrypted.extend_from_slice(&byte[..n]),
        }
    }
    assert_eq!(decrypted, plaintext);
}

#[test]
fn decryptor_reports_version_and_extensions() {
    let sink = SharedBuf::default();
    {
        let mut encryptor = Encryptor::new(sink.clone(), &password()).unwrap();
        let extensions = encryptor.extensions_mut().unwrap();
        extensions.clear();
        extensions.push(Extension::new("NOTE", b"hello".to_vec()));
        encryptor.write_plaintext(b"body").unwrap();
        encryptor.finish().unwrap();
    }

    let container = sink.bytes();
    let decryptor = Decryptor::new(&password(), Cursor::new(&container)).unwrap();
    assert_eq!(decryptor.version(), 2);
    assert_eq!(
        decryptor.extensions(),
        &[Extension::new("NOTE", b"hello".to_vec())]
    );
}

#[test]
fn version_1_containers_carry_no_extensions() {
    let options = Options {
        version: 1,
        ..Options::default()
    };
    let sink = SharedBuf::default();
    {
        let mut encryptor = Encryptor::with_options(sink.clone(), &password(), &options).unwrap();
        encryptor.write_plaintext(b"v1 body").unwrap();
        encryptor.finish().unwrap();
    }

    let container = sink.bytes();
    let mut decryptor = Decryptor::new(&password(), Cursor::new(&container)).unwrap();
    assert_eq!(decryptor.version(), 1);
    assert!(decryptor.extensions().is_empty());

    let mut plaintext = Vec::new();
    decryptor.read_to_end(&mut plaintext).unwrap();
    assert_eq!(plaintext, b"v1 body");
}
