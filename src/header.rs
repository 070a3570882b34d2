//! # Header and Extension Codec
//!
//! Parses and emits the fixed-layout container prelude ("AES", version,
//! reserved byte) and the optional variable-length extension records carried
//! by version 2 files.
//!
//! All multi-byte integers in the container are big-endian. Fixed-size reads
//! loop until filled so chunking readers (sockets, pipes) work; running out
//! of input mid-field is a [`Format`](AescryptError::Format) error.

use crate::consts::{MAGIC, MAX_FILE_VERSION};
use crate::error::AescryptError;
use std::io::{Read, Write};

/// One extension record from the container header.
///
/// Records are ordered and duplicate keys are allowed. The key is UTF-8; the
/// value is opaque bytes and may contain embedded `0x00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub key: String,
    pub value: Vec<u8>,
}

impl Extension {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Reads exactly `N` bytes, looping over short reads.
pub(crate) fn read_exact_bytes<const N: usize, R: Read>(
    reader: &mut R,
) -> Result<[u8; N], AescryptError> {
    let mut buf = [0u8; N];
    read_full(reader, &mut buf)?;
    Ok(buf)
}

pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), AescryptError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(AescryptError::Format(
                "the stream was exhausted unexpectedly".into(),
            ));
        }
        filled += n;
    }
    Ok(())
}

/// Reads and validates the prelude, returning `(version, reserved)`.
///
/// For version 0 the reserved byte carries the legacy final-block length and
/// must be below 16; for later versions it must be zero.
pub(crate) fn read_prelude<R: Read>(reader: &mut R) -> Result<(u8, u8), AescryptError> {
    let prelude = read_exact_bytes::<5, _>(reader)?;
    if prelude[..3] != MAGIC {
        return Err(AescryptError::Format("invalid header marker".into()));
    }

    let version = prelude[3];
    let reserved = prelude[4];
    if version > MAX_FILE_VERSION {
        return Err(AescryptError::Format(format!(
            "unsupported file version: {version}"
        )));
    }
    if version == 0 {
        if reserved >= 16 {
            return Err(AescryptError::Format("invalid header marker".into()));
        }
    } else if reserved != 0 {
        return Err(AescryptError::Format("reserved field is not zero".into()));
    }

    Ok((version, reserved))
}

/// Writes the prelude. The reserved byte is zero for versions 1 and 2, and
/// the final-block length for version 0.
pub(crate) fn write_prelude<W: Write>(
    writer: &mut W,
    version: u8,
    reserved: u8,
) -> Result<(), AescryptError> {
    writer.write_all(&MAGIC)?;
    writer.write_all(&[version, reserved])?;
    Ok(())
}

/// Reads the extension list up to and including the zero-length terminator.
pub(crate) fn read_extensions<R: Read>(reader: &mut R) -> Result<Vec<Extension>, AescryptError> {
    let mut extensions = Vec::new();
    loop {
        let length = u16::from_be_bytes(read_exact_bytes::<2, _>(reader)?) as usize;
        if length == 0 {
            return Ok(extensions);
        }

        let mut record = vec![0u8; length];
        read_full(reader, &mut record)?;

        let separator = record.iter().position(|&b| b == 0).ok_or_else(|| {
            AescryptError::Format("invalid extension data, separator (0x00) not found".into())
        })?;

        let key = std::str::from_utf8(&record[..separator])
            .map_err(|_| AescryptError::Format("extension key is not valid UTF-8".into()))?
            .to_string();
        let value = record[separator + 1..].to_vec();
        extensions.push(Extension { key, value });
    }
}

/// Writes the extension list verbatim, followed by the terminator.
pub(crate) fn write_extensions<W: Write>(
    writer: &mut W,
    extensions: &[Extension],
) -> Result<(), AescryptError> {
    for ext in extensions {
        let length = ext.key.len() + 1 + ext.value.len();
        let length = u16::try_from(length).map_err(|_| {
            AescryptError::Argument(format!("extension record too long: {length} bytes"))
        })?;
        writer.write_all(&length.to_be_bytes())?;
        writer.write_all(ext.key.as_bytes())?;
        writer.write_all(&[0])?;
        writer.write_all(&ext.value)?;
    }
    writer.write_all(&[0, 0])?;
    Ok(())
}

/// Reads just enough of a container to report its format version.
///
/// Useful for file-management tooling that needs to classify files without
/// deriving keys.
pub fn read_version<R: Read>(mut reader: R) -> Result<u8, AescryptError> {
    let (version, _) = read_prelude(&mut reader)?;
    Ok(version)
}
