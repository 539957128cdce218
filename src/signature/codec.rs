//! Binary `.sig.db` layout.
//!
//! All integers are little-endian and fixed width:
//!
//! ```text
//! u32 magic
//! i32 format_version
//! u64 target_version
//! u64 entry_count
//! entry_count times:
//!     u64 symbol_len;  symbol bytes
//!     u64 pattern_len; pattern bytes   (0x00 = wildcard)
//!     u64 op_count
//!     op_count times:
//!         i32 op_type
//!         i64 displacement             (only for Disp)
//!     i8  kind                         (format >= 1.1.0)
//!     u64 extra_len; extra bytes       (format >= 1.1.0, thunk kinds only)
//! ```

use super::database::{FormatVersion, SignatureDatabase};
use super::entry::{EntryKind, SigEntry};
use super::operation::SigOperation;
use crate::errors::{Error, FormatError, Result, ResultExt};
use crate::version::TargetVersion;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Leading file signature of every `.sig.db`.
pub const MAGIC: u32 = 0x3046_FCDB;

/// Write `db` to `writer`.
pub fn save<W: Write>(db: &SignatureDatabase, writer: &mut W) -> Result<()> {
    let format = db.format_version();
    writer.write_all(&MAGIC.to_le_bytes())?;
    writer.write_all(&format.code().to_le_bytes())?;
    writer.write_all(&db.target_version().canonical().to_le_bytes())?;
    write_len(writer, db.len())?;

    for entry in db.entries() {
        write_bytes(writer, entry.symbol())?;
        write_bytes(writer, entry.pattern())?;
        write_len(writer, entry.operations().len())?;
        for op in entry.operations() {
            writer.write_all(&op.type_code().to_le_bytes())?;
            if let SigOperation::Disp(offset) = op {
                writer.write_all(&offset.to_le_bytes())?;
            }
        }
        if format.stores_kind() {
            writer.write_all(&entry.kind().code().to_le_bytes())?;
            if let Some(extra) = entry.extra_symbol() {
                write_bytes(writer, extra)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Read a database, rejecting it unless it covers `expected`.
pub fn load<R: Read>(reader: &mut R, expected: TargetVersion) -> Result<SignatureDatabase> {
    let magic = u32::from_le_bytes(read_array(reader, "magic")?);
    if magic != MAGIC {
        return Err(FormatError::BadMagic {
            expected: MAGIC,
            found: magic,
        }
        .into());
    }

    let format_code = i32::from_le_bytes(read_array(reader, "format version")?);
    let format = FormatVersion::from_code(format_code)
        .ok_or(FormatError::UnsupportedFormatVersion(format_code))?;

    let target = u64::from_le_bytes(read_array(reader, "target version")?);
    if target != expected.canonical() {
        return Err(FormatError::VersionMismatch {
            expected: expected.canonical(),
            found: target,
        }
        .into());
    }

    let entry_count = read_u64(reader, "entry count")?;
    let mut db = SignatureDatabase::with_format(expected, format);
    for _ in 0..entry_count {
        db.push(read_entry(reader, format)?);
    }
    Ok(db)
}

/// Create (or truncate) `path` and write `db` to it.
pub fn save_to_path(db: &SignatureDatabase, path: &Path) -> Result<()> {
    let file = File::create(path).with_path("create", path)?;
    let mut writer = BufWriter::new(file);
    save(db, &mut writer).map_err(|err| match err {
        Error::Io(source) => Error::io_at("write", path, source),
        other => other,
    })
}

pub fn load_from_path(path: &Path, expected: TargetVersion) -> Result<SignatureDatabase> {
    let file = File::open(path).with_path("open", path)?;
    load(&mut BufReader::new(file), expected)
}

fn read_entry<R: Read>(reader: &mut R, format: FormatVersion) -> Result<SigEntry> {
    let symbol = read_bytes(reader, "symbol")?;
    let pattern = read_bytes(reader, "pattern")?;

    let op_count = read_u64(reader, "operation count")?;
    let mut operations = Vec::new();
    for _ in 0..op_count {
        let code = i32::from_le_bytes(read_array(reader, "operation type")?);
        let op = match SigOperation::from_type_code(code) {
            Some(SigOperation::Disp(_)) => {
                SigOperation::Disp(i64::from_le_bytes(read_array(reader, "displacement")?))
            }
            Some(op) => op,
            None => return Err(FormatError::InvalidOperation(code).into()),
        };
        operations.push(op);
    }

    let (kind, extra_symbol) = if format.stores_kind() {
        let code = i8::from_le_bytes(read_array(reader, "entry kind")?);
        let kind = EntryKind::from_code(code).ok_or(FormatError::InvalidEntryKind(code))?;
        let extra = if kind.is_thunk() {
            Some(read_bytes(reader, "extra symbol")?)
        } else {
            None
        };
        (kind, extra)
    } else {
        (EntryKind::Function, None)
    };

    SigEntry::new(kind, symbol, extra_symbol, pattern, operations).map_err(|err| match err {
        Error::Validation(reason) => FormatError::InvalidEntry { reason }.into(),
        other => other,
    })
}

fn write_len<W: Write>(writer: &mut W, len: usize) -> io::Result<()> {
    writer.write_all(&(len as u64).to_le_bytes())
}

fn write_bytes<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    write_len(writer, bytes.len())?;
    writer.write_all(bytes)
}

fn read_array<R: Read, const N: usize>(reader: &mut R, field: &'static str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|err| short_read(err, field))?;
    Ok(buf)
}

fn read_u64<R: Read>(reader: &mut R, field: &'static str) -> Result<u64> {
    Ok(u64::from_le_bytes(read_array(reader, field)?))
}

/// Length-prefixed byte string. The length is untrusted, so the payload is
/// read through a bounded reader instead of being preallocated.
fn read_bytes<R: Read>(reader: &mut R, field: &'static str) -> Result<Vec<u8>> {
    let len = read_u64(reader, field)?;
    let mut buf = Vec::new();
    reader
        .by_ref()
        .take(len)
        .read_to_end(&mut buf)
        .map_err(|err| short_read(err, field))?;
    if (buf.len() as u64) < len {
        return Err(FormatError::Truncated { field }.into());
    }
    Ok(buf)
}

fn short_read(err: io::Error, field: &'static str) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        FormatError::Truncated { field }.into()
    } else {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(text: &str) -> TargetVersion {
        TargetVersion::parse(text).unwrap()
    }

    fn sample(format: FormatVersion) -> SignatureDatabase {
        let mut db = SignatureDatabase::with_format(v("1.21.50"), format);
        db.push(
            SigEntry::function(
                "?init@MinecraftGame@@QEAAXXZ",
                b"\x48\x89\x5C\x00\x00\x55".to_vec(),
                vec![],
            )
            .unwrap(),
        );
        db.push(
            SigEntry::function(
                "?tick@MinecraftGame@@QEAAXM@Z",
                b"\xE8\x00\x00\x00\x00\x48".to_vec(),
                vec![SigOperation::Disp(1), SigOperation::Deref, SigOperation::Disp(-0x20)],
            )
            .unwrap(),
        );
        db
    }

    fn encode(db: &SignatureDatabase) -> Vec<u8> {
        let mut buf = Vec::new();
        save(db, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode(&SignatureDatabase::new(v("1.21.50")));
        assert_eq!(bytes.len(), 4 + 4 + 8 + 8);
        assert_eq!(&bytes[0..4], &[0xDB, 0xFC, 0x46, 0x30]);
        assert_eq!(&bytes[4..8], &0i32.to_le_bytes());
        assert_eq!(&bytes[8..16], &121_050u64.to_le_bytes());
        assert_eq!(&bytes[16..24], &0u64.to_le_bytes());
    }

    #[test]
    fn test_operation_layout_only_disp_has_payload() {
        let mut db = SignatureDatabase::new(v("1.21.50"));
        db.push(
            SigEntry::function("s", [0x90u8], vec![SigOperation::Deref, SigOperation::Disp(-2)])
                .unwrap(),
        );
        let bytes = encode(&db);
        let ops = &bytes[24 + 8 + 1 + 8 + 1 + 8..];
        assert_eq!(&ops[0..4], &2i32.to_le_bytes());
        assert_eq!(&ops[4..8], &1i32.to_le_bytes());
        assert_eq!(&ops[8..16], &(-2i64).to_le_bytes());
        assert_eq!(ops.len(), 16);
    }

    #[test]
    fn test_round_trip_base_format() {
        let db = sample(FormatVersion::V1_0_0);
        let loaded = load(&mut encode(&db).as_slice(), v("1.21.50")).unwrap();
        assert_eq!(loaded, db);
    }

    #[test]
    fn test_round_trip_extended_format_keeps_thunks() {
        let mut db = sample(FormatVersion::V1_1_0);
        db.push(
            SigEntry::new(
                EntryKind::VirtualThunk,
                "?update@Actor@@UEAAXXZ",
                Some(b"??_9Actor@@$BBA@AA".to_vec()),
                [0x40u8, 0x53],
                vec![SigOperation::Call],
            )
            .unwrap(),
        );
        db.push(
            SigEntry::new(EntryKind::Data, "?gInstance@@3PEAVGame@@EA", None, [0x48u8], vec![])
                .unwrap(),
        );
        let loaded = load(&mut encode(&db).as_slice(), v("1.21.50")).unwrap();
        assert_eq!(loaded, db);
    }

    #[test]
    fn test_base_format_drops_kind_and_thunk() {
        let mut db = SignatureDatabase::new(v("1.21.50"));
        db.push(
            SigEntry::new(EntryKind::VirtualThunk, "sym", Some(b"thunk".to_vec()), [0x40u8], vec![])
                .unwrap(),
        );
        let loaded = load(&mut encode(&db).as_slice(), v("1.21.50")).unwrap();
        let entry = &loaded.entries()[0];
        assert_eq!(entry.kind(), EntryKind::Function);
        assert_eq!(entry.extra_symbol(), None);
        assert_eq!(entry.symbol(), b"sym");
    }

    #[test]
    fn test_bad_magic_fails_first() {
        let mut bytes = encode(&sample(FormatVersion::V1_0_0));
        bytes[0] ^= 0xFF;
        let err = load(&mut bytes.as_slice(), v("1.30.0")).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::BadMagic { .. })), "{err:?}");
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let bytes = encode(&sample(FormatVersion::V1_0_0));
        let err = load(&mut bytes.as_slice(), v("1.21.60")).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::VersionMismatch {
                expected: 121_060,
                found: 121_050
            })
        ));
    }

    #[test]
    fn test_stored_empty_pattern_is_a_format_error() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        bytes.extend_from_slice(&121_050u64.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.push(b'a');
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&0u64.to_le_bytes());

        let err = load(&mut bytes.as_slice(), v("1.21.50")).unwrap_err();
        assert!(err.is_format(), "{err:?}");
        assert!(matches!(err, Error::Format(FormatError::InvalidEntry { .. })));
    }

    #[test]
    fn test_unknown_format_version_is_rejected() {
        let mut bytes = encode(&sample(FormatVersion::V1_0_0));
        bytes[4..8].copy_from_slice(&7i32.to_le_bytes());
        let err = load(&mut bytes.as_slice(), v("1.21.50")).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::UnsupportedFormatVersion(7))));
    }

    #[test]
    fn test_every_truncation_is_a_format_error() {
        let bytes = encode(&sample(FormatVersion::V1_0_0));
        for cut in 0..bytes.len() {
            let err = load(&mut &bytes[..cut], v("1.21.50")).unwrap_err();
            assert!(
                matches!(err, Error::Format(FormatError::Truncated { .. })),
                "cut at {cut}: {err:?}"
            );
        }
    }

    #[test]
    fn test_huge_length_does_not_allocate() {
        let mut bytes = encode(&SignatureDatabase::new(v("1.21.50")));
        bytes[16..24].copy_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        let err = load(&mut bytes.as_slice(), v("1.21.50")).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::Truncated { field: "symbol" })));
    }

    #[test]
    fn test_invalid_operation_type() {
        let mut db = SignatureDatabase::new(v("1.21.50"));
        db.push(SigEntry::function("s", [0x90u8], vec![SigOperation::Call]).unwrap());
        let mut bytes = encode(&db);
        let at = bytes.len() - 4;
        bytes[at..].copy_from_slice(&(-1i32).to_le_bytes());
        let err = load(&mut bytes.as_slice(), v("1.21.50")).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::InvalidOperation(-1))));
    }

    #[test]
    fn test_save_to_unwritable_path_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.sig.db");
        let err = save_to_path(&sample(FormatVersion::V1_0_0), &path).unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }), "{err:?}");
    }

    #[test]
    fn test_path_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bedrock_sigs.v1_21_50.sig.db");
        let db = sample(FormatVersion::V1_0_0);
        save_to_path(&db, &path).unwrap();
        assert_eq!(load_from_path(&path, v("1.21.50")).unwrap(), db);
    }
}
