//! Property-based tests for the signature database codec
//!
//! These tests verify invariants that should hold for all inputs:
//! - Saving then loading reproduces every field in order
//! - Embedded 0x00 bytes and non-ASCII symbols survive untouched
//! - Any strict prefix of a valid buffer is rejected
//! - The base layout never carries entry kinds

use proptest::prelude::*;
use sigcodegen::{
    load, save, EntryKind, Error, FormatError, FormatVersion, SigEntry, SigOperation,
    SignatureDatabase, TargetVersion,
};

fn operation() -> impl Strategy<Value = SigOperation> {
    prop_oneof![
        Just(SigOperation::None),
        any::<i64>().prop_map(SigOperation::Disp),
        Just(SigOperation::Deref),
        Just(SigOperation::Call),
        Just(SigOperation::Move),
        Just(SigOperation::Lea),
    ]
}

fn entry_kind() -> impl Strategy<Value = EntryKind> {
    prop_oneof![
        Just(EntryKind::Function),
        Just(EntryKind::Data),
        Just(EntryKind::VirtualThunk),
        Just(EntryKind::CtorThunk),
        Just(EntryKind::DtorThunk),
    ]
}

/// Entries for the extended layout, any kind
fn entry() -> impl Strategy<Value = SigEntry> {
    (
        entry_kind(),
        prop::collection::vec(any::<u8>(), 0..40),
        prop::collection::vec(any::<u8>(), 1..40),
        prop::collection::vec(any::<u8>(), 1..64),
        prop::collection::vec(operation(), 0..6),
    )
        .prop_map(|(kind, symbol, extra, pattern, ops)| {
            let extra = kind.is_thunk().then_some(extra);
            SigEntry::new(kind, symbol, extra, pattern, ops).unwrap()
        })
}

/// Entries representable in the base layout
fn function_entry() -> impl Strategy<Value = SigEntry> {
    (
        prop::collection::vec(any::<u8>(), 0..40),
        prop::collection::vec(any::<u8>(), 1..64),
        prop::collection::vec(operation(), 0..6),
    )
        .prop_map(|(symbol, pattern, ops)| SigEntry::function(symbol, pattern, ops).unwrap())
}

fn target_version() -> impl Strategy<Value = TargetVersion> {
    (0u64..100, 0u64..1000)
        .prop_map(|(minor, patch)| TargetVersion::parse(&format!("1.{minor}.{patch}")).unwrap())
}

fn database(format: FormatVersion) -> BoxedStrategy<SignatureDatabase> {
    let entries = match format {
        FormatVersion::V1_0_0 => prop::collection::vec(function_entry(), 0..12).boxed(),
        FormatVersion::V1_1_0 => prop::collection::vec(entry(), 0..12).boxed(),
    };
    (target_version(), entries)
        .prop_map(move |(version, entries)| {
            let mut db = SignatureDatabase::with_format(version, format);
            for e in entries {
                db.push(e);
            }
            db
        })
        .boxed()
}

fn encode(db: &SignatureDatabase) -> Vec<u8> {
    let mut buf = Vec::new();
    save(db, &mut buf).unwrap();
    buf
}

proptest! {
    #[test]
    fn prop_base_layout_round_trips(db in database(FormatVersion::V1_0_0)) {
        let buf = encode(&db);
        let loaded = load(&mut buf.as_slice(), db.target_version()).unwrap();
        prop_assert_eq!(loaded, db);
    }

    #[test]
    fn prop_extended_layout_round_trips(db in database(FormatVersion::V1_1_0)) {
        let buf = encode(&db);
        let loaded = load(&mut buf.as_slice(), db.target_version()).unwrap();
        prop_assert_eq!(loaded, db);
    }

    #[test]
    fn prop_truncation_is_always_detected(
        db in database(FormatVersion::V1_1_0),
        cut in any::<prop::sample::Index>()
    ) {
        let buf = encode(&db);
        let len = cut.index(buf.len());
        let result = load(&mut &buf[..len], db.target_version());
        prop_assert!(
            matches!(result, Err(Error::Format(FormatError::Truncated { .. }))),
            "prefix of {} / {} bytes was accepted",
            len,
            buf.len()
        );
    }

    #[test]
    fn prop_other_target_versions_are_rejected(
        db in database(FormatVersion::V1_0_0),
        other in target_version()
    ) {
        prop_assume!(other != db.target_version());
        let buf = encode(&db);
        let result = load(&mut buf.as_slice(), other);
        prop_assert!(
            matches!(result, Err(Error::Format(FormatError::VersionMismatch { .. }))),
            "expected a version mismatch error"
        );
    }
}
