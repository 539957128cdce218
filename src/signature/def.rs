//! Linker export-definition (`.def`) output.

use super::database::SignatureDatabase;
use crate::errors::{Error, Result, ResultExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the export list for `db`: a `LIBRARY` header naming `module`,
/// then one line per symbol in insertion order. Thunk entries contribute
/// their extra symbol on the following line. Duplicates are written as-is.
pub fn write_def<W: Write>(db: &SignatureDatabase, module: &str, writer: &mut W) -> Result<usize> {
    writeln!(writer, "LIBRARY \"{module}\"")?;
    writeln!(writer, "EXPORTS")?;
    let mut exports = 0;
    for entry in db.entries() {
        for symbol in std::iter::once(entry.symbol()).chain(entry.extra_symbol()) {
            writer.write_all(b"    ")?;
            writer.write_all(symbol)?;
            writer.write_all(b"\n")?;
            exports += 1;
        }
    }
    writer.flush()?;
    Ok(exports)
}

/// Write the export list to `path`, returning the number of export lines.
pub fn write_def_file(db: &SignatureDatabase, module: &str, path: &Path) -> Result<usize> {
    let file = File::create(path).with_path("create", path)?;
    let mut writer = BufWriter::new(file);
    write_def(db, module, &mut writer).map_err(|err| match err {
        Error::Io(source) => Error::io_at("write", path, source),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{EntryKind, SigEntry};
    use crate::version::TargetVersion;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emits_header_and_symbols_in_order() {
        let mut db = SignatureDatabase::new(TargetVersion::parse("1.21.50").unwrap());
        db.push(SigEntry::function("?b@@YAXXZ", [0x90u8], vec![]).unwrap());
        db.push(
            SigEntry::new(
                EntryKind::VirtualThunk,
                "?update@Actor@@UEAAXXZ",
                Some(b"??_9Actor@@$BBA@AA".to_vec()),
                [0x40u8],
                vec![],
            )
            .unwrap(),
        );
        db.push(SigEntry::function("?b@@YAXXZ", [0xCCu8], vec![]).unwrap());

        let mut out = Vec::new();
        let count = write_def(&db, "Minecraft.Windows.exe", &mut out).unwrap();

        assert_eq!(count, 4);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            indoc! {r#"
                LIBRARY "Minecraft.Windows.exe"
                EXPORTS
                    ?b@@YAXXZ
                    ?update@Actor@@UEAAXXZ
                    ??_9Actor@@$BBA@AA
                    ?b@@YAXXZ
            "#}
        );
    }

    #[test]
    fn test_empty_database_has_only_header() {
        let db = SignatureDatabase::new(TargetVersion::parse("1.21.50").unwrap());
        let mut out = Vec::new();
        assert_eq!(write_def(&db, "game.exe", &mut out).unwrap(), 0);
        assert_eq!(out, b"LIBRARY \"game.exe\"\nEXPORTS\n");
    }
}
