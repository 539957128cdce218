//! Declaration resolver backed by a front-end index file.
//!
//! The C++ front end writes `declarations.json` into the build directory:
//!
//! ```json
//! {
//!   "files": {
//!     "src/mc/MinecraftGame.h": [
//!       {
//!         "name": "MinecraftGame::init",
//!         "kind": "function",
//!         "symbol": "?init@MinecraftGame@@QEAAXXZ",
//!         "annotations": [["1.21.2", "\\x48\\x89\\x5C\\x00"]]
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! Annotation arguments are C string-literal bodies and are decoded with
//! [`decode_c_literal`]. Relative file keys are resolved against the
//! directory holding the index.

use super::literal::decode_c_literal;
use super::resolver::{Annotation, DeclKind, DeclarationResolver, ResolveRequest, ResolvedDecl};
use crate::errors::{Error, Result, ResultExt};
use crate::io::normalize_path;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const INDEX_FILE_NAME: &str = "declarations.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawKind {
    Function,
    Data,
    VirtualMethod,
}

#[derive(Debug, Deserialize)]
struct RawDecl {
    name: String,
    kind: RawKind,
    symbol: String,
    #[serde(default)]
    thunk_symbol: Option<String>,
    #[serde(default)]
    annotations: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawIndex {
    #[serde(default)]
    files: HashMap<PathBuf, Vec<RawDecl>>,
}

/// Serves declarations from a parsed index, keyed by normalized path.
///
/// Entries are decoded lazily per request so that one malformed
/// declaration only fails its own header.
///
/// The index is produced by an external front end that already resolved
/// every declaration, so [`ResolveRequest::resource_dir`] has no effect
/// here; it is only logged at debug level.
#[derive(Debug)]
pub struct IndexResolver {
    files: HashMap<PathBuf, Vec<RawDecl>>,
}

impl IndexResolver {
    /// Load `<build_dir>/declarations.json`.
    pub fn load(build_dir: &Path) -> Result<Self> {
        let path = build_dir.join(INDEX_FILE_NAME);
        let text = std::fs::read_to_string(&path).with_path("read declaration index", &path)?;
        let resolver = Self::from_json(&text, build_dir)?;
        info!(
            index = %path.display(),
            headers = resolver.files.len(),
            "Loaded declaration index"
        );
        Ok(resolver)
    }

    pub fn from_json(text: &str, base_dir: &Path) -> Result<Self> {
        let raw: RawIndex = serde_json::from_str(text)?;
        let files = raw
            .files
            .into_iter()
            .map(|(key, decls)| (normalize_path(&base_dir.join(key)), decls))
            .collect();
        Ok(Self { files })
    }

    pub fn header_count(&self) -> usize {
        self.files.len()
    }
}

impl DeclarationResolver for IndexResolver {
    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<Vec<ResolvedDecl>> {
        if let Some(dir) = request.resource_dir {
            debug!(resource_dir = %dir.display(), "resource directory is not used by the index");
        }
        let key = normalize_path(request.file);
        let raw = self
            .files
            .get(&key)
            .ok_or_else(|| {
                Error::task(request.file, "header is not present in the declaration index")
            })?;
        raw.iter()
            .map(|decl| convert(decl).map_err(|err| Error::task(request.file, err.to_string())))
            .collect()
    }
}

fn convert(raw: &RawDecl) -> Result<ResolvedDecl> {
    let kind = match raw.kind {
        RawKind::Function => DeclKind::Function,
        RawKind::Data => DeclKind::Data,
        RawKind::VirtualMethod => {
            let thunk = raw.thunk_symbol.as_deref().unwrap_or_default();
            if thunk.is_empty() {
                return Err(Error::Validation(format!(
                    "virtual method {} has no thunk symbol",
                    raw.name
                )));
            }
            DeclKind::VirtualMethod {
                thunk_symbol: thunk.as_bytes().to_vec(),
            }
        }
    };

    let annotations = raw
        .annotations
        .iter()
        .map(|args| {
            args.iter()
                .map(|arg| decode_c_literal(arg))
                .collect::<Result<Vec<_>>>()
                .map(|args| Annotation { args })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ResolvedDecl {
        name: raw.name.clone(),
        kind,
        symbol: raw.symbol.as_bytes().to_vec(),
        annotations,
    })
}
