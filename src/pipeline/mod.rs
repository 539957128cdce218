//! End-to-end generation run.
//!
//! Phases run strictly in order: discover headers, keep the ones naming the
//! marker, populate every target version in parallel, emit per-version
//! artifacts, then write the sanitized SDK headers. Inside a phase, work is
//! one task per file on a fixed-size pool; a failing task is counted and
//! never stops its siblings.

pub mod emit;

use crate::annotation::{interpret_declaration, DeclarationResolver, ResolveRequest};
use crate::classifier::filter_files_by_token;
use crate::config::SigCodegenConfig;
use crate::errors::{Error, Result};
use crate::header::generate_sdk_headers;
use crate::io::{ensure_dir, find_headers};
use crate::observability::{RunStats, StatsSnapshot};
use crate::signature::{ExportStore, SigEntry};
use crate::version::TargetVersion;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub source_dirs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Requested versions as given by the user; each item may itself be a
    /// comma-separated list.
    pub versions: Vec<String>,
    pub resource_dir: Option<PathBuf>,
    pub config: SigCodegenConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: StatsSnapshot,
    pub versions: Vec<TargetVersion>,
    pub artifacts: Vec<PathBuf>,
    pub headers_written: usize,
}

impl RunSummary {
    /// Process exit status: the failure count, saturated to fit a byte.
    pub fn exit_code(&self) -> u8 {
        u8::try_from(self.stats.failures).unwrap_or(u8::MAX)
    }
}

pub struct Pipeline<'r, R: DeclarationResolver + ?Sized> {
    options: PipelineOptions,
    resolver: &'r R,
    store: ExportStore,
    stats: RunStats,
    pool: ThreadPool,
}

impl<'r, R: DeclarationResolver + ?Sized> Pipeline<'r, R> {
    pub fn new(options: PipelineOptions, resolver: &'r R) -> Result<Self> {
        options.config.validate()?;
        let format_version = options.config.output.format_version()?;
        let jobs = options.config.parallel.effective_jobs();
        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| Error::Configuration(format!("cannot start {jobs} worker threads: {e}")))?;

        Ok(Self {
            options,
            resolver,
            store: ExportStore::new(format_version),
            stats: RunStats::new(),
            pool,
        })
    }

    pub fn run(self) -> Result<RunSummary> {
        ensure_dir(&self.options.output_dir)?;
        let versions = self.target_versions();
        let config = &self.options.config;

        let headers = find_headers(&self.options.source_dirs, &config.header_extensions);
        self.stats.set_scanned(headers.len());
        if headers.is_empty() {
            return Err(Error::Validation("no header files found".to_string()));
        }
        info!("Found {} header files", headers.len());

        let started = Instant::now();
        let mut candidates = filter_files_by_token(&headers, &config.marker, &self.pool);
        candidates.sort();
        self.stats.set_retained(candidates.len());
        info!(
            "Retained {} / {} files ({:.3}s)",
            candidates.len(),
            headers.len(),
            started.elapsed().as_secs_f64()
        );

        if candidates.is_empty() {
            info!("No files contain {}. Nothing to do.", config.marker);
            return Ok(RunSummary {
                stats: self.stats.snapshot(),
                versions,
                ..RunSummary::default()
            });
        }

        for &version in &versions {
            self.store.register(version);
            self.populate(version, &candidates);
        }

        let Self {
            options,
            store,
            stats,
            pool,
            ..
        } = self;

        let databases = store.into_databases();
        let artifacts = emit::emit_all(
            &databases,
            &options.output_dir,
            &options.config.output,
            &stats,
        );

        let sdk_root = options.output_dir.join(&options.config.output.sdk_dir);
        let headers_written = match generate_sdk_headers(
            &options.source_dirs,
            &headers,
            &sdk_root,
            &options.config.marker,
            &pool,
        ) {
            Ok(report) => {
                stats.add_failures(report.failed);
                info!(
                    "Wrote {} SDK headers to {}",
                    report.written,
                    sdk_root.display()
                );
                report.written
            }
            Err(err) => {
                warn!("SDK header generation skipped: {err}");
                stats.record_failure();
                0
            }
        };

        Ok(RunSummary {
            stats: stats.snapshot(),
            versions,
            artifacts,
            headers_written,
        })
    }

    /// Valid requested versions in ascending order. Each unparsable item
    /// counts as one failure.
    fn target_versions(&self) -> Vec<TargetVersion> {
        let mut versions = BTreeSet::new();
        let items = self
            .options
            .versions
            .iter()
            .flat_map(|list| list.split(','))
            .map(str::trim)
            .filter(|item| !item.is_empty());
        for item in items {
            match TargetVersion::parse(item) {
                Some(version) => {
                    versions.insert(version);
                }
                None => {
                    warn!("Invalid target version: '{item}'");
                    self.stats.record_failure();
                }
            }
        }
        versions.into_iter().collect()
    }

    fn populate(&self, version: TargetVersion, candidates: &[PathBuf]) {
        info!("Processing for version: {version}");
        let started = Instant::now();
        let resource_dir = self.options.resource_dir.as_deref();

        self.pool.install(|| {
            candidates.par_iter().for_each(|file| {
                let request = ResolveRequest {
                    file,
                    target: version,
                    resource_dir,
                };
                match self.resolver.resolve(&request) {
                    Ok(decls) => {
                        let entries: Vec<SigEntry> = decls
                            .iter()
                            .flat_map(|decl| interpret_declaration(decl, version))
                            .collect();
                        self.stats.increment_resolved();
                        self.stats.add_entries(entries.len());
                        if !entries.is_empty() {
                            self.store.insert_all(version, entries);
                        }
                    }
                    Err(err) => {
                        warn!(%version, "{err}");
                        self.stats.record_failure();
                    }
                }
            });
        });

        info!(
            %version,
            entries = self.store.entry_count(version),
            "Resolved in {}ms",
            started.elapsed().as_millis()
        );
    }
}
