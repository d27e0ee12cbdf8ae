//! Persisted manifest with a single writer.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::ManifestFileError;
use crate::format::ManifestFormat;
use crate::model::{Manifest, NewEntry};
use crate::parse::parse;
use crate::rebuild;
use crate::serialize::serialize;

/// What to do when registering a path that is already in the manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Leave the manifest unchanged and report the existing binding.
    #[default]
    KeepExisting,
    /// Append another entry with a fresh binding.
    Append,
}

/// Result of [`ManifestFile::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Binding of the entry for the registered path.
    pub binding: u32,
    /// False when the path was already registered and the policy kept it.
    pub inserted: bool,
}

/// Manifest source file on disk.
///
/// All writes take an internal lock for the whole read-modify-write, so
/// registrations through one `ManifestFile` never lose each other's entries.
/// The new source is written to a temporary file next to the manifest and
/// renamed over it.
pub struct ManifestFile {
    path: PathBuf,
    format: ManifestFormat,
    policy: DuplicatePolicy,
    lock: Mutex<()>,
}

impl ManifestFile {
    /// Create a handle for the manifest at `path`. The file need not exist.
    #[must_use]
    pub fn new(path: PathBuf, format: ManifestFormat) -> Self {
        Self {
            path,
            format,
            policy: DuplicatePolicy::default(),
            lock: Mutex::new(()),
        }
    }

    /// Set the duplicate policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Manifest location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Manifest format.
    #[must_use]
    pub fn format(&self) -> &ManifestFormat {
        &self.format
    }

    /// Location of a copy kept when the manifest cannot be parsed.
    ///
    /// Generation `0` is `index.ts.bak`, later ones are `index.ts.bak.1`,
    /// `index.ts.bak.2` and so on.
    #[must_use]
    pub fn backup_path(&self, generation: u32) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".bak");
        if generation > 0 {
            name.push(format!(".{generation}"));
        }
        self.path.with_file_name(name)
    }

    /// Read the current manifest.
    ///
    /// A missing or unparseable file reads as an empty manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestFileError::Io`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<Manifest, ManifestFileError> {
        let source = self.read_source()?;
        Ok(crate::parse_lenient(&source, &self.format))
    }

    /// Register a document and persist the manifest.
    ///
    /// If the existing source cannot be parsed it is copied to the first
    /// unused [`backup_path`](Self::backup_path) and replaced by a manifest
    /// holding only the new entry.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestFileError::Io`] if reading, backing up or writing fails.
    pub fn register(&self, entry: &NewEntry) -> Result<Registration, ManifestFileError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut manifest = self.read_for_update()?;

        if self.policy == DuplicatePolicy::KeepExisting
            && let Some(existing) = manifest.find(&entry.path)
        {
            tracing::debug!(path = %entry.path, binding = existing.binding, "Already registered");
            return Ok(Registration {
                binding: existing.binding,
                inserted: false,
            });
        }

        let binding = manifest.push(entry);
        self.write(&serialize(&manifest, &self.format))?;

        tracing::info!(path = %entry.path, binding, "Registered document");
        Ok(Registration {
            binding,
            inserted: true,
        })
    }

    /// Replace the manifest with one generated from `paths`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestFileError::Io`] if writing fails.
    pub fn rebuild<I, S>(&self, paths: I) -> Result<Manifest, ManifestFileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let manifest = rebuild(paths, &self.format);
        self.write(&serialize(&manifest, &self.format))?;

        tracing::info!(entries = manifest.len(), path = %self.path.display(), "Rebuilt manifest");
        Ok(manifest)
    }

    fn read_source(&self) -> Result<String, ManifestFileError> {
        match fs::read_to_string(&self.path) {
            Ok(source) => Ok(source),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(ManifestFileError::io(&self.path, e)),
        }
    }

    /// Read and parse, backing up source that does not parse.
    fn read_for_update(&self) -> Result<Manifest, ManifestFileError> {
        let source = self.read_source()?;
        if source.trim().is_empty() {
            return Ok(Manifest::new());
        }

        match parse(&source, &self.format) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                let backup = self.back_up(&source)?;
                tracing::warn!(
                    error = %e,
                    backup = %backup.display(),
                    "Manifest unreadable, previous source saved and manifest restarted"
                );
                Ok(Manifest::new())
            }
        }
    }

    /// Write `source` to the first backup name not yet taken.
    fn back_up(&self, source: &str) -> Result<PathBuf, ManifestFileError> {
        for generation in 0..=u32::MAX {
            let backup = self.backup_path(generation);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&backup)
            {
                Ok(mut file) => {
                    file.write_all(source.as_bytes())
                        .map_err(|e| ManifestFileError::io(&backup, e))?;
                    return Ok(backup);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(ManifestFileError::io(&backup, e)),
            }
        }
        Err(ManifestFileError::io(
            self.backup_path(u32::MAX),
            std::io::ErrorKind::AlreadyExists.into(),
        ))
    }

    fn write(&self, source: &str) -> Result<(), ManifestFileError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| ManifestFileError::io(dir, e))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| ManifestFileError::io(dir, e))?;
        tmp.write_all(source.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| ManifestFileError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| ManifestFileError::io(&self.path, e.error))?;
        Ok(())
    }
}
