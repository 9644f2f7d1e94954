//! Content-addressed store of wall measurements.
//!
//! An entry is keyed by SHA-256 over the extractor tag (backend and model)
//! followed by the plan bytes; entries made by different models for the
//! same drawing never collide.

use costcorrect_types::{CacheError, Result, WallMeasurement};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

const ENTRY_EXTENSION: &str = "json";

/// Cache manager for extraction results
pub struct Cache {
    cache_dir: PathBuf,
}

impl Cache {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)
            .map_err(|e| CacheError::IoError(format!("{}: {}", cache_dir.display(), e)))?;
        Ok(Self { cache_dir })
    }

    /// Hex digest of `tag`, a NUL separator, then the plan contents (streamed)
    fn cache_key(plan_path: &Path, tag: &str) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(tag.as_bytes());
        hasher.update([0u8]);
        let mut reader = BufReader::new(File::open(plan_path)?);
        io::copy(&mut reader, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn entry_path(&self, plan_path: &Path, tag: &str) -> Result<PathBuf> {
        let key = Self::cache_key(plan_path, tag)?;
        Ok(self.cache_dir.join(key).with_extension(ENTRY_EXTENSION))
    }

    /// Cached measurement of `plan_path` made by the extractor tagged `tag`
    pub fn get(&self, plan_path: &Path, tag: &str) -> Result<Option<WallMeasurement>> {
        let entry = self.entry_path(plan_path, tag)?;
        if !entry.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&entry)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CacheError::Corrupted(format!("{}: {}", entry.display(), e)).into())
    }

    pub fn set(&self, plan_path: &Path, tag: &str, measurement: &WallMeasurement) -> Result<()> {
        let entry = self.entry_path(plan_path, tag)?;
        fs::write(&entry, serde_json::to_string_pretty(measurement)?)?;
        Ok(())
    }

    /// Paths of every stored entry
    fn entries(&self) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == ENTRY_EXTENSION) {
                entries.push(path);
            }
        }
        Ok(entries)
    }

    /// Remove every entry, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let entries = self.entries()?;
        for path in &entries {
            fs::remove_file(path)?;
        }
        Ok(entries.len())
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let entries = self.entries()?;
        let total_size_bytes = entries
            .iter()
            .filter_map(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .sum();

        Ok(CacheStats {
            entry_count: entries.len(),
            total_size_bytes,
            cache_dir: self.cache_dir.clone(),
        })
    }
}

#[derive(Debug)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_size_bytes: u64,
    pub cache_dir: PathBuf,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Measurement Cache")?;
        writeln!(f, "=================")?;
        writeln!(f, "Entries:    {}", self.entry_count)?;
        writeln!(f, "Total size: {:.2} KB", self.total_size_bytes as f64 / 1024.0)?;
        write!(f, "Location:   {}", self.cache_dir.display())
    }
}
