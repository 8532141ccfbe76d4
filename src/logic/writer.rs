// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! First-stage archive writer.
//!
//! Streams every file of a [`SourceSet`] into a ZIP archive in enumeration
//! order and publishes a [`ProgressEvent`] after each entry.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use zip::ZipWriter;
use zip::write::FileOptions;

use crate::logic::error::PackError;
use crate::logic::eta::{CpuSampler, estimate_remaining};
use crate::models::{ArchiveEntry, CompressionFormat, ProgressEvent, SourceSet};

/// Entries at or above this size need ZIP64 headers.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Cooperative cancellation flag shared between the operator and a run.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Ask the running workflow to stop at the next checkpoint.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear a previous request before starting a new run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Totals reported after a successful write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteSummary {
    pub entries: usize,
    pub bytes_read: u64,
    pub elapsed: Duration,
}

/// Write `source` into a new archive at `dest`.
///
/// Parent directories for `dest` are created if missing. Entries are named by
/// their path relative to the source root and compressed with `format`.
/// `cancel` is polled between read chunks; on cancellation the entry in
/// flight is dropped, the entries already written are finalized, and the
/// partial archive stays on disk.
pub fn write_archive(
    source: &SourceSet,
    dest: &Path,
    format: CompressionFormat,
    cancel: &CancelFlag,
    cpu: &mut dyn CpuSampler,
    on_progress: &mut dyn FnMut(&ProgressEvent),
) -> Result<WriteSummary, PackError> {
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|err| {
            PackError::write(format!("Failed to create output directory {parent:?}"), err)
        })?;
    }

    let file = File::create(dest)
        .map_err(|err| PackError::write(format!("Failed to create archive {dest:?}"), err))?;
    let mut zip = ZipWriter::new(file);

    let total = source.len();
    tracing::info!(
        archive = %dest.display(),
        entries = total,
        format = format.label(),
        "compression started"
    );

    if source.is_empty() {
        tracing::warn!("source set is empty, writing an empty archive");
    }

    let start = Instant::now();
    let mut bytes_read = 0u64;
    for (idx, entry) in source.entries().iter().enumerate() {
        match write_entry(&mut zip, entry, format, cancel)? {
            Some(read) => bytes_read += read,
            None => return Err(cancelled(zip, idx, total)),
        }

        let processed = idx + 1;
        let remaining = total - processed;
        let elapsed = start.elapsed();
        let cpu_percent = cpu.sample_percent();
        on_progress(&ProgressEvent {
            processed,
            remaining,
            elapsed,
            cpu_percent,
            eta: estimate_remaining(elapsed, processed, remaining, cpu_percent),
            current: entry.name.clone(),
        });
    }

    zip.finish()?;
    let elapsed = start.elapsed();
    tracing::info!(entries = total, bytes_read, ?elapsed, "compression finished");

    Ok(WriteSummary {
        entries: total,
        bytes_read,
        elapsed,
    })
}

/// Copy one source file into the archive. Returns `None` when cancelled mid-entry.
fn write_entry(
    zip: &mut ZipWriter<File>,
    entry: &ArchiveEntry,
    format: CompressionFormat,
    cancel: &CancelFlag,
) -> Result<Option<u64>, PackError> {
    if cancel.is_cancelled() {
        return Ok(None);
    }

    let mut reader = File::open(&entry.path)
        .map_err(|err| PackError::write(format!("Failed to read source {:?}", entry.path), err))?;
    let size = reader.metadata().map(|m| m.len()).unwrap_or(0);

    let options: FileOptions<'_, ()> = FileOptions::default()
        .compression_method(format.method())
        .compression_level(format.level())
        .large_file(size >= ZIP64_THRESHOLD);
    zip.start_file(entry.name.as_str(), options)?;

    let mut written = 0u64;
    let mut buffer = vec![0u8; 256 * 1024];
    loop {
        if cancel.is_cancelled() {
            zip.abort_file()?;
            return Ok(None);
        }
        let read = reader
            .read(&mut buffer)
            .map_err(|err| PackError::write(format!("Failed to read from {:?}", entry.path), err))?;
        if read == 0 {
            break;
        }
        zip.write_all(&buffer[..read]).map_err(|err| {
            PackError::write(format!("Failed to write {} into archive", entry.name), err)
        })?;
        written += read as u64;
    }
    tracing::debug!(entry = %entry.name, bytes = written, "entry written");
    Ok(Some(written))
}

/// Finalize the entries already written and report the cancellation.
fn cancelled(zip: ZipWriter<File>, written: usize, total: usize) -> PackError {
    tracing::warn!(written, total, "compression cancelled by operator");
    if let Err(err) = zip.finish() {
        tracing::warn!(error = %err, "could not finalize partial archive");
    }
    PackError::Cancelled { written, total }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::io::Read;

    use tempfile::TempDir;

    use super::*;
    use crate::logic::enumerate::enumerate_files;
    use crate::logic::eta::FixedCpu;
    use crate::models::SelectionPolicy;

    fn make_source(dir: &Path, count: usize) -> SourceSet {
        for i in 0..count {
            let body = format!("frame data for clip {i}\n").repeat(i + 1);
            fs::write(dir.join(format!("clip{i:02}.mp4")), body).unwrap();
        }
        enumerate_files(dir, &SelectionPolicy::extensions(["mp4"])).unwrap()
    }

    fn read_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut data = Vec::new();
                file.read_to_end(&mut data).unwrap();
                (file.name().to_string(), data)
            })
            .collect()
    }

    #[test]
    fn writes_one_entry_per_source_in_order() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let set = make_source(src.path(), 4);
        let dest = out.path().join("nested").join("clips.zip");

        let mut events = Vec::new();
        let summary = write_archive(
            &set,
            &dest,
            CompressionFormat::Deflate,
            &CancelFlag::default(),
            &mut FixedCpu(0.0),
            &mut |e| events.push(e.clone()),
        )
        .unwrap();

        assert_eq!(summary.entries, 4);
        let entries = read_entries(&dest);
        let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["clip00.mp4", "clip01.mp4", "clip02.mp4", "clip03.mp4"]);

        // Round trip: every entry decompresses to the original bytes.
        for (name, data) in &entries {
            assert_eq!(data, &fs::read(src.path().join(name)).unwrap());
        }

        assert_eq!(events.len(), 4);
        assert_eq!(events[0].processed, 1);
        assert_eq!(events[0].remaining, 3);
        assert_eq!(events[3].remaining, 0);
        assert_eq!(events[3].eta, Duration::ZERO);
    }

    #[test]
    fn store_format_writes_stored_entries() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let set = make_source(src.path(), 2);
        let dest = out.path().join("clips.zip");

        write_archive(
            &set,
            &dest,
            CompressionFormat::Store,
            &CancelFlag::default(),
            &mut FixedCpu(0.0),
            &mut |_| {},
        )
        .unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let entry = archive.by_index(0).unwrap();
        assert_eq!(entry.compression(), zip::CompressionMethod::Stored);
    }

    #[test]
    fn cancellation_keeps_partial_archive() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let set = make_source(src.path(), 5);
        let dest = out.path().join("clips.zip");
        let cancel = CancelFlag::default();

        let err = write_archive(
            &set,
            &dest,
            CompressionFormat::Deflate,
            &cancel,
            &mut FixedCpu(0.0),
            &mut |e| {
                if e.processed == 2 {
                    cancel.cancel();
                }
            },
        )
        .unwrap_err();

        assert!(matches!(err, PackError::Cancelled { written: 2, total: 5 }));
        assert!(dest.exists(), "partial archive must not be deleted");
        let names: BTreeSet<_> = read_entries(&dest).into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            BTreeSet::from(["clip00.mp4".to_string(), "clip01.mp4".to_string()])
        );
    }

    #[test]
    fn unreadable_source_is_a_write_error() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let set = make_source(src.path(), 2);
        fs::remove_file(src.path().join("clip01.mp4")).unwrap();

        let err = write_archive(
            &set,
            &out.path().join("clips.zip"),
            CompressionFormat::Deflate,
            &CancelFlag::default(),
            &mut FixedCpu(0.0),
            &mut |_| {},
        )
        .unwrap_err();

        assert!(matches!(err, PackError::Write { .. }));
    }
}
