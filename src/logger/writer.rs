//! Size-rotating file writer used by the file layer

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use jiff::Zoned;
use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::{FileConfig, RotationConfig};

/// File writer with size-based rotation.
///
/// When a write fails the writer switches to stderr for the rest of the
/// process so log lines are never silently lost.
pub struct RotatingFileWriter {
    state: Arc<Mutex<WriterState>>,
    path: PathBuf,
    rotation: RotationConfig,
}

struct WriterState {
    file: BufWriter<File>,
    current_size: u64,
    fallback_mode: bool,
}

impl RotatingFileWriter {
    pub fn new(config: &FileConfig) -> io::Result<Self> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = open_log_file(&config.path, config.append)?;
        let current_size = if config.append {
            fs::metadata(&config.path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                file,
                current_size,
                fallback_mode: false,
            })),
            path: config.path.clone(),
            rotation: config.rotation.clone(),
        })
    }

    pub fn is_in_fallback_mode(&self) -> bool {
        self.state.lock().map(|s| s.fallback_mode).unwrap_or(false)
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriterGuard {
            state: self.state.clone(),
            path: self.path.clone(),
            rotation: self.rotation.clone(),
        }
    }
}

/// Per-event handle; flushes the shared buffer on drop.
pub struct RotatingWriterGuard {
    state: Arc<Mutex<WriterState>>,
    path: PathBuf,
    rotation: RotationConfig,
}

impl Write for RotatingWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("Failed to acquire writer lock"))?;

        if state.fallback_mode {
            return io::stderr().write(buf);
        }

        if self.rotation.should_rotate(state.current_size) {
            if let Err(e) = self.rotate(&mut state) {
                return fall_back(&mut state, buf, e);
            }
        }

        match state.file.write(buf) {
            Ok(written) => {
                state.current_size += written as u64;
                Ok(written)
            }
            Err(e) => fall_back(&mut state, buf, e),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("Failed to acquire writer lock"))?;

        if state.fallback_mode {
            return io::stderr().flush();
        }
        state.file.flush()
    }
}

impl RotatingWriterGuard {
    fn rotate(&self, state: &mut WriterState) -> io::Result<()> {
        state.file.flush()?;
        rotate_file(&self.path, self.rotation.max_files)?;
        state.file = open_log_file(&self.path, false)?;
        state.current_size = 0;
        Ok(())
    }
}

impl Drop for RotatingWriterGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            let _ = state.file.flush();
        }
    }
}

fn fall_back(state: &mut WriterState, buf: &[u8], error: io::Error) -> io::Result<usize> {
    state.fallback_mode = true;
    eprintln!("[logger] file write failed, falling back to stderr: {}", error);
    io::stderr().write(buf)
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;

    Ok(BufWriter::new(file))
}

/// Renames the active file to `<stem>.<timestamp>.<ext>` and prunes old backups.
pub(crate) fn rotate_file(path: &Path, max_files: usize) -> io::Result<()> {
    if path.exists() {
        fs::rename(path, backup_path(path))?;
    }
    prune_backups(path, max_files)
}

fn backup_path(base: &Path) -> PathBuf {
    let stamp = Zoned::now().strftime("%Y%m%d_%H%M%S").to_string();
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    let ext = base.extension().map(|e| e.to_string_lossy());

    let name_for = |suffix: &str| match &ext {
        Some(ext) => format!("{}.{}{}.{}", stem, stamp, suffix, ext),
        None => format!("{}.{}{}", stem, stamp, suffix),
    };

    let mut candidate = base.with_file_name(name_for(""));
    let mut n = 1;
    while candidate.exists() {
        candidate = base.with_file_name(name_for(&format!("-{}", n)));
        n += 1;
    }
    candidate
}

/// Keeps at most `max_files` backups next to `base`, oldest removed first.
fn prune_backups(base: &Path, max_files: usize) -> io::Result<()> {
    let parent = match base.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let prefix = format!("{}.", base.file_stem().unwrap_or_default().to_string_lossy());

    let mut backups: Vec<(std::time::SystemTime, PathBuf)> = fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.as_path() != base
                && p.file_name()
                    .map(|n| n.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
        })
        .map(|p| {
            let modified = fs::metadata(&p)
                .and_then(|m| m.modified())
                .unwrap_or(std::time::UNIX_EPOCH);
            (modified, p)
        })
        .collect();

    backups.sort();

    let excess = backups.len().saturating_sub(max_files);
    for (_, path) in backups.into_iter().take(excess) {
        fs::remove_file(path)?;
    }
    Ok(())
}
