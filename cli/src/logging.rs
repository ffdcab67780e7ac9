//! Console and log-file output for the CLI.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use indicatif::ProgressBar;
use log::LevelFilter;

/// Options for initializing the logger.
pub struct InitLogOpts<'a> {
    /// Directory receiving `docdown_{timestamp}.log`
    pub log_dir: &'a Path,
    /// Level for both console and file
    pub level: LevelFilter,
    /// Progress bar to keep intact while printing to the console
    pub progress: ProgressBar,
}

/// Writes every record to stderr and, when available, to the log file.
struct TeeWriter {
    file: Option<File>,
    progress: ProgressBar,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.progress.suspend(|| io::stderr().write_all(buf))?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

fn open_log_file(log_dir: &Path) -> io::Result<(PathBuf, File)> {
    fs::create_dir_all(log_dir)?;
    let name = format!("docdown_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
    let path = log_dir.join(name);
    let file = File::create(&path)?;
    Ok((path, file))
}

/// Install the global logger. Returns the log file path, or `None` when
/// the file could not be created (console logging still works).
///
/// `RUST_LOG` overrides `level`.
pub fn init_log(opts: InitLogOpts<'_>) -> Result<Option<PathBuf>, log::SetLoggerError> {
    let (path, file) = match open_log_file(opts.log_dir) {
        Ok((path, file)) => (Some(path), Some(file)),
        Err(e) => {
            eprintln!(
                "warning: cannot create log file in {}: {}",
                opts.log_dir.display(),
                e
            );
            (None, None)
        }
    };

    let writer = TeeWriter {
        file,
        progress: opts.progress,
    };

    env_logger::Builder::new()
        .filter_level(opts.level)
        .parse_default_env()
        .format(|f, record| {
            writeln!(
                f,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(writer)))
        .try_init()?;

    Ok(path)
}
