//! File-backed record source

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tagfix_core::{RecordSource, RecordStream, SourceError, SourceResult, TagRecord};
use tracing::{debug, info, warn};

use crate::parse::{parse_line, CsvOptions};

/// Line counters from the most recent pass over the files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvStats {
    pub files: usize,
    pub parsed: usize,
    pub skipped: usize,
}

/// Reads one or more catalogue exports, in the order given.
///
/// Records come out in file order, then line order. Malformed lines are
/// logged and skipped. A file that cannot be opened or read ends the stream
/// with [`SourceError::Io`], so the build fails and the previous snapshot
/// stays published.
#[derive(Debug, Clone)]
pub struct CsvSource {
    paths: Vec<PathBuf>,
    options: CsvOptions,
    stats: CsvStats,
}

impl CsvSource {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_options(paths, CsvOptions::default())
    }

    pub fn with_options<I, P>(paths: I, options: CsvOptions) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            options,
            stats: CsvStats::default(),
        }
    }

    /// Counters from the last stream, updated as it is consumed.
    pub fn stats(&self) -> CsvStats {
        self.stats
    }
}

impl RecordSource for CsvSource {
    fn records(&mut self) -> SourceResult<RecordStream<'_>> {
        self.stats = CsvStats::default();
        Ok(Box::new(CsvRecords {
            paths: &self.paths,
            options: &self.options,
            stats: &mut self.stats,
            next_file: 0,
            current: None,
            buf: Vec::new(),
            done: false,
        }))
    }
}

struct OpenFile<'a> {
    path: &'a Path,
    reader: BufReader<File>,
    line_no: usize,
}

struct CsvRecords<'a> {
    paths: &'a [PathBuf],
    options: &'a CsvOptions,
    stats: &'a mut CsvStats,
    next_file: usize,
    current: Option<OpenFile<'a>>,
    buf: Vec<u8>,
    done: bool,
}

impl CsvRecords<'_> {
    fn fail(&mut self, path: &Path, err: io::Error) -> Option<SourceResult<TagRecord>> {
        self.done = true;
        self.current = None;
        Some(Err(SourceError::Io(io::Error::new(
            err.kind(),
            format!("{}: {err}", path.display()),
        ))))
    }
}

impl Iterator for CsvRecords<'_> {
    type Item = SourceResult<TagRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            let Some(file) = self.current.as_mut() else {
                let Some(path) = self.paths.get(self.next_file) else {
                    self.done = true;
                    return None;
                };
                self.next_file += 1;
                match File::open(path) {
                    Ok(f) => {
                        debug!(path = %path.display(), "Reading catalogue file");
                        self.stats.files += 1;
                        self.current = Some(OpenFile {
                            path,
                            reader: BufReader::new(f),
                            line_no: 0,
                        });
                    }
                    Err(e) => return self.fail(path, e),
                }
                continue;
            };

            self.buf.clear();
            match file.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    info!(
                        path = %file.path.display(),
                        lines = file.line_no,
                        parsed = self.stats.parsed,
                        skipped = self.stats.skipped,
                        "Finished catalogue file"
                    );
                    self.current = None;
                }
                Ok(_) => {
                    file.line_no += 1;
                    let line = String::from_utf8_lossy(&self.buf);
                    match parse_line(&line, self.options) {
                        Ok(Some(record)) => {
                            self.stats.parsed += 1;
                            return Some(Ok(record));
                        }
                        Ok(None) => {}
                        Err(e) => {
                            self.stats.skipped += 1;
                            warn!(
                                path = %file.path.display(),
                                line = file.line_no,
                                error = %e,
                                "Skipping malformed catalogue line"
                            );
                        }
                    }
                }
                Err(e) => {
                    let path = file.path;
                    return self.fail(path, e);
                }
            }
        }
    }
}
