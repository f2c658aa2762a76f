// SPDX-License-Identifier: MIT OR Apache-2.0

//! Artifact download into the cache root.
//!
//! [`ArtifactFetcher::ensure`] makes sure a named file exists in the cache,
//! downloading it at most once. Transfers are streamed in fixed-size chunks
//! into a temporary file next to the destination and renamed into place only
//! after the last byte arrived, so an interrupted download never looks like a
//! cache hit.

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::cache::CacheRoot;
use crate::config::{FetchConfig, DEFAULT_CHUNK_SIZE};
use crate::errors::{Error, Result};

/// Callback run on a freshly downloaded artifact.
pub type PostProcess<'a> = &'a dyn Fn(&Path) -> Result<()>;

/// An open download body.
pub struct Download {
    pub reader: Box<dyn Read>,
    /// Total size in bytes, when the server announced it
    pub content_length: Option<u64>,
}

/// Source of remote bytes.
pub trait Transport {
    /// Starts a transfer of `url`.
    fn open(&self, url: &str) -> Result<Download>;
}

/// HTTP(S) transport backed by a blocking `reqwest` client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a transport that gives up connecting after `connect_timeout`.
    ///
    /// There is no overall timeout: corpora can take hours to transfer.
    pub fn new(connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(None)
            .user_agent(concat!("wordvecs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::fetch("<client>", e))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn open(&self, url: &str) -> Result<Download> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::fetch(url, e))?;

        Ok(Download {
            content_length: response.content_length(),
            reader: Box::new(response),
        })
    }
}

/// Ensures remote artifacts exist in the cache root.
pub struct ArtifactFetcher {
    cache: CacheRoot,
    transport: Box<dyn Transport>,
    chunk_size: usize,
    show_progress: bool,
}

impl ArtifactFetcher {
    /// Creates a fetcher downloading over HTTP.
    pub fn new(cache: CacheRoot, config: &FetchConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.connect_timeout())?;
        Ok(Self::with_transport(cache, transport).with_chunk_size(config.chunk_size()))
    }

    /// Creates a fetcher with a custom transport.
    pub fn with_transport(cache: CacheRoot, transport: impl Transport + 'static) -> Self {
        Self {
            cache,
            transport: Box::new(transport),
            chunk_size: DEFAULT_CHUNK_SIZE,
            show_progress: false,
        }
    }

    /// Sets the number of bytes read per chunk.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Enables or disables the download progress bar.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The cache root artifacts are placed under.
    pub fn cache_root(&self) -> &CacheRoot {
        &self.cache
    }

    /// Returns the local path of `name`, downloading it from `url` first if
    /// it is missing, empty, or `force` is set.
    pub fn ensure(&self, name: impl AsRef<Path>, url: Option<&str>, force: bool) -> Result<PathBuf> {
        self.ensure_with(name, url, force, None)
    }

    /// Like [`ArtifactFetcher::ensure`], running `postprocess` after a
    /// successful download. The callback does not run on a cache hit.
    pub fn ensure_with(
        &self,
        name: impl AsRef<Path>,
        url: Option<&str>,
        force: bool,
        postprocess: Option<PostProcess<'_>>,
    ) -> Result<PathBuf> {
        let path = self.cache.path(name);

        if !force && is_cached(&path) {
            debug!("Cache hit for {}", path.display());
            return Ok(path);
        }

        let url = url.ok_or_else(|| Error::MissingArtifact { path: path.clone() })?;

        info!("Downloading from {} to {}", url, path.display());
        let bytes = self.download(url, &path)?;
        info!("Downloaded {} bytes to {}", bytes, path.display());

        if let Some(postprocess) = postprocess {
            postprocess(&path)?;
        }

        Ok(path)
    }

    /// Streams `url` into `dest`, returning the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let Download {
            mut reader,
            content_length,
        } = self.transport.open(url)?;

        let pb = self.progress_bar(content_length);
        let mut tmp = tempfile::Builder::new()
            .prefix(".download-")
            .tempfile_in(parent)?;

        let mut buf = vec![0u8; self.chunk_size];
        let mut written = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    pb.abandon();
                    return Err(Error::fetch(url, e));
                }
            };
            tmp.write_all(&buf[..n])?;
            written += n as u64;
            pb.inc(n as u64);
        }

        if let Some(expected) = content_length {
            if written != expected {
                pb.abandon();
                return Err(Error::fetch(
                    url,
                    format!("transfer ended after {} of {} bytes", written, expected),
                ));
            }
        }

        pb.finish_and_clear();
        persist(tmp, dest)?;
        Ok(written)
    }

    fn progress_bar(&self, len: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = match len {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::no_length(),
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} | Downloading {msg}")
                .expect("valid progress bar template")
                .progress_chars("##."),
        );
        pb
    }
}

/// Whether `path` is a non-empty regular file.
pub fn is_cached(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Flushes `tmp` to disk and atomically renames it to `dest`.
pub(crate) fn persist(tmp: NamedTempFile, dest: &Path) -> Result<()> {
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Cursor;
    use std::rc::Rc;
    use tempfile::tempdir;

    /// Serves fixed bytes and counts how often it was asked.
    struct MemoryTransport {
        body: Vec<u8>,
        calls: Rc<Cell<usize>>,
    }

    impl Transport for MemoryTransport {
        fn open(&self, _url: &str) -> Result<Download> {
            self.calls.set(self.calls.get() + 1);
            Ok(Download {
                content_length: Some(self.body.len() as u64),
                reader: Box::new(Cursor::new(self.body.clone())),
            })
        }
    }

    /// Yields a few bytes and then fails.
    struct BrokenTransport;

    struct BrokenReader {
        sent: bool,
    }

    impl Read for BrokenReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ));
            }
            self.sent = true;
            buf[..5].copy_from_slice(b"hello");
            Ok(5)
        }
    }

    impl Transport for BrokenTransport {
        fn open(&self, _url: &str) -> Result<Download> {
            Ok(Download {
                content_length: None,
                reader: Box::new(BrokenReader { sent: false }),
            })
        }
    }

    fn fetcher(root: &Path, body: &[u8]) -> (ArtifactFetcher, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let transport = MemoryTransport {
            body: body.to_vec(),
            calls: Rc::clone(&calls),
        };
        let fetcher =
            ArtifactFetcher::with_transport(CacheRoot::new(root).unwrap(), transport).with_chunk_size(4);
        (fetcher, calls)
    }

    #[test]
    fn ensure_downloads_once() {
        let dir = tempdir().unwrap();
        let (fetcher, calls) = fetcher(dir.path(), b"hello world!");

        let first = fetcher
            .ensure("hello.txt", Some("http://example.invalid/hello.txt"), false)
            .unwrap();
        let second = fetcher
            .ensure("hello.txt", Some("http://example.invalid/hello.txt"), false)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first, dir.path().join("hello.txt"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "hello world!");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn force_downloads_again() {
        let dir = tempdir().unwrap();
        let (fetcher, calls) = fetcher(dir.path(), b"data");

        fetcher.ensure("a.bin", Some("http://x/a"), false).unwrap();
        fetcher.ensure("a.bin", Some("http://x/a"), true).unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let (fetcher, _) = fetcher(dir.path(), b"zipped");

        let path = fetcher
            .ensure(Path::new("glove").join("twitter.zip"), Some("http://x/t.zip"), false)
            .unwrap();

        assert!(path.is_file());
        assert_eq!(path, dir.path().join("glove").join("twitter.zip"));
    }

    #[test]
    fn missing_url_for_missing_file_fails() {
        let dir = tempdir().unwrap();
        let (fetcher, calls) = fetcher(dir.path(), b"unused");

        let err = fetcher.ensure("absent.txt", None, false).unwrap_err();

        assert!(matches!(err, Error::MissingArtifact { .. }));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn existing_file_needs_no_url() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("local.txt"), "already here").unwrap();
        let (fetcher, calls) = fetcher(dir.path(), b"unused");

        let path = fetcher.ensure("local.txt", None, false).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "already here");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn empty_file_is_not_a_cache_hit() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();
        let (fetcher, calls) = fetcher(dir.path(), b"filled");

        let path = fetcher.ensure("empty.txt", Some("http://x/e"), false).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "filled");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn interrupted_transfer_leaves_nothing_behind() {
        let dir = tempdir().unwrap();
        let fetcher = ArtifactFetcher::with_transport(CacheRoot::new(dir.path()).unwrap(), BrokenTransport);

        let err = fetcher.ensure("partial.txt", Some("http://x/p"), false).unwrap_err();

        assert!(matches!(err, Error::Fetch { .. }));
        assert!(!dir.path().join("partial.txt").exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    /// Announces more bytes than it sends.
    struct ShortTransport;

    impl Transport for ShortTransport {
        fn open(&self, _url: &str) -> Result<Download> {
            Ok(Download {
                content_length: Some(100),
                reader: Box::new(Cursor::new(b"only ten b".to_vec())),
            })
        }
    }

    #[test]
    fn short_transfer_is_rejected() {
        let dir = tempdir().unwrap();
        let fetcher = ArtifactFetcher::with_transport(CacheRoot::new(dir.path()).unwrap(), ShortTransport)
            .with_chunk_size(4);

        let err = fetcher.ensure("short.txt", Some("http://x/s"), false).unwrap_err();

        assert!(matches!(err, Error::Fetch { .. }));
        assert!(!dir.path().join("short.txt").exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn postprocess_runs_only_after_download() {
        let dir = tempdir().unwrap();
        let (fetcher, _) = fetcher(dir.path(), b"payload");
        let runs = Cell::new(0);
        let hook = |path: &Path| -> Result<()> {
            assert!(path.is_file());
            runs.set(runs.get() + 1);
            Ok(())
        };

        fetcher
            .ensure_with("p.txt", Some("http://x/p"), false, Some(&hook))
            .unwrap();
        fetcher
            .ensure_with("p.txt", Some("http://x/p"), false, Some(&hook))
            .unwrap();

        assert_eq!(runs.get(), 1);
    }
}
