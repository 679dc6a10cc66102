//! Download strategies and the ordered fallback chain.
//!
//! Each [`Fetch`] implementation knows one way to turn a URL into a file.
//! [`FetchChain`] tries them in order per file; the first success wins.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

use crate::bail;
use crate::error::{ErrorExt, Result};
use crate::install::error::{InstallError, InstallResult};
use crate::utils::{fs, process};

const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(300);

/// Boxed future returned by [`Fetch::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// One way of downloading a URL to a local file.
pub trait Fetch: Send + Sync {
    /// Short name used in logs and error reports, e.g. `http` or `curl`.
    fn name(&self) -> &str;

    /// Download `url` into `dest`, overwriting it.
    ///
    /// Must fail on any non-success HTTP status.
    fn fetch<'a>(&'a self, url: &'a str, dest: &'a Path) -> FetchFuture<'a>;
}

/// Built-in HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(DOWNLOAD_CONNECT_TIMEOUT)
            .user_agent(concat!("relkit-install/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        log::debug!("GET {url}");
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .fs_context("creating download file", dest)?;
        let mut downloaded: u64 = 0;

        loop {
            let chunk = match timeout(DOWNLOAD_INACTIVITY_TIMEOUT, response.chunk()).await {
                Ok(Ok(Some(chunk))) => chunk,
                Ok(Ok(None)) => break,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => bail!(
                    "Download timeout: no data received for {} seconds from {} after {} bytes",
                    DOWNLOAD_INACTIVITY_TIMEOUT.as_secs(),
                    url,
                    downloaded
                ),
            };
            file.write_all(&chunk)
                .await
                .fs_context("writing download file", dest)?;
            downloaded += chunk.len() as u64;
        }

        file.flush().await.fs_context("flushing download file", dest)?;
        log::debug!("Downloaded {downloaded} bytes from {url}");
        Ok(())
    }
}

impl Fetch for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch<'a>(&'a self, url: &'a str, dest: &'a Path) -> FetchFuture<'a> {
        Box::pin(self.download(url, dest))
    }
}

/// External download program such as `curl`.
///
/// The child process is killed if the fetch future is dropped.
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    name: String,
    program: PathBuf,
}

impl CommandFetcher {
    /// `curl` from `PATH`, if installed.
    pub fn curl() -> Option<Self> {
        match which::which("curl") {
            Ok(program) => {
                log::debug!("Found curl at: {}", program.display());
                Some(Self {
                    name: "curl".to_string(),
                    program,
                })
            }
            Err(e) => {
                log::debug!("curl not found in PATH: {e}");
                None
            }
        }
    }

    fn arguments(&self, url: &str, dest: &Path) -> Vec<std::ffi::OsString> {
        let connect_timeout = DOWNLOAD_CONNECT_TIMEOUT.as_secs().to_string();
        let speed_time = DOWNLOAD_INACTIVITY_TIMEOUT.as_secs().to_string();
        let mut args: Vec<std::ffi::OsString> = [
            "--fail",
            "--silent",
            "--show-error",
            "--location",
            "--connect-timeout",
            connect_timeout.as_str(),
            "--speed-limit",
            "1",
            "--speed-time",
            speed_time.as_str(),
            "--output",
        ]
        .iter()
        .map(std::ffi::OsString::from)
        .collect();
        args.push(dest.as_os_str().to_owned());
        args.push(url.into());
        args
    }
}

impl Fetch for CommandFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch<'a>(&'a self, url: &'a str, dest: &'a Path) -> FetchFuture<'a> {
        Box::pin(async move {
            let args = self.arguments(url, dest);
            process::run_command(&self.program, &args, None).await?;
            Ok(())
        })
    }
}

/// Ordered list of fetch strategies.
pub struct FetchChain {
    fetchers: Vec<Box<dyn Fetch>>,
}

impl FetchChain {
    pub fn new(fetchers: Vec<Box<dyn Fetch>>) -> Self {
        Self { fetchers }
    }

    /// The built-in HTTP client first, then `curl` when it is installed.
    pub fn with_defaults() -> Result<Self> {
        let mut fetchers: Vec<Box<dyn Fetch>> = vec![Box::new(HttpFetcher::new()?)];
        if let Some(curl) = CommandFetcher::curl() {
            fetchers.push(Box::new(curl));
        }
        Ok(Self::new(fetchers))
    }

    pub fn names(&self) -> Vec<&str> {
        self.fetchers.iter().map(|f| f.name()).collect()
    }

    /// Download `url` to `dest` with the first strategy that succeeds.
    ///
    /// A strategy that fails has its partial output removed before the next
    /// one runs.
    ///
    /// # Errors
    ///
    /// [`InstallError::DownloadUnavailable`] listing every attempt when all
    /// strategies fail (or the chain is empty).
    pub async fn fetch(&self, url: &str, dest: &Path) -> InstallResult<()> {
        let mut attempts = Vec::with_capacity(self.fetchers.len());

        for fetcher in &self.fetchers {
            match fetcher.fetch(url, dest).await {
                Ok(()) => {
                    log::debug!("Fetched {url} with {}", fetcher.name());
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("{} could not fetch {url}: {e}", fetcher.name());
                    fs::remove_file(dest).await?;
                    attempts.push(format!("{}: {e}", fetcher.name()));
                }
            }
        }

        if attempts.is_empty() {
            attempts.push("no download client available".to_string());
        }
        Err(InstallError::DownloadUnavailable {
            url: url.to_string(),
            attempts,
        })
    }
}

impl std::fmt::Debug for FetchChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchChain")
            .field("fetchers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Writes fixed bytes, or fails, and counts calls.
    struct FakeFetcher {
        name: &'static str,
        body: Option<&'static [u8]>,
        calls: Arc<AtomicUsize>,
    }

    impl Fetch for FakeFetcher {
        fn name(&self) -> &str {
            self.name
        }

        fn fetch<'a>(&'a self, _url: &'a str, dest: &'a Path) -> FetchFuture<'a> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                std::fs::write(dest, b"partial").fs_context("writing", dest)?;
                match self.body {
                    Some(body) => {
                        std::fs::write(dest, body).fs_context("writing", dest)?;
                        Ok(())
                    }
                    None => bail!("connection refused"),
                }
            })
        }
    }

    fn fake(
        name: &'static str,
        body: Option<&'static [u8]>,
    ) -> (Box<dyn Fetch>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = FakeFetcher {
            name,
            body,
            calls: Arc::clone(&calls),
        };
        (Box::new(fetcher), calls)
    }

    #[tokio::test]
    async fn http_fetcher_streams_body_to_disk() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/download/relkit-linux-amd64.tar.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"tarball".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("relkit-linux-amd64.tar.gz");
        let url = format!("{}/latest/download/relkit-linux-amd64.tar.gz", server.uri());

        HttpFetcher::new().unwrap().fetch(&url, &dest).await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"tarball");
    }

    #[tokio::test]
    async fn http_fetcher_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.zip"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/missing.zip", server.uri());
        let result = HttpFetcher::new()
            .unwrap()
            .fetch(&url, &dir.path().join("missing.zip"))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn chain_falls_back_to_next_strategy() {
        let (first, first_calls) = fake("broken", None);
        let (second, second_calls) = fake("working", Some(&b"archive"[..]));
        let chain = FetchChain::new(vec![first, second]);

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.zip");
        chain.fetch("https://example.invalid/a.zip", &dest).await.unwrap();

        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(std::fs::read(&dest).unwrap(), b"archive");
    }

    #[tokio::test]
    async fn chain_stops_at_first_success() {
        let (first, _) = fake("working", Some(&b"archive"[..]));
        let (second, second_calls) = fake("unused", Some(&b"other"[..]));
        let chain = FetchChain::new(vec![first, second]);

        let dir = tempfile::tempdir().unwrap();
        chain
            .fetch("https://example.invalid/a.zip", &dir.path().join("a.zip"))
            .await
            .unwrap();

        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exhausted_chain_is_download_unavailable() {
        let (first, _) = fake("http", None);
        let (second, _) = fake("curl", None);
        let chain = FetchChain::new(vec![first, second]);

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.zip");
        let err = chain
            .fetch("https://example.invalid/a.zip", &dest)
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 6);
        match err {
            InstallError::DownloadUnavailable { url, attempts } => {
                assert_eq!(url, "https://example.invalid/a.zip");
                assert_eq!(attempts.len(), 2);
                assert!(attempts[0].starts_with("http:"));
                assert!(attempts[1].starts_with("curl:"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dest.exists(), "partial download left behind");
    }

    #[tokio::test]
    async fn empty_chain_is_download_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = FetchChain::new(Vec::new())
            .fetch("https://example.invalid/a.zip", &dir.path().join("a.zip"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn curl_arguments_fail_on_http_errors() {
        let curl = CommandFetcher {
            name: "curl".to_string(),
            program: PathBuf::from("curl"),
        };
        let args = curl.arguments("https://example.invalid/a.zip", Path::new("/tmp/a.zip"));
        assert_eq!(args.first().map(|a| a.as_os_str()), Some(std::ffi::OsStr::new("--fail")));
        assert_eq!(
            args.last().map(|a| a.as_os_str()),
            Some(std::ffi::OsStr::new("https://example.invalid/a.zip"))
        );
    }
}
