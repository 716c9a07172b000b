//! Process-wide snippet cache.
//!
//! Built lazily on first access by scanning the configured source and running
//! the extractor over every annotated file. The build runs at most once per
//! `SnippetCache` instance; concurrent first callers await the same build.
//! The resulting catalog is immutable.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info, instrument, warn};

use crate::domain::{ChallengeEntry, FileMatch};
use crate::error::{Result, SnippetError};
use crate::extract::extract_file;
use crate::scanner::SnippetSource;

/// Snapshot of every challenge found in the scanned sources.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, Arc<ChallengeEntry>>,
    /// Keys whose region could not be paired, with the file that declared them.
    broken: HashMap<String, PathBuf>,
}

impl Catalog {
    pub fn from_files(files: &[FileMatch]) -> Self {
        let mut catalog = Catalog::default();
        for file in files {
            for (key, res) in extract_file(file) {
                if catalog.contains(&key) {
                    warn!(target: "snippet", %key, path = %file.path.display(), "Duplicate challenge key; keeping the first occurrence");
                    continue;
                }
                match res {
                    Ok(entry) => {
                        catalog.entries.insert(key, Arc::new(entry));
                    }
                    Err(e) => {
                        warn!(target: "snippet", %key, path = %file.path.display(), error = %e, "Broken code snippet boundaries");
                        catalog.broken.insert(key, file.path.clone());
                    }
                }
            }
        }
        catalog
    }

    pub fn get(&self, key: &str) -> Result<Arc<ChallengeEntry>> {
        if let Some(entry) = self.entries.get(key) {
            return Ok(entry.clone());
        }
        if self.broken.contains_key(key) {
            return Err(SnippetError::BrokenBoundary(key.to_string()));
        }
        Err(SnippetError::NotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key) || self.broken.contains_key(key)
    }

    /// All declared keys (including broken ones), sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().chain(self.broken.keys()).cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len() + self.broken.len()
    }
}

#[derive(Clone)]
pub struct SnippetCache {
    source: Arc<dyn SnippetSource>,
    catalog: Arc<OnceCell<Arc<Catalog>>>,
}

impl SnippetCache {
    pub fn new(source: Arc<dyn SnippetSource>) -> Self {
        Self {
            source,
            catalog: Arc::new(OnceCell::new()),
        }
    }

    /// The full catalog, building it on first use.
    pub async fn challenges(&self) -> Arc<Catalog> {
        self.catalog
            .get_or_init(|| self.build())
            .await
            .clone()
    }

    #[instrument(level = "info", skip(self))]
    async fn build(&self) -> Arc<Catalog> {
        let source = self.source.clone();
        let files = match tokio::task::spawn_blocking(move || source.annotated_files()).await {
            Ok(files) => files,
            Err(e) => {
                error!(target: "snippet", error = %e, "Snippet scan task failed; serving an empty catalog");
                Vec::new()
            }
        };
        let catalog = Catalog::from_files(&files);
        info!(target: "snippet", files = files.len(), challenges = catalog.len(), broken = catalog.broken.len(), "Snippet cache built");
        Arc::new(catalog)
    }

    pub async fn retrieve(&self, key: &str) -> Result<Arc<ChallengeEntry>> {
        self.challenges().await.get(key)
    }

    pub async fn keys(&self) -> Vec<String> {
        self.challenges().await.keys()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.challenges().await.contains(key)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source that counts how often it was scanned.
    pub(crate) struct StaticSource {
        files: Vec<FileMatch>,
        pub scans: AtomicUsize,
    }

    impl StaticSource {
        pub(crate) fn new(files: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                files: files
                    .iter()
                    .map(|(p, c)| FileMatch { path: PathBuf::from(p), content: c.to_string() })
                    .collect(),
                scans: AtomicUsize::new(0),
            })
        }
    }

    impl SnippetSource for StaticSource {
        fn annotated_files(&self) -> Vec<FileMatch> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            self.files.clone()
        }
    }

    pub(crate) const LOGIN: &str = "\
// vuln-code-snippet start loginAdmin
const q = `SELECT * FROM Users WHERE email = '${email}'` // vuln-code-snippet vuln-line loginAdmin
models.sequelize.query(q) // vuln-code-snippet neutral-line loginAdmin
// vuln-code-snippet end loginAdmin
";

    pub(crate) const BROKEN: &str = "\
// vuln-code-snippet start redirect brokenOne
check(url) // vuln-code-snippet vuln-line redirect
// vuln-code-snippet end redirect
";

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_calls_build_once() {
        let source = StaticSource::new(&[("routes/login.ts", LOGIN)]);
        let cache = SnippetCache::new(source.clone());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.keys().await })
            })
            .collect();
        for h in handles {
            assert_eq!(h.await.expect("join"), vec!["loginAdmin".to_string()]);
        }
        cache.retrieve("loginAdmin").await.expect("entry");
        assert_eq!(source.scans.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fresh_instances_do_not_share_state() {
        let a = SnippetCache::new(StaticSource::new(&[("a.ts", LOGIN)]));
        let b = SnippetCache::new(StaticSource::new(&[]));
        assert!(a.contains("loginAdmin").await);
        assert!(!b.contains("loginAdmin").await);
    }

    #[tokio::test]
    async fn broken_key_surfaces_on_retrieve_without_hiding_others() {
        let cache = SnippetCache::new(StaticSource::new(&[("routes/redirect.ts", BROKEN), ("routes/login.ts", LOGIN)]));

        assert_eq!(cache.keys().await, vec!["brokenOne", "loginAdmin", "redirect"]);
        assert_eq!(
            cache.retrieve("brokenOne").await.unwrap_err(),
            SnippetError::BrokenBoundary("brokenOne".into())
        );
        let redirect = cache.retrieve("redirect").await.expect("redirect");
        assert_eq!(redirect.snippet, "check(url)");
        let login = cache.retrieve("loginAdmin").await.expect("login");
        assert_eq!(login.vuln_lines, vec![1]);
        assert_eq!(login.neutral_lines, vec![2]);
    }

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let cache = SnippetCache::new(StaticSource::new(&[("routes/login.ts", LOGIN)]));
        assert_eq!(
            cache.retrieve("typo").await.unwrap_err(),
            SnippetError::NotFound("typo".into())
        );
    }

    #[test]
    fn first_occurrence_of_a_duplicate_key_wins() {
        let other = "// vuln-code-snippet start loginAdmin\nother()\n// vuln-code-snippet end loginAdmin\n";
        let files = vec![
            FileMatch { path: "a.ts".into(), content: LOGIN.into() },
            FileMatch { path: "b.ts".into(), content: other.into() },
        ];
        let catalog = Catalog::from_files(&files);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("loginAdmin").unwrap().snippet.starts_with("const q"));
    }
}
