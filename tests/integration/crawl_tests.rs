//! Integration tests for the mirror engine
//!
//! Most tests serve Justia-shaped pages from an in-memory transport so that
//! failures, latency and interruptions can be scripted per URL. The last
//! tests use wiremock to run the same flow over real HTTP.

use async_trait::async_trait;
use lex_mirror::config::{Config, SiteConfig};
use lex_mirror::crawler::{Coordinator, FetchError, HttpTransport, RunStatus, Transport};
use lex_mirror::output::ProgressSnapshot;
use lex_mirror::targets::{build_targets, CrawlTarget, Mode, Selection, JURISDICTIONS};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALABAMA: &str = "https://law.justia.com/codes/alabama/2023/";
const ALASKA: &str = "https://law.justia.com/codes/alaska/2023/";

fn listing_page(links: &[(&str, &str)]) -> String {
    let items: String = links
        .iter()
        .map(|(href, text)| format!("<li><a href=\"{}\">{}</a></li>", href, text))
        .collect();
    format!(
        "<html><body><h1>Listing</h1><div class=\"codes-listing\"><ul>{}</ul></div></body></html>",
        items
    )
}

fn section_page(number: &str, text: &str) -> String {
    format!(
        "<html><body><h1>Section {number}</h1>\
         <div class=\"citation\"><span>Code § {number} (2023)</span></div>\
         <div id=\"codes-content\"><p>{text}</p></div></body></html>"
    )
}

/// In-memory site with scripted failures, latency and an optional interrupt
#[derive(Default)]
struct StubSite {
    pages: HashMap<String, String>,
    scripted: Mutex<HashMap<String, VecDeque<u16>>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    delay: Duration,
    interrupt: Mutex<Option<(String, CancellationToken)>>,
}

impl StubSite {
    fn page(mut self, url: &str, body: String) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    /// Serve `statuses` (one per request) before the real page
    fn fail(self, url: &str, statuses: &[u16]) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .insert(url.to_string(), statuses.iter().copied().collect());
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Cancel `token` when `url` is requested
    fn interrupt_on(&self, url: &str, token: CancellationToken) {
        *self.interrupt.lock().unwrap() = Some((url.to_string(), token));
    }

    fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
    }

    fn leaf_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.contains("/section-"))
            .count()
    }

    fn peak_leaf_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for StubSite {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let key = url.as_str().to_string();
        self.calls.lock().unwrap().push(key.clone());

        let leaf = key.contains("/section-");
        if leaf {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if leaf {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        if let Some((trigger, token)) = self.interrupt.lock().unwrap().as_ref() {
            if *trigger == key {
                token.cancel();
            }
        }

        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        if let Some(status) = scripted {
            return Err(FetchError::Status { url: key, status });
        }

        match self.pages.get(&key) {
            Some(body) => Ok(body.clone().into_bytes()),
            None => Err(FetchError::Status {
                url: key,
                status: 404,
            }),
        }
    }
}

/// Alabama: state → two titles → {2, 1} sections
fn with_alabama(site: StubSite) -> StubSite {
    site.page(
        ALABAMA,
        listing_page(&[
            ("/codes/alabama/2023/title-1/", "Title 1 - General Provisions"),
            ("/codes/alabama/2023/title-2/", "Title 2 - Agriculture"),
        ]),
    )
    .page(
        &format!("{}title-1/", ALABAMA),
        listing_page(&[("section-1-1/", "Section 1-1"), ("section-1-2/", "Section 1-2")]),
    )
    .page(
        &format!("{}title-2/", ALABAMA),
        listing_page(&[("section-2-1/", "Section 2-1")]),
    )
    .page(
        &format!("{}title-1/section-1-1/", ALABAMA),
        section_page("1-1", "Words importing the singular include the plural."),
    )
    .page(
        &format!("{}title-1/section-1-2/", ALABAMA),
        section_page("1-2", "This code takes effect on adoption."),
    )
    .page(
        &format!("{}title-2/section-2-1/", ALABAMA),
        section_page("2-1", "The department of agriculture is established."),
    )
}

/// Alaska: state → one title → one section
fn with_alaska(site: StubSite) -> StubSite {
    site.page(
        ALASKA,
        listing_page(&[("/codes/alaska/2023/title-1/", "Title 1")]),
    )
    .page(
        &format!("{}title-1/", ALASKA),
        listing_page(&[("section-1-1/", "Section 1-1")]),
    )
    .page(
        &format!("{}title-1/section-1-1/", ALASKA),
        section_page("1-1", "Alaska statutes."),
    )
}

fn test_config(root: &Path, workers: usize) -> Config {
    let mut config = Config::default();
    config.crawler.workers = workers;
    config.crawler.max_attempts = 3;
    config.crawler.backoff_base_ms = 1;
    config.crawler.backoff_max_ms = 4;
    config.output.root_dir = root.to_path_buf();
    config
}

fn targets(codes: &[&str], site: &SiteConfig) -> Vec<CrawlTarget> {
    let selected = Selection::Explicit(codes.iter().map(|c| c.to_string()).collect())
        .resolve(JURISDICTIONS)
        .unwrap();
    build_targets(&selected, Mode::Codes, site).unwrap()
}

fn alabama_file(root: &Path, rel: &str) -> PathBuf {
    root.join("codes/AL").join(rel)
}

/// Every regular file under `root`, relative, sorted
fn files_under(root: &Path) -> Vec<String> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().to_string_lossy().into_owned());
            }
        }
    }
    let mut out = Vec::new();
    if root.exists() {
        walk(root, root, &mut out);
    }
    out.sort();
    out
}

fn counts(snapshot: &ProgressSnapshot) -> (u64, u64, u64) {
    (snapshot.completed, snapshot.failed, snapshot.skipped_resumed)
}

#[tokio::test]
async fn test_mirrors_two_level_hierarchy() {
    let dir = tempdir().unwrap();
    let site = Arc::new(with_alabama(StubSite::default()));
    let config = test_config(dir.path(), 2);

    let coordinator = Coordinator::with_transport(config, site.clone());
    let report = coordinator.run(&targets(&["AL"], &SiteConfig::default())).await;

    assert_eq!(report.status(), RunStatus::Success);
    assert_eq!(report.targets.len(), 1);
    assert_eq!(report.targets[0].total_discovered, 3);
    assert_eq!(counts(&report.targets[0]), (3, 0, 0));
    assert_eq!(report.targets[0].index_failures, 0);

    assert_eq!(
        files_under(&dir.path().join("codes")),
        vec![
            "AL/title-1/section-1-1.txt",
            "AL/title-1/section-1-2.txt",
            "AL/title-2/section-2-1.txt",
        ]
    );

    let text = std::fs::read_to_string(alabama_file(dir.path(), "title-1/section-1-1.txt")).unwrap();
    assert!(text.starts_with("Section 1-1\nCitation: Code § 1-1 (2023)\n"));
    assert!(text.contains("Words importing the singular include the plural."));

    assert!(!dir.path().join("failed.tsv").exists());
}

#[tokio::test]
async fn test_second_run_dispatches_nothing() {
    let dir = tempdir().unwrap();
    let site = Arc::new(with_alabama(StubSite::default()));
    let selected = targets(&["AL"], &SiteConfig::default());

    let first = Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .run(&selected)
        .await;
    assert_eq!(first.status(), RunStatus::Success);
    let files_before = files_under(dir.path());
    let contents_before =
        std::fs::read_to_string(alabama_file(dir.path(), "title-2/section-2-1.txt")).unwrap();
    let leaf_calls_before = site.leaf_calls();

    let second = Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .run(&selected)
        .await;

    assert_eq!(second.status(), RunStatus::Success);
    assert_eq!(counts(&second.targets[0]), (0, 0, 3));
    assert_eq!(second.targets[0].dispatched(), 0);
    assert_eq!(site.leaf_calls(), leaf_calls_before);
    assert_eq!(files_under(dir.path()), files_before);
    assert_eq!(
        std::fs::read_to_string(alabama_file(dir.path(), "title-2/section-2-1.txt")).unwrap(),
        contents_before
    );
}

#[tokio::test]
async fn test_overwrite_fetches_everything_again() {
    let dir = tempdir().unwrap();
    let site = Arc::new(with_alabama(StubSite::default()));
    let selected = targets(&["AL"], &SiteConfig::default());

    Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .run(&selected)
        .await;
    let report = Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .overwrite(true)
        .run(&selected)
        .await;

    assert_eq!(counts(&report.targets[0]), (3, 0, 0));
    assert_eq!(site.leaf_calls(), 6);
}

#[tokio::test]
async fn test_empty_and_partial_files_are_fetched_again() {
    let dir = tempdir().unwrap();
    let empty = alabama_file(dir.path(), "title-1/section-1-1.txt");
    let stray_temp = alabama_file(dir.path(), "title-1/.section-1-2.txt.part");
    let complete = alabama_file(dir.path(), "title-2/section-2-1.txt");
    std::fs::create_dir_all(empty.parent().unwrap()).unwrap();
    std::fs::create_dir_all(complete.parent().unwrap()).unwrap();
    std::fs::write(&empty, "").unwrap();
    std::fs::write(&stray_temp, "Section 1-2\nhalf a docu").unwrap();
    std::fs::write(&complete, "kept from an earlier run").unwrap();

    let site = Arc::new(with_alabama(StubSite::default()));
    let report = Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .run(&targets(&["AL"], &SiteConfig::default()))
        .await;

    assert_eq!(report.status(), RunStatus::Success);
    assert_eq!(counts(&report.targets[0]), (2, 0, 1));
    assert!(std::fs::metadata(&empty).unwrap().len() > 0);
    assert!(std::fs::read_to_string(alabama_file(dir.path(), "title-1/section-1-2.txt"))
        .unwrap()
        .contains("This code takes effect on adoption."));
    assert!(!stray_temp.exists());
    assert_eq!(
        std::fs::read_to_string(&complete).unwrap(),
        "kept from an earlier run"
    );
    assert_eq!(site.calls_to(&format!("{}title-2/section-2-1/", ALABAMA)), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_is_bounded_by_worker_count() {
    let dir = tempdir().unwrap();
    let sections: Vec<(String, String)> = (1..=20)
        .map(|i| (format!("section-1-{}/", i), format!("Section 1-{}", i)))
        .collect();
    let links: Vec<(&str, &str)> = sections
        .iter()
        .map(|(href, text)| (href.as_str(), text.as_str()))
        .collect();

    let mut site = StubSite::default()
        .with_delay(Duration::from_millis(15))
        .page(ALABAMA, listing_page(&[("/codes/alabama/2023/title-1/", "Title 1")]))
        .page(&format!("{}title-1/", ALABAMA), listing_page(&links));
    for i in 1..=20 {
        site = site.page(
            &format!("{}title-1/section-1-{}/", ALABAMA, i),
            section_page(&format!("1-{}", i), "Text."),
        );
    }
    let site = Arc::new(site);

    let report = Coordinator::with_transport(test_config(dir.path(), 3), site.clone())
        .run(&targets(&["AL"], &SiteConfig::default()))
        .await;

    assert_eq!(counts(&report.targets[0]), (20, 0, 0));
    let peak = site.peak_leaf_concurrency();
    assert!(peak <= 3, "peak concurrency {} exceeds 3 workers", peak);
    assert!(peak >= 2, "workers never overlapped (peak {})", peak);
}

#[tokio::test]
async fn test_failing_document_is_isolated() {
    let dir = tempdir().unwrap();
    let broken = format!("{}title-1/section-1-2/", ALABAMA);
    let site = Arc::new(with_alaska(with_alabama(StubSite::default())).fail(&broken, &[404]));

    let report = Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .run(&targets(&["AL", "AK"], &SiteConfig::default()))
        .await;

    assert_eq!(report.status(), RunStatus::Failed);
    assert_eq!(counts(&report.targets[0]), (2, 1, 0));
    assert_eq!(counts(&report.targets[1]), (1, 0, 0));
    assert_eq!(site.calls_to(&broken), 1);
    assert!(!alabama_file(dir.path(), "title-1/section-1-2.txt").exists());
    assert!(dir.path().join("codes/AK/title-1/section-1-1.txt").is_file());

    let log = std::fs::read_to_string(dir.path().join("failed.tsv")).unwrap();
    let fields: Vec<&str> = log.trim_end().split('\t').collect();
    assert_eq!(&fields[1..], &["AL/codes", "network_permanent", broken.as_str()]);
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let dir = tempdir().unwrap();
    let flaky = format!("{}title-2/section-2-1/", ALABAMA);
    let site = Arc::new(with_alabama(StubSite::default()).fail(&flaky, &[503, 429]));

    let report = Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .run(&targets(&["AL"], &SiteConfig::default()))
        .await;

    assert_eq!(report.status(), RunStatus::Success);
    assert_eq!(counts(&report.targets[0]), (3, 0, 0));
    assert_eq!(site.calls_to(&flaky), 3);
}

#[tokio::test]
async fn test_exhausted_retries_fail_the_document() {
    let dir = tempdir().unwrap();
    let down = format!("{}title-2/section-2-1/", ALABAMA);
    let site = Arc::new(with_alabama(StubSite::default()).fail(&down, &[503; 10]));

    let report = Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .run(&targets(&["AL"], &SiteConfig::default()))
        .await;

    assert_eq!(report.status(), RunStatus::Failed);
    assert_eq!(counts(&report.targets[0]), (2, 1, 0));
    assert_eq!(site.calls_to(&down), 3);

    let log = std::fs::read_to_string(dir.path().join("failed.tsv")).unwrap();
    assert!(log.contains("\tnetwork_transient\t"));
}

#[tokio::test]
async fn test_unreadable_listing_skips_only_its_subtree() {
    let dir = tempdir().unwrap();
    let title_2 = format!("{}title-2/", ALABAMA);
    let site = Arc::new(with_alabama(StubSite::default()).fail(&title_2, &[404]));

    let report = Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .run(&targets(&["AL"], &SiteConfig::default()))
        .await;

    assert_eq!(report.status(), RunStatus::Failed);
    assert_eq!(counts(&report.targets[0]), (2, 0, 0));
    assert_eq!(report.targets[0].index_failures, 1);
    assert_eq!(site.calls_to(&format!("{}section-2-1/", title_2)), 0);
}

#[tokio::test]
async fn test_section_link_that_is_a_listing_is_expanded() {
    let dir = tempdir().unwrap();
    let title_1 = format!("{}title-1/", ALABAMA);
    let site = Arc::new(
        StubSite::default()
            .page(ALABAMA, listing_page(&[("/codes/alabama/2023/title-1/", "Title 1")]))
            .page(
                &title_1,
                listing_page(&[
                    ("section-1-1/", "Section 1-1"),
                    ("section-1-2/", "Sections 1-2 through 1-9"),
                    ("rules-of-construction/", "Rules of Construction"),
                ]),
            )
            .page(
                &format!("{}section-1-1/", title_1),
                section_page("1-1", "Definitions."),
            )
            .page(
                &format!("{}section-1-2/", title_1),
                listing_page(&[("section-1-2-1/", "Section 1-2-1")]),
            )
            .page(
                &format!("{}section-1-2/section-1-2-1/", title_1),
                section_page("1-2-1", "Nested under a section-looking listing."),
            )
            .page(
                &format!("{}rules-of-construction/", title_1),
                listing_page(&[("section-1-10/", "Section 1-10")]),
            )
            .page(
                &format!("{}rules-of-construction/section-1-10/", title_1),
                section_page("1-10", "Construction of statutes."),
            ),
    );

    let report = Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .run(&targets(&["AL"], &SiteConfig::default()))
        .await;

    assert_eq!(report.status(), RunStatus::Success);
    assert_eq!(report.targets[0].total_discovered, 3);
    assert_eq!(counts(&report.targets[0]), (3, 0, 0));
    assert_eq!(
        files_under(&dir.path().join("codes")),
        vec![
            "AL/title-1/rules-of-construction/section-1-10.txt",
            "AL/title-1/section-1-1.txt",
            "AL/title-1/section-1-2/section-1-2-1.txt",
        ]
    );
    assert!(!dir.path().join("failed.tsv").exists());
}

#[tokio::test]
async fn test_sibling_links_with_the_same_slug_get_separate_files() {
    let dir = tempdir().unwrap();
    let site = Arc::new(
        StubSite::default()
            .page(
                ALABAMA,
                listing_page(&[
                    ("/codes/alabama/2023/section-9", "Section 9"),
                    ("/codes/alabama/2023/section-9/", "Section 9 (amended)"),
                ]),
            )
            .page(&format!("{}section-9", ALABAMA), section_page("9", "Original text."))
            .page(&format!("{}section-9/", ALABAMA), section_page("9", "Amended text.")),
    );

    let report = Coordinator::with_transport(test_config(dir.path(), 2), site.clone())
        .run(&targets(&["AL"], &SiteConfig::default()))
        .await;

    assert_eq!(report.status(), RunStatus::Success);
    assert_eq!(counts(&report.targets[0]), (2, 0, 0));

    let files = files_under(&dir.path().join("codes"));
    assert_eq!(files.len(), 2);
    assert_eq!(files[1], "AL/section-9.txt");
    assert!(files[0].starts_with("AL/section-9-") && files[0].ends_with(".txt"));
    let texts: Vec<String> = files
        .iter()
        .map(|f| std::fs::read_to_string(dir.path().join("codes").join(f)).unwrap())
        .collect();
    assert!(texts.iter().any(|t| t.contains("Original text.")));
    assert!(texts.iter().any(|t| t.contains("Amended text.")));
}

#[tokio::test]
async fn test_interrupted_run_resumes_cleanly() {
    let dir = tempdir().unwrap();
    let site = Arc::new(with_alaska(with_alabama(StubSite::default())));
    let selected = targets(&["AL", "AK"], &SiteConfig::default());

    let coordinator = Coordinator::with_transport(test_config(dir.path(), 1), site.clone());
    site.interrupt_on(
        &format!("{}title-1/section-1-2/", ALABAMA),
        coordinator.cancellation_token(),
    );
    let first = coordinator.run(&selected).await;

    assert_eq!(first.status(), RunStatus::Interrupted);
    assert_eq!(first.targets.len(), 1);
    assert_eq!(site.calls_to(ALASKA), 0);
    for file in files_under(dir.path()) {
        if file.ends_with(".txt") {
            let len = std::fs::metadata(dir.path().join(&file)).unwrap().len();
            assert!(len > 0, "{} is empty", file);
        }
    }

    let second = Coordinator::with_transport(test_config(dir.path(), 1), site.clone())
        .run(&selected)
        .await;

    assert_eq!(second.status(), RunStatus::Success);
    let al = &second.targets[0];
    assert_eq!(al.completed + al.skipped_resumed, 3);
    assert!(al.skipped_resumed >= 1);
    assert_eq!(counts(&second.targets[1]), (1, 0, 0));
    let txt: Vec<String> = files_under(&dir.path().join("codes"))
        .into_iter()
        .filter(|f| f.ends_with(".txt"))
        .collect();
    assert_eq!(txt.len(), 4);
}

#[tokio::test]
async fn test_mirror_over_http() {
    let server = MockServer::start().await;
    let pages = [
        (
            "/codes/alabama/2023/",
            listing_page(&[("/codes/alabama/2023/title-1/", "Title 1")]),
        ),
        (
            "/codes/alabama/2023/title-1/",
            listing_page(&[("section-1-1/", "Section 1-1"), ("section-1-2/", "Section 1-2")]),
        ),
        (
            "/codes/alabama/2023/title-1/section-1-1/",
            section_page("1-1", "First."),
        ),
    ];
    for (route, body) in pages {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header_exists("user-agent"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/codes/alabama/2023/title-1/section-1-2/"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path(), 2);
    config.site.codes_base_url = server.uri();
    let selected = targets(&["AL"], &config.site);

    let report = Coordinator::new(config).unwrap().run(&selected).await;

    assert_eq!(report.status(), RunStatus::Failed);
    assert_eq!(counts(&report.targets[0]), (1, 1, 0));
    let text = std::fs::read_to_string(alabama_file(dir.path(), "title-1/section-1-1.txt")).unwrap();
    assert!(text.contains("First."));
}

#[tokio::test]
async fn test_http_status_classification() {
    let server = MockServer::start().await;
    for (route, status) in [("/ok", 200), ("/gone", 404), ("/busy", 503), ("/slow-down", 429)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string("body"))
            .mount(&server)
            .await;
    }

    let config = Config::default();
    let transport = HttpTransport::from_config(&config.user_agent, &config.crawler).unwrap();
    let url = |route: &str| Url::parse(&format!("{}{}", server.uri(), route)).unwrap();

    assert_eq!(transport.get(&url("/ok")).await.unwrap(), b"body");

    let gone = transport.get(&url("/gone")).await.unwrap_err();
    assert!(matches!(gone, FetchError::Status { status: 404, .. }));
    assert!(!gone.is_transient());

    assert!(transport.get(&url("/busy")).await.unwrap_err().is_transient());
    assert!(transport.get(&url("/slow-down")).await.unwrap_err().is_transient());
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = Config::default();
    let transport = HttpTransport::from_config(&config.user_agent, &config.crawler).unwrap();
    let err = transport
        .get(&Url::parse(&format!("http://127.0.0.1:{}/anything", port)).unwrap())
        .await
        .unwrap_err();

    assert!(err.is_transient());
}
