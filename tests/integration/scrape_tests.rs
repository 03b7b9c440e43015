//! End-to-end batch tests

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use serde_json::{json, Value};
use sitetext::config::{Config, RunTarget, ScraperConfig};
use sitetext::output::to_result_json;
use sitetext::scrape::Coordinator;
use sitetext::ItemState;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted in `root` with the given work list
fn create_test_config(root: &TempDir, work_list: &Value) -> Config {
    let list_path = root.path().join("spider.json");
    std::fs::write(&list_path, work_list.to_string()).expect("Failed to write work list");

    let scraper = ScraperConfig {
        scraped_dir: root.path().join("scraped").display().to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..ScraperConfig::default()
    };

    Config::new(
        scraper,
        RunTarget::Named {
            output: "output".to_string(),
            work_list: list_path,
        },
    )
}

/// Builds an in-memory PDF with one page per entry of `pages`
fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for page_text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::from(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to save PDF");
    bytes
}

/// Shared in-memory sink for captured log output
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

async fn mount_html(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_failed_fetch_is_dropped_and_logged() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/one", "<p>Page one</p>").await;
    mount_html(&mock_server, "/three", "<p>Page three</p>").await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let failed_url = format!("{}/two", base_url);
    let root = TempDir::new().unwrap();
    let config = create_test_config(
        &root,
        &json!([
            {"url": format!("{}/one", base_url)},
            {"url": failed_url},
            {"url": format!("{}/three", base_url)},
        ]),
    );

    let report = Coordinator::new(config)
        .run()
        .await
        .expect("Run should not fail");

    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items[0].url(), format!("{}/one", base_url));
    assert_eq!(report.items[1].url(), format!("{}/three", base_url));
    assert_eq!(report.stats.count(ItemState::Done), 2);
    assert_eq!(report.stats.count(ItemState::FetchFailed), 1);

    let captured = logs.contents();
    assert!(
        captured.contains(&format!("Error downloading {}", failed_url)),
        "missing log line for failed URL in:\n{}",
        captured
    );
}

#[tokio::test]
async fn test_html_and_pdf_both_written_as_txt() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<html><body>
            <header><h1>Site</h1></header>
            <h2>Welcome</h2>
            <p>Hello <script>alert(1)</script>world</p>
        </body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(build_pdf(&["A", "B", "C"]), "application/pdf"))
        .mount(&mock_server)
        .await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(
        &root,
        &json!([
            {"url": format!("{}/", base_url)},
            {"url": format!("{}/files/report.pdf", base_url)},
        ]),
    );
    let output_dir = config.output_dir.clone();

    let report = Coordinator::new(config).run().await.unwrap();
    assert_eq!(report.items.len(), 2);

    let html_path = PathBuf::from(report.items[0].file_on_disk().unwrap());
    let pdf_path = PathBuf::from(report.items[1].file_on_disk().unwrap());

    for written in [&html_path, &pdf_path] {
        assert_eq!(written.parent(), Some(output_dir.as_path()));
        assert_eq!(written.extension().and_then(|e| e.to_str()), Some("txt"));
    }

    let html_name = html_path.file_name().unwrap().to_string_lossy().to_string();
    let pdf_name = pdf_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(html_name.starts_with("page_"));
    assert!(pdf_name.starts_with("report.pdf_"));

    let html_text = std::fs::read_to_string(&html_path).unwrap();
    assert_eq!(html_text, "Welcome Hello world");
    assert!(!html_text.contains("alert(1)"));

    assert_eq!(std::fs::read_to_string(&pdf_path).unwrap(), "ABC");
}

#[tokio::test]
async fn test_extra_fields_pass_through() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/docs", "<li>Item</li>").await;

    let url = format!("{}/docs", mock_server.uri());
    let root = TempDir::new().unwrap();
    let config = create_test_config(
        &root,
        &json!([{"title": "Docs", "url": url, "tags": ["a", "b"]}]),
    );

    let report = Coordinator::new(config).run().await.unwrap();
    let json = to_result_json(&report.items).unwrap();
    let parsed: Value = serde_json::from_str(&json).unwrap();

    let entry = &parsed[0];
    assert_eq!(entry["title"], "Docs");
    assert_eq!(entry["url"], Value::String(url));
    assert_eq!(entry["tags"], json!(["a", "b"]));
    assert!(entry["file_on_disk"].as_str().unwrap().ends_with(".txt"));

    let keys: Vec<_> = entry.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["title", "url", "tags", "file_on_disk"]);
    assert!(json.contains("\n    {\n        \"title\""));
}

#[tokio::test]
async fn test_same_url_gets_distinct_files() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/", "<p>Same page</p>").await;

    let entries: Vec<Value> = (0..20)
        .map(|_| json!({"url": format!("{}/", mock_server.uri())}))
        .collect();
    let root = TempDir::new().unwrap();
    let config = create_test_config(&root, &Value::Array(entries));
    let output_dir = config.output_dir.clone();

    let report = Coordinator::new(config).run().await.unwrap();
    assert_eq!(report.items.len(), 20);

    let names: HashSet<_> = report
        .items
        .iter()
        .map(|item| item.file_on_disk().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 20);
    assert_eq!(files_in(&output_dir).len(), 20);
}

#[tokio::test]
async fn test_rerun_archives_previous_output() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/a", "<p>Alpha</p>").await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(
        &root,
        &json!([{"url": format!("{}/a", mock_server.uri())}]),
    );
    let output_dir = config.output_dir.clone();

    let first = Coordinator::new(config.clone()).run().await.unwrap();
    assert!(first.archive.is_none());
    let first_file = PathBuf::from(first.items[0].file_on_disk().unwrap());
    assert!(first_file.exists());

    let second = Coordinator::new(config).run().await.unwrap();
    let archive = second.archive.expect("first run's output should be archived");

    assert_eq!(archive.parent(), output_dir.parent());
    let archive_name = archive.file_name().unwrap().to_string_lossy().to_string();
    assert!(archive_name.starts_with("output_"));
    assert!(archive_name.ends_with(".zip"));

    let zip = zip::ZipArchive::new(std::fs::File::open(&archive).unwrap()).unwrap();
    let first_name = first_file.file_name().unwrap().to_string_lossy().to_string();
    assert!(zip.file_names().any(|name| name == first_name));

    let second_file = PathBuf::from(second.items[0].file_on_disk().unwrap());
    assert!(!first_file.exists());
    assert_eq!(files_in(&output_dir), vec![second_file]);
}

#[tokio::test]
async fn test_unreachable_host_does_not_fail_run() {
    let root = TempDir::new().unwrap();
    let config = create_test_config(&root, &json!([{"url": "http://127.0.0.1:9/"}]));

    let report = Coordinator::new(config).run().await.unwrap();
    assert!(report.items.is_empty());
    assert_eq!(report.stats.count(ItemState::FetchFailed), 1);
}

#[tokio::test]
async fn test_single_worker_processes_everything() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/x", "<p>x</p>").await;

    let entries: Vec<Value> = (0..5)
        .map(|i| json!({"url": format!("{}/x", mock_server.uri()), "n": i}))
        .collect();
    let root = TempDir::new().unwrap();
    let mut config = create_test_config(&root, &Value::Array(entries));
    config.scraper.workers = 1;

    let report = Coordinator::new(config).run().await.unwrap();
    let order: Vec<_> = report
        .items
        .iter()
        .map(|item| item.get("n").and_then(Value::as_i64).unwrap())
        .collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);
}
