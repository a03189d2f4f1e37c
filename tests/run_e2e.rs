// tests/run_e2e.rs
// Full pass against a local board: fetch → filter → export → persist → rerun.

use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use job_radar::config::{ApiSite, HtmlSite};
use job_radar::export::{write_report, RunReport};
use job_radar::notify::{FileNotifier, Notifier};
use job_radar::{keywords, run_once, AppConfig, ConfigError, SeenStore};

const PAGE: &str = r#"
<div class="job"><h2>Site Reliability Engineer</h2><span class="company">Initech</span>
  <span class="location">Remote</span><p>Kubernetes, Terraform and AWS.</p>
  <a href="/jobs/sre">Apply</a></div>
<div class="job"><h2>Office Manager</h2><span class="company">Initech</span>
  <span class="location">Austin, TX</span><a href="/jobs/om">Apply</a></div>
"#;

async fn serve() -> String {
    let app = Router::new()
        .route("/board", get(|| async { Html(PAGE) }))
        .route(
            "/api",
            get(|| async {
                Json(json!([
                    {"title": "DevOps Engineer", "company": "Globex", "location": "Remote - US",
                     "url": "https://globex.test/devops", "description": "terraform everywhere"},
                    {"title": "DevOps Engineer", "company": "Globex", "location": "Remote - US",
                     "url": "https://globex.test/devops", "description": "terraform everywhere"}
                ]))
            }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(base: &str, dir: &std::path::Path) -> AppConfig {
    AppConfig {
        sites: vec![HtmlSite {
            name: "initech".into(),
            url: format!("{base}/board"),
            selector: "div.job".into(),
            kind: None,
        }],
        api_sites: vec![ApiSite {
            name: "globex".into(),
            kind: Default::default(),
            url: format!("{base}/api"),
            base_url: String::new(),
            method: "GET".into(),
            params: Default::default(),
            companies: vec![],
        }],
        resume_keywords: vec!["kubernetes".into(), "terraform".into(), "aws".into()],
        min_relevance_score: 0.3,
        seen_jobs_path: dir.join("seen.json"),
        export_dir: Some(dir.join("exports")),
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn second_run_reports_nothing_new() {
    let base = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&base, dir.path());
    cfg.validate().unwrap();
    let cancel = CancellationToken::new();

    let mut seen = SeenStore::load(&cfg.seen_jobs_path).unwrap();
    let first = run_once(&cfg, keywords::resolve_keywords(&cfg), &mut seen, &cancel)
        .await
        .unwrap();

    assert_eq!(first.stats.sources_succeeded, 2);
    assert_eq!(first.stats.total_found, 3);
    // the duplicate API entry counts as already seen
    assert_eq!(first.stats.new_found, 2);
    assert_eq!(first.stats.relevant_found, 2);
    let titles: Vec<_> = first.matches.iter().map(|m| m.posting.title.as_str()).collect();
    assert_eq!(titles, vec!["Site Reliability Engineer", "DevOps Engineer"]);
    assert_eq!(first.matches[0].relevance_score, 1.0);

    let report = RunReport::new(&first.stats, &first.results, &first.matches);
    let path = write_report(cfg.export_dir.as_deref().unwrap(), &report).unwrap();
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(exported["matches"].as_array().unwrap().len(), 2);

    let out = dir.path().join("report.txt");
    FileNotifier::new(out.clone())
        .notify(&first.matches, &first.stats)
        .await
        .unwrap();
    assert!(std::fs::read_to_string(&out).unwrap().contains("Initech"));

    seen.save().unwrap();

    let mut seen = SeenStore::load(&cfg.seen_jobs_path).unwrap();
    assert_eq!(seen.len(), 2);
    let second = run_once(&cfg, keywords::resolve_keywords(&cfg), &mut seen, &cancel)
        .await
        .unwrap();
    assert!(second.matches.is_empty());
    assert_eq!(second.stats.new_found, 0);
    assert_eq!(second.stats.total_found, 3);
}

#[tokio::test]
async fn empty_keyword_list_is_refused_before_fetching() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = AppConfig {
        resume_keywords: vec![],
        resume_path: Some(dir.path().join("cv.pdf")),
        ..config("http://127.0.0.1:9", dir.path())
    };
    // a resume path alone satisfies structural validation
    cfg.validate().unwrap();
    assert!(matches!(
        keywords::require_keywords(&cfg),
        Err(ConfigError::Invalid(_))
    ));

    let mut seen = SeenStore::in_memory();
    let err = run_once(&cfg, keywords::resolve_keywords(&cfg), &mut seen, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Invalid(_))
    ));
    assert!(seen.is_empty());
}
