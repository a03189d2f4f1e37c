// tests/config_load.rs
use serial_test::serial;
use std::fs;

use job_radar::config::{ApiKind, SourceSpec, ENV_CONFIG_PATH, ENV_SMTP_PASSWORD};
use job_radar::{AppConfig, ConfigError};

const TOML_CFG: &str = r#"
resume_keywords = ["kubernetes", "terraform"]
min_relevance_score = 0.5
max_concurrency = 2

[[sites]]
name = "WeWorkRemotely"
url = "https://weworkremotely.test/categories/remote-devops-sysadmin-jobs"
selector = "li.feature"
type = "weworkremotely"

[[api_sites]]
name = "Remotive"
type = "api"
url = "https://remotive.test/api/remote-jobs"
params = { category = "devops" }

[[api_sites]]
name = "Greenhouse"
type = "greenhouse_api"
base_url = "https://boards-api.greenhouse.test/v1/boards"
companies = ["acme", "globex"]

[location]
countries = ["US", "Canada"]
exclude_countries = ["RU"]

[location.remote]
required = true
hybrid = true

[email]
enabled = true
smtp_host = "smtp.example.test"
from = "radar@example.test"
to = "me@example.test"
"#;

#[test]
#[serial]
fn toml_config_loads_with_env_password() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("radar.toml");
    fs::write(&path, TOML_CFG).unwrap();

    std::env::set_var(ENV_SMTP_PASSWORD, "hunter2");
    let cfg = AppConfig::load_from(&path).unwrap();
    std::env::remove_var(ENV_SMTP_PASSWORD);

    assert_eq!(cfg.email.password, "hunter2");
    assert_eq!(cfg.email.smtp_port, 587);
    assert_eq!(cfg.max_concurrency, 2);
    assert!(cfg.location.remote.required);
    assert!(cfg.location.remote.accept);

    let sources = cfg.sources();
    assert_eq!(sources.len(), 3);
    assert_eq!(sources[0].name(), "WeWorkRemotely");
    match &sources[2] {
        SourceSpec::Api(a) => {
            assert_eq!(a.kind, ApiKind::Greenhouse);
            assert_eq!(a.companies, vec!["acme", "globex"]);
        }
        other => panic!("expected api source, got {other:?}"),
    }
}

#[test]
#[serial]
fn env_path_wins_and_missing_target_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("radar.json");
    fs::write(
        &path,
        r#"{"sites":[{"name":"B","url":"https://b.test","selector":"li"}],
            "resume_keywords":["aws"]}"#,
    )
    .unwrap();

    std::env::set_var(ENV_CONFIG_PATH, &path);
    let cfg = AppConfig::load_default();
    std::env::set_var(ENV_CONFIG_PATH, dir.path().join("nope.toml"));
    let missing = AppConfig::load_default();
    std::env::remove_var(ENV_CONFIG_PATH);

    assert_eq!(cfg.unwrap().resume_keywords, vec!["aws"]);
    assert!(matches!(missing, Err(ConfigError::Invalid(_))));
}

#[test]
fn zero_sources_or_keywords_are_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let no_sources = dir.path().join("a.json");
    fs::write(&no_sources, r#"{"resume_keywords":["aws"]}"#).unwrap();
    assert!(matches!(
        AppConfig::load_from(&no_sources),
        Err(ConfigError::Invalid(_))
    ));

    let no_keywords = dir.path().join("b.json");
    fs::write(
        &no_keywords,
        r#"{"sites":[{"name":"B","url":"https://b.test","selector":"li"}]}"#,
    )
    .unwrap();
    assert!(matches!(
        AppConfig::load_from(&no_keywords),
        Err(ConfigError::Invalid(_))
    ));

    let broken = dir.path().join("c.toml");
    fs::write(&broken, "sites = [").unwrap();
    assert!(matches!(
        AppConfig::load_from(&broken),
        Err(ConfigError::Parse { .. })
    ));

    let yaml = dir.path().join("d.yaml");
    fs::write(&yaml, "sites: []").unwrap();
    assert!(matches!(
        AppConfig::load_from(&yaml),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn save_and_reload_round_trips_without_password() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.toml");
    fs::write(&src, TOML_CFG).unwrap();
    let mut cfg = AppConfig::load_from(&src).unwrap();
    cfg.email.password = "secret".into();

    let out = dir.path().join("out").join("radar.json");
    cfg.save_to(&out).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(!text.contains("secret"));

    let back = AppConfig::load_from(&out).unwrap();
    assert_eq!(back.sources(), cfg.sources());
    assert_eq!(back.location, cfg.location);
}
