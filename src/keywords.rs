// src/keywords.rs
//! Candidate keyword list: configured keywords plus skills found in the resume.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use anyhow::Context as _;

use crate::config::AppConfig;
use crate::error::ConfigError;

/// Skills recognised in resume text. Order here is the order of extraction.
const SKILL_VOCABULARY: &[&str] = &[
    "linux",
    "windows server",
    "bash",
    "powershell",
    "python",
    "go",
    "golang",
    "rust",
    "java",
    "ruby",
    "aws",
    "azure",
    "gcp",
    "kubernetes",
    "k8s",
    "docker",
    "helm",
    "terraform",
    "ansible",
    "puppet",
    "chef",
    "jenkins",
    "gitlab ci",
    "github actions",
    "argocd",
    "prometheus",
    "grafana",
    "datadog",
    "elk",
    "nginx",
    "postgresql",
    "mysql",
    "redis",
    "kafka",
    "vmware",
    "ci/cd",
    "networking",
    "security",
];

// (skill, whole-word matcher). `\b` does not fire next to `/`, so edges are explicit.
static SKILL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SKILL_VOCABULARY
        .iter()
        .filter_map(|skill| {
            let pat = format!(r"(?i)(?:^|[^a-z0-9]){}(?:$|[^a-z0-9])", regex::escape(skill));
            Regex::new(&pat).ok().map(|re| (*skill, re))
        })
        .collect()
});

/// One keyword per line; commas also split. `#` comments and blank entries are skipped.
pub fn load_keywords_from_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read keywords {}", path.display()))?;
    Ok(parse_keyword_list(&text))
}

fn parse_keyword_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.split('#').next().unwrap_or_default())
        .flat_map(|l| l.split(','))
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Vocabulary skills mentioned in `text`, whole-word and case-insensitive.
pub fn extract_skills_from_text(text: &str) -> Vec<String> {
    SKILL_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(skill, _)| skill.to_string())
        .collect()
}

/// Configured keywords first, then anything the resume adds. A resume that cannot be
/// read is logged and skipped.
pub fn resolve_keywords(cfg: &AppConfig) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    push_unique(&mut out, cfg.resume_keywords.iter().cloned());

    if let Some(path) = cfg.resume_path.as_deref() {
        match keywords_from_resume(path) {
            Ok(found) => {
                tracing::info!(path = %path.display(), found = found.len(), "resume keywords loaded");
                push_unique(&mut out, found);
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "resume skipped"),
        }
    }
    out
}

/// [`resolve_keywords`], rejecting an empty result. A resume that yields nothing and an
/// empty `resume_keywords` list leave nothing to score against.
pub fn require_keywords(cfg: &AppConfig) -> Result<Vec<String>, ConfigError> {
    let kws = resolve_keywords(cfg);
    if kws.is_empty() {
        return Err(ConfigError::Invalid(
            "no keywords: resume_keywords is empty and the resume yielded none".into(),
        ));
    }
    Ok(kws)
}

fn keywords_from_resume(path: &Path) -> anyhow::Result<Vec<String>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("keywords") | Some("lst") => load_keywords_from_file(path),
        None | Some("txt") | Some("md") => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read resume {}", path.display()))?;
            Ok(extract_skills_from_text(&text))
        }
        // PDF/DOCX would need a document parser
        Some(other) => anyhow::bail!("unsupported resume format .{other}"),
    }
}

fn push_unique(out: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        let item = item.trim().to_string();
        if item.is_empty() {
            continue;
        }
        let lower = item.to_lowercase();
        if !out.iter().any(|k| k.to_lowercase() == lower) {
            out.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn skills_are_whole_word() {
        let got = extract_skills_from_text("Ran Kubernetes and Go services; built CI/CD. Google fan.");
        assert_eq!(got, vec!["go", "kubernetes", "ci/cd"]);
        assert!(extract_skills_from_text("ergonomics, chefs").is_empty());
    }

    #[test]
    fn keyword_list_skips_comments_and_blanks() {
        let got = parse_keyword_list("# header\nkubernetes, terraform\n\n aws # cloud\n,\n");
        assert_eq!(got, vec!["kubernetes", "terraform", "aws"]);
    }

    #[test]
    fn resume_skills_extend_configured_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "Linux admin. Terraform, AWS, Kubernetes.").unwrap();

        let cfg = AppConfig {
            resume_keywords: vec!["Kubernetes".into(), "helm".into()],
            resume_path: Some(path),
            ..AppConfig::default()
        };
        assert_eq!(
            resolve_keywords(&cfg),
            vec!["Kubernetes", "helm", "linux", "aws", "terraform"]
        );
    }

    #[test]
    fn unsupported_resume_is_skipped() {
        let cfg = AppConfig {
            resume_keywords: vec!["aws".into()],
            resume_path: Some("cv.pdf".into()),
            ..AppConfig::default()
        };
        assert_eq!(resolve_keywords(&cfg), vec!["aws"]);
    }

    #[test]
    fn unreadable_resume_alone_is_not_enough() {
        let cfg = AppConfig {
            resume_keywords: vec![" ".into()],
            resume_path: Some("cv.pdf".into()),
            ..AppConfig::default()
        };
        assert!(matches!(require_keywords(&cfg), Err(ConfigError::Invalid(_))));

        let cfg = AppConfig {
            resume_keywords: vec!["aws".into()],
            ..cfg
        };
        assert_eq!(require_keywords(&cfg).unwrap(), vec!["aws"]);
    }
}
