//! `relpub publish` - resolve the release, reconcile every asset onto it.

use std::path::PathBuf;

use relpub_engine::{publish, Progress, PublishSummary, ReleaseSpec, RetryPolicy};
use relpub_github_client::{ClientConfig, GithubClient};

use crate::exit_codes::{self, publish_exit_code};
use crate::{CliError, OutputFormat};

#[allow(clippy::too_many_arguments)]
pub fn cmd_publish(
    repo: String,
    tag: String,
    files: Vec<String>,
    target: String,
    notes: String,
    draft: bool,
    prerelease: bool,
    token: Option<String>,
    api_base: String,
    retry_limit: u32,
    output: Option<OutputFormat>,
    quiet: bool,
    debug: bool,
) -> Result<(), CliError> {
    let (owner, name) = parse_repo(&repo)?;

    let token = token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| CliError {
            code: exit_codes::EXIT_USAGE,
            message: "no API token provided".into(),
            hint: Some("pass --token or set GITHUB_TOKEN".into()),
        })?;

    let paths = expand_files(&files)?;

    let json_output = match output {
        Some(OutputFormat::Json) => true,
        Some(OutputFormat::Text) => false,
        None => !atty::is(atty::Stream::Stdout),
    };

    let client = GithubClient::new(ClientConfig {
        token,
        api_base: format!("{}/repos/{}/{}", api_base.trim_end_matches('/'), owner, name),
        debug,
    });

    let spec = ReleaseSpec {
        tag,
        target,
        body: notes,
        draft,
        prerelease,
    };
    let policy = RetryPolicy {
        limit: retry_limit,
        ..RetryPolicy::default()
    };
    let progress = if quiet {
        Progress::Silent
    } else {
        Progress::Stderr
    };

    let summary = publish(&client, &spec, &paths, &policy, progress).map_err(|e| CliError {
        code: publish_exit_code(&e),
        message: e.to_string(),
        hint: None,
    })?;

    print_summary(&summary, json_output);
    Ok(())
}

fn print_summary(summary: &PublishSummary, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("error: cannot serialize summary: {e}"),
        }
        return;
    }

    println!(
        "Published {} ({} asset(s), release id {})",
        summary.tag,
        summary.files.len(),
        summary.release_id
    );
    for file in &summary.files {
        if file.already_present {
            println!("  {} - already up to date", file.name);
        } else {
            println!("  {} - uploaded in {} attempt(s)", file.name, file.attempts);
        }
    }
}

/// Split `owner/repo`; both segments required and non-empty.
fn parse_repo(repo: &str) -> Result<(&str, &str), CliError> {
    let parts: Vec<&str> = repo.splitn(2, '/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || parts[1].contains('/') {
        return Err(CliError {
            code: exit_codes::EXIT_USAGE,
            message: format!("invalid repo format: '{repo}' (expected owner/repo)"),
            hint: Some("example: relpub publish acme/tool v1.0.0 dist/*".into()),
        });
    }
    Ok((parts[0], parts[1]))
}

/// Expand each file argument, preserving argument order. Arguments with
/// glob metacharacters go through the glob crate; plain paths pass
/// through untouched. A pattern matching nothing is an error, since a
/// silently empty publish hides typos.
fn expand_files(args: &[String]) -> Result<Vec<PathBuf>, CliError> {
    let mut paths = Vec::new();
    for arg in args {
        if arg.contains(['*', '?', '[']) {
            let entries = glob::glob(arg)
                .map_err(|e| CliError::usage(format!("invalid glob pattern '{arg}': {e}")))?;
            let before = paths.len();
            for entry in entries {
                let path = entry.map_err(|e| CliError {
                    code: exit_codes::EXIT_ERROR,
                    message: format!("cannot read {}: {}", e.path().display(), e),
                    hint: None,
                })?;
                paths.push(path);
            }
            if paths.len() == before {
                return Err(CliError::usage(format!(
                    "glob pattern '{arg}' matched no files"
                )));
            }
        } else {
            paths.push(PathBuf::from(arg));
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_valid() {
        let (owner, name) = parse_repo("acme/tool").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(name, "tool");
    }

    #[test]
    fn test_parse_repo_invalid() {
        for bad in ["acme", "/tool", "acme/", "", "a/b/c"] {
            let err = parse_repo(bad).unwrap_err();
            assert_eq!(err.code, exit_codes::EXIT_USAGE, "input: {bad:?}");
        }
    }

    #[test]
    fn test_expand_plain_paths_preserve_argument_order() {
        let args = vec!["b.txt".to_string(), "a.txt".to_string()];
        let paths = expand_files(&args).unwrap();
        assert_eq!(paths, vec![PathBuf::from("b.txt"), PathBuf::from("a.txt")]);
    }

    #[test]
    fn test_expand_glob_matches_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x-1.tar.gz"), b"1").unwrap();
        std::fs::write(dir.path().join("x-2.tar.gz"), b"2").unwrap();
        std::fs::write(dir.path().join("other.txt"), b"3").unwrap();

        let pattern = format!("{}/x-*.tar.gz", dir.path().display());
        let paths = expand_files(&[pattern]).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("x-"))
        }));
    }

    #[test]
    fn test_expand_glob_no_match_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/missing-*.zip", dir.path().display());
        let err = expand_files(&[pattern]).unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_USAGE);
        assert!(err.message.contains("matched no files"));
    }
}
