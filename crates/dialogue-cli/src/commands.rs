use anyhow::Context;
use clap::ArgMatches;
use dialogue_ingest::{ImportConfig, ImportFailure, ImportSuccess, Importer};
use dialogue_migrate::Migrator;
use dialogue_model::Project;
use dialogue_validate::{validate as validate_project, ValidationReport};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn file_path(args: &ArgMatches) -> anyhow::Result<&PathBuf> {
    args.get_one::<PathBuf>("file").context("missing file argument")
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8 text", path.display()))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ImportConfig> {
    let config = match path {
        Some(path) => ImportConfig::from_toml_file(path)?,
        None => ImportConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

/// `dialogue import <file>`
pub(crate) async fn import(args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let path = file_path(args)?;
    let config = load_config(args.get_one::<PathBuf>("config"))?;
    let raw = read_text(path)?;
    let origin = path.display().to_string();

    let result = Importer::new(config).import_project(raw, Some(&origin)).await;
    if args.get_flag("json") {
        let text = match &result {
            Ok(success) => serde_json::to_string_pretty(success)?,
            Err(failure) => serde_json::to_string_pretty(failure)?,
        };
        println!("{text}");
    } else {
        match &result {
            Ok(success) => print!("{}", import_summary(success)),
            Err(failure) => eprintln!("{}", failure_line(failure)),
        }
    }

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// `dialogue migrate <file> [-o out]`
pub(crate) fn migrate(args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let path = file_path(args)?;
    let document: serde_json::Value = serde_json::from_str(&read_text(path)?)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let outcome = Migrator::new()
        .migrate(&document)
        .with_context(|| format!("failed to migrate {}", path.display()))?;
    let text = outcome.project.to_json_pretty()?;

    match args.get_one::<PathBuf>("output") {
        Some(out) => {
            fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(
                "Wrote {} (migrated: {}, from {})",
                out.display(),
                outcome.was_migrated,
                outcome.from_version
            );
        }
        None => println!("{text}"),
    }
    Ok(ExitCode::SUCCESS)
}

/// `dialogue validate <file>`
pub(crate) fn validate(args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let path = file_path(args)?;
    let project = Project::from_json_str(&read_text(path)?)
        .with_context(|| format!("{} is not a current-schema project", path.display()))?;

    let report = validate_project(&project);
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report_text(&report));
    }

    Ok(if report.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn import_summary(success: &ImportSuccess) -> String {
    let info = &success.migration_info;
    let summary = &success.validation_summary;
    let mut out = String::new();
    out.push_str(&format!("Imported: {}\n", success.project.metadata.title));
    out.push_str(&format!(
        "Nodes: {}  Edges: {}  Tags: {}\n",
        success.project.nodes.len(),
        success.project.edges.len(),
        success.project.tags.len()
    ));
    if info.was_migrated {
        out.push_str(&format!("Migrated: {} -> {}\n", info.from_version, info.to_version));
    }
    out.push_str(&format!(
        "Valid: {}  ({} errors, {} warnings, {} info)\n",
        summary.is_valid, summary.error_count, summary.warning_count, summary.info_count
    ));
    out
}

fn failure_line(failure: &ImportFailure) -> String {
    format!("{}: {}", failure.error_code, failure.human_message)
}

fn report_text(report: &ValidationReport) -> String {
    let stats = &report.statistics;
    let mut out = String::new();
    out.push_str(&format!(
        "Valid: {}\nNodes: {}  Edges: {}  Roots: {}  Leaves: {}  Max depth: {}\n",
        report.is_valid,
        stats.node_count,
        stats.edge_count,
        stats.root_count,
        stats.leaf_count,
        stats.max_depth
    ));
    for finding in report.findings() {
        out.push_str(&format!("  {:<7} {}\n", format!("{:?}", finding.severity()), finding));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_test_utils::{legacy_greeting, npc_graph};
    use std::io::Write;

    fn matches(argv: &[&str]) -> ArgMatches {
        let all = crate::cli().try_get_matches_from(argv).unwrap();
        let (_, sub) = all.subcommand().unwrap();
        sub.clone()
    }

    fn temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn migrate_writes_current_project() {
        let input = temp_file(&legacy_greeting().to_string());
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");

        let args = matches(&[
            "dialogue",
            "migrate",
            input.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ]);
        assert_eq!(migrate(&args).unwrap(), ExitCode::SUCCESS);

        let project = Project::from_json_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(project.nodes.len(), 2);
        assert_eq!(project.metadata.migrated_from.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn validate_flags_invalid_project() {
        let project = npc_graph(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let input = temp_file(&project.to_json_pretty().unwrap());
        let args = matches(&["dialogue", "validate", input.path().to_str().unwrap()]);
        assert_eq!(validate(&args).unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn validate_rejects_legacy_document() {
        let input = temp_file(&legacy_greeting().to_string());
        let args = matches(&["dialogue", "validate", input.path().to_str().unwrap()]);
        assert!(validate(&args).is_err());
    }

    #[tokio::test]
    async fn import_uses_config_file() {
        let input = temp_file(&legacy_greeting().to_string());
        let config = temp_file("max_bytes = 16\n");
        let args = matches(&[
            "dialogue",
            "import",
            input.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
        ]);
        assert_eq!(import(&args).await.unwrap(), ExitCode::FAILURE);

        let args = matches(&["dialogue", "import", input.path().to_str().unwrap(), "--json"]);
        assert_eq!(import(&args).await.unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = matches(&["dialogue", "migrate", "/nonexistent/project.json"]);
        let err = migrate(&args).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn report_text_lists_findings() {
        let report = validate_project(&npc_graph(&["a"], &[("a", "ghost")]));
        let text = report_text(&report);
        assert!(text.starts_with("Valid: false"));
        assert!(text.contains("[EDGE_TARGET_MISSING]"));
        assert!(text.contains("[ORPHANED_NODES]"));
    }
}
