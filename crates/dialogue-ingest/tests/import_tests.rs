use dialogue_ingest::{ImportConfig, ImportDetail, ImportErrorCode, Importer};
use dialogue_model::NodeType;
use dialogue_test_utils::{legacy_chain, legacy_greeting, npc_graph};
use dialogue_validate::FindingCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::time::Duration;

fn isolated() -> Importer {
    Importer::new(ImportConfig::default())
}

fn in_process() -> Importer {
    Importer::new(ImportConfig::default().with_isolation(false))
}

#[tokio::test]
async fn legacy_greeting_imports_cleanly() {
    let text = legacy_greeting().to_string();
    let success = isolated().import_project(text, Some("greeting.json")).await.unwrap();

    let project = &success.project;
    assert_eq!(project.schema_version, "2.0.0");
    assert_eq!(project.nodes.len(), 2);
    assert_eq!(project.nodes[0].node_type, NodeType::NpcDialog);
    assert_eq!(project.nodes[1].node_type, NodeType::PlayerResponse);
    assert_eq!(project.edges.len(), 1);
    assert!(success.migration_info.was_migrated);
    assert!(success.validation_summary.is_valid);
    assert_eq!(success.validation_summary.error_count, 0);
}

#[tokio::test]
async fn current_project_passes_through_unmigrated() {
    let project = npc_graph(&["a", "b"], &[("a", "b")]);
    let text = project.to_json_pretty().unwrap();
    let success = isolated().import_project(text, None).await.unwrap();

    assert!(!success.migration_info.was_migrated);
    assert_eq!(success.migration_info.from_version, "2.0.0");
    assert_eq!(success.project, project);
}

#[tokio::test]
async fn one_byte_over_ceiling_is_rejected() {
    let text = legacy_greeting().to_string();
    let config = ImportConfig::default().with_max_bytes(text.len() - 1);
    let failure = Importer::new(config).import_project(text, None).await.unwrap_err();
    assert_eq!(failure.error_code, ImportErrorCode::FileTooLarge);

    let text = legacy_greeting().to_string();
    let config = ImportConfig::default().with_max_bytes(text.len());
    assert!(Importer::new(config).import_project(text, None).await.is_ok());
}

#[tokio::test]
async fn malformed_json_is_invalid() {
    let failure = isolated().import_project("{\"nodes\": [", None).await.unwrap_err();
    assert_eq!(failure.error_code, ImportErrorCode::InvalidJson);
    assert!(failure.internal_detail.is_none());
}

#[tokio::test]
async fn self_referencing_document_is_rejected() {
    let text = json!({"$id": "root", "nodes": [{"id": "a", "data": {"$ref": "root"}}]}).to_string();
    let failure = isolated().import_project(text, None).await.unwrap_err();
    assert_eq!(failure.error_code, ImportErrorCode::CircularReference);
}

#[tokio::test]
async fn node_and_edge_ceilings() {
    let text = legacy_chain(6).to_string();

    let config = ImportConfig::default().with_max_nodes(5);
    let failure = Importer::new(config).import_project(text.clone(), None).await.unwrap_err();
    assert_eq!(failure.error_code, ImportErrorCode::TooManyNodes);

    let config = ImportConfig::default().with_max_edges(4);
    let failure = Importer::new(config).import_project(text, None).await.unwrap_err();
    assert_eq!(failure.error_code, ImportErrorCode::TooManyEdges);
}

#[tokio::test]
async fn unresolvable_legacy_edge_fails_migration() {
    let text = json!({
        "nodes": [{"id": "a", "type": "npc"}],
        "connections": [{"id": "c1", "source": "a", "target": "ghost"}]
    })
    .to_string();
    let failure = isolated().import_project(text, None).await.unwrap_err();

    assert_eq!(failure.error_code, ImportErrorCode::MigrationFailed);
    match failure.internal_detail {
        Some(ImportDetail::Migration { offending_id, .. }) => {
            assert_eq!(offending_id.as_deref(), Some("c1"));
        }
        other => panic!("unexpected detail: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_current_document_fails_migration() {
    let mut value = serde_json::to_value(npc_graph(&["a", "b"], &[("a", "b")])).unwrap();
    value["nodes"][1]["id"] = json!("npcDialog_b-2");
    value["edges"][0]["target"] = json!("npcDialog_b-2");
    let failure = isolated().import_project(value.to_string(), None).await.unwrap_err();

    assert_eq!(failure.error_code, ImportErrorCode::MigrationFailed);
    match failure.internal_detail {
        Some(ImportDetail::Migration { offending_id, .. }) => {
            assert_eq!(offending_id.as_deref(), Some("npcDialog_b-2"));
        }
        other => panic!("unexpected detail: {other:?}"),
    }
}

#[tokio::test]
async fn minted_edge_id_does_not_collide_with_declared_one() {
    let text = json!({
        "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
        "edges": [
            {"id": "edge_1", "source": "a", "target": "b"},
            {"source": "b", "target": "c"}
        ]
    })
    .to_string();
    let success = isolated().import_project(text, None).await.unwrap();

    let ids: Vec<&str> = success.project.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["edge_1", "edge_1_1"]);
    assert!(success.validation_summary.is_valid);
}

#[tokio::test]
async fn ignored_connections_do_not_count_toward_edge_ceiling() {
    let text = json!({
        "nodes": [{"id": "a"}, {"id": "b"}],
        "edges": [{"id": "e1", "source": "a", "target": "b"}],
        "connections": [
            {"id": "c1", "source": "a", "target": "b"},
            {"id": "c2", "source": "b", "target": "a"}
        ]
    })
    .to_string();
    let config = ImportConfig::default().with_max_edges(1);
    let success = Importer::new(config).import_project(text, None).await.unwrap();
    assert_eq!(success.project.edges.len(), 1);
}

#[tokio::test]
async fn worker_past_deadline_times_out() {
    let text = legacy_chain(20_000).to_string();
    let config = ImportConfig::default()
        .with_max_bytes(usize::MAX)
        .with_max_nodes(usize::MAX)
        .with_max_edges(usize::MAX);
    let importer = Importer::new(config).with_timeout(Duration::from_nanos(1));

    let failure = importer.import_project(text, None).await.unwrap_err();
    assert_eq!(failure.error_code, ImportErrorCode::Timeout);
    assert!(failure.internal_detail.is_none());
}

#[tokio::test]
async fn duplicate_node_id_in_current_document_fails_validation() {
    let project = npc_graph(&["a", "a"], &[]);
    let text = project.to_json_pretty().unwrap();
    let failure = isolated().import_project(text, None).await.unwrap_err();

    assert_eq!(failure.error_code, ImportErrorCode::ValidationFailed);
    match failure.internal_detail {
        Some(ImportDetail::Validation { findings }) => {
            assert_eq!(findings.len(), 1);
            assert_eq!(findings[0].code, FindingCode::DuplicateNodeId);
        }
        other => panic!("unexpected detail: {other:?}"),
    }
}

#[tokio::test]
async fn dangling_edge_in_current_document_fails_validation() {
    let project = npc_graph(&["a"], &[("a", "ghost")]);
    let text = project.to_json_pretty().unwrap();
    let failure = isolated().import_project(text, None).await.unwrap_err();
    assert_eq!(failure.error_code, ImportErrorCode::ValidationFailed);

    let serialized = serde_json::to_value(&failure).unwrap();
    assert!(serialized.get("internalDetail").is_none());
    assert_eq!(serialized["errorCode"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn isolated_and_in_process_paths_agree() {
    let inputs = vec![
        legacy_greeting().to_string(),
        legacy_chain(20).to_string(),
        "not json".to_string(),
        npc_graph(&["a", "a"], &[]).to_json_pretty().unwrap(),
        json!({"nodes": [{"id": "x"}], "edges": [{"source": "x", "target": "x"}]}).to_string(),
    ];

    for input in inputs {
        let isolated = isolated().import_project(input.as_str(), None).await;
        let local = in_process().import_project(input.as_str(), None).await;
        match (isolated, local) {
            (Ok(a), Ok(b)) => {
                assert_eq!(a.migration_info, b.migration_info);
                assert_eq!(a.validation_summary, b.validation_summary);
                assert_eq!(a.project.nodes, b.project.nodes);
                assert_eq!(a.project.edges, b.project.edges);
            }
            (Err(a), Err(b)) => {
                assert_eq!(a.error_code, b.error_code);
                assert_eq!(a.human_message, b.human_message);
            }
            (a, b) => panic!("paths disagree: {a:?} vs {b:?}"),
        }
    }
}

#[tokio::test]
async fn concurrent_imports_are_independent() {
    let importer = isolated();
    let texts: Vec<String> = (1..=8).map(|n| legacy_chain(n * 3).to_string()).collect();
    let results = import_all(&importer, &texts).await;
    for (n, result) in (1..=8).zip(results) {
        assert_eq!(result.unwrap().project.nodes.len(), n * 3);
    }
}

async fn import_all(
    importer: &Importer,
    texts: &[String],
) -> Vec<dialogue_ingest::ImportResult> {
    let mut handles = Vec::new();
    for text in texts {
        let importer = importer.clone();
        let text = text.clone();
        handles.push(tokio::spawn(async move {
            importer.import_project(text, None).await
        }));
    }
    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

#[test]
fn config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_bytes = 2048\nmax_nodes = 50\nisolation = false").unwrap();

    let config = ImportConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.max_bytes, 2048);
    assert_eq!(config.max_nodes, 50);
    assert!(!config.isolation);
    assert_eq!(config.timeout_secs, 30);
}

#[test]
fn in_process_import_is_synchronous() {
    let success = in_process()
        .import_in_process(&legacy_greeting().to_string())
        .unwrap();
    assert_eq!(success.project.edges.len(), 1);
}
