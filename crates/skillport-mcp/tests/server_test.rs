//! End-to-end tests of the skill server over a temporary skills tree

#![allow(clippy::unwrap_used, clippy::expect_used)]

use rmcp::model::{RawContent, ResourceContents};
use serde_json::json;
use skillport_mcp::{ScriptsConfig, ServerConfig, ServerError, SkillServer, RUN_SCRIPT_TOOL};
use skillport_skills::SkillError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn skills_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "api-design/SKILL.md",
        "---\ndescription: \"Design RESTful APIs\"\n---\n# API Design\n\nUse nouns.\n",
    );
    write(
        dir.path(),
        "api-design/resources/status-codes.md",
        "# HTTP Status Codes\n\n200, 404...\n",
    );
    write(
        dir.path(),
        "api-design/resources/auth.md",
        "---\ndescription: Auth patterns\n---\nbody\n",
    );
    write(
        dir.path(),
        "team/go-concurrency/SKILL.md",
        "# Go Concurrency\n\nDetails...",
    );
    fs::create_dir_all(dir.path().join("team/go-concurrency/resources")).unwrap();
    dir
}

fn text_of(result: &rmcp::model::CallToolResult) -> String {
    match &result.content[0].raw {
        RawContent::Text(text) => text.text.clone(),
        other => panic!("expected text content, got {other:?}"),
    }
}

#[test]
fn test_list_tools() {
    let dir = skills_tree();
    let server = SkillServer::new(&ServerConfig::new(dir.path()));

    let tools = server.tool_definitions();
    let summary: Vec<(String, String)> = tools
        .iter()
        .map(|t| {
            (
                t.name.to_string(),
                t.description.as_deref().unwrap_or_default().to_string(),
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            ("api_design".to_string(), "Design RESTful APIs".to_string()),
            ("go_concurrency".to_string(), "Go Concurrency".to_string()),
        ]
    );
    assert_eq!(
        serde_json::Value::Object((*tools[0].input_schema).clone()),
        json!({ "type": "object", "properties": {} })
    );
}

#[test]
fn test_missing_root_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let server = SkillServer::new(&ServerConfig::new(dir.path().join("missing")));
    assert!(server.tool_definitions().is_empty());
    assert!(server.resource_list().is_empty());
}

#[tokio::test]
async fn test_call_tool_appends_resources() {
    let dir = skills_tree();
    let server = SkillServer::new(&ServerConfig::new(dir.path()));

    let result = server.call("api_design", None).await.unwrap();
    let text = text_of(&result);
    assert!(text.starts_with("---\ndescription: \"Design RESTful APIs\""));
    assert!(text.ends_with(
        "## Available Resources\n\n- **auth**: Auth patterns\n- **status-codes**: HTTP Status Codes\n"
    ));
}

#[tokio::test]
async fn test_call_tool_without_resources_is_verbatim() {
    let dir = skills_tree();
    let server = SkillServer::new(&ServerConfig::new(dir.path()));

    let result = server.call("go_concurrency", None).await.unwrap();
    assert_eq!(text_of(&result), "# Go Concurrency\n\nDetails...");
}

#[tokio::test]
async fn test_call_unknown_tool() {
    let dir = skills_tree();
    let server = SkillServer::new(&ServerConfig::new(dir.path()));

    let err = server.call("does_not_exist", None).await.unwrap_err();
    assert!(matches!(err, ServerError::Skill(SkillError::UnknownTool(_))));
}

#[test]
fn test_list_resources() {
    let dir = skills_tree();
    let server = SkillServer::new(&ServerConfig::new(dir.path()));

    let resources = server.resource_list();
    let listed: Vec<(String, String, String)> = resources
        .iter()
        .map(|r| {
            (
                r.uri.clone(),
                r.name.clone(),
                r.description.clone().unwrap_or_default(),
            )
        })
        .collect();

    assert_eq!(
        listed,
        vec![
            (
                "skill://api-design/SKILL.md".to_string(),
                "api-design/SKILL".to_string(),
                "Design RESTful APIs".to_string()
            ),
            (
                "skill://api-design/resources/auth.md".to_string(),
                "api-design/resources/auth".to_string(),
                "Auth patterns".to_string()
            ),
            (
                "skill://api-design/resources/status-codes.md".to_string(),
                "api-design/resources/status-codes".to_string(),
                "HTTP Status Codes".to_string()
            ),
            (
                "skill://team/go-concurrency/SKILL.md".to_string(),
                "team/go-concurrency/SKILL".to_string(),
                "Go Concurrency".to_string()
            ),
        ]
    );
    assert!(resources
        .iter()
        .all(|r| r.mime_type.as_deref() == Some("text/markdown")));
}

#[test]
fn test_read_resource() {
    let dir = skills_tree();
    let server = SkillServer::new(&ServerConfig::new(dir.path()));

    let result = server
        .read("skill://api-design/resources/status-codes.md")
        .unwrap();
    match &result.contents[0] {
        ResourceContents::TextResourceContents {
            text, mime_type, ..
        } => {
            assert_eq!(text, "# HTTP Status Codes\n\n200, 404...\n");
            assert_eq!(mime_type.as_deref(), Some("text/markdown"));
        }
        other => panic!("expected text contents, got {other:?}"),
    }
}

#[test]
fn test_read_resource_failures() {
    let dir = skills_tree();
    let server = SkillServer::new(&ServerConfig::new(dir.path()));

    assert!(matches!(
        server.read(""),
        Err(ServerError::Skill(SkillError::MissingUri))
    ));
    assert!(matches!(
        server.read("skill://foo/../../etc/passwd"),
        Err(ServerError::Skill(SkillError::InvalidUri { .. }))
    ));
    assert!(matches!(
        server.read("https://example.com/SKILL.md"),
        Err(ServerError::Skill(SkillError::InvalidUri { .. }))
    ));
    assert!(matches!(
        server.read("skill://api-design/resources/missing.md"),
        Err(ServerError::Skill(SkillError::ResourceRead { .. }))
    ));
}

#[tokio::test]
async fn test_script_tool_hidden_when_disabled() {
    let dir = skills_tree();
    let server = SkillServer::new(&ServerConfig::new(dir.path()));

    assert!(!server.scripts_enabled());
    assert!(server
        .tool_definitions()
        .iter()
        .all(|t| t.name != RUN_SCRIPT_TOOL));

    let err = server
        .call(
            RUN_SCRIPT_TOOL,
            json!({ "skill": "api_design", "script": "scripts/x.sh" })
                .as_object()
                .cloned(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::Skill(SkillError::UnknownTool(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_script_tool_runs_when_enabled() {
    let dir = skills_tree();
    write(
        dir.path(),
        "api-design/scripts/lint.sh",
        "echo \"linting $1\"\nexit 2\n",
    );
    let config = ServerConfig::new(dir.path()).with_scripts(ScriptsConfig {
        enabled: true,
        ..ScriptsConfig::default()
    });
    let server = SkillServer::new(&config);

    assert!(server
        .tool_definitions()
        .iter()
        .any(|t| t.name == RUN_SCRIPT_TOOL));

    let result = server
        .call(
            RUN_SCRIPT_TOOL,
            json!({ "skill": "api_design", "script": "scripts/lint.sh", "args": ["openapi.yaml"] })
                .as_object()
                .cloned(),
        )
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    assert_eq!(
        text_of(&result),
        "Exit code: 2\n\nstdout:\nlinting openapi.yaml"
    );
}

#[tokio::test]
async fn test_script_tool_rejects_escape_and_bad_params() {
    let dir = skills_tree();
    let config = ServerConfig::new(dir.path()).with_scripts(ScriptsConfig {
        enabled: true,
        ..ScriptsConfig::default()
    });
    let server = SkillServer::new(&config);

    let err = server
        .call(
            RUN_SCRIPT_TOOL,
            json!({ "skill": "api_design", "script": "../../evil.sh" })
                .as_object()
                .cloned(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServerError::Skill(SkillError::PathEscape { .. })
    ));

    let err = server
        .call(RUN_SCRIPT_TOOL, json!({ "skill": 1 }).as_object().cloned())
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::InvalidParams { .. }));
}

#[test]
fn test_script_tool_name_is_never_listed_twice() {
    let dir = skills_tree();
    write(dir.path(), "run-skill-script/SKILL.md", "# Runs things\n");

    let disabled = SkillServer::new(&ServerConfig::new(dir.path()));
    let names: Vec<String> = disabled
        .tool_definitions()
        .iter()
        .map(|t| t.name.to_string())
        .collect();
    assert_eq!(names, vec!["api_design", RUN_SCRIPT_TOOL, "go_concurrency"]);

    let enabled = SkillServer::new(&ServerConfig::new(dir.path()).with_scripts(ScriptsConfig {
        enabled: true,
        ..ScriptsConfig::default()
    }));
    let tools = enabled.tool_definitions();
    let script_tools: Vec<_> = tools.iter().filter(|t| t.name == RUN_SCRIPT_TOOL).collect();
    assert_eq!(tools.len(), 3);
    assert_eq!(script_tools.len(), 1);
    assert!(script_tools[0]
        .description
        .as_deref()
        .unwrap_or_default()
        .starts_with("Run a helper script"));
}

#[test]
fn test_unreadable_skill_keeps_other_resources() {
    let dir = skills_tree();
    fs::create_dir_all(dir.path().join("bad")).unwrap();
    fs::write(dir.path().join("bad/SKILL.md"), b"\xff\xfe# bad\n").unwrap();
    let server = SkillServer::new(&ServerConfig::new(dir.path()));

    assert_eq!(server.tool_definitions().len(), 2);
    let uris: Vec<String> = server.resource_list().iter().map(|r| r.uri.clone()).collect();
    assert_eq!(
        uris,
        vec![
            "skill://api-design/SKILL.md",
            "skill://api-design/resources/auth.md",
            "skill://api-design/resources/status-codes.md",
            "skill://team/go-concurrency/SKILL.md",
        ]
    );
}
