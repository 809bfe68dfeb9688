//! MCP server exposing a skills directory
//!
//! Provides [`SkillServer`], which answers `tools/list`, `tools/call`,
//! `resources/list` and `resources/read` from a fresh read of the skills
//! directory on every request. Holds no mutable state, so concurrent
//! requests are safe.

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use rmcp::model::{
    AnnotateAble, CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject,
    ListResourcesResult, ListToolsResult, PaginatedRequestParams, RawResource,
    ReadResourceRequestParams, ReadResourceResult, Resource, ResourceContents,
    ServerCapabilities, ServerInfo, Tool, ToolAnnotations,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt};
use serde::Deserialize;
use serde_json::{json, Value};
use skillport_skills::uri::MARKDOWN_MIME;
use skillport_skills::{ScriptExecutor, SkillLibrary};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name of the built-in tool that runs skill scripts
pub const RUN_SCRIPT_TOOL: &str = "run_skill_script";

/// Arguments of [`RUN_SCRIPT_TOOL`]
#[derive(Debug, Deserialize)]
struct RunScriptParams {
    skill: String,
    script: String,
    #[serde(default)]
    args: Vec<String>,
}

/// Serves a skills directory over MCP
#[derive(Debug, Clone)]
pub struct SkillServer {
    library: SkillLibrary,
    /// Present only when scripts are enabled in configuration
    executor: Option<ScriptExecutor>,
}

impl SkillServer {
    /// Create a server from configuration
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            library: SkillLibrary::new(&config.skills_dir),
            executor: config.scripts.executor(&config.skills_dir),
        }
    }

    /// Skills served by this instance
    #[must_use]
    pub fn library(&self) -> &SkillLibrary {
        &self.library
    }

    /// Whether the script tool is exposed
    #[must_use]
    pub fn scripts_enabled(&self) -> bool {
        self.executor.is_some()
    }

    /// Tool definitions: one per skill, plus the script tool when enabled
    #[must_use]
    pub fn tool_definitions(&self) -> Vec<Tool> {
        let listing = self.library.list_tools();
        let scripts_enabled = self.executor.is_some();
        let mut shadowed = listing.shadowed;

        let empty_schema = Arc::new(object_schema(&json!({}), &[]));
        let mut tools: Vec<Tool> = listing
            .tools
            .into_iter()
            .filter(|info| {
                // The built-in script tool owns this name while scripts are enabled
                if scripts_enabled && info.name == RUN_SCRIPT_TOOL {
                    warn!(
                        "Skill {} is shadowed by the built-in '{}' tool",
                        info.path, RUN_SCRIPT_TOOL
                    );
                    shadowed += 1;
                    return false;
                }
                true
            })
            .map(|info| {
                let mut tool = Tool::new(info.name, info.description, empty_schema.clone());
                tool.annotations = Some(ToolAnnotations {
                    read_only_hint: Some(true),
                    ..Default::default()
                });
                tool
            })
            .collect();

        debug!(
            "Listing {} skill tools ({} skipped, {} shadowed)",
            tools.len(),
            listing.skipped,
            shadowed
        );

        if scripts_enabled {
            tools.push(run_script_tool());
        }
        tools
    }

    /// Handle a tool call
    ///
    /// Skill tools ignore their arguments. A script that exits non-zero is a
    /// successful call whose result is flagged as an error.
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> Result<CallToolResult> {
        debug!("Calling tool '{}'", name);

        if name == RUN_SCRIPT_TOOL {
            if let Some(executor) = &self.executor {
                return Self::run_script(executor, arguments).await;
            }
        }

        let text = self.library.call_tool(name)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    async fn run_script(
        executor: &ScriptExecutor,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult> {
        let params: RunScriptParams =
            serde_json::from_value(Value::Object(arguments.unwrap_or_default())).map_err(|e| {
                ServerError::InvalidParams {
                    tool: RUN_SCRIPT_TOOL.to_string(),
                    details: e.to_string(),
                }
            })?;

        let output = executor
            .execute(&params.skill, &params.script, &params.args)
            .await?;

        let content = vec![Content::text(output.render())];
        Ok(if output.success() {
            CallToolResult::success(content)
        } else {
            CallToolResult::error(content)
        })
    }

    /// Resource list; unreadable skills are left out
    #[must_use]
    pub fn resource_list(&self) -> Vec<Resource> {
        self.library
            .list_resources()
            .into_iter()
            .map(|entry| {
                let mut raw = RawResource::new(entry.uri, entry.display_name);
                raw.description = Some(entry.description);
                raw.mime_type = Some(entry.mime_type.to_string());
                raw.no_annotation()
            })
            .collect()
    }

    /// Read one resource as Markdown text
    pub fn read(&self, uri: &str) -> Result<ReadResourceResult> {
        let text = self.library.read_resource(Some(uri))?;

        let mut contents = ResourceContents::text(text, uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(MARKDOWN_MIME.to_string());
        }

        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }

    /// Serve over stdin/stdout until the client disconnects
    ///
    /// # Errors
    /// Returns an error if the MCP handshake fails or the service task aborts
    pub async fn run_stdio(self) -> Result<()> {
        info!(
            "Starting skill server for {:?} (scripts {})",
            self.library.root(),
            if self.scripts_enabled() { "enabled" } else { "disabled" }
        );

        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| ServerError::Transport(format!("Failed to initialize MCP: {e}")))?;

        info!("MCP server initialized, waiting for requests");
        let reason = service
            .waiting()
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        info!("MCP server stopped: {:?}", reason);
        Ok(())
    }
}

impl ServerHandler for SkillServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "skillport".into(),
                title: Some("Skillport".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Each tool returns a Markdown skill document with guidance for a task. \
                 Call the tool whose description matches the task, then follow the document. \
                 Skill documents and their reference files are also available as skill:// resources."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            meta: None,
            tools: self.tool_definitions(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.call(&request.name, request.arguments)
            .await
            .map_err(McpError::from)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            meta: None,
            resources: self.resource_list(),
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        self.read(&request.uri).map_err(McpError::from)
    }
}

fn object_schema(properties: &Value, required: &[&str]) -> JsonObject {
    let mut schema = JsonObject::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), properties.clone());
    if !required.is_empty() {
        schema.insert("required".into(), json!(required));
    }
    schema
}

fn run_script_tool() -> Tool {
    let schema = object_schema(
        &json!({
            "skill": {
                "type": "string",
                "description": "Skill tool name or directory name"
            },
            "script": {
                "type": "string",
                "description": "Script path relative to the skill directory, e.g. scripts/check.sh"
            },
            "args": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Arguments passed to the script"
            }
        }),
        &["skill", "script"],
    );

    Tool::new(
        RUN_SCRIPT_TOOL,
        "Run a helper script bundled with a skill and return its exit code, stdout and stderr.",
        Arc::new(schema),
    )
}
