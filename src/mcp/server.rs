/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads newline-delimited JSON-RPC requests
/// 2. Routes tool calls to the streak tracker and mood journal
/// 3. Writes JSON-RPC responses back, one per line

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::domain::{ProfileId, UserId};
use crate::mcp::protocol::*;
use crate::tools;
use crate::{MoodJournalServer, ServerError};

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying journal server
    journal_server: MoodJournalServer,
    /// Whether the client has confirmed initialization
    initialized: bool,
}

fn schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| json!({"type": "object"}))
}

fn parse_args<T: DeserializeOwned>(args: HashMap<String, Value>) -> Result<T, ToolCallResult> {
    serde_json::from_value(Value::Object(args.into_iter().collect()))
        .map_err(|e| ToolCallResult::error(format!("Invalid arguments: {}", e)))
}

fn tool_success<T: Serialize>(message: &str, body: &T) -> ToolCallResult {
    let result = ToolCallResult::success(message.to_string());
    match serde_json::to_value(body) {
        Ok(value) => result.with_structured(value),
        Err(e) => {
            warn!("Failed to serialize tool result: {}", e);
            result
        }
    }
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(journal_server: MoodJournalServer) -> Self {
        Self {
            journal_server,
            initialized: false,
        }
    }

    /// Whether the client has sent the `initialized` notification
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");
        let reader = BufReader::new(tokio::io::stdin());
        self.serve(reader, tokio::io::stdout()).await
    }

    /// Serve requests from `reader` until it is exhausted
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.handle_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request).await
    }

    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        match request.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                if request.is_notification() {
                    None
                } else {
                    Some(JsonRpcResponse::success(request.id, json!(null)))
                }
            }
            _ if request.is_notification() => {
                debug!("Ignoring notification: {}", request.method);
                None
            }
            "initialize" => Some(self.handle_initialize(request)),
            "tools/list" => Some(self.handle_tools_list(request)),
            "tools/call" => Some(self.handle_tools_call(request).await),
            _ => Some(JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            )),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Mood Journal MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(
                request.id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to encode result: {}", e),
                None,
            ),
        }
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition {
                name: "streak_get".to_string(),
                description: "Show the current daily activity streak without recording activity".to_string(),
                input_schema: schema_of::<tools::NoParams>(),
            },
            ToolDefinition {
                name: "streak_update".to_string(),
                description: "Record today's activity (e.g. a login) and return the updated streak".to_string(),
                input_schema: schema_of::<tools::NoParams>(),
            },
            ToolDefinition {
                name: "streak_initialize".to_string(),
                description: "Start the daily activity streak over at 1 from today".to_string(),
                input_schema: schema_of::<tools::NoParams>(),
            },
            ToolDefinition {
                name: "mood_set".to_string(),
                description: "Record today's mood (1-8). Choosing again on the same day replaces the earlier choice".to_string(),
                input_schema: schema_of::<tools::SetMoodParams>(),
            },
            ToolDefinition {
                name: "mood_today".to_string(),
                description: "Show the mood recorded for today, if any".to_string(),
                input_schema: schema_of::<tools::NoParams>(),
            },
            ToolDefinition {
                name: "mood_recent".to_string(),
                description: "List moods from the last N days, oldest first".to_string(),
                input_schema: schema_of::<tools::RecentMoodsParams>(),
            },
            ToolDefinition {
                name: "mood_monthly_stats".to_string(),
                description: "Mood distribution, average and streaks for a calendar month".to_string(),
                input_schema: schema_of::<tools::MonthlyStatsParams>(),
            },
            ToolDefinition {
                name: "mood_levels".to_string(),
                description: "List the eight mood levels with their emoji and labels".to_string(),
                input_schema: schema_of::<tools::NoParams>(),
            },
        ];

        JsonRpcResponse::success(request.id, json!({"tools": tools}))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = self
            .call_tool(&tool_params.name, tool_params.arguments)
            .await
            .unwrap_or_else(|err| err);

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(
                request.id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to encode result: {}", e),
                None,
            ),
        }
    }

    /// Dispatch a tool by name; `Err` carries an error result for the client
    async fn call_tool(
        &self,
        name: &str,
        args: HashMap<String, Value>,
    ) -> Result<ToolCallResult, ToolCallResult> {
        if name == "mood_levels" {
            let levels = tools::mood_levels();
            let text = levels
                .iter()
                .map(|l| format!("{} {} {}", l.level, l.emoji, l.label))
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(tool_success(&text, &levels));
        }

        let user_id = self.session_user()?;
        let tracker = self.journal_server.streaks();
        let journal = self.journal_server.journal();

        match name {
            "streak_get" => {
                let response = tools::get_streak(tracker, &user_id).await;
                Ok(tool_success(&response.message, &response))
            }
            "streak_update" => {
                let response = tools::update_streak(tracker, &user_id).await;
                Ok(tool_success(&response.message, &response))
            }
            "streak_initialize" => {
                let response = tools::initialize_streak(tracker, &user_id).await;
                Ok(tool_success(&response.message, &response))
            }
            "mood_set" => {
                let params: tools::SetMoodParams = parse_args(args)?;
                let profile_id = self.profile_for(&user_id).await?;
                let response = tools::set_mood(journal, &profile_id, params)
                    .await
                    .map_err(|e| ToolCallResult::error(format!("Could not save your mood: {}", e)))?;
                Ok(tool_success(&response.message, &response))
            }
            "mood_today" => {
                let profile_id = self.existing_profile(&user_id).await?;
                let response = tools::todays_mood(journal, profile_id.as_ref())
                    .await
                    .map_err(|e| ToolCallResult::error(e.to_string()))?;
                Ok(tool_success(&response.message, &response))
            }
            "mood_recent" => {
                let params: tools::RecentMoodsParams = parse_args(args)?;
                let profile_id = self.existing_profile(&user_id).await?;
                let response = tools::recent_moods(journal, profile_id.as_ref(), params)
                    .await
                    .map_err(|e| ToolCallResult::error(e.to_string()))?;
                Ok(tool_success(&response.message, &response))
            }
            "mood_monthly_stats" => {
                let params: tools::MonthlyStatsParams = parse_args(args)?;
                let profile_id = self.existing_profile(&user_id).await?;
                let clock = self.journal_server.clock();
                let response = tools::monthly_stats(journal, clock, profile_id.as_ref(), params)
                    .await
                    .map_err(|e| ToolCallResult::error(e.to_string()))?;
                Ok(tool_success(&response.message, &response))
            }
            _ => Err(ToolCallResult::error(format!("Unknown tool: {}", name))),
        }
    }

    fn session_user(&self) -> Result<UserId, ToolCallResult> {
        self.journal_server
            .session()
            .current_user_id()
            .ok_or_else(|| ToolCallResult::error("No user is signed in".to_string()))
    }

    /// Profile of a user who has journaled before; reading never creates one
    async fn existing_profile(&self, user_id: &UserId) -> Result<Option<ProfileId>, ToolCallResult> {
        self.journal_server
            .profiles()
            .find_profile(user_id)
            .await
            .map_err(|e| ToolCallResult::error(format!("Could not load profile: {}", e)))
    }

    /// Profile to write under, created on first use
    async fn profile_for(&self, user_id: &UserId) -> Result<ProfileId, ToolCallResult> {
        self.journal_server
            .profiles()
            .resolve_profile(user_id)
            .await
            .map_err(|e| ToolCallResult::error(format!("Could not load profile: {}", e)))
    }
}
