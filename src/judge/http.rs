//! HTTP-backed language-model judge.
//!
//! Talks to a chat-completions style inference API. The judge may run a
//! bounded multi-round tool-use loop against a `StatsProvider` before
//! committing to a structured decision. Parse failure is a typed
//! `JudgeError::Unparsable` and is never retried here; the caller falls
//! back to the deterministic evaluator.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::JudgeError;
use crate::stats::StatsProvider;

use super::protocol::{JudgeDecision, TradeContext};
use super::LanguageModelJudge;

/// System prompt framing every judge request
const JUDGE_SYSTEM_PROMPT: &str = "You are an experienced NBA General Manager making trade \
decisions. Your response must be valid JSON.";

/// Judge client configuration
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// API key for the inference service
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Maximum tool-use rounds before giving up
    pub max_tool_rounds: u8,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.x.ai/v1".to_string(),
            model: "grok-4-1-fast-reasoning".to_string(),
            timeout_secs: 30,
            max_tool_rounds: 4,
        }
    }
}

impl JudgeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("JUDGE_API_KEY").unwrap_or_default(),
            base_url: std::env::var("JUDGE_API_URL").unwrap_or(defaults.base_url),
            model: std::env::var("JUDGE_MODEL").unwrap_or(defaults.model),
            timeout_secs: defaults.timeout_secs,
            max_tool_rounds: defaults.max_tool_rounds,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ── Wire types (chat-completions API) ──────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ChatMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn tool_result(tool_call_id: &str, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    /// JSON-encoded arguments object
    arguments: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

// ── Judge client ───────────────────────────────────────────────

/// Language-model judge backed by a remote chat-completions API
pub struct HttpJudge {
    config: JudgeConfig,
    http: Client,
    stats: Arc<dyn StatsProvider>,
}

impl HttpJudge {
    pub fn new(config: JudgeConfig, stats: Arc<dyn StatsProvider>) -> Result<Self, JudgeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| JudgeError::Http(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            config,
            http,
            stats,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Tool declarations offered to the model each round
    fn tool_specs() -> serde_json::Value {
        json!([
            {
                "type": "function",
                "function": {
                    "name": "lookup_player",
                    "description": "Get basic information about an NBA player by full name",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Player full name" }
                        },
                        "required": ["name"]
                    }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "lookup_team",
                    "description": "Get basic information about an NBA team by name or abbreviation",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Team name or abbreviation" }
                        },
                        "required": ["name"]
                    }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "lookup_career_stats",
                    "description": "Get career per-game statistics for an NBA player id",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "player_id": { "type": "string", "description": "Player id" }
                        },
                        "required": ["player_id"]
                    }
                }
            }
        ])
    }

    fn build_prompt(context: &TradeContext) -> Result<String, JudgeError> {
        let context_json = serde_json::to_string_pretty(context)
            .map_err(|e| JudgeError::Unparsable(format!("context serialization: {}", e)))?;
        Ok(format!(
            r#"You are the General Manager of the {team}. You're considering a trade with the {other}.

## Trade Context

```json
{context}
```

Evaluate this trade from your perspective. Consider:
1. Player value and team fit
2. Salary implications
3. Position balance
4. Short and long-term impact

You may call the available tools to look up additional player or team data first.

Then respond in the following JSON format:
{{
    "decision": "accept" or "reject" or "counter",
    "value_for_us": a number from 1-10,
    "value_for_them": a number from 1-10,
    "reasoning": your reasoning in 2-3 sentences,
    "message": what you would tell the other GM
}}

Respond ONLY with valid JSON."#,
            team = context.our_team,
            other = context.other_team,
            context = context_json,
        ))
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatMessage, JudgeError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            temperature: 0.7,
            max_tokens: 1000,
            tools: Some(Self::tool_specs()),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    JudgeError::Timeout {
                        elapsed_ms: self.config.timeout_secs * 1000,
                    }
                } else {
                    JudgeError::Http(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(JudgeError::Http(format!(
                "judge API returned {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| JudgeError::Http(format!("malformed API envelope: {}", e)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| JudgeError::Unparsable("empty choices in judge response".to_string()))
    }

    /// Execute one requested tool call, feeding errors back as content so
    /// the model can route around an unavailable tool.
    async fn dispatch_tool(&self, call: &FunctionCall) -> String {
        let args: serde_json::Value = match serde_json::from_str(&call.arguments) {
            Ok(v) => v,
            Err(e) => return format!("{{\"error\": \"bad tool arguments: {}\"}}", e),
        };
        let str_arg = |key: &str| args.get(key).and_then(|v| v.as_str()).unwrap_or_default();

        let result = match call.name.as_str() {
            "lookup_player" => self
                .stats
                .lookup_player(str_arg("name"))
                .await
                .and_then(|r| Ok(serde_json::to_value(r)?)),
            "lookup_team" => self
                .stats
                .lookup_team(str_arg("name"))
                .await
                .and_then(|r| Ok(serde_json::to_value(r)?)),
            "lookup_career_stats" => self
                .stats
                .lookup_career_stats(str_arg("player_id"))
                .await
                .and_then(|r| Ok(serde_json::to_value(r)?)),
            other => {
                return format!("{{\"error\": \"unknown tool: {}\"}}", other);
            }
        };

        match result {
            Ok(value) => value.to_string(),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "judge tool call failed");
                format!("{{\"error\": \"{}\"}}", e)
            }
        }
    }
}

#[async_trait::async_trait]
impl LanguageModelJudge for HttpJudge {
    async fn evaluate(&self, context: &TradeContext) -> Result<JudgeDecision, JudgeError> {
        if !self.is_configured() {
            return Err(JudgeError::NotConfigured);
        }

        let mut messages = vec![
            ChatMessage::system(JUDGE_SYSTEM_PROMPT),
            ChatMessage::user(Self::build_prompt(context)?),
        ];

        for round in 0..=self.config.max_tool_rounds {
            let reply = self.chat(&messages).await?;

            if let Some(tool_calls) = reply.tool_calls.clone().filter(|c| !c.is_empty()) {
                if round == self.config.max_tool_rounds {
                    return Err(JudgeError::Unparsable(
                        "tool-use loop exceeded the round limit".to_string(),
                    ));
                }
                debug!(
                    trade_id = %context.trade_id,
                    round,
                    calls = tool_calls.len(),
                    "judge requested tools"
                );
                messages.push(reply);
                for call in &tool_calls {
                    let output = self.dispatch_tool(&call.function).await;
                    messages.push(ChatMessage::tool_result(&call.id, output));
                }
                continue;
            }

            let text = reply.content.unwrap_or_default();
            let json = extract_json(&text);
            return serde_json::from_str(json)
                .map_err(|e| JudgeError::Unparsable(format!("{} in {:?}", e, json)));
        }

        Err(JudgeError::Unparsable(
            "judge never produced a final answer".to_string(),
        ))
    }
}

/// Extract JSON from a response that may contain markdown code blocks
fn extract_json(text: &str) -> &str {
    // Try to find JSON in code blocks first
    if let Some(start) = text.find("```json") {
        if let Some(end) = text[start + 7..].find("```") {
            return text[start + 7..start + 7 + end].trim();
        }
    }

    // Try generic code blocks
    if let Some(start) = text.find("```") {
        if let Some(end) = text[start + 3..].find("```") {
            let content = text[start + 3..start + 3 + end].trim();
            // Skip language identifier if present
            if let Some(newline) = content.find('\n') {
                return content[newline + 1..].trim();
            }
            return content;
        }
    }

    // Try to find raw JSON object
    if let Some(start) = text.find('{') {
        if let Some(end) = text.rfind('}') {
            return &text[start..=end];
        }
    }

    text.trim()
}
