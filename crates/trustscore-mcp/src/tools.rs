//! Tool definitions and JSON-RPC dispatch for the Trust Score MCP server.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use trustscore_core::{TrustUpdate, WalletAddress};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

// ============================================================================
// MCP Protocol Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: &'static str,
    description: &'static str,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

// ============================================================================
// Tool Definitions
// ============================================================================

fn wallet_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "wallet": {
                "type": "string",
                "description": "EVM wallet address (0x followed by 40 hex characters)"
            }
        },
        "required": ["wallet"]
    })
}

fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "trustscore_health",
            description: "Check the health of the Trust Score service, its RPC connection and whether the TrustRegistry is deployed.",
            input_schema: json!({ "type": "object", "properties": {}, "required": [] }),
        },
        Tool {
            name: "trustscore_contract_status",
            description: "Get the TrustRegistry contract status: deployment, address, chain and total number of registered wallets.",
            input_schema: json!({ "type": "object", "properties": {}, "required": [] }),
        },
        Tool {
            name: "trustscore_get_trust",
            description: "Get the full on-chain trust card for a wallet: score, band, risk level, verification, transaction count and wallet age.",
            input_schema: wallet_schema(),
        },
        Tool {
            name: "trustscore_get_score",
            description: "Get only the raw on-chain trust score for a wallet.",
            input_schema: wallet_schema(),
        },
        Tool {
            name: "trustscore_is_registered",
            description: "Check whether a wallet has a trust record in the registry.",
            input_schema: wallet_schema(),
        },
        Tool {
            name: "trustscore_update_score",
            description: "Write a wallet's trust score (owner only). Returns a pending transaction hash; poll trustscore_tx_status for confirmation.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "wallet": { "type": "string", "description": "EVM wallet address" },
                    "score": { "type": "integer", "minimum": 0, "maximum": 100 },
                    "total_tx": { "type": "integer", "minimum": 0 },
                    "wallet_age_days": { "type": "integer", "minimum": 0 }
                },
                "required": ["wallet", "score", "total_tx", "wallet_age_days"]
            }),
        },
        Tool {
            name: "trustscore_set_verification",
            description: "Set or clear a wallet's verified flag (owner only). Returns a pending transaction hash.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "wallet": { "type": "string", "description": "EVM wallet address" },
                    "verified": { "type": "boolean" }
                },
                "required": ["wallet", "verified"]
            }),
        },
        Tool {
            name: "trustscore_tx_status",
            description: "Get the status (pending, confirmed or failed) of a registry write submitted through this service.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "tx_hash": { "type": "string", "description": "Transaction hash (0x-prefixed, 32 bytes)" }
                },
                "required": ["tx_hash"]
            }),
        },
    ]
}

// ============================================================================
// HTTP Client
// ============================================================================

fn read_response(result: Result<ureq::Response, ureq::Error>) -> Result<Value, String> {
    match result {
        Ok(response) => response
            .into_json::<Value>()
            .map_err(|e| format!("Failed to parse response: {}", e)),
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_json::<Value>().unwrap_or(Value::Null);
            let message = body["error"].as_str().unwrap_or("request failed");
            Err(format!("API returned {}: {}", code, message))
        }
        Err(e) => Err(format!("HTTP request failed: {}", e)),
    }
}

fn wallet_arg(args: &Value) -> Result<WalletAddress, String> {
    let raw = args["wallet"].as_str().ok_or("Missing wallet parameter")?;
    WalletAddress::parse(raw).map_err(|e| e.to_string())
}

/// A transaction hash is `0x` followed by 64 hex digits.
fn tx_hash_arg(args: &Value) -> Result<&str, String> {
    let raw = args["tx_hash"].as_str().ok_or("Missing tx_hash parameter")?;
    let valid = raw
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(format!("Invalid transaction hash: {}", raw));
    }
    Ok(raw)
}

fn u64_arg(args: &Value, name: &str) -> Result<u64, String> {
    args[name]
        .as_u64()
        .ok_or_else(|| format!("Missing or invalid {} parameter", name))
}

pub struct TrustScoreTools {
    api_url: String,
}

impl TrustScoreTools {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("TRUSTSCORE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn get(&self, path: &str) -> Result<Value, String> {
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!(url = %url, "GET");
        read_response(ureq::get(&url).call())
    }

    fn send(&self, method: &str, path: &str, body: Value) -> Result<Value, String> {
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!(method = method, url = %url, "Sending write request");
        read_response(
            ureq::request(method, &url)
                .set("Content-Type", "application/json")
                .send_json(body),
        )
    }

    /// Run a tool. Arguments are validated before any request is made.
    pub fn execute(&self, name: &str, args: &Value) -> Result<Value, String> {
        match name {
            "trustscore_health" => self.get("/health"),

            "trustscore_contract_status" => self.get("/api/v1/contract"),

            "trustscore_get_trust" => {
                let wallet = wallet_arg(args)?;
                self.get(&format!("/api/v1/wallet/{}/trust", wallet))
            }

            "trustscore_get_score" => {
                let wallet = wallet_arg(args)?;
                self.get(&format!("/api/v1/wallet/{}/score", wallet))
            }

            "trustscore_is_registered" => {
                let wallet = wallet_arg(args)?;
                self.get(&format!("/api/v1/wallet/{}/registered", wallet))
            }

            "trustscore_update_score" => {
                let wallet = wallet_arg(args)?;
                let update = TrustUpdate {
                    score: u64_arg(args, "score")?,
                    total_tx: u64_arg(args, "total_tx")?,
                    wallet_age_days: u64_arg(args, "wallet_age_days")?,
                };
                update.validate().map_err(|e| e.to_string())?;
                self.send(
                    "POST",
                    &format!("/api/v1/wallet/{}/trust", wallet),
                    json!({
                        "score": update.score,
                        "total_tx": update.total_tx,
                        "wallet_age_days": update.wallet_age_days,
                    }),
                )
            }

            "trustscore_set_verification" => {
                let wallet = wallet_arg(args)?;
                let verified = args["verified"]
                    .as_bool()
                    .ok_or("Missing or invalid verified parameter")?;
                self.send(
                    "PUT",
                    &format!("/api/v1/wallet/{}/verification", wallet),
                    json!({ "verified": verified }),
                )
            }

            "trustscore_tx_status" => {
                let hash = tx_hash_arg(args)?;
                self.get(&format!("/api/v1/tx/{}", hash))
            }

            _ => Err(format!("Unknown tool: {}", name)),
        }
    }
}

// ============================================================================
// MCP Message Handlers
// ============================================================================

fn handle_initialize() -> Value {
    json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": "trustscore-mcp",
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn handle_call_tool(tools: &TrustScoreTools, params: &Value) -> Value {
    let name = params["name"].as_str().unwrap_or("");
    let args = &params["arguments"];

    match tools.execute(name, args) {
        Ok(result) => json!({
            "content": [{
                "type": "text",
                "text": serde_json::to_string_pretty(&result).unwrap_or_default()
            }]
        }),
        Err(e) => {
            tracing::warn!(tool = name, error = %e, "Tool call failed");
            json!({
                "content": [{
                    "type": "text",
                    "text": format!("Error: {}", e)
                }],
                "isError": true
            })
        }
    }
}

pub fn handle_request(tools: &TrustScoreTools, request: JsonRpcRequest) -> JsonRpcResponse {
    let result = match request.method.as_str() {
        "initialize" => handle_initialize(),
        "tools/list" => json!({ "tools": get_tools() }),
        "tools/call" => handle_call_tool(tools, &request.params),
        "ping" => json!({}),
        _ => {
            return JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32601,
                    message: format!("Method not found: {}", request.method),
                }),
            };
        }
    };

    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id: request.id,
        result: Some(result),
        error: None,
    }
}

/// Notifications carry no id and get no response.
pub fn is_notification(method: &str) -> bool {
    method.starts_with("notifications/") || method == "initialized"
}
