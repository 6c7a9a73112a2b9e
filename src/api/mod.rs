//! RPC 모듈 - JSON-RPC 스타일 요청 처리
//!
//! 세 가지 메서드를 같은 검색기 위에 노출합니다.
//! - `query`: 키워드 검색
//! - `get_block`: id로 원문 조회
//! - `list_blocks`: 공개 엔트리 목록
//!
//! 단일 요청 객체와 배치(배열)를 모두 받습니다.
//! 전송 계층(HTTP, stdio 등)은 이 모듈 밖의 책임입니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::knowledge::{BlockRetriever, Partition, QueryRequest};

/// JSON-RPC 에러 코드
pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

// ============================================================================
// Types
// ============================================================================

/// 요청 envelope
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// 에러 객체
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// 응답 envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetBlockParams {
    #[serde(alias = "file")]
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListParams {
    kind: Option<Partition>,
}

/// params 역직렬화 (없으면 빈 객체)
fn parse_params<T: for<'de> Deserialize<'de>>(params: Value) -> Result<T, String> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| format!("Invalid params: {}", e))
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// ============================================================================
// Dispatch
// ============================================================================

/// 단일 요청 처리
pub async fn handle(retriever: &BlockRetriever, request: RpcRequest) -> RpcResponse {
    let RpcRequest { id, method, params } = request;
    tracing::debug!("RPC {} (id={})", method, id);

    match method.as_str() {
        "query" => match parse_params::<QueryRequest>(params) {
            Ok(query) => RpcResponse::ok(id, to_value(&retriever.query(&query))),
            Err(message) => RpcResponse::err(id, INVALID_PARAMS, message),
        },
        "get_block" => match parse_params::<GetBlockParams>(params) {
            Ok(p) => match retriever.get_block(&p.id).await {
                Ok(content) => RpcResponse::ok(id, to_value(&content)),
                Err(e) => RpcResponse::err(id, INVALID_PARAMS, e.to_string()),
            },
            Err(message) => RpcResponse::err(id, INVALID_PARAMS, message),
        },
        "list_blocks" => match parse_params::<ListParams>(params) {
            Ok(p) => RpcResponse::ok(id, to_value(&retriever.list(p.kind))),
            Err(message) => RpcResponse::err(id, INVALID_PARAMS, message),
        },
        other => RpcResponse::err(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
    }
}

/// JSON 값 하나 처리 (객체가 아니면 invalid request)
async fn handle_value(retriever: &BlockRetriever, value: Value) -> RpcResponse {
    let id = value.get("id").cloned().unwrap_or(Value::Null);

    match serde_json::from_value::<RpcRequest>(value) {
        Ok(request) => handle(retriever, request).await,
        Err(e) => RpcResponse::err(id, INVALID_REQUEST, format!("Invalid request: {}", e)),
    }
}

/// 원본 JSON 텍스트 처리 (단일 또는 배치)
///
/// 배치는 요청 순서대로 응답 배열을 반환합니다.
pub async fn dispatch(retriever: &BlockRetriever, raw: &str) -> Value {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            return to_value(&RpcResponse::err(
                Value::Null,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            ))
        }
    };

    match parsed {
        Value::Array(items) if items.is_empty() => to_value(&RpcResponse::err(
            Value::Null,
            INVALID_REQUEST,
            "Empty batch",
        )),
        Value::Array(items) => {
            let mut responses = Vec::with_capacity(items.len());
            for item in items {
                responses.push(to_value(&handle_value(retriever, item).await));
            }
            Value::Array(responses)
        }
        single => to_value(&handle_value(retriever, single).await),
    }
}

// ============================================================================
// Tests
// ============================================================================
