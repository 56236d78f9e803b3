//! Webhook service implementation
//!
//! HTTP endpoints consumed by the voice agent during an inbound carrier
//! call: MC verification, load search, and call summary recording. The
//! three webhook routes are gated by a shared `x-api-key` header.

use crate::call_journal::CallRecord;
use crate::config;
use crate::engine::entry::SearchRequest;
use crate::metrics;
use crate::response;
use crate::server;

use hyper::{Body, Method, Request, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

pub async fn route(req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    match (&method, path.as_str()) {
        (&Method::POST, "/webhook/carrier/verify_mc") => {
            metrics::record_metrics("verify_mc", || verify_mc(req)).await
        }
        (&Method::POST, "/webhook/carrier/load_search") => {
            metrics::record_metrics("load_search", || load_search(req)).await
        }
        (&Method::POST, "/webhook/carrier/summary") => {
            metrics::record_metrics("summary", || summary(req)).await
        }
        (&Method::GET, "/health") => health(),
        (&Method::GET, "/loads") => metrics::record_metrics("loads", || list_loads(req)).await,
        _ => json_response(
            StatusCode::NOT_FOUND,
            &json!({"status": "not_found", "message": "Unknown route"}),
        ),
    }
}

#[derive(Debug, Deserialize)]
struct VerifyMcRequest {
    #[serde(default)]
    mc_number: String,
    #[serde(default)]
    conversation_id: Option<String>,
}

/// Dedicated endpoint for MC verification.
async fn verify_mc(req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
    if !check_api_key(&req) {
        return forbidden();
    }
    let body = hyper::body::to_bytes(req.into_body()).await?;
    log::info!("mc verification request: {}", String::from_utf8_lossy(&body));

    let payload: VerifyMcRequest = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => return bad_request(e),
    };

    if payload.mc_number.trim().is_empty() {
        return json_response(
            StatusCode::OK,
            &json!({
                "verified": false,
                "message": "MC number is required",
                "conversation_id": payload.conversation_id,
                "say": "I need your MC number to verify your eligibility. What's your MC number?",
            }),
        );
    }

    let verifier = { server::instance().lock().await.verifier.clone() };
    let result = verifier.verify(&payload.mc_number).await;
    log::info!(
        "mc {} verification result: {}, carrier: {}",
        payload.mc_number,
        result.verified,
        result.carrier_name
    );

    if result.verified {
        json_response(
            StatusCode::OK,
            &json!({
                "verified": true,
                "message": "MC number verified successfully",
                "carrier_name": result.carrier_name,
                "conversation_id": payload.conversation_id,
                "say": format!(
                    "Excellent! Your MC number {} has been verified. Welcome, {}! \
                     You're eligible to work with us. Let me search for available \
                     loads that match your equipment.",
                    payload.mc_number, result.carrier_name
                ),
            }),
        )
    } else {
        json_response(
            StatusCode::OK,
            &json!({
                "verified": false,
                "message": "MC number verification failed",
                "conversation_id": payload.conversation_id,
                "say": "I'm sorry, but your MC number is not eligible to work with us \
                        at this time. Please contact our compliance department for \
                        more information.",
            }),
        )
    }
}

/// Dedicated endpoint for load search.
async fn load_search(req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
    if !check_api_key(&req) {
        return forbidden();
    }
    let body = hyper::body::to_bytes(req.into_body()).await?;
    log::info!("load search request: {}", String::from_utf8_lossy(&body));

    let request: SearchRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return bad_request(e),
    };

    let board = { server::instance().lock().await.board.clone() };
    match board.search(&request) {
        Ok(outcome) => {
            let reply = response::format_outcome(&outcome, &request, board.equipment_types());
            metrics::observe_outcome(&reply.status);
            json_response(StatusCode::OK, &reply)
        }
        Err(e) => {
            log::error!("load search failed: {}", e);
            let mut reply = response::error_reply("Failed to search loads");
            reply.conversation_id = request.conversation_id.clone();
            metrics::observe_outcome(&reply.status);
            json_response(StatusCode::INTERNAL_SERVER_ERROR, &reply)
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryRequest {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    mc_number: String,
    #[serde(default)]
    carrier_name: String,
    #[serde(default)]
    load_id: Option<u64>,
    #[serde(default)]
    outcome: String,
    #[serde(default)]
    sentiment: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    duration: u64,
}

/// Endpoint to save call summary, outcome, and sentiment.
async fn summary(req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
    if !check_api_key(&req) {
        return forbidden();
    }
    let body = hyper::body::to_bytes(req.into_body()).await?;
    log::info!("summary request: {}", String::from_utf8_lossy(&body));

    let payload: SummaryRequest = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => return bad_request(e),
    };

    let record = CallRecord::new(
        payload.session_id,
        payload.mc_number,
        payload.carrier_name,
        payload.load_id,
        payload.outcome,
        payload.sentiment,
        payload.summary,
        payload.duration,
    );

    let journal = { server::instance().lock().await.journal.clone() };
    let appended = journal
        .lock()
        .map_err(|e| e.to_string())
        .and_then(|mut journal| journal.append(&record).map_err(|e| e.to_string()));

    match appended {
        Ok(sequence) => {
            log::info!("call record {} saved at sequence {}", record.id, sequence);
            json_response(
                StatusCode::OK,
                &json!({
                    "status": "success",
                    "message": "Call summary saved successfully",
                    "say": "Thank you for the call summary. The information has been recorded.",
                }),
            )
        }
        Err(e) => {
            log::error!("failed to save call summary: {}", e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({
                    "status": "error",
                    "message": "Failed to save call summary",
                    "say": "There was an error saving the call summary.",
                }),
            )
        }
    }
}

async fn list_loads(_req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
    let board = { server::instance().lock().await.board.clone() };
    match board.available_loads() {
        Ok(loads) => json_response(StatusCode::OK, &loads),
        Err(e) => {
            log::error!("failed to list loads: {}", e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({"status": "error", "message": "Failed to list loads"}),
            )
        }
    }
}

fn health() -> Result<Response<Body>, hyper::Error> {
    json_response(
        StatusCode::OK,
        &json!({"status": "healthy", "service": "loadmatch"}),
    )
}

fn check_api_key(req: &Request<Body>) -> bool {
    let expected = config::instance().lock().unwrap().api_key.clone();
    match req.headers().get("x-api-key").and_then(|v| v.to_str().ok()) {
        Some(key) => key == expected,
        None => false,
    }
}

fn forbidden() -> Result<Response<Body>, hyper::Error> {
    json_response(
        StatusCode::FORBIDDEN,
        &json!({"status": "forbidden", "message": "Invalid API Key"}),
    )
}

fn bad_request(e: serde_json::Error) -> Result<Response<Body>, hyper::Error> {
    log::warn!("rejecting malformed request body: {}", e);
    json_response(
        StatusCode::BAD_REQUEST,
        &json!({"status": "bad_request", "message": format!("Invalid JSON payload: {}", e)}),
    )
}

fn json_response<T: serde::Serialize>(
    status: StatusCode,
    payload: &T,
) -> Result<Response<Body>, hyper::Error> {
    let (status, body) = match serde_json::to_vec(payload) {
        Ok(body) => (status, body),
        Err(e) => {
            log::error!("failed to encode response body: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                br#"{"status":"error","message":"Failed to encode response"}"#.to_vec(),
            )
        }
    };
    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::empty()));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(path: &str, key: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method(Method::POST).uri(path);
        if let Some(key) = key {
            builder = builder.header("x-api-key", key);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // The default config carries the development API key.
    const API_KEY: &str = "dev-api-key";

    #[tokio::test]
    async fn test_wrong_api_key_is_forbidden() {
        let req = post("/webhook/carrier/load_search", Some("wrong-key"), "{}");
        let response = route(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let payload = body_json(response).await;
        assert_eq!(payload["status"], "forbidden");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_forbidden() {
        let req = post("/webhook/carrier/verify_mc", None, r#"{"mc_number": "MC123456"}"#);
        let response = route(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/nope")
            .body(Body::empty())
            .unwrap();
        let response = route(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload = body_json(response).await;
        assert_eq!(payload["status"], "not_found");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let req = post("/webhook/carrier/load_search", Some(API_KEY), "{not json");
        let response = route(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = body_json(response).await;
        assert_eq!(payload["status"], "bad_request");
    }

    #[tokio::test]
    async fn test_verify_mc_without_number_prompts_for_it() {
        let req = post(
            "/webhook/carrier/verify_mc",
            Some(API_KEY),
            r#"{"conversation_id": "call-3"}"#,
        );
        let response = route(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["verified"], false);
        assert_eq!(payload["conversation_id"], "call-3");
        assert!(payload["say"].as_str().unwrap().contains("MC number"));
    }

    #[tokio::test]
    async fn test_unencodable_payload_is_server_error() {
        // serde_json rejects non-string map keys at encode time.
        let mut payload = std::collections::HashMap::new();
        payload.insert(vec![1u8], "x");
        let response = json_response(StatusCode::OK, &payload).unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
    }
}
