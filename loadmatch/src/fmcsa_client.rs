//! FMCSA carrier authority verification
//!
//! Client for the federal carrier registry. A carrier is eligible only if
//! its MC number maps to an authority that is allowed to operate. The
//! registry being down must never take the call flow down with it, so
//! transport and payload problems degrade to an unverified result.

use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct Verification {
    pub verified: bool,
    pub carrier_name: String,
}

impl Verification {
    fn unverified() -> Self {
        Verification {
            verified: false,
            carrier_name: "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegistryResponse {
    #[serde(default)]
    content: Vec<RegistryEntry>,
}

#[derive(Debug, Deserialize)]
struct RegistryEntry {
    carrier: Option<CarrierInfo>,
}

#[derive(Debug, Deserialize)]
struct CarrierInfo {
    #[serde(rename = "allowedToOperate")]
    allowed_to_operate: Option<String>,
    #[serde(rename = "legalName")]
    legal_name: Option<String>,
}

pub struct FmcsaClient {
    http_client: reqwest::Client,
    base_url: String,
    web_key: Option<String>,
}

impl FmcsaClient {
    pub fn new(base_url: String, web_key: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            web_key,
        }
    }

    /// Verifies a carrier's MC number against the registry.
    pub async fn verify(&self, mc_number: &str) -> Verification {
        let docket = mc_number.replace("MC", "").replace("mc", "");
        let docket = docket.trim();

        let mut url = format!(
            "{}/carriers/docket-number/{}?format=json",
            self.base_url.trim_end_matches('/'),
            docket
        );
        if let Some(key) = &self.web_key {
            url.push_str(&format!("&webKey={}", key));
        }

        let response = match self
            .http_client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::error!("registry request failed for docket {}: {}", docket, e);
                return Verification::unverified();
            }
        };
        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                log::warn!("registry rejected docket {}: {}", docket, e);
                return Verification::unverified();
            }
        };
        let payload: RegistryResponse = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("unexpected registry payload for docket {}: {}", docket, e);
                return Verification::unverified();
            }
        };

        let verification = evaluate(payload);
        log::info!(
            "docket {} verification: verified={} carrier={}",
            docket,
            verification.verified,
            verification.carrier_name
        );
        verification
    }
}

fn evaluate(payload: RegistryResponse) -> Verification {
    let carrier = match payload.content.into_iter().next().and_then(|e| e.carrier) {
        Some(carrier) => carrier,
        None => return Verification::unverified(),
    };
    Verification {
        verified: carrier.allowed_to_operate.as_deref() == Some("Y"),
        carrier_name: carrier
            .legal_name
            .unwrap_or_else(|| "Unknown".to_string()),
    }
}
