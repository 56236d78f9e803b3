use log::warn;
use once_cell::sync::OnceCell;
use serde_derive::Deserialize;
use std::sync::Mutex;

static INSTANCE: OnceCell<Mutex<RuntimeConfig>> = OnceCell::new();

pub fn instance() -> &'static Mutex<RuntimeConfig> {
    INSTANCE.get_or_init(|| Mutex::new(RuntimeConfig::new()))
}

#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    pub addr: String,
    pub metrics_addr: String,
    pub api_key: String,
    pub fmcsa_url: String,
    pub fmcsa_api_key: Option<String>,
    pub seed_path: Option<String>,
    pub journal_path: String,
    pub equipment_types: Vec<String>,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        RuntimeConfig {
            addr: "0.0.0.0:8000".to_string(),
            metrics_addr: "0.0.0.0:8010".to_string(),
            api_key: "dev-api-key".to_string(),
            fmcsa_url: "https://mobile.fmcsa.dot.gov/qc/services".to_string(),
            fmcsa_api_key: None,
            seed_path: None,
            journal_path: "call_journal.bin".to_string(),
            equipment_types: vec![
                "Dry Van".to_string(),
                "Flatbed".to_string(),
                "Reefer".to_string(),
                "Power Only".to_string(),
            ],
        }
    }

    pub fn from_toml(path: &str) -> Option<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "Something went wrong reading the runtime config file, {:?}",
                    e
                );
                return Some(RuntimeConfig::new());
            }
        };
        let config: RuntimeConfig = match toml::from_str(&contents) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "Something went wrong reading the runtime config file, {:?}",
                    e
                );
                return Some(RuntimeConfig::new());
            }
        };
        *instance().lock().unwrap() = config.clone();
        Some(config)
    }
}
