use crate::call_journal::CallJournal;
use crate::config;
use crate::engine::board::LoadBoard;
use crate::engine::data::Inventory;
use crate::engine::matchlogic::EngineConfig;
use crate::fmcsa_client::FmcsaClient;
use crate::metrics;
use crate::webhook_service;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response};
use once_cell::sync::OnceCell;
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tokio::sync::Mutex;

static INSTANCE: OnceCell<Mutex<Server>> = OnceCell::new();
pub fn instance() -> &'static Mutex<Server> {
    INSTANCE.get_or_init(|| Mutex::new(Server::builder()))
}

pub struct Server {
    pub(crate) board: Arc<LoadBoard>,
    pub(crate) journal: Arc<std::sync::Mutex<CallJournal>>,
    pub(crate) verifier: Arc<FmcsaClient>,
}

impl Server {
    fn builder() -> Self {
        let cfg = config::instance().lock().unwrap().clone();

        let inventory = match &cfg.seed_path {
            Some(path) => match Inventory::from_seed_file(path) {
                Ok(inventory) => {
                    log::info!("seeded {} loads from {}", inventory.len(), path);
                    inventory
                }
                Err(e) => {
                    log::warn!("failed to seed inventory from {}: {}", path, e);
                    Inventory::new()
                }
            },
            None => Inventory::new(),
        };

        let board = Arc::new(LoadBoard::new(
            inventory,
            EngineConfig {
                equipment_types: cfg.equipment_types.clone(),
            },
        ));
        let journal = CallJournal::open(&cfg.journal_path).expect("Call journal is unavailable");
        let verifier = Arc::new(FmcsaClient::new(cfg.fmcsa_url, cfg.fmcsa_api_key));

        Server {
            board,
            journal: Arc::new(std::sync::Mutex::new(journal)),
            verifier,
        }
    }

    pub async fn start(&mut self) {
        self.start_webhook_server().await;
        self.start_metrics_server().await;
    }

    pub fn stop(&mut self) {
        log::info!("server stop");
    }

    async fn start_webhook_server(&mut self) {
        let addr = config::instance()
            .lock()
            .unwrap()
            .addr
            .as_str()
            .parse()
            .unwrap();
        let make_svc = make_service_fn(move |_| async move {
            Ok::<_, hyper::Error>(service_fn(webhook_service::route))
        });
        let server = hyper::Server::bind(&addr).serve(make_svc);
        tokio::spawn(async move {
            tokio::pin!(server);
            server.await.unwrap()
        });
        log::info!("webhook server started on {}", addr);
    }

    async fn start_metrics_server(&mut self) {
        let addr = config::instance()
            .lock()
            .unwrap()
            .metrics_addr
            .as_str()
            .parse()
            .unwrap();
        let make_svc = make_service_fn(move |_| {
            let registry = metrics::REGISTRY_INSTANCE.clone();
            async move {
                Ok::<_, hyper::Error>(service_fn(move |_: Request<Body>| {
                    let registry = registry.clone();
                    async move {
                        let encoder = TextEncoder::new();
                        let metric_families = registry.gather();
                        let mut buffer = Vec::new();
                        encoder.encode(&metric_families, &mut buffer).unwrap();
                        Ok::<_, hyper::Error>(Response::new(Body::from(buffer)))
                    }
                }))
            }
        });
        metrics::init_registry();
        let server = hyper::Server::bind(&addr).serve(make_svc);
        tokio::spawn(async move {
            tokio::pin!(server);
            server.await.unwrap()
        });
        log::info!("metrics server started on {}", addr);
    }
}
