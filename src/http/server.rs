//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with every route
//! - Wire up middleware (request id, tracing, timeout, body limit, CORS)
//! - Serve static files as the fallback
//! - Own the price feed task for the lifetime of the server
//! - Shut down gracefully on signal

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::events::EventHub;
use crate::hardware::{DisconnectedDevice, HardwareWallet};
use crate::http::request::make_request_span;
use crate::http::{device, history, payment, wallet, websocket};
use crate::ledger::{LedgerClient, LedgerResult, Network, RippledClient};
use crate::observability::metrics;
use crate::price::{CoinMarketCapSource, PriceFeed};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub testnet: Arc<dyn LedgerClient>,
    pub mainnet: Arc<dyn LedgerClient>,
    pub hardware: Arc<dyn HardwareWallet>,
    /// Network the hardware wallet's account lives on.
    pub hardware_network: Network,
    pub events: EventHub,
}

impl AppState {
    pub fn new(
        testnet: Arc<dyn LedgerClient>,
        mainnet: Arc<dyn LedgerClient>,
        hardware: Arc<dyn HardwareWallet>,
        hardware_network: Network,
    ) -> Self {
        Self {
            testnet,
            mainnet,
            hardware,
            hardware_network,
            events: EventHub::new(),
        }
    }

    /// Build ledger clients for both networks from configuration.
    pub fn from_config(config: &GatewayConfig) -> LedgerResult<Self> {
        let testnet = RippledClient::new(Network::Testnet, config.testnet.clone())?;
        let mainnet = RippledClient::new(Network::Mainnet, config.mainnet.clone())?;

        Ok(Self::new(
            Arc::new(testnet),
            Arc::new(mainnet),
            Arc::new(DisconnectedDevice),
            config.hardware.network,
        ))
    }

    pub fn ledger(&self, network: Network) -> &Arc<dyn LedgerClient> {
        match network {
            Network::Testnet => &self.testnet,
            Network::Mainnet => &self.mainnet,
        }
    }
}

/// HTTP and WebSocket server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    price_feed: Option<PriceFeed>,
}

impl HttpServer {
    /// Create a new server over prepared state.
    pub fn new(config: GatewayConfig, state: AppState) -> Self {
        let price_feed = Self::build_price_feed(&config, &state.events);
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            price_feed,
        }
    }

    /// Use a specific price feed instead of the configured one.
    pub fn with_price_feed(mut self, feed: Option<PriceFeed>) -> Self {
        self.price_feed = feed;
        self
    }

    fn build_price_feed(config: &GatewayConfig, events: &EventHub) -> Option<PriceFeed> {
        if !config.price_feed.enabled {
            return None;
        }

        match CoinMarketCapSource::from_config(&config.price_feed) {
            Ok(source) => Some(PriceFeed::new(
                Arc::new(source),
                events.clone(),
                Duration::from_secs(config.price_feed.interval_secs),
            )),
            Err(e) => {
                tracing::warn!(error = %e, "Price feed disabled");
                None
            }
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/create_test_wallet", post(wallet::create_test_wallet))
            .route("/create_real_wallet", post(wallet::create_real_wallet))
            .route("/fund_wallet", post(wallet::fund_wallet))
            .route("/send_xrp", post(payment::send_xrp))
            .route("/fetch_transactions", get(history::fetch_transactions))
            .route("/get-ledger-xrp-balance", get(device::get_ledger_xrp_balance))
            .route("/send-xrp-from-ledger", post(device::send_xrp_from_ledger))
            .route("/ws", get(websocket::ws_handler))
            .route("/health", get(health))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state);

        if let Some(dir) = &config.http.static_dir {
            router = router.fallback_service(ServeDir::new(dir));
        }
        if config.http.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router
            .layer(RequestBodyLimitLayer::new(config.http.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.http.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Server listening at http://{}", addr);

        if let Some(feed) = self.price_feed {
            tokio::spawn(feed.run(shutdown.resubscribe()));
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

impl std::fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer")
            .field("bind_address", &self.config.listener.bind_address)
            .field("price_feed", &self.price_feed.is_some())
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    connections: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        connections: state.events.connection_count(),
    })
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(route, response.status().as_u16(), start);
    response
}
