extern crate tracing_futures;

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde;

use std::sync::Arc;

use error::BackendError;
use mongodb::Client;
use rocket::http::Method;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedHeaders, AllowedOrigins};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::{Backend, Config};
use crate::data::SampleData;
use crate::error::ConfigurationError;
use crate::gateway::Gateways;
use crate::remote::mongo::MongoRecordService;
use crate::route::mount_api;

pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod gateway;
pub mod list;
pub mod middleware;
pub mod remote;
pub mod resp;
pub mod route;
pub mod screen;
pub mod util;

pub async fn create(log_level: Option<Level>) -> Result<Rocket<Build>, BackendError> {
    if let Some(l) = log_level {
        let subscriber = FmtSubscriber::builder().with_max_level(l).finish();

        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Unable to set global logger: {}", err);
        };
        if let Err(err) = tracing_log::LogTracer::init() {
            eprintln!("Unable to forward log records: {}", err);
        }
    }

    tracing::info!("Reading .env file...");
    if dotenv::dotenv().is_err() {
        tracing::warn!("Unable to load .env file.");
    }

    tracing::info!("Loading configuration...");
    let c = match Config::load() {
        Ok(c) => {
            tracing::info!("Configuration loaded.");
            c
        }
        Err(ConfigurationError::NotFound(_)) => {
            let c = Config::default();
            if c.save().is_err() {
                tracing::warn!("Unable to save generated configuration.");
            }
            c
        }
        Err(other) => {
            tracing::error!("Configuration error: {}", other);
            return Err(other.into());
        }
    };

    let gateways = match c.backend {
        Backend::Mock => {
            tracing::info!(
                "Serving bundled sample data with {}ms latency.",
                c.mock_latency_ms
            );
            Gateways::in_memory(SampleData::bundled()?, c.mock_latency())
        }
        Backend::Remote => {
            tracing::info!("Connecting to MongoDB: {}", c.mongodb_uri);
            let client = Client::with_uri_str(c.mongodb_uri.as_str()).await?;

            tracing::info!("Using MongoDB database: {}", c.mongodb_db);
            let db = client.database(c.mongodb_db.as_str());

            if let Err(e) = db.list_collections(None, None).await {
                tracing::error!("Unable to connect to MongoDB.");
                return Err(e.into());
            }

            Gateways::remote(Arc::new(MongoRecordService::new(db)))
        }
    };

    build(c, gateways)
}

/// Assembles the server around already constructed gateways.
pub fn build(c: Config, gateways: Gateways) -> Result<Rocket<Build>, BackendError> {
    tracing::info!("Starting HTTP server...");
    let mut r = rocket::build().manage(c).manage(gateways);

    tracing::info!("Setting up CORS...");
    let cors = rocket_cors::CorsOptions {
        allowed_origins: AllowedOrigins::All,
        allowed_methods: vec![Method::Get, Method::Put, Method::Post, Method::Delete]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: AllowedHeaders::All,
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors()?;

    r = r.attach(cors);
    r = mount_api(r);

    Ok(r)
}
