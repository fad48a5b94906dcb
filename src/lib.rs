// src/lib.rs
use actix_web::web;
use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod services;

use crate::services::{ImageProcessor, Orchestrator};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub image_processor: Arc<ImageProcessor>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            image_processor: Arc::new(ImageProcessor::new()),
        }
    }
}

/// Mounts every route under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/ai")
                    .route("/analyze", web::post().to(handlers::analyze_images))
                    .route("/detect-stack", web::post().to(handlers::detect_tech_stack))
                    .route("/generate-code", web::post().to(handlers::generate_code))
                    .route("/models", web::get().to(handlers::list_models))
                    .route("/models/test", web::get().to(handlers::test_model)),
            )
            .route("/health", web::get().to(handlers::health_check))
            .route("/health/ping", web::get().to(handlers::ping)),
    );
}
