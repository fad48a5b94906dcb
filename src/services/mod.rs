// src/services/mod.rs
pub mod catalog;
pub mod image_processor;
pub mod normalizer;
pub mod orchestrator;

pub use image_processor::ImageProcessor;
pub use orchestrator::Orchestrator;
