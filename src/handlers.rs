// src/handlers.rs
use crate::{AppState, errors::BeforeAfterError, models::*, services::catalog};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;
use log::info;
use serde::Deserialize;
use std::collections::HashMap;

pub const MAX_CODE_FILES: usize = 10;
/// Upper bound for non-file form fields (provider, model, key, framework).
pub const MAX_FIELD_BYTES: usize = 4096;

struct UploadedFile {
    filename: String,
    data: Bytes,
}

/// Files sent under `file_field` plus every other field as text.
struct FormData {
    files: Vec<UploadedFile>,
    fields: HashMap<String, String>,
}

impl FormData {
    fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn provider(&self) -> Result<Provider, BeforeAfterError> {
        self.text("aiProvider")
            .as_deref()
            .unwrap_or(Provider::OpenAI.as_str())
            .parse()
    }
}

async fn read_form(mut payload: Multipart, file_field: &str) -> Result<FormData, Error> {
    let mut form = FormData {
        files: Vec::new(),
        fields: HashMap::new(),
    };

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().to_string();
        let filename = field
            .content_disposition()
            .get_filename()
            .map(|filename| filename.to_string());

        let is_file = name == file_field;
        let mut data = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            if !is_file && data.len() + chunk.len() > MAX_FIELD_BYTES {
                return Err(BeforeAfterError::Validation(format!(
                    "Field '{}' exceeds {} bytes",
                    name, MAX_FIELD_BYTES
                ))
                .into());
            }
            data.extend_from_slice(&chunk);
        }

        if is_file {
            form.files.push(UploadedFile {
                filename: filename.unwrap_or_else(|| "upload".to_string()),
                data: data.freeze(),
            });
        } else {
            form.fields
                .insert(name, String::from_utf8_lossy(&data).into_owned());
        }
    }

    Ok(form)
}

pub async fn analyze_images(
    payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let form = read_form(payload, "images").await?;

    if form.files.len() != 2 {
        return Err(BeforeAfterError::InputArity(
            "Two images are required for comparison".to_string(),
        )
        .into());
    }

    let provider = form.provider()?;

    if let Some(project_id) = form.text("projectId") {
        info!("Analysis requested for project {}", project_id);
    }

    let mut images = Vec::with_capacity(2);
    for file in &form.files {
        let (width, height) = data.image_processor.validate_image(&file.data)?;
        info!("Received {} ({}x{})", file.filename, width, height);
        images.push(Bytes::from(
            data.image_processor.prepare_for(provider, &file.data)?,
        ));
    }
    let target = images.pop().unwrap_or_default();
    let current = images.pop().unwrap_or_default();

    let request = AnalysisRequest {
        current,
        target,
        framework: form.text("framework"),
        provider,
        model: form.text("aiModel"),
        api_key: form.text("apiKey"),
    };

    let result = data.orchestrator.analyze_images(&request).await?;

    Ok(HttpResponse::Ok().json(&result))
}

pub async fn detect_tech_stack(
    payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let form = read_form(payload, "codeFiles").await?;

    if form.files.is_empty() {
        return Err(
            BeforeAfterError::InputArity("At least one code file is required".to_string()).into(),
        );
    }
    if form.files.len() > MAX_CODE_FILES {
        return Err(BeforeAfterError::InputArity(format!(
            "At most {} code files are accepted",
            MAX_CODE_FILES
        ))
        .into());
    }

    let request = TechStackRequest {
        provider: form.provider()?,
        model: form.text("aiModel"),
        api_key: form.text("apiKey"),
        files: form
            .files
            .iter()
            .map(|file| CodeFile::new(&file.filename, String::from_utf8_lossy(&file.data)))
            .collect(),
    };

    let result = data.orchestrator.detect_tech_stack(&request).await?;

    Ok(HttpResponse::Ok().json(&result))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeBody {
    #[serde(flatten)]
    pub options: GenerateCodeOptions,
    pub ai_provider: Option<String>,
    pub ai_model: Option<String>,
    pub api_key: Option<String>,
}

pub async fn generate_code(
    body: web::Json<GenerateCodeBody>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let body = body.into_inner();

    let provider = body
        .ai_provider
        .as_deref()
        .unwrap_or(Provider::OpenAI.as_str())
        .parse::<Provider>()?;

    if body.options.framework.trim().is_empty() || body.options.description.trim().is_empty() {
        return Err(BeforeAfterError::Validation(
            "framework and description are required".to_string(),
        )
        .into());
    }

    let request = CodeGenRequest {
        options: body.options,
        provider,
        model: body.ai_model,
        api_key: body.api_key,
    };

    let result = data.orchestrator.generate_code(&request).await?;

    Ok(HttpResponse::Ok().json(&result))
}

#[derive(Debug, Deserialize)]
pub struct ModelsQuery {
    pub provider: Option<String>,
}

pub async fn list_models(query: web::Query<ModelsQuery>) -> HttpResponse {
    match query
        .provider
        .as_deref()
        .and_then(|name| name.parse::<Provider>().ok())
    {
        Some(provider) => HttpResponse::Ok().json(catalog::provider_catalog(provider)),
        None => HttpResponse::Ok().json(catalog::full_catalog()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTestQuery {
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
}

pub async fn test_model(
    query: web::Query<ModelTestQuery>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let availability = data
        .orchestrator
        .test_model(&query.provider, &query.model, query.api_key.as_deref())
        .await;
    HttpResponse::Ok().json(availability)
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "beforeafter",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "pong" }))
}
