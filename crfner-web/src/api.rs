//! Rotas HTTP.
//!
//! | Rota            | Entrada                       | Saída                                  |
//! |-----------------|-------------------------------|----------------------------------------|
//! | `POST /predict` | `{"phrase": "..."}`           | `{"phrase", "annotations": [{mot, annotation}]}` |
//! | `POST /upload`  | multipart, campo `file`       | idem, com o texto extraído em `phrase` |
//! | `POST /features`| `{"phrase": "..."}`           | tokens com seus feature maps           |
//! | `GET /health`   | —                             | status e rótulos do modelo             |

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        DefaultBodyLimit, State,
    },
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use crfner_core::{AnnotationResult, LabelingPipeline, TokenFeatures};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};
use crate::extract::extract_text;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub phrase: String,
}

/// Monta o router com CORS, trace e limite de corpo.
pub fn create_router(state: Arc<AppState>) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.allowed_origin));

    Router::new()
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .route("/features", post(features_handler))
        .route("/upload", post(upload_handler))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(middleware)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(origin) {
            // Ecoa a origem só quando ela confere
            Ok(value) => AllowOrigin::list([value]),
            Err(_) => {
                warn!(origin, "invalid CORS origin, cross-origin requests disabled");
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "labels": state.pipeline.predictor().labels(),
    }))
}

/// Rotula um texto enviado como JSON.
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> ServerResult<Json<AnnotationResult>> {
    let Json(request) =
        payload.map_err(|rejection| ServerError::MalformedInput(rejection.body_text()))?;
    let result = run_pipeline(&state, move |pipeline| pipeline.annotate(&request.phrase)).await?;
    Ok(Json(result))
}

/// Mostra os tokens e as features que o modelo receberia, sem predição.
async fn features_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> ServerResult<Json<Vec<TokenFeatures>>> {
    let Json(request) =
        payload.map_err(|rejection| ServerError::MalformedInput(rejection.body_text()))?;
    let inspected =
        run_pipeline(&state, move |pipeline| Ok(pipeline.inspect(&request.phrase))).await?;
    Ok(Json(inspected))
}

/// Extrai o texto de um PDF/DOCX/texto enviado e o rotula.
async fn upload_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<AnnotationResult>> {
    let mut multipart =
        multipart.map_err(|rejection| ServerError::MalformedInput(rejection.body_text()))?;

    let mut document = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::MalformedInput(e.body_text()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::MalformedInput(e.body_text()))?;
            document = Some((filename, bytes));
            break;
        }
    }

    let Some((filename, bytes)) = document else {
        return Err(ServerError::MalformedInput("No file part".into()));
    };

    info!(filename = ?filename, bytes = bytes.len(), "document received");
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, filename.as_deref()))
        .await
        .map_err(|e| ServerError::Internal(format!("extraction task failed: {e}")))??;

    let result = run_pipeline(&state, move |pipeline| pipeline.annotate(&text)).await?;
    Ok(Json(result))
}

/// Roda um trabalho síncrono do pipeline fora do runtime assíncrono.
async fn run_pipeline<T, F>(state: &AppState, job: F) -> ServerResult<T>
where
    F: FnOnce(&LabelingPipeline) -> crfner_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let pipeline = state.pipeline.clone();
    tokio::task::spawn_blocking(move || job(&pipeline))
        .await
        .map_err(|e| ServerError::Internal(format!("pipeline task failed: {e}")))?
        .map_err(ServerError::from)
}
