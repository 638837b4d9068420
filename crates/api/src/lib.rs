mod rate_limit;

use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use agro_agents::{webhook, SessionOrchestrator};
use agro_core::locale;
use agro_core::models::{AgroError, Language, ReplyChannel};
use agro_core::prediction::{predict_yield, YieldParams};
use agro_engine::{RecognitionEngine, TrainingSnapshot, MIN_TRAINING_IMAGES};
use agro_observability::AppMetrics;
use agro_transport::{Transport, TwilioRelay};
use anyhow::Result;
use axum::extract::{Json, Path as AxumPath, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{body::Body, Router};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::rate_limit::IpRateLimiter;

type SurfaceMap = Arc<RwLock<HashMap<String, Arc<SessionOrchestrator<Transport>>>>>;

#[derive(Clone)]
pub struct ApiState {
    pub engine: RecognitionEngine,
    pub transport: Arc<Transport>,
    pub surfaces: SurfaceMap,
    pub relay: Option<Arc<TwilioRelay>>,
    pub metrics: Arc<AppMetrics>,
    pub api_key: String,
    pub limiter: IpRateLimiter,
    pub allowed_origins: Arc<Vec<String>>,
    pub local_delay: Duration,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: agro_observability::MetricsSnapshot,
    capabilities: HealthCapabilities,
}

#[derive(Debug, Serialize)]
struct HealthCapabilities {
    remote_assistant: bool,
    whatsapp_relay: bool,
    model_trained: bool,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    surface_id: Option<String>,
    text: String,
    language: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    surface_id: String,
    reply_text: String,
    channel: ReplyChannel,
    language: Language,
}

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    image: String,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrainingImageRequest {
    plant_type: String,
    image: String,
}

#[derive(Debug, Deserialize)]
struct WhatsAppConnectRequest {
    phone_number: String,
}

#[derive(Debug, Deserialize)]
struct WhatsAppWebhookRequest {
    body: String,
}

pub async fn build_app() -> Result<Router> {
    let metrics = AppMetrics::shared();
    let engine = match env::var("AGRO_TRAINING_TICK_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
    {
        Some(tick_ms) => {
            RecognitionEngine::new().with_training_tick(Duration::from_millis(tick_ms))
        }
        None => RecognitionEngine::new(),
    };
    let transport = Arc::new(Transport::from_env());
    let relay = TwilioRelay::from_env().map(Arc::new);

    let api_key = env::var("AGRO_API_KEY").unwrap_or_else(|_| "dev-agro-key".to_string());
    let rate_limit_window = Duration::from_secs(
        env::var("AGRO_API_RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(60),
    );
    let rate_limit_max = env::var("AGRO_API_RATE_LIMIT_MAX")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(80);
    let local_delay = Duration::from_millis(
        env::var("AGRO_LOCAL_RESOLVER_DELAY_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(1000),
    );
    let allowed_origins = parse_allowed_origins();

    let state = ApiState {
        engine,
        transport,
        surfaces: Arc::new(RwLock::new(HashMap::new())),
        relay,
        metrics,
        api_key,
        limiter: IpRateLimiter::new(rate_limit_window, rate_limit_max),
        allowed_origins: Arc::new(allowed_origins),
        local_delay,
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/chat", post(chat))
        .route("/v1/surface/:surface_id", delete(surface_close))
        .route("/v1/yield", post(yield_predict))
        .route("/v1/classify", post(classify))
        .route("/v1/training/images", post(training_image_add))
        .route("/v1/training/start", post(training_start))
        .route("/v1/training/progress", get(training_progress))
        .route("/v1/whatsapp/connect", post(whatsapp_connect))
        .route("/v1/whatsapp/webhook", post(whatsapp_webhook))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        capabilities: HealthCapabilities {
            remote_assistant: state.transport.is_remote(),
            whatsapp_relay: state.relay.is_some(),
            model_trained: state.engine.is_trained(),
        },
    };
    (StatusCode::OK, Json(payload))
}

async fn chat(
    State(state): State<ApiState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let lang = Language::from_optional_str(request.language.as_deref());
    let surface_id = request
        .surface_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let orchestrator = {
        let mut surfaces = state.surfaces.write();
        surfaces
            .entry(surface_id.clone())
            .or_insert_with(|| {
                Arc::new(
                    SessionOrchestrator::new(state.transport.clone(), state.metrics.clone())
                        .with_local_delay(state.local_delay),
                )
            })
            .clone()
    };

    orchestrator.open().await;
    let reply = orchestrator.handle_turn(&request.text, lang).await;

    (
        StatusCode::OK,
        Json(ChatResponse {
            surface_id,
            reply_text: reply.reply_text,
            channel: reply.channel,
            language: reply.language,
        }),
    )
}

async fn surface_close(
    State(state): State<ApiState>,
    AxumPath(surface_id): AxumPath<String>,
) -> impl IntoResponse {
    let orchestrator = state.surfaces.write().remove(&surface_id);

    let closed = match orchestrator {
        Some(orchestrator) => {
            orchestrator.close().await;
            true
        }
        None => false,
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "surface_id": surface_id,
            "closed": closed
        })),
    )
}

async fn yield_predict(
    State(_state): State<ApiState>,
    Json(params): Json<YieldParams>,
) -> Response {
    match predict_yield(&params) {
        Ok(total) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "predicted_yield_quintals": total,
                "district": params.district,
                "unit": params.unit
            })),
        )
            .into_response(),
        Err(AgroError::InvalidInput(message)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "invalid_input",
                "message": message
            })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "prediction_failed",
                "message": error.to_string()
            })),
        )
            .into_response(),
    }
}

async fn classify(
    State(state): State<ApiState>,
    Json(request): Json<ClassifyRequest>,
) -> impl IntoResponse {
    let lang = Language::from_optional_str(request.language.as_deref());
    let result = state.engine.classify_image(&request.image, lang);
    state.metrics.inc_classification();

    let training_hint = if state.engine.is_trained() {
        None
    } else {
        Some(locale::training_hint(lang))
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "result": result,
            "training_hint": training_hint
        })),
    )
}

async fn training_image_add(
    State(state): State<ApiState>,
    Json(request): Json<TrainingImageRequest>,
) -> Response {
    if !state
        .engine
        .add_training_image(&request.plant_type, &request.image)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "unsupported_plant_type",
                "plant_type": request.plant_type
            })),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({ "accepted": true })),
    )
        .into_response()
}

async fn training_start(State(state): State<ApiState>) -> Response {
    let snapshot = state.engine.snapshot();
    let total: usize = snapshot.images_per_plant.values().sum();

    if snapshot.in_progress {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "error": "training_in_progress"
            })),
        )
            .into_response();
    }
    if total < MIN_TRAINING_IMAGES {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "error": "not_enough_images",
                "required": MIN_TRAINING_IMAGES,
                "total": total
            })),
        )
            .into_response();
    }

    state.metrics.inc_training_run();
    let engine = state.engine.clone();
    tokio::spawn(async move {
        let completed = engine.train_model().await;
        info!(completed, "training run finished");
    });

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "started": true })),
    )
        .into_response()
}

async fn training_progress(State(state): State<ApiState>) -> Json<TrainingSnapshot> {
    Json(state.engine.snapshot())
}

async fn whatsapp_connect(
    State(state): State<ApiState>,
    Json(request): Json<WhatsAppConnectRequest>,
) -> Response {
    let Some(relay) = state.relay.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "error": "relay_unconfigured",
                "message": "WhatsApp relay credentials are not configured"
            })),
        )
            .into_response();
    };

    match relay.send_welcome(&request.phone_number).await {
        Ok(message_sid) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "connected": true,
                "message_sid": message_sid
            })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "error": "relay_send_failed",
                "message": error.to_string()
            })),
        )
            .into_response(),
    }
}

async fn whatsapp_webhook(
    State(_state): State<ApiState>,
    Json(request): Json<WhatsAppWebhookRequest>,
) -> impl IntoResponse {
    let reply = webhook::inbound_reply(&request.body);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "reply": reply })),
    )
}

fn parse_allowed_origins() -> Vec<String> {
    env::var("AGRO_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let origins = if origins.is_empty() {
        vec![HeaderValue::from_static("http://localhost:5500")]
    } else {
        origins
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-api-key"),
        ])
}

fn is_public_endpoint(path: &str) -> bool {
    matches!(path, "/health")
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if request.method() == Method::OPTIONS || is_public_endpoint(path.as_str()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if header_key != state.api_key {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "unauthorized",
                "message": "missing or invalid x-api-key"
            })),
        )
            .into_response();
    }

    next.run(request).await
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if request.method() == Method::OPTIONS || is_public_endpoint(path.as_str()) {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    if !state.limiter.allow(&ip) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "rate_limited",
                "message": "rate limit exceeded for this IP"
            })),
        )
            .into_response();
    }

    next.run(request).await
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
