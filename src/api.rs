//! REST API for the load planning service.
//!
//! Provides HTTP endpoints for the frontend. Uses Axum as the web framework
//! and supports CORS. Every request runs one full calculation pass; nothing is
//! cached between requests.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::OnceLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

use crate::config::ApiConfig;
use crate::estimate::{VolumeCount, estimate_by_volume, round_cbm};
use crate::fit::{LayerFit, Orientation};
use crate::model::{
    BoxDimensions, ContainerKind, ContainerProfile, PalletDimensions, PalletPreset,
};
use crate::solver::{Calculator, CalculatorConfig, ClassStack, ContainerFit, PalletFit};
use crate::units::{LengthUnit, round_for_display};

#[derive(Clone)]
struct ApiState {
    calculator: Calculator,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// Swagger UI assets are pinned to swagger-ui-dist 5.17.14 with SRI hashes;
// bump the version and both hashes together.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>pallet-fit API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                window.ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                });
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Raw carton dimensions as entered, in `unit`.
///
/// Missing values count as 0 and produce an incomplete result with zero stack
/// depth and box totals.
#[derive(Deserialize, Clone, Copy, Debug, Default, ToSchema)]
pub struct RawBox {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl RawBox {
    fn as_tuple(&self) -> (f64, f64, f64) {
        (
            self.length.unwrap_or(0.0),
            self.width.unwrap_or(0.0),
            self.height.unwrap_or(0.0),
        )
    }
}

/// Pallet selection. `length` and `width` are only read for the `custom` preset.
#[derive(Deserialize, Clone, Copy, Debug, Default, ToSchema)]
pub struct PalletRequest {
    #[serde(default)]
    #[schema(nullable = true)]
    pub preset: Option<PalletPreset>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub base_height: Option<f64>,
}

#[derive(Deserialize, ToSchema)]
#[schema(
    example = json!({
        "box": { "length": 40.0, "width": 30.0, "height": 20.0 },
        "unit": "cm",
        "pallet": { "preset": "standard", "base_height": 15.0 }
    })
)]
pub struct CalculateRequest {
    #[serde(rename = "box")]
    pub carton: RawBox,
    #[serde(default)]
    #[schema(nullable = true)]
    pub unit: Option<LengthUnit>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub pallet: Option<PalletRequest>,
}

/// Response of `/calculate`.
#[derive(Serialize, ToSchema)]
pub struct CalculationResponse {
    /// Carton in centimetres, rounded to one decimal.
    #[serde(rename = "box")]
    pub carton: BoxDimensions,
    pub pallet_preset: PalletPreset,
    pub pallet: PalletDimensions,
    pub per_pallet: PalletFit,
    /// 20GP, 40GP and 40HQ in that order.
    pub containers: Vec<ContainerFit>,
    pub complete: bool,
    #[schema(nullable = true)]
    pub incomplete_reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "length": 50.0, "width": 40.0, "height": 30.0, "unit": "cm" }))]
pub struct EstimateRequest {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub unit: Option<LengthUnit>,
}

/// Response of `/estimate`.
#[derive(Serialize, ToSchema)]
pub struct EstimateResponse {
    /// Carton volume in m³, rounded to four decimals.
    pub box_cbm: f64,
    pub per_container: Vec<VolumeCount>,
}

#[derive(Serialize, ToSchema)]
pub struct PalletPresetInfo {
    pub preset: PalletPreset,
    pub label: String,
    pub dimensions: PalletDimensions,
}

#[derive(Serialize, ToSchema)]
pub struct ContainerProfileInfo {
    pub kind: ContainerKind,
    pub inner_length: f64,
    pub inner_width: f64,
    pub height_limit: f64,
    pub nominal_volume_cbm: f64,
}

impl From<ContainerProfile> for ContainerProfileInfo {
    fn from(profile: ContainerProfile) -> Self {
        Self {
            kind: profile.kind,
            inner_length: profile.inner_length,
            inner_width: profile.inner_width,
            height_limit: profile.height_limit,
            nominal_volume_cbm: profile.nominal_volume_cbm,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

impl CalculateRequest {
    fn run(self, calculator: &Calculator) -> CalculationResponse {
        let config: &CalculatorConfig = calculator.config();
        let pallet_request = self.pallet.unwrap_or_default();
        let preset = pallet_request.preset.unwrap_or(config.default_preset);
        let pallet = config.resolve_pallet(
            Some(preset),
            pallet_request.length,
            pallet_request.width,
            pallet_request.base_height,
        );

        let (input, result) = calculator.calculate_raw(self.carton.as_tuple(), self.unit, pallet);
        let incomplete_reason = input
            .carton
            .check_complete()
            .and(input.pallet.check_complete())
            .err()
            .map(|err| err.to_string());

        CalculationResponse {
            carton: BoxDimensions::new(
                round_for_display(input.carton.length),
                round_for_display(input.carton.width),
                round_for_display(input.carton.height),
            ),
            pallet_preset: preset,
            pallet: input.pallet,
            per_pallet: result.pallet,
            containers: result.containers.to_vec(),
            complete: result.complete,
            incomplete_reason,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_calculate, handle_estimate, list_pallets, list_containers),
    components(
        schemas(
            CalculateRequest,
            RawBox,
            PalletRequest,
            CalculationResponse,
            EstimateRequest,
            EstimateResponse,
            PalletPresetInfo,
            ContainerProfileInfo,
            ErrorResponse,
            BoxDimensions,
            PalletDimensions,
            PalletPreset,
            LengthUnit,
            ContainerKind,
            PalletFit,
            ClassStack,
            LayerFit,
            Orientation,
            ContainerFit,
            VolumeCount
        )
    ),
    tags((name = "calculation", description = "Pallet and container load planning"))
)]
struct ApiDoc;

/// Builds the application router.
pub fn build_router(calculator: Calculator, docs_enabled: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { calculator };

    let mut router = Router::new()
        .route("/calculate", post(handle_calculate))
        .route("/estimate", post(handle_estimate))
        .route("/pallets", get(list_pallets))
        .route("/containers", get(list_containers));

    if docs_enabled {
        router = router
            .route("/docs/openapi.json", get(serve_openapi_json))
            .route("/docs", get(serve_openapi_ui));
    }

    router.layer(cors).with_state(state)
}

/// Starts the API server.
///
/// Configures CORS for cross-origin requests from the frontend.
/// Blocks until the server is terminated.
pub async fn start_api_server(config: ApiConfig, calculator_config: CalculatorConfig) {
    let app = build_router(Calculator::new(calculator_config), config.docs_enabled());

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Could not bind API server to {}: {}", addr, err);
            return;
        }
    };

    let display_host = config.display_host().to_string();
    info!("Server running on http://{}:{}", display_host, config.port());
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        info!("Local access: http://localhost:{}", config.port());
    }
    info!("API endpoints: POST /calculate, POST /estimate, GET /pallets, GET /containers");
    if config.docs_enabled() {
        info!("Documentation: GET /docs, GET /docs/openapi.json");
    }

    if let Err(err) = axum::serve(listener, app).await {
        error!("API server terminated with an error: {err}");
    }
}

/// Handler for POST /calculate.
///
/// Runs the pallet and container calculation for one carton. Incomplete
/// dimensions are not an error; stack depth and totals are zeroed and the
/// response is flagged instead.
#[utoipa::path(
    post,
    path = "/calculate",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Calculated pallet and container load", body = CalculationResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "calculation"
)]
async fn handle_calculate(
    State(state): State<ApiState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };

    let response = request.run(&state.calculator);
    info!(
        complete = response.complete,
        layer_capacity = response.per_pallet.layer_capacity(),
        "Calculated load for pallet {:?}",
        response.pallet_preset
    );

    (StatusCode::OK, Json(response)).into_response()
}

/// Handler for POST /estimate.
///
/// Quick carton count per container by volume, ignoring pallets.
#[utoipa::path(
    post,
    path = "/estimate",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Volume-based estimate", body = EstimateResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "calculation"
)]
async fn handle_estimate(
    State(state): State<ApiState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };

    let unit = request
        .unit
        .unwrap_or(state.calculator.config().default_unit);
    let estimate = estimate_by_volume(
        request.length.unwrap_or(0.0),
        request.width.unwrap_or(0.0),
        request.height.unwrap_or(0.0),
        unit,
    );

    let response = EstimateResponse {
        box_cbm: round_cbm(estimate.box_cbm),
        per_container: estimate.per_container.to_vec(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Handler for GET /pallets.
#[utoipa::path(
    get,
    path = "/pallets",
    responses((status = 200, description = "Available pallet presets", body = [PalletPresetInfo])),
    tag = "calculation"
)]
async fn list_pallets(State(state): State<ApiState>) -> Json<Vec<PalletPresetInfo>> {
    let config = state.calculator.config();
    let presets = PalletPreset::ALL
        .iter()
        .map(|&preset| PalletPresetInfo {
            preset,
            label: preset.label().to_string(),
            dimensions: config.resolve_pallet(Some(preset), None, None, None),
        })
        .collect();
    Json(presets)
}

/// Handler for GET /containers.
#[utoipa::path(
    get,
    path = "/containers",
    responses((status = 200, description = "Supported container profiles", body = [ContainerProfileInfo])),
    tag = "calculation"
)]
async fn list_containers() -> Json<Vec<ContainerProfileInfo>> {
    Json(
        ContainerProfile::all()
            .into_iter()
            .map(ContainerProfileInfo::from)
            .collect(),
    )
}

async fn serve_openapi_json() -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        build_router(Calculator::default(), true)
    }

    async fn post_json(router: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build");
        let response = router.oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let value = serde_json::from_slice(&bytes).expect("response should be JSON");
        (status, value)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        let response = router.oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let value = serde_json::from_slice(&bytes).expect("response should be JSON");
        (status, value)
    }

    #[test]
    fn openapi_doc_lists_expected_paths() {
        let doc = openapi_doc();
        let paths = &doc.paths.paths;
        for path in ["/calculate", "/estimate", "/pallets", "/containers"] {
            assert!(
                paths.contains_key(path),
                "OpenAPI documentation is missing the {} path",
                path
            );
        }
    }

    #[test]
    fn openapi_doc_contains_key_schemas() {
        let doc = openapi_doc();
        let components = doc
            .components
            .as_ref()
            .expect("OpenAPI documentation contains no components");
        for name in ["CalculateRequest", "CalculationResponse", "ErrorResponse"] {
            assert!(
                components.schemas.contains_key(name),
                "Expected schema '{}' is missing from OpenAPI spec",
                name
            );
        }
    }

    #[test]
    fn calculate_request_defaults_pallet_and_unit() {
        let json = r#"{ "box": { "length": 40.0, "width": 30.0, "height": 20.0 } }"#;
        let request: CalculateRequest = serde_json::from_str(json).expect("Should parse valid JSON");
        assert!(request.unit.is_none());
        assert!(request.pallet.is_none());

        let response = request.run(&Calculator::default());
        assert_eq!(response.pallet_preset, PalletPreset::Standard);
        assert_eq!(response.pallet, PalletDimensions::new(120.0, 100.0, 15.0));
        assert!(response.complete);
    }

    #[test]
    fn calculate_request_rejects_unknown_preset() {
        let json = r#"{ "box": { "length": 40.0 }, "pallet": { "preset": "block" } }"#;
        assert!(serde_json::from_str::<CalculateRequest>(json).is_err());
    }

    #[test]
    fn calculate_request_accepts_short_preset_names() {
        let json = r#"{ "box": { "length": 40, "width": 30, "height": 20 }, "pallet": { "preset": "eur" } }"#;
        let request: CalculateRequest = serde_json::from_str(json).expect("Should parse valid JSON");
        let response = request.run(&Calculator::default());
        assert_eq!(response.pallet_preset, PalletPreset::Euro);
        assert_eq!(response.pallet, PalletPreset::Euro.dimensions());
    }

    #[test]
    fn negative_base_height_is_reported_without_boxes() {
        let json = r#"{
            "box": { "length": 40, "width": 30, "height": 20 },
            "pallet": { "base_height": -40 }
        }"#;
        let request: CalculateRequest = serde_json::from_str(json).expect("Should parse valid JSON");
        let response = request.run(&Calculator::default());

        assert!(!response.complete);
        let reason = response.incomplete_reason.expect("reason should be set");
        assert!(reason.contains("Pallet base height"), "unexpected reason: {}", reason);
        assert_eq!(response.per_pallet.standard.layers, 0);
        assert!(response.containers.iter().all(|c| c.total_boxes == 0));
    }

    #[test]
    fn calculate_request_uses_custom_pallet_sides() {
        let json = r#"{
            "box": { "length": 400, "width": 300, "height": 200 },
            "unit": "mm",
            "pallet": { "preset": "custom", "length": 80.0, "width": 60.0, "base_height": 0.0 }
        }"#;
        let request: CalculateRequest = serde_json::from_str(json).expect("Should parse valid JSON");
        let response = request.run(&Calculator::default());

        assert_eq!(response.carton, BoxDimensions::new(40.0, 30.0, 20.0));
        assert_eq!(response.pallet, PalletDimensions::new(80.0, 60.0, 0.0));
        // 80 / 40 = 2, 60 / 30 = 2
        assert_eq!(response.per_pallet.layer_capacity(), 4);
        // 228 / 20 = 11
        assert_eq!(response.per_pallet.standard.layers, 11);
    }

    #[test]
    fn missing_height_is_reported_not_rejected() {
        let json = r#"{ "box": { "length": 40.0, "width": 30.0 } }"#;
        let request: CalculateRequest = serde_json::from_str(json).expect("Should parse valid JSON");
        let response = request.run(&Calculator::default());

        assert!(!response.complete);
        let reason = response.incomplete_reason.expect("reason should be set");
        assert!(reason.contains("Box height"), "unexpected reason: {}", reason);
        assert!(response.containers.iter().all(|c| c.total_boxes == 0));
    }

    #[tokio::test]
    async fn calculate_endpoint_returns_three_containers() {
        let body = r#"{ "box": { "length": 40, "width": 30, "height": 20 }, "unit": "cm" }"#;
        let (status, value) = post_json(router(), "/calculate", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["per_pallet"]["layer"]["count"], 9);
        assert_eq!(value["per_pallet"]["standard"]["layers"], 10);
        assert_eq!(value["per_pallet"]["standard"]["stack_height"], 215.0);

        let containers = value["containers"].as_array().expect("containers array");
        assert_eq!(containers.len(), 3);
        assert_eq!(containers[2]["kind"], "40HQ");
        assert_eq!(containers[2]["pallets_on_floor"], 20);
        assert_eq!(containers[2]["orientation"], "standard");
        assert_eq!(containers[2]["total_boxes"], 20 * 9 * 12);
        assert_eq!(value["complete"], true);
        assert!(value["incomplete_reason"].is_null());
    }

    #[tokio::test]
    async fn calculate_endpoint_rejects_malformed_json() {
        let (status, value) = post_json(router(), "/calculate", "{ not json").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(value["error"], "Invalid JSON data");
    }

    #[tokio::test]
    async fn estimate_endpoint_rounds_volume() {
        let body = r#"{ "length": 10, "width": 10, "height": 10, "unit": "inch" }"#;
        let (status, value) = post_json(router(), "/estimate", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["box_cbm"], 0.0164);
        let counts = value["per_container"].as_array().expect("per_container array");
        assert_eq!(counts.len(), 3);
        // 28 / 0.016387064 = 1708.6
        assert_eq!(counts[0]["boxes"], 1708);
    }

    #[tokio::test]
    async fn estimate_endpoint_without_volume_has_no_counts() {
        let (status, value) = post_json(router(), "/estimate", r#"{ "length": 10 }"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["box_cbm"], 0.0);
        assert!(value["per_container"][1]["boxes"].is_null());
    }

    #[tokio::test]
    async fn pallets_endpoint_lists_presets() {
        let (status, value) = get_json(router(), "/pallets").await;
        assert_eq!(status, StatusCode::OK);
        let presets = value.as_array().expect("preset array");
        assert_eq!(presets.len(), PalletPreset::ALL.len());
        assert_eq!(presets[1]["preset"], "euro");
        assert_eq!(presets[1]["dimensions"]["width"], 80.0);
    }

    #[tokio::test]
    async fn containers_endpoint_lists_profiles() {
        let (status, value) = get_json(router(), "/containers").await;
        assert_eq!(status, StatusCode::OK);
        let profiles = value.as_array().expect("profile array");
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[0]["kind"], "20GP");
        assert_eq!(profiles[0]["inner_length"], 589.0);
        assert_eq!(profiles[2]["height_limit"], 258.0);
    }

    #[tokio::test]
    async fn docs_can_be_disabled() {
        let router = build_router(Calculator::default(), false);
        let request = Request::builder()
            .uri("/docs/openapi.json")
            .body(Body::empty())
            .expect("request should build");
        let response = router.oneshot(request).await.expect("router is infallible");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn docs_page_loads_local_openapi_document() {
        let request = Request::builder()
            .uri("/docs")
            .body(Body::empty())
            .expect("request should build");
        let response = router().oneshot(request).await.expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let html = String::from_utf8(bytes.to_vec()).expect("page should be UTF-8");
        assert!(html.contains(r#"url: "/docs/openapi.json""#));
        assert_eq!(html.matches("swagger-ui-dist@5.17.14/").count(), 2);
        assert_eq!(html.matches(r#"integrity="sha384-"#).count(), 2);
    }
}
