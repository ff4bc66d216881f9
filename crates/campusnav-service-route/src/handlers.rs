//! Endpoint handlers.
//!
//! Each handler validates its input, runs the routing call on the blocking
//! pool and records the outcome metrics.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use campusnav_lib::{
    k_shortest_paths, route_through, shortest_path, Directions, Error as LibError, IntegratedPath,
    LatLng, MultiDestinationReport, PathResult, Result as LibResult, WeatherSnapshot,
};
use campusnav_service_shared::{
    failure_reason, from_lib_error, record_integrated_choice, record_path_nodes,
    record_route_calculated, record_route_distance, record_route_failed, AppState,
    IntegratedRequest, KPathsRequest, PathRequest, ProblemDetails, RequestId,
    RouteThroughRequest, ServiceResponse, Validate, WeatherQuery, WeatherTarget,
};

pub(crate) const SERVICE: &str = "route";

type HandlerResult<T> = Result<ServiceResponse<T>, ProblemDetails>;

/// Unwrap a JSON body and validate it, turning either failure into a 400.
fn accept<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
    request_id: &RequestId,
) -> Result<T, ProblemDetails> {
    let Json(request) = body.map_err(|rejection| {
        record_route_failed("validation_error", SERVICE);
        ProblemDetails::bad_request(rejection.body_text(), request_id.as_str())
    })?;
    request.validate(request_id.as_str()).map_err(|problem| {
        record_route_failed("validation_error", SERVICE);
        *problem
    })?;
    Ok(request)
}

/// Run `work` on the blocking pool and map library errors to problems.
async fn run_blocking<T, F>(request_id: &RequestId, work: F) -> Result<T, ProblemDetails>
where
    F: FnOnce() -> LibResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!(request_id = %request_id, error = %e, "routing failed");
            record_route_failed(failure_reason(&e), SERVICE);
            Err(from_lib_error(&e, request_id.as_str()))
        }
        Err(join_error) => {
            error!(request_id = %request_id, error = %join_error, "routing task aborted");
            record_route_failed("internal_error", SERVICE);
            Err(ProblemDetails::internal_error(
                "routing task did not complete",
                request_id.as_str(),
            ))
        }
    }
}

fn record_path(kind: &str, path: &PathResult) {
    record_route_calculated(kind, SERVICE);
    record_path_nodes(path.path.len(), kind);
    record_route_distance(path.distance, kind);
}

#[derive(Debug, Serialize)]
pub struct PathResponse {
    #[serde(flatten)]
    pub path: PathResult,
    pub hops: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions: Option<Directions>,
}

/// `POST /api/v1/path`
pub async fn path_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<PathRequest>, JsonRejection>,
) -> HandlerResult<PathResponse> {
    let request = accept(body, &request_id)?;
    info!(
        request_id = %request_id,
        campus = %request.campus,
        from = %request.from,
        to = %request.to,
        accessible = request.accessible,
        "handling path request"
    );

    let response = run_blocking(&request_id, move || {
        let graph = state.store().graph_for(&request.campus, request.accessible)?;
        let path = shortest_path(graph, &request.from, &request.to)?;
        let directions = request
            .directions
            .then(|| Directions::for_path(&path, state.config().walking_speed));
        Ok(PathResponse {
            hops: path.hop_count(),
            path,
            directions,
        })
    })
    .await?;

    record_path("path", &response.path);
    Ok(ServiceResponse::new(response))
}

#[derive(Debug, Serialize)]
pub struct KPathsResponse {
    pub count: usize,
    pub paths: Vec<PathResult>,
}

/// `POST /api/v1/k-paths`
pub async fn k_paths_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<KPathsRequest>, JsonRejection>,
) -> HandlerResult<KPathsResponse> {
    let request = accept(body, &request_id)?;
    info!(
        request_id = %request_id,
        campus = %request.campus,
        from = %request.from,
        to = %request.to,
        k = request.k,
        "handling k-paths request"
    );

    let paths = run_blocking(&request_id, move || {
        let graph = state.store().graph_for(&request.campus, request.accessible)?;
        k_shortest_paths(graph, &request.from, &request.to, request.k)
    })
    .await?;

    record_route_calculated("k_paths", SERVICE);
    if let Some(best) = paths.first() {
        record_path_nodes(best.path.len(), "k_paths");
    }
    Ok(ServiceResponse::new(KPathsResponse {
        count: paths.len(),
        paths,
    }))
}

/// `POST /api/v1/route-through`
///
/// A report with unreachable stops becomes a 422 problem that still lists
/// every leg.
pub async fn route_through_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<RouteThroughRequest>, JsonRejection>,
) -> HandlerResult<MultiDestinationReport> {
    let request = accept(body, &request_id)?;
    info!(
        request_id = %request_id,
        campus = %request.campus,
        from = %request.from,
        stops = request.stops.len(),
        "handling route-through request"
    );

    let report = run_blocking(&request_id, move || {
        let graph = state.store().graph_for(&request.campus, request.accessible)?;
        Ok(route_through(graph, &request.from, &request.stops))
    })
    .await?;

    if report.is_complete() {
        record_route_calculated("route_through", SERVICE);
        record_path_nodes(report.path.len(), "route_through");
        record_route_distance(report.total_distance, "route_through");
        return Ok(ServiceResponse::new(report));
    }

    let error = LibError::PartialMultiDestinationFailure {
        failed: report.failures(),
        total_legs: report.legs.len(),
        accumulated_distance: report.total_distance,
    };
    warn!(request_id = %request_id, error = %error, "some stops unreachable");
    record_route_failed(failure_reason(&error), SERVICE);
    Err(from_lib_error(&error, request_id.as_str()).with_extension("legs", &report.legs))
}

#[derive(Debug, Serialize)]
pub struct IntegratedResponse {
    #[serde(flatten)]
    pub route: IntegratedPath,
    pub outdoor_distance: f64,
    pub uses_tunnel: bool,
    pub weather_adjusted: bool,
    /// Absent when no weather was known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bad_weather: Option<bool>,
}

impl From<IntegratedPath> for IntegratedResponse {
    fn from(route: IntegratedPath) -> Self {
        Self {
            outdoor_distance: route.outdoor_distance(),
            uses_tunnel: route.uses_tunnel(),
            weather_adjusted: route.weather_adjusted(),
            bad_weather: route.weather.as_ref().map(WeatherSnapshot::is_bad),
            route,
        }
    }
}

/// `POST /api/v1/integrated`
///
/// Uses the request's `weather` when present, otherwise asks the live
/// provider about the midpoint of the endpoints.
pub async fn integrated_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<IntegratedRequest>, JsonRejection>,
) -> HandlerResult<IntegratedResponse> {
    let request = accept(body, &request_id)?;
    info!(
        request_id = %request_id,
        start = %request.start,
        end = %request.end,
        stops = request.stops.len(),
        supplied_weather = request.weather.is_some(),
        "handling integrated request"
    );

    let route = run_blocking(&request_id, move || {
        let query = request.to_query();
        match &request.weather {
            Some(weather) => state.router().plan(&query, Some(weather)),
            None => state.router().plan_with_live_weather(&query),
        }
    })
    .await?;

    let response = IntegratedResponse::from(route);
    record_route_calculated("integrated", SERVICE);
    record_route_distance(response.route.total_distance, "integrated");
    record_integrated_choice(response.uses_tunnel, response.weather_adjusted);
    Ok(ServiceResponse::new(response))
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub location: LatLng,
    #[serde(flatten)]
    pub snapshot: WeatherSnapshot,
    pub bad_weather: bool,
}

/// `GET /api/v1/weather?lat=..&lng=..` or `?campus=..`
pub async fn weather_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<WeatherQuery>,
) -> HandlerResult<WeatherResponse> {
    let location = match query.target(request_id.as_str()).map_err(|p| *p)? {
        WeatherTarget::Point(point) => point,
        WeatherTarget::Campus(campus) => {
            state
                .store()
                .campus(&campus)
                .map_err(|e| from_lib_error(&e, request_id.as_str()))?;
            state.directory().reference_point(&campus).ok_or_else(|| {
                ProblemDetails::bad_request(
                    format!("Campus '{}' has no known coordinates", campus),
                    request_id.as_str(),
                )
            })?
        }
    };

    let provider = state.weather().cloned().ok_or_else(|| {
        ProblemDetails::service_unavailable("live weather is not configured", request_id.as_str())
    })?;

    let snapshot = run_blocking(&request_id, move || provider.current_weather(location)).await?;
    Ok(ServiceResponse::new(WeatherResponse {
        location,
        bad_weather: snapshot.is_bad(),
        snapshot,
    }))
}

#[derive(Debug, Serialize)]
pub struct CampusSummary {
    pub name: String,
    pub nodes: usize,
    pub edges: usize,
    pub exits: usize,
    pub entrances: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_point: Option<LatLng>,
}

#[derive(Debug, Serialize)]
pub struct ConnectorSummary {
    pub from: String,
    pub to: String,
    /// Metres; the configured tunnel length applies when absent.
    pub distance: f64,
}

#[derive(Debug, Serialize)]
pub struct CampusesResponse {
    pub campuses: Vec<CampusSummary>,
    pub connectors: Vec<ConnectorSummary>,
}

/// `GET /api/v1/campuses`
pub async fn campuses_handler(State(state): State<AppState>) -> ServiceResponse<CampusesResponse> {
    let directory = state.directory();
    let mut campuses: Vec<CampusSummary> = state
        .store()
        .campus_names()
        .filter_map(|name| {
            let graph = state.store().graph_for(name, false).ok()?;
            Some(CampusSummary {
                name: name.to_string(),
                nodes: graph.node_count(),
                edges: graph.edge_count(),
                exits: directory.exits(name).len(),
                entrances: directory.entrances(name).len(),
                reference_point: directory.reference_point(name),
            })
        })
        .collect();
    campuses.sort_by(|a, b| a.name.cmp(&b.name));

    let tunnel_distance = state.config().tunnel_distance;
    let connectors = directory
        .connectors()
        .iter()
        .map(|c| ConnectorSummary {
            from: format!("{}:{}", c.from_campus, c.from_node),
            to: format!("{}:{}", c.to_campus, c.to_node),
            distance: c.distance.unwrap_or(tunnel_distance),
        })
        .collect();

    ServiceResponse::new(CampusesResponse {
        campuses,
        connectors,
    })
}
