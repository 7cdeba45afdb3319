use crate::errors::AppError;
use crate::models::{
    HoverRequest, MapResponse, RegionClickRequest, ResizeRequest, TimelineRequest,
    TimelineResponse, TooltipResponse, YearResponse,
};
use crate::state::AppState;
use crate::timeline::TimelineEvent;
use axum::{Json, extract::State, response::Html};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.lock().await;
    Html(dashboard.render_page())
}

pub async fn get_year(State(state): State<AppState>) -> Json<YearResponse> {
    let dashboard = state.dashboard.lock().await;
    let (min_year, max_year) = dashboard.year_domain();
    Json(YearResponse {
        year: dashboard.selected_year(),
        min_year,
        max_year,
    })
}

pub async fn timeline_event(
    State(state): State<AppState>,
    Json(payload): Json<TimelineRequest>,
) -> Result<Json<TimelineResponse>, AppError> {
    let event = parse_event(&payload)?;
    let mut dashboard = state.dashboard.lock().await;
    let changed = dashboard.timeline_event(event);

    Ok(Json(TimelineResponse {
        year: dashboard.selected_year(),
        mode: dashboard.timeline_mode().as_str().to_string(),
        changed,
        map_svg: changed.then(|| dashboard.map_html()),
        metrics_html: changed.then(|| dashboard.metrics_html()),
        timeline_html: dashboard.timeline_html(),
    }))
}

fn parse_event(payload: &TimelineRequest) -> Result<TimelineEvent, AppError> {
    let year_for = |action: &str| {
        payload
            .year
            .ok_or_else(|| AppError::bad_request(format!("action '{action}' requires a year")))
    };
    match payload.action.as_str() {
        "press" => Ok(TimelineEvent::Press),
        "scrub" => Ok(TimelineEvent::Scrub(year_for("scrub")?)),
        "release" => Ok(TimelineEvent::Release(year_for("release")?)),
        "dot" => Ok(TimelineEvent::DotClick(year_for("dot")?)),
        "play" => Ok(TimelineEvent::Play),
        "pause" => Ok(TimelineEvent::Pause),
        "tick" => Ok(TimelineEvent::Tick),
        "reset" => Ok(TimelineEvent::Reset),
        other => Err(AppError::bad_request(format!("unknown timeline action '{other}'"))),
    }
}

pub async fn map_hover(
    State(state): State<AppState>,
    Json(payload): Json<HoverRequest>,
) -> Json<TooltipResponse> {
    let mut dashboard = state.dashboard.lock().await;
    let tooltip = dashboard.hover(&payload.state, payload.entering);
    Json(TooltipResponse {
        tooltip,
        map_svg: Some(dashboard.map_html()),
    })
}

pub async fn map_click(
    State(state): State<AppState>,
    Json(payload): Json<RegionClickRequest>,
) -> Json<TooltipResponse> {
    let mut dashboard = state.dashboard.lock().await;
    let tooltip = dashboard.region_click(&payload.state);
    Json(TooltipResponse {
        tooltip,
        map_svg: Some(dashboard.map_html()),
    })
}

pub async fn map_resize(
    State(state): State<AppState>,
    Json(payload): Json<ResizeRequest>,
) -> Json<MapResponse> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.resize_map(payload.width);
    Json(MapResponse {
        map_svg: dashboard.map_html(),
    })
}
