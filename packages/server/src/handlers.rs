//! HTTP handler functions for the mausam map API.

use actix_web::{HttpResponse, web};
use mausam_map_region::markers::{MapMarker, build_markers};
use mausam_map_region::mode::ModeDescriptor;
use mausam_map_region_models::Mode;
use mausam_map_server_models::{
    ApiError, ApiErrorKind, ApiHealth, ApiMap, ApiMarker, ApiMode, ApiSnapshotInfo,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/modes`
///
/// Lists every display mode in navigation order.
pub async fn modes(state: web::Data<AppState>) -> HttpResponse {
    let modes: Vec<ApiMode> = state.modes.all().iter().map(api_mode).collect();
    HttpResponse::Ok().json(modes)
}

/// `GET /api/map/{mode}`
///
/// Returns the markers for a mode. Entering weather mode refreshes live
/// weather for every capital; entering any other mode discards the
/// current snapshot.
pub async fn map(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let descriptor = state.modes.resolve(&path);

    let snapshot = if descriptor.uses_live_weather {
        match state.weather.refresh_all(&descriptor.capitals).await {
            Some(set) => Some(set),
            // A newer refresh won; show whatever it published.
            None => state.weather.snapshot().await,
        }
    } else {
        state.weather.invalidate().await;
        None
    };

    let markers = build_markers(&descriptor, snapshot.as_deref())
        .into_iter()
        .map(api_marker)
        .collect();

    HttpResponse::Ok().json(ApiMap {
        mode: api_mode(&descriptor),
        markers,
        snapshot: snapshot.as_deref().map(ApiSnapshotInfo::from),
    })
}

/// `GET /api/detail/{mode}/{region}`
///
/// Returns the drill-down for one region: 404 when nothing matches, 502
/// when the backing dataset or forecast cannot be loaded.
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (mode_name, region) = path.into_inner();

    let Ok(mode) = mode_name.trim().parse::<Mode>() else {
        return HttpResponse::NotFound().json(ApiError {
            error: format!("Mode '{mode_name}' has no detail view"),
            kind: ApiErrorKind::NotFound,
        });
    };

    match state.details.resolve(mode, &region).await {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) if e.is_not_found() => HttpResponse::NotFound().json(ApiError {
            error: e.to_string(),
            kind: ApiErrorKind::NotFound,
        }),
        Err(e) => {
            log::error!("Failed to resolve {mode} detail for '{region}': {e}");
            HttpResponse::BadGateway().json(ApiError {
                error: format!("Failed to load {mode} data"),
                kind: ApiErrorKind::LoadFailed,
            })
        }
    }
}

fn api_mode(descriptor: &ModeDescriptor) -> ApiMode {
    ApiMode {
        name: descriptor.name.clone(),
        label: descriptor.label.clone(),
        color: descriptor.marker_color,
        icon: descriptor.marker_icon,
        detail_route: descriptor
            .detail_route
            .as_ref()
            .map(|route| route.template.clone()),
        dataset: descriptor.dataset,
        uses_live_weather: descriptor.uses_live_weather,
    }
}

fn api_marker(marker: MapMarker) -> ApiMarker {
    ApiMarker {
        state: marker.state,
        city: marker.city,
        lat: marker.lat,
        lon: marker.lon,
        color: marker.color,
        icon: marker.icon,
        title: marker.title,
        detail_path: marker.detail_path,
        weather: marker.weather.map(Into::into),
    }
}
