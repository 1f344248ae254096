use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};

use crate::{
    handlers::{auth, dive_sites, dives, experience_levels},
    state::AppState,
};

pub fn app_router(state: Arc<AppState>) -> Router {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(1)
            .burst_size(10)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    let login = Router::new()
        .route("/", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/revoke", post(auth::revoke))
        .route_layer(GovernorLayer::new(governor_conf));

    let dives = Router::new()
        .route("/", get(dives::list).post(dives::create))
        .route(
            "/{id}",
            get(dives::get).put(dives::update).delete(dives::delete),
        );

    let dive_sites = Router::new()
        .route("/", get(dive_sites::list).post(dive_sites::create))
        .route(
            "/{id}",
            get(dive_sites::get)
                .put(dive_sites::update)
                .delete(dive_sites::delete),
        );

    Router::new()
        .nest("/login", login)
        .nest("/dives", dives)
        .nest("/divesites", dive_sites)
        .route("/experiencelevels", get(experience_levels::list))
        .with_state(state)
}
