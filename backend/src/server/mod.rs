//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub(crate) use metrics::make_metrics;

#[cfg(feature = "metrics")]
use metrics::{MetricsLayer, lookup_metrics};
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use nft_frames::doc::ApiDoc;
#[cfg(not(feature = "metrics"))]
use nft_frames::domain::ports::NoOpLookupMetrics;
use nft_frames::inbound::http::HttpState;
use nft_frames::inbound::http::frames;
use nft_frames::inbound::http::health::{HealthState, live, ready};
use nft_frames::Trace;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    base_path: String,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        base_path,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(web::scope(&base_path).configure(frames::configure));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when an adapter cannot be built, metric
/// registration fails, or the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let bind_addr = config.bind_addr();

    #[cfg(feature = "metrics")]
    let lookups = lookup_metrics(config.prometheus.as_ref())?;
    #[cfg(not(feature = "metrics"))]
    let lookups = std::sync::Arc::new(NoOpLookupMetrics);

    let http_state = build_http_state(&config.frame, lookups)?;
    let base_path = config.frame.base_path.clone();

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from(config.prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            base_path: base_path.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use nft_frames::settings::FrameSettings;
    use std::sync::Arc;

    fn deps(base_path: &str) -> AppDependencies {
        let config = FrameSettings {
            alchemy_api_key: Some("key".to_owned()),
            base_path: Some(base_path.to_owned()),
            ..FrameSettings::default()
        }
        .validate()
        .expect("valid settings");
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: build_http_state(&config, Arc::new(nft_frames::domain::ports::NoOpLookupMetrics))
                .expect("state builds"),
            base_path: config.base_path,
        }
    }

    #[actix_web::test]
    async fn mounts_frames_under_the_base_path() {
        let app = test::init_service(build_app(deps("/frames"))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/frames/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("trace-id"));

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn health_probes_sit_outside_the_base_path() {
        let app = test::init_service(build_app(deps("/api"))).await;

        for path in ["/health/ready", "/health/live"] {
            let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{path}");
        }
    }
}
