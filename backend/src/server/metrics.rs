//! Prometheus wiring: the optional request middleware and the lookup counters
//! sharing its registry.

use std::io;
use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;

use nft_frames::domain::ports::{LookupMetrics, NoOpLookupMetrics};
use nft_frames::outbound::metrics::PrometheusLookupMetrics;

const METRICS_NAMESPACE: &str = "nft_frames";
const METRICS_ENDPOINT: &str = "/metrics";

/// Build the request metrics middleware serving `/metrics`.
///
/// # Errors
///
/// Returns an error when the default collectors cannot be registered.
pub(crate) fn make_metrics() -> io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(METRICS_NAMESPACE)
        .endpoint(METRICS_ENDPOINT)
        .build()
        .map_err(|err| io::Error::other(format!("prometheus middleware: {err}")))
}

/// Lookup counters registered on the middleware's registry, or a no-op when
/// metrics are disabled.
pub(crate) fn lookup_metrics(
    prometheus: Option<&PrometheusMetrics>,
) -> io::Result<Arc<dyn LookupMetrics>> {
    match prometheus {
        Some(prometheus) => PrometheusLookupMetrics::new(&prometheus.registry)
            .map(|metrics| Arc::new(metrics) as Arc<dyn LookupMetrics>)
            .map_err(|err| io::Error::other(format!("lookup metrics registration failed: {err}"))),
        None => Ok(Arc::new(NoOpLookupMetrics)),
    }
}

/// Request metrics middleware that can be switched off without changing the
/// app's type.
#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl From<Option<PrometheusMetrics>> for MetricsLayer {
    fn from(metrics: Option<PrometheusMetrics>) -> Self {
        metrics.map_or(Self::Disabled, |metrics| Self::Enabled(Arc::new(metrics)))
    }
}

type BoxedTransform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxedTransform;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Self::Enabled(metrics) = self else {
            let passthrough = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
            return Box::pin(async move { Ok(boxed::service(passthrough)) });
        };
        let pending = Compat::new(PrometheusMetrics::clone(metrics)).new_transform(service);
        Box::pin(async move { Ok(boxed::service(pending.await?)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn enabled_layer_serves_the_metrics_endpoint() {
        let prometheus = make_metrics().expect("middleware builds");
        lookup_metrics(Some(&prometheus)).expect("counters register");
        let app = test::init_service(
            App::new()
                .wrap(MetricsLayer::from(Some(prometheus)))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert!(res.status().is_success());
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        assert!(res.status().is_success());
    }

    #[actix_web::test]
    async fn disabled_layer_passes_requests_through() {
        let app = test::init_service(
            App::new()
                .wrap(MetricsLayer::from(None))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert!(res.status().is_success());
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
