use super::http::HTTPError;
use super::reason::ReasonCode;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};

/// Logs every handler error along with its chain of sources
pub struct LoggerMiddleware;

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggerMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService { service }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().to_string();
        let path = req.path().to_string();

        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let status = res.status().as_u16();

                    if let Some(err) = res.response().error() {
                        if let Some(err) = err.as_error::<HTTPError>() {
                            let output = error_chain(err);
                            if err.reason == ReasonCode::Internal {
                                tracing::error!(%method, %path, status, "{output}");
                            } else {
                                tracing::info!(%method, %path, status, "{output}");
                            }
                        } else {
                            tracing::warn!(%method, %path, status, "{err}");
                        }
                    } else {
                        tracing::debug!(%method, %path, status, "request");
                    }

                    Ok(res)
                }
                Err(err) => {
                    tracing::error!(%method, %path, "Error occurred: {err}");
                    Err(err)
                }
            }
        })
    }
}

fn error_chain(err: &HTTPError) -> String {
    let mut output = format!("{err}");
    let mut error: &dyn std::error::Error = err;
    while let Some(source) = error.source() {
        output = format!("{output}\n  Caused by: {source}");
        error = source;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{get, test, App, HttpResponse, Responder};

    #[get("/ok")]
    async fn ok() -> impl Responder {
        HttpResponse::Ok().body("")
    }

    #[get("/missing")]
    async fn missing() -> Result<HttpResponse, HTTPError> {
        Err(offchain::Error::UnknownRoot {
            owner: "app".to_string(),
            root: smt::hash::Digest::EMPTY,
        }
        .into())
    }

    #[actix_web::test]
    async fn passes_responses_through() {
        let app = test::init_service(
            App::new()
                .wrap(LoggerMiddleware)
                .service(ok)
                .service(missing),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/ok").to_request()).await;
        assert!(resp.status().is_success());

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/missing").to_request()).await;
        assert_eq!(resp.status().as_u16(), 404);
    }

    #[test]
    fn chain_includes_sources() {
        let err: HTTPError = offchain::Error::UnknownRoot {
            owner: "app".to_string(),
            root: smt::hash::Digest::EMPTY,
        }
        .into();

        let output = error_chain(&err);
        assert!(output.starts_with("not-found: root/not-found"));
        assert!(output.contains("Caused by: unknown root"));
    }
}
