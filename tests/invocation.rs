//! End-to-end invocation tests against an in-process HTTP service

use geoaccess::error::{ErrorKind, ServiceError};
use geoaccess::service::{ServiceInvoker, ServiceOptions, ServiceResponse};
use geoaccess::services::wfs::{Wfs, WfsOptions};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn feature_collection() -> Value {
    json!({ "type": "FeatureCollection", "features": [] })
}

/// Extracts the reply-correlation name from the request query
fn correlation_name(req: &Request<Body>) -> String {
    let url = url::Url::parse(&format!("http://local{}", req.uri())).unwrap();
    url.query_pairs()
        .find(|(key, _)| key == "callback")
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

async fn handle(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let body = match req.uri().path() {
        // Direct exchange, bare JSON reply
        "/wfs" => feature_collection().to_string(),

        // Callback exchange, envelope wrapped in the correlation function
        "/wrapped" => {
            let envelope = json!({
                "http": { "status": 200, "error": null },
                "xml": feature_collection().to_string(),
            });
            format!("{}({})", correlation_name(&req), envelope)
        }

        // Callback exchange reporting a service-side failure
        "/refused" => json!({
            "http": { "status": 400, "error": "bad request" },
            "xml": null,
        })
        .to_string(),

        // Never replies in time
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late".to_string()
        }

        _ => {
            return Ok(Response::builder()
                .status(404)
                .body(Body::empty())
                .unwrap())
        }
    };

    Ok(Response::new(Body::from(body)))
}

fn start_server() -> SocketAddr {
    let make_svc = make_service_fn(|_| async { Ok::<_, Infallible>(service_fn(handle)) });
    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

fn wfs_adapter() -> Wfs {
    Wfs::new(WfsOptions {
        type_names: "BDTOPO:bati_indifferencie".to_string(),
        ..WfsOptions::default()
    })
    .unwrap()
}

struct Outcome {
    successes: Arc<Mutex<Vec<ServiceResponse<Value>>>>,
    failures: Arc<Mutex<Vec<ServiceError>>>,
}

impl Outcome {
    fn new() -> Self {
        Outcome {
            successes: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn wire(&self, options: &mut ServiceOptions<Value>) {
        let successes = self.successes.clone();
        options.on_success = Some(Box::new(move |response| {
            successes.lock().unwrap().push(response)
        }));

        let failures = self.failures.clone();
        options.on_failure = Some(Box::new(move |failure| {
            failures.lock().unwrap().push(failure)
        }));
    }

    fn single_success(&self) -> ServiceResponse<Value> {
        assert_eq!(self.failures.lock().unwrap().len(), 0);
        let mut successes = self.successes.lock().unwrap();
        assert_eq!(successes.len(), 1);
        successes.remove(0)
    }

    fn single_failure(&self) -> ServiceError {
        assert_eq!(self.successes.lock().unwrap().len(), 0);
        let mut failures = self.failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        failures.remove(0)
    }
}

fn options_for(outcome: &Outcome, addr: SocketAddr, path: &str) -> ServiceOptions<Value> {
    let mut options = ServiceOptions {
        server_url: Some(format!("http://{}{}", addr, path)),
        ..ServiceOptions::default()
    };
    outcome.wire(&mut options);
    options
}

#[tokio::test]
async fn queries_features_over_a_direct_exchange() {
    let addr = start_server();

    let outcome = Outcome::new();
    let options = ServiceOptions {
        delivery_mode: Some("DIRECT".to_string()),
        ..options_for(&outcome, addr, "/wfs")
    };

    let invoker = ServiceInvoker::new(wfs_adapter(), options).unwrap();
    invoker.call().await;

    assert_eq!(
        outcome.single_success(),
        ServiceResponse::Parsed(feature_collection())
    );
}

#[tokio::test]
async fn unwraps_function_wrapped_callback_replies() {
    let addr = start_server();

    let outcome = Outcome::new();
    let options = options_for(&outcome, addr, "/wrapped");

    let invoker = ServiceInvoker::new(wfs_adapter(), options).unwrap();
    invoker.call().await;

    assert_eq!(
        outcome.single_success(),
        ServiceResponse::Parsed(feature_collection())
    );
}

#[tokio::test]
async fn reports_service_failures_from_the_envelope() {
    let addr = start_server();

    let outcome = Outcome::new();
    let options = options_for(&outcome, addr, "/refused");

    let invoker = ServiceInvoker::new(wfs_adapter(), options).unwrap();
    invoker.call().await;

    assert_eq!(
        outcome.single_failure(),
        ServiceError::Server {
            status: 400,
            message: "bad request".to_string()
        }
    );
}

#[tokio::test]
async fn gives_up_on_unresponsive_services() {
    let addr = start_server();

    let outcome = Outcome::new();
    let options = ServiceOptions {
        delivery_mode: Some("DIRECT".to_string()),
        timeout_ms: 50,
        ..options_for(&outcome, addr, "/slow")
    };

    let invoker = ServiceInvoker::new(wfs_adapter(), options).unwrap();
    invoker.call().await;

    assert_eq!(outcome.single_failure().kind(), ErrorKind::Timeout);
}
