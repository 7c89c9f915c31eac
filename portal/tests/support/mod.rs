//! Loopback HTTP server standing in for remote services.

use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};

/// Records `METHOD path` for every request that reaches a handler.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn record(&self, request: &HttpRequest) {
        self.0
            .lock()
            .expect("recorder mutex")
            .push(format!("{} {}", request.method(), request.path()));
    }

    pub fn requests(&self) -> Vec<String> {
        self.0.lock().expect("recorder mutex").clone()
    }
}

async fn unrouted(recorder: web::Data<Recorder>, request: HttpRequest) -> HttpResponse {
    recorder.record(&request);
    HttpResponse::NotFound().json(serde_json::json!({ "message": "no such route" }))
}

/// Start a server on an ephemeral port with `routes` and a recording 404
/// fallback. Returns the base URL and a handle to stop it.
pub fn serve<F>(recorder: &Recorder, routes: F) -> (String, ServerHandle)
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let recorder = recorder.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(recorder.clone()))
            .configure(routes.clone())
            .default_service(web::to(unrouted))
    })
    .workers(1)
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}"), handle)
}
