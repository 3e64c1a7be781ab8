//! Loopback HTTP stubs for adapter integration tests.
//!
//! Each stub records every request it receives and answers with a canned
//! status and JSON body chosen by the test.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex, PoisonError};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::StatusCode, web};
use serde_json::Value;
use url::Url;

/// One request seen by a stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|err| {
            panic!("request body is not JSON ({err}): {}", self.body_text())
        })
    }

    /// Value of a `multipart/form-data` text field.
    pub fn form_field(&self, name: &str) -> Option<String> {
        let body = self.body_text();
        let marker = format!("name=\"{name}\"\r\n\r\n");
        let start = body.find(&marker)? + marker.len();
        let end = body[start..].find("\r\n")? + start;
        Some(body[start..end].to_owned())
    }
}

type Responder = dyn Fn(&Recorded) -> (u16, Value) + Send + Sync;

struct StubState {
    requests: Mutex<Vec<Recorded>>,
    respond: Box<Responder>,
}

pub struct Stub {
    pub base: Url,
    state: web::Data<StubState>,
    handle: ServerHandle,
}

impl Stub {
    pub fn requests(&self) -> Vec<Recorded> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

async fn record(req: HttpRequest, body: web::Bytes, state: web::Data<StubState>) -> HttpResponse {
    let recorded = Recorded {
        method: req.method().to_string(),
        path: req.path().to_owned(),
        query: req.query_string().to_owned(),
        headers: req
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect(),
        body: body.to_vec(),
    };
    let (status, reply) = (state.respond)(&recorded);
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(recorded);
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(reply)
}

/// Start a stub on `127.0.0.1:0` that answers every request via `respond`.
pub async fn spawn_stub<F>(respond: F) -> Stub
where
    F: Fn(&Recorded) -> (u16, Value) + Send + Sync + 'static,
{
    let state = web::Data::new(StubState {
        requests: Mutex::new(Vec::new()),
        respond: Box::new(respond),
    });
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");

    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .default_service(web::to(record))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .expect("listen on loopback")
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    Stub {
        base: Url::parse(&format!("http://{addr}")).expect("stub url"),
        state,
        handle,
    }
}
