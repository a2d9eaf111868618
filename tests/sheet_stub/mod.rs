use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// One canned response, keyed by request path (query string ignored).
#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Route {
    pub fn csv(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/csv; charset=utf-8",
            body: body.to_owned(),
        }
    }
}

/// Stand-in for a spreadsheet "publish to web" endpoint.
pub struct SheetStub {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SheetStub {
    pub fn spawn(routes: Vec<(&'static str, Route)>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start sheet stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");
        let routes = routes.into_iter().collect::<HashMap<_, _>>();

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                let path = url.split('?').next().unwrap_or(&url);

                let Some(route) = routes.get(path) else {
                    let _ = request.respond(
                        tiny_http::Response::from_string("not found").with_status_code(404),
                    );
                    continue;
                };

                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    route.content_type.as_bytes(),
                )
                .expect("build header");
                let response = tiny_http::Response::from_string(route.body.clone())
                    .with_status_code(route.status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for SheetStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
