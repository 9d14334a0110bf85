#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use sync_ssh_keys::core::{Result, Transport, WarningPolicy};
use sync_ssh_keys::utils::HttpResponse;

/// Canned responses keyed by URL, ignoring pagination parameters.
/// Unrouted URLs answer 404. Every request is recorded.
#[derive(Default)]
pub struct FakeTransport {
    routes: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn ok(self, url: &str, body: &str) -> Self {
        self.route(url, 200, body)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| normalize(request) == url)
            .count()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str, _headers: &[(String, String)]) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());

        Ok(match self.routes.get(&normalize(url)) {
            Some((status, body)) => HttpResponse::new(*status, body.as_bytes()),
            None => HttpResponse::new(404, r#"{"message": "Not Found"}"#),
        })
    }
}

fn normalize(url: &str) -> String {
    match url.split_once('?') {
        None => url.to_string(),
        Some((path, query)) => {
            let kept: Vec<&str> = query
                .split('&')
                .filter(|param| !param.starts_with("per_page=") && !param.starts_with("page="))
                .collect();
            if kept.is_empty() {
                path.to_string()
            } else {
                format!("{}?{}", path, kept.join("&"))
            }
        }
    }
}

pub fn lenient() -> Arc<WarningPolicy> {
    Arc::new(WarningPolicy::new(false))
}

pub fn strict() -> Arc<WarningPolicy> {
    Arc::new(WarningPolicy::new(true))
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
