//! `Transport` backed by ureq, run on tokio's blocking pool.

use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::remote::Transport;

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    /// 4xx/5xx responses come back as data rather than `Err`, letting
    /// `TodoClient` handle status interpretation.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute(&agent, &request))
            .await
            .map_err(|e| RequestError::Transport(format!("request task failed: {e}")))?
    }
}

fn prepare<B>(mut builder: ureq::RequestBuilder<B>, req: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(timeout) = req.timeout {
        builder = builder.config().timeout_global(Some(timeout)).build();
    }
    builder
}

fn execute(agent: &ureq::Agent, req: &HttpRequest) -> Result<HttpResponse, RequestError> {
    let result = match (req.method, req.body.as_deref()) {
        (HttpMethod::Get, _) => prepare(agent.get(&req.path), req).call(),
        (HttpMethod::Head, _) => prepare(agent.head(&req.path), req).call(),
        (HttpMethod::Delete, _) => prepare(agent.delete(&req.path), req).call(),
        (HttpMethod::Post, Some(body)) => prepare(agent.post(&req.path), req).send(body.as_bytes()),
        (HttpMethod::Post, None) => prepare(agent.post(&req.path), req).send_empty(),
        (HttpMethod::Put, Some(body)) => prepare(agent.put(&req.path), req).send(body.as_bytes()),
        (HttpMethod::Put, None) => prepare(agent.put(&req.path), req).send_empty(),
    };
    let mut response = result.map_err(|e| RequestError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| RequestError::Transport(format!("reading response body: {e}")))?;
    Ok(HttpResponse { status, body })
}
