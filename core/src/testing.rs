//! Scripted in-memory `Transport` for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::remote::Transport;

enum Reply {
    Ready(Result<HttpResponse, RequestError>),
    /// Connection accepted, answer never comes.
    Silent,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Reply>,
    seen: Vec<HttpRequest>,
}

/// Answers requests from a queue of canned replies and records every request.
/// Clones share the same script.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, status: u16, body: &str) -> &Self {
        self.push(Reply::Ready(Ok(HttpResponse {
            status,
            body: body.to_string(),
        })))
    }

    pub fn fail(&self, reason: &str) -> &Self {
        self.push(Reply::Ready(Err(RequestError::Transport(reason.to_string()))))
    }

    pub fn never_answer(&self) -> &Self {
        self.push(Reply::Silent)
    }

    pub fn requests(&self) -> Vec<(HttpMethod, String)> {
        self.script
            .borrow()
            .seen
            .iter()
            .map(|r| (r.method, r.path.clone()))
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.script.borrow().seen.len()
    }

    pub fn pending_replies(&self) -> usize {
        self.script.borrow().replies.len()
    }

    fn push(&self, reply: Reply) -> &Self {
        self.script.borrow_mut().replies.push_back(reply);
        self
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let reply = {
            let mut script = self.script.borrow_mut();
            script.seen.push(request);
            script.replies.pop_front()
        };
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Silent) => std::future::pending().await,
            None => Err(RequestError::Transport("no scripted reply".to_string())),
        }
    }
}
