use super::Response;
use std::collections::VecDeque;

/// Responses waiting for a connection to become writable.
#[derive(Debug)]
pub struct Outbox {
    queue: VecDeque<Response>,
    limit: usize,
    overflowed: bool,
}
impl Outbox {
    pub fn new(limit: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            limit,
            overflowed: false,
        }
    }
    pub fn inbox(&mut self) -> Inbox<'_> {
        Inbox(self)
    }
    pub fn pop(&mut self) -> Option<Response> {
        self.queue.pop_front()
    }
    pub fn len(&self) -> usize {
        self.queue.len()
    }
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
    /// Set once a response had to be dropped because the queue was full.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}

/// Where handlers put their replies to a single connection.
#[derive(Debug)]
pub struct Inbox<'a>(&'a mut Outbox);
impl Inbox<'_> {
    pub fn submit(&mut self, response: Response) {
        if self.0.queue.len() >= self.0.limit {
            log::trace!("outbox full, dropping {response:?}");
            self.0.overflowed = true;
            return;
        }
        self.0.queue.push_back(response);
    }
    pub fn reborrow(&mut self) -> Inbox<'_> {
        Inbox(&mut *self.0)
    }
}
