use crate::prelude::*;
use crate::storage::Storage;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::time::Duration;

mod inboxes;
mod request;
mod response;
pub mod client;
pub mod wire;

pub use inboxes::{Inbox, Outbox};
pub use response::Response;

/// Why a connection is being closed.
#[derive(Debug, thiserror::Error)]
pub enum Disconnection {
    #[error("logged out")]
    Logout,
    #[error("sent {0}, which a logged in client may not send")]
    Protocol(wire::Command),
    #[error("{0}")]
    Framing(#[from] wire::WireError),
    #[error("connection closed by peer")]
    Closed,
    #[error("{0}")]
    Transport(#[from] io::Error),
    #[error("too many unsent replies")]
    SlowConsumer,
}

#[derive(Debug)]
pub struct Network {
    listener: TcpListener,
    max_queued: usize,

    poller: polling::Poller,
    events: Vec<polling::Event>,

    clients: SlotMap<client::Client>,
}

const LISTENER: usize = usize::MAX - 1;
impl Network {
    pub fn bind(addr: impl ToSocketAddrs, max_queued: usize) -> io::Result<Self> {
        let poller = polling::Poller::new()?;

        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        poller.add(&listener, polling::Event::readable(LISTENER))?;
        log::info!("listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            max_queued,

            poller,
            events: vec![],

            clients: SlotMap::new(),
        })
    }
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the server forever, saving the users after every round of events.
    pub fn serve(&mut self, trivia: &mut crate::Trivia, storage: &mut dyn Storage) -> io::Result<()> {
        loop {
            self.poll(None, trivia)?;
            trivia.persist(storage);
        }
    }

    /// Waits for socket activity and handles all of it. Returns how many
    /// events were handled, which is 0 if `timeout` ran out first.
    pub fn poll(&mut self, timeout: Option<Duration>, trivia: &mut crate::Trivia) -> io::Result<usize> {
        self.events.clear();
        match self.poller.wait(&mut self.events, timeout) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(0),
            Err(e) => return Err(e),
        }
        let mut events = core::mem::take(&mut self.events);
        let handled = events.len();
        for event in events.drain(..) {
            if event.key == LISTENER {
                self.poller.modify(&self.listener, polling::Event::readable(LISTENER))?;
                self.accept_clients();
            } else {
                self.service(event, trivia);
            }
        }
        self.events = events;
        Ok(handled)
    }

    fn service(&mut self, event: polling::Event, trivia: &mut crate::Trivia) {
        let Some(client) = self.clients.get(event.key) else {
            log::warn!("event for unknown connection {}", event.key);
            return;
        };
        let mut result = Ok(());
        if event.readable {
            result = client.read(trivia);
        }
        if event.writable && result.is_ok() {
            result = client.write();
        }
        if result.is_ok() {
            let interest = polling::Event {
                key: event.key,
                readable: true,
                writable: client.wants_write(),
            };
            result = self.poller.modify(client.conn(), interest).map_err(Disconnection::from);
        }
        if let Err(why) = result {
            self.disconnect(event.key, why, trivia);
        }
    }

    fn disconnect(&mut self, key: usize, why: Disconnection, trivia: &mut crate::Trivia) {
        let Some(client) = self.clients.release(key) else {
            return;
        };
        log::debug!("{} disconnected: {why}", client.addr());
        if let Err(e) = self.poller.delete(client.conn()) {
            log::error!("failed to stop polling {}: {e}", client.addr());
        }
        trivia.disconnect(client.addr());
    }

    fn accept_clients(&mut self) {
        loop {
            match self.listener.accept() {
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("failed to accept a connection: {e}");
                    break;
                }
                Ok((conn, addr)) => {
                    let key = self.clients.next_idx();
                    let added = client::Client::accept(conn, addr, self.max_queued)
                        .and_then(|client| {
                            self.poller.add(client.conn(), polling::Event::readable(key))?;
                            Ok(client)
                        });
                    match added {
                        Ok(client) => {
                            self.clients.insert(client);
                            log::debug!("{addr} connected as {key}, {} online", self.clients.len());
                        }
                        Err(e) => log::warn!("failed to set up connection from {addr}: {e}"),
                    }
                }
            }
        }
    }
}
