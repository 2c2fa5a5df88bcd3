use crate::prelude::*;
use super::{Disconnection, Outbox};
use std::io::{Read, Write};
use std::net::TcpStream;

pub struct Client {
    conn: TcpStream,
    addr: ConnId,
    outbox: Outbox,

    received: Box<[u8]>,
    received_len: usize,

    // frame that the socket couldn't take in one go
    pending_bytes: Vec<u8>,
    pending_byte_cursor: usize,
}
impl Client {
    pub(super) fn conn(&self) -> &TcpStream {
        &self.conn
    }
    pub(super) fn addr(&self) -> ConnId {
        self.addr
    }
    pub(super) fn wants_write(&self) -> bool {
        self.pending_byte_cursor < self.pending_bytes.len() || !self.outbox.is_empty()
    }
    pub fn accept(conn: TcpStream, addr: ConnId, max_queued: usize) -> io::Result<Self> {
        conn.set_nonblocking(true)?;
        Ok(Self {
            conn,
            addr,
            outbox: Outbox::new(max_queued),
            received: vec![0; wire::MAX_FRAME_LEN].into_boxed_slice(),
            received_len: 0,
            pending_bytes: vec![],
            pending_byte_cursor: 0,
        })
    }

    /// Drains the socket and hands every complete frame to the game.
    pub fn read(&mut self, trivia: &mut crate::Trivia) -> Result<(), Disconnection> {
        loop {
            if self.received_len == self.received.len() {
                return Err(Disconnection::Framing(wire::WireError::MalformedFrame));
            }
            match self.conn.read(&mut self.received[self.received_len..]) {
                Ok(0) => return Err(Disconnection::Closed),
                Ok(n) => self.received_len += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Disconnection::Transport(e)),
            }
            while let Some((msg, used)) = wire::next_frame(&self.received[..self.received_len])? {
                log::trace!("[{}] -> {} {:?}", self.addr, msg.command, msg.data);
                self.received.copy_within(used..self.received_len, 0);
                self.received_len -= used;

                trivia.handle(self.addr, msg, self.outbox.inbox())?;
                if self.outbox.overflowed() {
                    return Err(Disconnection::SlowConsumer);
                }
            }
        }
    }

    /// Writes queued responses until the socket would block.
    pub fn write(&mut self) -> Result<(), Disconnection> {
        loop {
            while self.pending_byte_cursor < self.pending_bytes.len() {
                match self.conn.write(&self.pending_bytes[self.pending_byte_cursor..]) {
                    Ok(0) => return Err(Disconnection::Closed),
                    Ok(n) => self.pending_byte_cursor += n,
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(Disconnection::Transport(e)),
                }
            }
            let Some(response) = self.outbox.pop() else {
                return Ok(());
            };
            match response.encode() {
                Ok(frame) => {
                    log::trace!("[{}] <- {:?}", self.addr, String::from_utf8_lossy(&frame));
                    self.pending_bytes = frame;
                    self.pending_byte_cursor = 0;
                }
                Err(e) => log::warn!("dropping reply to {}, it cannot be encoded: {e}", self.addr),
            }
        }
    }
}
impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("addr", &self.addr)
            .field("queued", &self.outbox.len())
            .field("buffered", &self.received_len)
            .finish()
    }
}
