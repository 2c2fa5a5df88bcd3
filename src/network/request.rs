use super::*;
use super::wire::{Command, Message};

impl crate::Trivia {
    /// Routes one client message by its command and the connection's session.
    pub fn handle(&mut self, conn: ConnId, msg: Message, mut inbox: Inbox) -> Result<(), Disconnection> {
        let logged_in = self.sessions().current_user(conn).is_ok();
        match (logged_in, msg.command) {
            (false, Command::Login) => self.login(conn, &msg.data, inbox),
            (false, _) => inbox.submit(Response::error("undefined command")),

            (true, Command::GetQuestion) => self.get_question(conn, inbox),
            (true, Command::SendAnswer) => self.send_answer(conn, &msg.data, inbox),
            (true, Command::MyScore) => self.my_score(conn, inbox),
            (true, Command::Highscore) => self.highscore(inbox),
            (true, Command::Logged) => self.logged(inbox),
            (true, Command::Logout) => return Err(Disconnection::Logout),
            // a second LOGIN or a server-only token ends the session
            (true, unexpected) => return Err(Disconnection::Protocol(unexpected)),
        }
        Ok(())
    }
}
