use crate::prelude::*;
use crate::questions::QuestionBank;
use crate::session::{SessionError, Sessions};
use crate::storage::{Storage, StorageError};
use crate::users::User;
use rand::{rngs::StdRng, SeedableRng};

/// Everything the game knows: who is logged in where, every player's record
/// and the question bank.
///
/// All of it is touched from the network thread only, one message at a time.
#[derive(Debug)]
pub struct Trivia {
    sessions: Sessions,
    users: UserRecords,
    questions: QuestionBank,
    rng: StdRng,
    // users changed since the last save
    dirty: bool,
}
impl Trivia {
    pub fn new(users: UserRecords, questions: QuestionBank) -> Self {
        Self::with_rng(users, questions, StdRng::from_entropy())
    }
    pub fn with_rng(users: UserRecords, questions: QuestionBank, rng: StdRng) -> Self {
        Self {
            sessions: Sessions::new(),
            users,
            questions,
            rng,
            dirty: false,
        }
    }
    pub fn load(storage: &mut dyn Storage) -> Result<Self, StorageError> {
        let questions = storage.load_questions()?;
        let users = storage.load_users()?;
        log::info!("loaded {} questions and {} users", questions.len(), users.len());
        Ok(Self::new(users, questions))
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }
    pub fn users(&self) -> &UserRecords {
        &self.users
    }
    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    /// Writes the users back if anything changed. Failures are logged and
    /// retried on the next call.
    pub fn persist(&mut self, storage: &mut dyn Storage) {
        if !self.dirty {
            return;
        }
        match storage.save_users(&self.users) {
            Ok(()) => self.dirty = false,
            Err(e) => log::error!("failed to save users: {e}"),
        }
    }

    /// Forgets the session of a connection that went away.
    pub fn disconnect(&mut self, conn: ConnId) {
        if let Ok(name) = self.sessions.end_session(conn) {
            log::debug!("{name} logged out from {conn}");
        }
    }

    pub(crate) fn login(&mut self, conn: ConnId, data: &str, mut inbox: Inbox) {
        let Ok((name, password)) = wire::parse_login(data) else {
            return inbox.submit(Response::error("invalid input"));
        };
        match self.sessions.authenticate(conn, name, password, &self.users) {
            Ok(()) => {
                log::debug!("{name} logged in from {conn}");
                inbox.submit(Response::LoginOk());
            }
            Err(e) => inbox.submit(Response::error(e.to_string())),
        }
    }

    pub(crate) fn get_question(&mut self, conn: ConnId, mut inbox: Inbox) {
        let Some((name, user)) = player(&self.sessions, &self.users, conn) else {
            return inbox.submit(Response::error(SessionError::NotLoggedIn.to_string()));
        };
        match self.questions.pick_unasked(&user.questions_asked, &mut self.rng) {
            Ok((qid, payload)) => {
                self.users.mark_question_asked(name, qid);
                self.dirty = true;
                inbox.submit(Response::YourQuestion(payload));
            }
            Err(_) => inbox.submit(Response::NoQuestions()),
        }
    }

    pub(crate) fn send_answer(&mut self, conn: ConnId, data: &str, mut inbox: Inbox) {
        let Some((name, user)) = player(&self.sessions, &self.users, conn) else {
            return inbox.submit(Response::error(SessionError::NotLoggedIn.to_string()));
        };
        let Some((qid, choice)) = parse_choice(data) else {
            return inbox.submit(Response::error("invalid answer"));
        };
        let (right, correct) = match self.questions.check_answer(qid, choice) {
            Ok(checked) => checked,
            Err(e) => return inbox.submit(Response::error(e.to_string())),
        };
        if user.questions_answered.contains(&qid) {
            return inbox.submit(Response::error("You may only answer question once"));
        }
        if !user.questions_asked.contains(&qid) {
            return inbox.submit(Response::error("question was not asked"));
        }
        if right {
            self.users.record_score_delta(name, 1);
            inbox.submit(Response::CorrectAnswer());
        } else {
            inbox.submit(Response::WrongAnswer(correct));
        }
        self.users.mark_question_answered(name, qid);
        self.dirty = true;
    }

    pub(crate) fn my_score(&self, conn: ConnId, mut inbox: Inbox) {
        match player(&self.sessions, &self.users, conn) {
            Some((_, user)) => inbox.submit(Response::YourScore(user.score)),
            None => inbox.submit(Response::error(SessionError::NotLoggedIn.to_string())),
        }
    }

    pub(crate) fn highscore(&self, mut inbox: Inbox) {
        let mut board = String::new();
        for (name, score) in self.users.leaderboard() {
            let line = format!("{name}: {score}\n");
            if board.len() + line.len() > wire::MAX_DATA_LEN {
                break;
            }
            board.push_str(&line);
        }
        inbox.submit(Response::AllScore(board));
    }

    pub(crate) fn logged(&self, mut inbox: Inbox) {
        let names = self.sessions.logged_in().map(str::to_owned).collect();
        inbox.submit(Response::LoggedAnswer(names));
    }
}

// Borrows the two maps separately so callers can still update the user.
fn player<'s, 'u>(sessions: &'s Sessions, users: &'u UserRecords, conn: ConnId) -> Option<(&'s str, &'u User)> {
    let name = sessions.current_user(conn).ok()?;
    Some((name, users.get(name)?))
}

fn parse_choice(data: &str) -> Option<(QuestionId, u8)> {
    let (qid, choice) = wire::parse_answer(data).ok()?;
    let qid = qid.parse::<QuestionId>().ok()?;
    let choice = choice.parse::<u8>().ok().filter(|c| (1..=4).contains(c))?;
    Some((qid, choice))
}
