use crate::prelude::*;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("incorrect username or password")]
    InvalidCredentials,
    #[error("user already logged in")]
    AlreadyLoggedIn,
    #[error("connection already has a session")]
    SessionExists,
    #[error("not logged in")]
    NotLoggedIn,
}

/// Which username each live connection is logged in as.
///
/// Sessions are kept in login order. There are only ever as many as there are
/// open connections, so lookups are linear scans.
#[derive(Debug, Default)]
pub struct Sessions {
    bound: Vec<(ConnId, String)>,
}
impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn authenticate(&mut self, conn: ConnId, username: &str, password: &str, users: &UserRecords) -> Result<(), SessionError> {
        match users.get(username) {
            Some(user) if user.password == password => {}
            _ => return Err(SessionError::InvalidCredentials),
        }
        if self.bound.iter().any(|(_, name)| name == username) {
            return Err(SessionError::AlreadyLoggedIn);
        }
        if self.current_user(conn).is_ok() {
            return Err(SessionError::SessionExists);
        }
        self.bound.push((conn, username.to_owned()));
        Ok(())
    }
    pub fn current_user(&self, conn: ConnId) -> Result<&str, SessionError> {
        self.bound
            .iter()
            .find(|(c, _)| *c == conn)
            .map(|(_, name)| name.as_str())
            .ok_or(SessionError::NotLoggedIn)
    }
    pub fn end_session(&mut self, conn: ConnId) -> Result<String, SessionError> {
        let i = self.bound.iter().position(|(c, _)| *c == conn).ok_or(SessionError::NotLoggedIn)?;
        Ok(self.bound.remove(i).1)
    }
    pub fn logged_in(&self) -> impl Iterator<Item = &str> {
        self.bound.iter().map(|(_, name)| name.as_str())
    }
    pub fn len(&self) -> usize {
        self.bound.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::User;

    fn conn(port: u16) -> ConnId {
        ConnId::from(([127, 0, 0, 1], port))
    }
    fn users() -> UserRecords {
        [("alice".to_owned(), User::new("rightpass")), ("bob".to_owned(), User::new("hunter2"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn rejects_bad_credentials() {
        let mut sessions = Sessions::new();
        let users = users();
        assert_eq!(sessions.authenticate(conn(1), "alice", "wrongpass", &users), Err(SessionError::InvalidCredentials));
        assert_eq!(sessions.authenticate(conn(1), "mallory", "rightpass", &users), Err(SessionError::InvalidCredentials));
        assert_eq!(sessions.current_user(conn(1)), Err(SessionError::NotLoggedIn));
    }

    #[test]
    fn one_live_session_per_username() {
        let mut sessions = Sessions::new();
        let users = users();
        sessions.authenticate(conn(1), "alice", "rightpass", &users).unwrap();
        assert_eq!(sessions.authenticate(conn(2), "alice", "rightpass", &users), Err(SessionError::AlreadyLoggedIn));
        assert_eq!(sessions.current_user(conn(1)), Ok("alice"));

        assert_eq!(sessions.end_session(conn(1)), Ok("alice".to_owned()));
        sessions.authenticate(conn(2), "alice", "rightpass", &users).unwrap();
        assert_eq!(sessions.current_user(conn(2)), Ok("alice"));
    }

    #[test]
    fn one_session_per_connection() {
        let mut sessions = Sessions::new();
        let users = users();
        sessions.authenticate(conn(1), "alice", "rightpass", &users).unwrap();
        assert_eq!(sessions.authenticate(conn(1), "bob", "hunter2", &users), Err(SessionError::SessionExists));
    }

    #[test]
    fn ending_a_missing_session_is_an_error() {
        let mut sessions = Sessions::new();
        let users = users();
        sessions.authenticate(conn(1), "alice", "rightpass", &users).unwrap();
        sessions.end_session(conn(1)).unwrap();
        assert_eq!(sessions.end_session(conn(1)), Err(SessionError::NotLoggedIn));
    }

    #[test]
    fn lists_users_in_login_order() {
        let mut sessions = Sessions::new();
        let users = users();
        sessions.authenticate(conn(7), "bob", "hunter2", &users).unwrap();
        sessions.authenticate(conn(3), "alice", "rightpass", &users).unwrap();
        assert_eq!(sessions.logged_in().collect::<Vec<_>>(), ["bob", "alice"]);
        assert_eq!(sessions.len(), 2);
    }
}
