use super::wire::{Command, Message, WireError};

macro_rules! response {
    {$($name:ident($($field:ident : $t:ty),*): $cmd:ident => $e:expr;)*} => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Response {
            $($name($($t),*),)*
        }
        impl Response {
            pub fn message(&self) -> Message {
                match self {
                    $(Response::$name($($field),*) => Message::new(Command::$cmd, $e),)*
                }
            }
        }
    };
}
response! {
    LoginOk(): LoginOk => "";
    Error(reason: String): Error => reason.as_str();
    LoggedAnswer(users: Vec<String>): LoggedAnswer => users.join(", ");
    YourQuestion(payload: String): YourQuestion => payload.as_str();
    CorrectAnswer(): CorrectAnswer => "";
    WrongAnswer(correct: u8): WrongAnswer => correct.to_string();
    YourScore(score: u32): YourScore => score.to_string();
    AllScore(board: String): AllScore => board.as_str();
    NoQuestions(): NoQuestions => "";
}
impl Response {
    pub fn error(reason: impl Into<String>) -> Self {
        Response::Error(reason.into())
    }
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        self.message().encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_use_server_commands() {
        let frame = Response::WrongAnswer(3).encode().unwrap();
        assert_eq!(frame, b"WRONG_ANSWER    |0001|3");
        let logged = Response::LoggedAnswer(vec!["alice".into(), "bob".into()]).message();
        assert_eq!(logged, Message::new(Command::LoggedAnswer, "alice, bob"));
        assert_eq!(Response::LoginOk().message(), Message::new(Command::LoginOk, ""));
        assert!(!Response::NoQuestions().message().command.is_client());
    }

    #[test]
    fn oversized_responses_fail_to_encode() {
        let board = "x".repeat(super::super::wire::MAX_DATA_LEN + 1);
        assert!(matches!(Response::AllScore(board).encode(), Err(WireError::DataTooLong(_))));
    }
}
