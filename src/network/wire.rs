//! The trivia wire format.
//!
//! Every frame is `CMD|LEN|DATA`: a 16 byte space-padded command token, a
//! 4 digit zero-padded length and up to 9999 bytes of data. Structured data
//! inside the data field is separated by `#`.

pub const CMD_FIELD_LEN: usize = 16;
pub const LENGTH_FIELD_LEN: usize = 4;
pub const MAX_DATA_LEN: usize = 9999;
pub const HEADER_LEN: usize = CMD_FIELD_LEN + 1 + LENGTH_FIELD_LEN + 1;
pub const MAX_FRAME_LEN: usize = HEADER_LEN + MAX_DATA_LEN;
pub const DELIMITER: char = '|';
pub const DATA_DELIMITER: char = '#';

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("cannot encode unknown command {0:?}")]
    InvalidCommand(String),
    #[error("data is {0} bytes, at most 9999 fit in a frame")]
    DataTooLong(usize),
    #[error("data may not contain the frame delimiter")]
    DelimiterInData,
    #[error("malformed frame")]
    MalformedFrame,
    #[error("header field has the wrong width")]
    BadFieldWidth,
    #[error("frame declared {declared} data bytes but carried {actual}")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("expected {expected} fields, found {found}")]
    FieldCountMismatch { expected: usize, found: usize },
}

macro_rules! commands {
    (@client client) => { true };
    (@client server) => { false };
    {$($name:ident: $token:literal $side:ident)*} => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Command {
            $($name,)*
        }
        impl Command {
            pub const ALL: &'static [Command] = &[$(Command::$name),*];

            pub fn token(self) -> &'static str {
                match self {
                    $(Command::$name => $token,)*
                }
            }
            pub fn from_token(token: &str) -> Option<Self> {
                match token {
                    $($token => Some(Command::$name),)*
                    _ => None,
                }
            }
            /// Whether clients are allowed to send this command.
            pub fn is_client(self) -> bool {
                match self {
                    $(Command::$name => commands!(@client $side),)*
                }
            }
        }
    };
}
commands! {
    Login: "LOGIN" client
    Logout: "LOGOUT" client
    Logged: "LOGGED" client
    GetQuestion: "GET_QUESTION" client
    SendAnswer: "SEND_ANSWER" client
    MyScore: "MY_SCORE" client
    Highscore: "HIGHSCORE" client

    LoginOk: "LOGIN_OK" server
    Error: "ERROR" server
    LoggedAnswer: "LOGGED_ANSWER" server
    YourQuestion: "YOUR_QUESTION" server
    CorrectAnswer: "CORRECT_ANSWER" server
    WrongAnswer: "WRONG_ANSWER" server
    YourScore: "YOUR_SCORE" server
    AllScore: "ALL_SCORE" server
    NoQuestions: "NO_QUESTIONS" server
}
impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub command: Command,
    pub data: String,
}
impl Message {
    pub fn new(command: Command, data: impl Into<String>) -> Self {
        Self { command, data: data.into() }
    }
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        encode(self.command.token(), &self.data)
    }
}

pub fn encode(command: &str, data: &str) -> Result<Vec<u8>, WireError> {
    if Command::from_token(command).is_none() {
        return Err(WireError::InvalidCommand(command.to_owned()));
    }
    if data.len() > MAX_DATA_LEN {
        return Err(WireError::DataTooLong(data.len()));
    }
    if data.contains(DELIMITER) {
        return Err(WireError::DelimiterInData);
    }
    let frame = format!(
        "{command:<cmd_width$}{DELIMITER}{len:0len_width$}{DELIMITER}{data}",
        len = data.len(),
        cmd_width = CMD_FIELD_LEN,
        len_width = LENGTH_FIELD_LEN,
    );
    Ok(frame.into_bytes())
}

pub fn decode(raw: &[u8]) -> Result<Message, WireError> {
    let raw = std::str::from_utf8(raw).map_err(|_| WireError::MalformedFrame)?;
    let mut parts = raw.split(DELIMITER);
    let (Some(command), Some(length), Some(data), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(WireError::MalformedFrame);
    };
    if command.len() != CMD_FIELD_LEN || length.len() != LENGTH_FIELD_LEN || data.len() > MAX_DATA_LEN {
        return Err(WireError::BadFieldWidth);
    }
    let declared = length_field(length.as_bytes())?;
    if declared != data.len() {
        return Err(WireError::LengthMismatch { declared, actual: data.len() });
    }
    let command = command.replace(' ', "");
    let command = Command::from_token(&command).ok_or(WireError::UnknownCommand(command))?;
    Ok(Message { command, data: data.to_owned() })
}

fn length_field(field: &[u8]) -> Result<usize, WireError> {
    let digits: Vec<u8> = field.iter().copied().filter(|&b| b != b' ').collect();
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(WireError::BadFieldWidth);
    }
    Ok(digits.iter().fold(0, |n, d| n * 10 + (d - b'0') as usize))
}

/// Length of the first frame in `buf`, or `None` if it hasn't fully arrived.
pub fn frame_len(buf: &[u8]) -> Result<Option<usize>, WireError> {
    if buf.len() < HEADER_LEN {
        return Ok(None);
    }
    let delimiter = DELIMITER as u8;
    if buf[CMD_FIELD_LEN] != delimiter || buf[HEADER_LEN - 1] != delimiter {
        return Err(WireError::MalformedFrame);
    }
    let declared = length_field(&buf[CMD_FIELD_LEN + 1..HEADER_LEN - 1])?;
    let total = HEADER_LEN + declared;
    Ok((buf.len() >= total).then_some(total))
}

/// Pulls the next complete message off the front of `buf`, returning it with
/// the number of bytes it occupied.
pub fn next_frame(buf: &[u8]) -> Result<Option<(Message, usize)>, WireError> {
    match frame_len(buf)? {
        Some(n) => decode(&buf[..n]).map(|msg| Some((msg, n))),
        None => Ok(None),
    }
}

pub fn split_fields<const N: usize>(data: &str) -> Result<[&str; N], WireError> {
    let fields: Vec<&str> = data.split(DATA_DELIMITER).collect();
    let found = fields.len();
    fields.try_into().map_err(|_| WireError::FieldCountMismatch { expected: N, found })
}

pub fn join_fields<T: std::fmt::Display>(fields: impl IntoIterator<Item = T>) -> String {
    let mut joined = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            joined.push(DATA_DELIMITER);
        }
        joined.push_str(&field.to_string());
    }
    joined
}

pub fn build_login(username: &str, password: &str) -> String {
    join_fields([username, password])
}
pub fn parse_login(data: &str) -> Result<(&str, &str), WireError> {
    let [username, password] = split_fields(data)?;
    Ok((username, password))
}
pub fn build_answer(qid: impl std::fmt::Display, choice: u8) -> String {
    join_fields([qid.to_string(), choice.to_string()])
}
pub fn parse_answer(data: &str) -> Result<(&str, &str), WireError> {
    let [qid, choice] = split_fields(data)?;
    Ok((qid, choice))
}
pub fn build_question(qid: impl std::fmt::Display, question: &str, answers: &[String; 4]) -> String {
    let mut fields = vec![qid.to_string(), question.to_owned()];
    fields.extend(answers.iter().cloned());
    join_fields(fields)
}
pub fn parse_question(data: &str) -> Result<[&str; 6], WireError> {
    split_fields(data)
}
