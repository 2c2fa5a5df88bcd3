use clap::Parser;
use std::path::PathBuf;

/// Serves trivia questions to any number of players over TCP.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about)]
pub struct Config {
    /// Address to listen on
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,
    /// Port to listen on
    #[clap(short, long, default_value = "5678")]
    pub port: u16,
    /// Restore users from the backup and load fresh questions before starting
    #[clap(short, long)]
    pub reset: bool,
    /// User database
    #[clap(long, default_value = "users.json")]
    pub users: PathBuf,
    /// Users to restore on --reset
    #[clap(long, default_value = "users_backup.json")]
    pub users_backup: PathBuf,
    /// Question bank
    #[clap(long, default_value = "questions.json")]
    pub questions: PathBuf,
    /// Open Trivia DB response dump that --reset draws questions from
    #[clap(long, default_value = "opentdb.json")]
    pub question_dump: PathBuf,
    /// How many questions --reset loads
    #[clap(long, default_value = "20", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub questions_to_load: usize,
    /// Replies a connection may have waiting before it is dropped
    #[clap(long, default_value = "64", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_queued: u16,
}
impl Config {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_server() {
        let config = Config::try_parse_from(["trivserv"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:5678");
        assert!(!config.reset);
        assert_eq!(config.users, PathBuf::from("users.json"));
        assert_eq!(config.questions_to_load, 20);
        assert_eq!(config.max_queued, 64);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from(["trivserv", "-r", "-p", "9000", "-H", "0.0.0.0", "--max-queued", "8"]).unwrap();
        assert!(config.reset);
        assert_eq!(config.address(), "0.0.0.0:9000");
        assert_eq!(config.max_queued, 8);
        assert!(Config::try_parse_from(["trivserv", "--max-queued", "0"]).is_err());
    }

    #[test]
    fn reset_loads_at_least_one_question() {
        assert!(Config::try_parse_from(["trivserv", "--questions-to-load", "0"]).is_err());
        let config = Config::try_parse_from(["trivserv", "--questions-to-load", "1"]).unwrap();
        assert_eq!(config.questions_to_load, 1);
    }
}
