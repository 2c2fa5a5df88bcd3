//! Where fresh questions come from when the server is reset.

use crate::prelude::*;
use crate::questions::{Question, QuestionBank, QuestionError};
use rand::seq::SliceRandom;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read question dump: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse question dump: {0}")]
    Json(#[from] serde_json::Error),
    #[error("wanted {wanted} questions but only {usable} were usable")]
    NotEnoughQuestions { wanted: usize, usable: usize },
    #[error(transparent)]
    Question(#[from] QuestionError),
}

pub trait QuestionSource {
    fn fetch(&mut self, n: usize) -> Result<QuestionBank, SourceError>;
}

#[derive(Debug, serde::Deserialize)]
struct Dump {
    results: Vec<DumpEntry>,
}
#[derive(Debug, Clone, serde::Deserialize)]
struct DumpEntry {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}
impl DumpEntry {
    fn is_usable(&self) -> bool {
        let garbled = |s: &String| s.contains(wire::DATA_DELIMITER) || s.contains('&') || s.contains(wire::DELIMITER);
        self.incorrect_answers.len() == 3
            && !garbled(&self.question)
            && !garbled(&self.correct_answer)
            && !self.incorrect_answers.iter().any(garbled)
    }
    fn into_question(self, rng: &mut impl rand::Rng) -> Question {
        let mut answers = self.incorrect_answers;
        answers.push(self.correct_answer.clone());
        answers.shuffle(rng);
        let correct = answers.iter().position(|a| *a == self.correct_answer).unwrap_or(3) as u8 + 1;
        let [a, b, c, d]: [String; 4] = answers.try_into().unwrap_or_default();
        Question { question: self.question, answers: [a, b, c, d], correct }
    }
}

/// Questions from a JSON file in the shape the Open Trivia DB API responds with.
#[derive(Debug)]
pub struct OpenTdbDump<R = rand::rngs::StdRng> {
    path: PathBuf,
    rng: R,
}
impl OpenTdbDump {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_rng(path, rand::SeedableRng::from_entropy())
    }
}
impl<R: rand::Rng> OpenTdbDump<R> {
    pub fn with_rng(path: impl Into<PathBuf>, rng: R) -> Self {
        Self { path: path.into(), rng }
    }
}
impl<R: rand::Rng> QuestionSource for OpenTdbDump<R> {
    fn fetch(&mut self, n: usize) -> Result<QuestionBank, SourceError> {
        let dump: Dump = serde_json::from_slice(&std::fs::read(&self.path)?)?;
        let mut usable: Vec<DumpEntry> = dump.results.into_iter().filter(DumpEntry::is_usable).collect();
        if usable.len() < n {
            return Err(SourceError::NotEnoughQuestions { wanted: n, usable: usable.len() });
        }
        usable.shuffle(&mut self.rng);
        let questions = usable
            .into_iter()
            .take(n)
            .zip(0..)
            .map(|(entry, id)| (id, entry.into_question(&mut self.rng)))
            .collect();
        log::info!("loaded {n} questions from {}", self.path.display());
        Ok(QuestionBank::new(questions)?)
    }
}
