use crate::prelude::*;
use rand::seq::SliceRandom;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("no questions left")]
    NoQuestionsLeft,
    #[error("unknown question {0}")]
    UnknownQuestion(QuestionId),
    #[error("question {0} is malformed: {1}")]
    Malformed(QuestionId, &'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub question: String,
    pub answers: [String; 4],
    /// 1-based index into `answers`.
    pub correct: u8,
}
impl Question {
    fn validate(&self, id: QuestionId) -> Result<(), QuestionError> {
        if !(1..=4).contains(&self.correct) {
            return Err(QuestionError::Malformed(id, "correct answer must be between 1 and 4"));
        }
        let forbidden = |s: &String| s.contains(wire::DATA_DELIMITER) || s.contains(wire::DELIMITER);
        if forbidden(&self.question) || self.answers.iter().any(forbidden) {
            return Err(QuestionError::Malformed(id, "text contains a protocol delimiter"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct QuestionBank(BTreeMap<QuestionId, Question>);

impl QuestionBank {
    pub fn new(questions: BTreeMap<QuestionId, Question>) -> Result<Self, QuestionError> {
        for (&id, question) in &questions {
            question.validate(id)?;
        }
        Ok(Self(questions))
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.0.get(&id)
    }
    pub fn ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.0.keys().copied()
    }

    /// Picks a question the player hasn't seen, returning its id and the
    /// `YOUR_QUESTION` payload.
    pub fn pick_unasked(&self, asked: &BTreeSet<QuestionId>, rng: &mut impl rand::Rng) -> Result<(QuestionId, String), QuestionError> {
        let candidates: Vec<QuestionId> = self.ids().filter(|id| !asked.contains(id)).collect();
        let &id = candidates.choose(rng).ok_or(QuestionError::NoQuestionsLeft)?;
        let q = &self.0[&id];
        Ok((id, wire::build_question(id, &q.question, &q.answers)))
    }

    /// Whether `choice` is right, along with the right choice.
    pub fn check_answer(&self, id: QuestionId, choice: u8) -> Result<(bool, u8), QuestionError> {
        let q = self.get(id).ok_or(QuestionError::UnknownQuestion(id))?;
        Ok((q.correct == choice, q.correct))
    }
}
impl<'de> serde::Deserialize<'de> for QuestionBank {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let questions = BTreeMap::deserialize(deserializer)?;
        Self::new(questions).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) fn sample(count: QuestionId) -> QuestionBank {
    let questions = (0..count)
        .map(|id| {
            (id, Question {
                question: format!("What is {id} + 1?"),
                answers: [0, 1, 2, 3].map(|n| (id + n).to_string()),
                correct: 2,
            })
        })
        .collect();
    QuestionBank::new(questions).expect("sample questions are well formed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn never_repeats_an_asked_question() {
        let bank = sample(5);
        let mut rng = StdRng::seed_from_u64(7);
        let mut asked = BTreeSet::new();
        for _ in 0..5 {
            let (id, _) = bank.pick_unasked(&asked, &mut rng).unwrap();
            assert!(asked.insert(id), "question {id} asked twice");
        }
        assert_eq!(asked.len(), 5);
        assert_eq!(bank.pick_unasked(&asked, &mut rng), Err(QuestionError::NoQuestionsLeft));
        assert_eq!(bank.pick_unasked(&asked, &mut rng), Err(QuestionError::NoQuestionsLeft));
    }

    #[test]
    fn payload_carries_question_and_answers() {
        let bank = sample(1);
        let (id, payload) = bank.pick_unasked(&BTreeSet::new(), &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(id, 0);
        assert_eq!(payload, "0#What is 0 + 1?#0#1#2#3");
    }

    #[test]
    fn checks_answers() {
        let bank = sample(4);
        assert_eq!(bank.check_answer(3, 2), Ok((true, 2)));
        assert_eq!(bank.check_answer(3, 4), Ok((false, 2)));
        assert_eq!(bank.check_answer(9, 2), Err(QuestionError::UnknownQuestion(9)));
    }

    #[test]
    fn rejects_malformed_questions() {
        let mut q = sample(1).get(0).unwrap().clone();
        q.correct = 5;
        assert!(matches!(QuestionBank::new(BTreeMap::from([(0, q.clone())])), Err(QuestionError::Malformed(0, _))));
        q.correct = 1;
        q.answers[2] = "a#b".into();
        assert!(matches!(QuestionBank::new(BTreeMap::from([(0, q)])), Err(QuestionError::Malformed(0, _))));
    }

    #[test]
    fn loads_from_json() {
        let json = r#"{"3":{"question":"Sky?","answers":["red","blue","green","pink"],"correct":2}}"#;
        let bank: QuestionBank = serde_json::from_str(json).unwrap();
        assert_eq!(bank.check_answer(3, 2), Ok((true, 2)));
        assert_eq!(serde_json::to_string(&bank).unwrap(), json);

        let bad = r#"{"3":{"question":"Sky?","answers":["red","blue","green","pink"],"correct":0}}"#;
        assert!(serde_json::from_str::<QuestionBank>(bad).is_err());
    }
}
