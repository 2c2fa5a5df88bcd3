use crate::prelude::*;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub password: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub questions_asked: BTreeSet<QuestionId>,
    #[serde(default)]
    pub questions_answered: BTreeSet<QuestionId>,
}
impl User {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            ..Default::default()
        }
    }
}

/// Every registered player, in the order they were first stored. The users
/// file keeps that order across saves and the leaderboard breaks ties by it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecords(Vec<(String, User)>);

impl UserRecords {
    pub fn new() -> Self {
        Self::default()
    }
    /// Replaces an existing user in place, otherwise appends.
    pub fn insert(&mut self, name: impl Into<String>, user: User) -> Option<User> {
        let name = name.into();
        match self.get_mut(&name) {
            Some(old) => Some(core::mem::replace(old, user)),
            None => {
                self.0.push((name, user));
                None
            }
        }
    }
    pub fn get(&self, name: &str) -> Option<&User> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, user)| user)
    }
    fn get_mut(&mut self, name: &str) -> Option<&mut User> {
        self.0.iter_mut().find(|(n, _)| n == name).map(|(_, user)| user)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &User)> {
        self.0.iter().map(|(name, user)| (name.as_str(), user))
    }

    pub fn record_score_delta(&mut self, name: &str, delta: i64) -> Option<u32> {
        let user = self.get_mut(name)?;
        user.score = (user.score as i64 + delta).clamp(0, u32::MAX as i64) as u32;
        Some(user.score)
    }
    /// Returns false if the user had already been asked `qid`.
    pub fn mark_question_asked(&mut self, name: &str, qid: QuestionId) -> bool {
        self.get_mut(name).map_or(false, |u| u.questions_asked.insert(qid))
    }
    /// Returns false if the user had already answered `qid`.
    pub fn mark_question_answered(&mut self, name: &str, qid: QuestionId) -> bool {
        self.get_mut(name).map_or(false, |u| u.questions_answered.insert(qid))
    }

    /// Scores from highest to lowest. Equal scores keep storage order.
    pub fn leaderboard(&self) -> Vec<(&str, u32)> {
        let mut scores: Vec<_> = self.iter().map(|(name, user)| (name, user.score)).collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1));
        scores
    }
}
impl FromIterator<(String, User)> for UserRecords {
    fn from_iter<I: IntoIterator<Item = (String, User)>>(iter: I) -> Self {
        let mut users = Self::new();
        for (name, user) in iter {
            users.insert(name, user);
        }
        users
    }
}

impl serde::Serialize for UserRecords {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
impl<'de> serde::Deserialize<'de> for UserRecords {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;
        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = UserRecords;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of usernames to user records")
            }
            fn visit_map<A: serde::de::MapAccess<'de>>(self, mut map: A) -> Result<UserRecords, A::Error> {
                let mut users = UserRecords::new();
                while let Some((name, user)) = map.next_entry::<String, User>()? {
                    users.insert(name, user);
                }
                Ok(users)
            }
        }
        deserializer.deserialize_map(Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scored(score: u32) -> User {
        User { score, ..User::new("pw") }
    }

    #[test]
    fn leaderboard_breaks_ties_by_storage_order() {
        let users: UserRecords = [
            ("carol".to_owned(), scored(9)),
            ("alice".to_owned(), scored(5)),
            ("bob".to_owned(), scored(9)),
        ]
        .into_iter()
        .collect();
        assert_eq!(users.leaderboard(), vec![("carol", 9), ("bob", 9), ("alice", 5)]);
    }

    #[test]
    fn file_order_survives_a_round_trip() {
        let json = r#"{"zed":{"password":"a","score":3,"questions_asked":[],"questions_answered":[]},"amy":{"password":"b","score":3,"questions_asked":[],"questions_answered":[]}}"#;
        let mut users: UserRecords = serde_json::from_str(json).unwrap();
        assert_eq!(users.leaderboard(), vec![("zed", 3), ("amy", 3)]);

        users.insert("amy", scored(4));
        let names: Vec<_> = users.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["zed", "amy"]);
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn score_never_goes_negative() {
        let mut users = UserRecords::new();
        users.insert("alice", scored(1));
        assert_eq!(users.record_score_delta("alice", -3), Some(0));
        assert_eq!(users.record_score_delta("alice", 2), Some(2));
        assert_eq!(users.record_score_delta("nobody", 1), None);
    }

    #[test]
    fn question_sets_are_idempotent() {
        let mut users = UserRecords::new();
        users.insert("alice", User::new("pw"));
        assert!(users.mark_question_asked("alice", 3));
        assert!(!users.mark_question_asked("alice", 3));
        assert!(users.mark_question_answered("alice", 3));
        assert!(!users.mark_question_answered("alice", 3));
        assert_eq!(users.get("alice").unwrap().questions_answered.len(), 1);
    }

    #[test]
    fn records_use_the_json_schema() {
        let json = r#"{"alice":{"password":"pw","score":4,"questions_asked":[1,2],"questions_answered":[1]}}"#;
        let users: UserRecords = serde_json::from_str(json).unwrap();
        let alice = users.get("alice").unwrap();
        assert_eq!(alice.score, 4);
        assert_eq!(alice.questions_asked, BTreeSet::from([1, 2]));
        assert_eq!(serde_json::to_string(&users).unwrap(), json);

        let fresh: UserRecords = serde_json::from_str(r#"{"bob":{"password":"x"}}"#).unwrap();
        assert_eq!(fresh.get("bob"), Some(&User::new("x")));
    }
}
