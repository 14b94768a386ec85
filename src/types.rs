use soroban_sdk::{contracttype, Address, String, Vec};

/// Storage keys.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Construction-time configuration (instance storage).
    Config,
    /// Number of surveys created by this factory.
    SurveyCount,
    /// Registry slot: address of the survey created at this index.
    SurveyAt(u32),
    /// Survey record, keyed by survey address.
    Survey(Address),
    /// Respondents of a survey in submission order.
    Respondents(Address),
    /// Answers submitted by `(survey, respondent)`.
    Answers(Address, Address),
}

/// Factory configuration, fixed by `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub token: Address,
    pub min_pool_amount: i128,
    pub min_reward_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
}

/// Survey definition supplied by the creator.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SurveySchema {
    pub title: String,
    pub description: String,
    pub target_number: u32,
    pub questions: Vec<Question>,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SurveyStatus {
    Open = 0,
    Closed = 1,
}

/// A survey created by the factory and funded with its pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Survey {
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub target_number: u32,
    pub questions: Vec<Question>,
    pub pool_amount: i128,
    pub reward_amount: i128,
    pub response_count: u32,
    pub status: SurveyStatus,
}

impl Survey {
    /// Pool value not yet paid out to respondents.
    pub fn unspent(&self) -> i128 {
        self.pool_amount - self.reward_amount * i128::from(self.response_count)
    }
}
