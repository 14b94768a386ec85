use soroban_sdk::contracterror;

/// Structured error codes returned by the survey factory.
///
/// Codes are stable; integrators match on the numeric value.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SurveyError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidConfig = 3,
    InsufficientPool = 4,
    InsufficientReward = 5,
    InvalidTargetNumber = 6,
    InvalidTitle = 7,
    InvalidDescription = 8,
    NoQuestions = 9,
    InvalidQuestion = 10,
    SurveyNotFound = 11,
    SurveyClosed = 12,
    AlreadyResponded = 13,
    InvalidAnswer = 14,
    CreatorCannotRespond = 15,
    NotCreator = 16,
}

impl SurveyError {
    /// Human-readable rejection text for this error.
    pub fn message(&self) -> &'static str {
        match self {
            SurveyError::AlreadyInitialized => "Factory is already initialized",
            SurveyError::NotInitialized => "Factory is not initialized",
            SurveyError::InvalidConfig => "Minimum amounts must not be negative",
            SurveyError::InsufficientPool => "Pool amount must be greater than minimum pool amount",
            SurveyError::InsufficientReward => {
                "Reward amount must be greater than minimum reward amount"
            }
            SurveyError::InvalidTargetNumber => "Target number must be greater than zero",
            SurveyError::InvalidTitle => "Title must be non-empty and within the length limit",
            SurveyError::InvalidDescription => "Description exceeds the length limit",
            SurveyError::NoQuestions => "Survey must have between one and the maximum number of questions",
            SurveyError::InvalidQuestion => "Question must have text and a valid number of options",
            SurveyError::SurveyNotFound => "Survey not found",
            SurveyError::SurveyClosed => "Survey is closed",
            SurveyError::AlreadyResponded => "Respondent has already answered this survey",
            SurveyError::InvalidAnswer => "Answers do not match the survey questions",
            SurveyError::CreatorCannotRespond => "Creator cannot answer their own survey",
            SurveyError::NotCreator => "Only the survey creator can do this",
        }
    }
}
