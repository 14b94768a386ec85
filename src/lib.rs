#![no_std]
use soroban_sdk::{
    contract, contractimpl, log, panic_with_error, symbol_short, token, Address, BytesN, Env,
    Symbol, Vec,
};

mod error;
mod types;

pub use error::SurveyError;
pub use types::{Config, DataKey, Question, Survey, SurveySchema, SurveyStatus};

/// Survey factory.
///
/// Creators fund a survey with a token pool; the pool is split evenly
/// between the survey's target number of respondents:
/// - Validating pool and per-respondent reward against the configured minimums
/// - Keeping an append-only registry of created surveys
/// - Paying each respondent their reward as answers come in
/// - Refunding whatever is left when the survey closes

#[contract]
pub struct SurveyFactory;

// Event symbols
const EVENT_INITIALIZED: Symbol = symbol_short!("init");
const EVENT_SURVEY_CREATED: Symbol = symbol_short!("srv_new");
const EVENT_SURVEY_ANSWERED: Symbol = symbol_short!("srv_ans");
const EVENT_SURVEY_CLOSED: Symbol = symbol_short!("srv_cls");

// Configuration constants
const MAX_TITLE_LENGTH: u32 = 128;
const MAX_DESCRIPTION_LENGTH: u32 = 1024;
const MAX_QUESTIONS: u32 = 32;
const MIN_OPTIONS: u32 = 2;
const MAX_OPTIONS: u32 = 16;
const MAX_PAGE_LIMIT: u32 = 20;

fn load_config(env: &Env) -> Config {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or_else(|| panic_with_error!(env, SurveyError::NotInitialized))
}

fn survey_count(env: &Env) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::SurveyCount)
        .unwrap_or(0)
}

/// Registry slots `start..end`, in creation order.
fn load_surveys(env: &Env, start: u32, end: u32) -> Vec<Address> {
    let mut surveys: Vec<Address> = Vec::new(env);
    for index in start..end {
        let slot: Option<Address> = env.storage().persistent().get(&DataKey::SurveyAt(index));
        if let Some(address) = slot {
            surveys.push_back(address);
        }
    }
    surveys
}

fn load_survey(env: &Env, survey: &Address) -> Result<Survey, SurveyError> {
    env.storage()
        .persistent()
        .get(&DataKey::Survey(survey.clone()))
        .ok_or(SurveyError::SurveyNotFound)
}

/// Survey addresses are derived from the factory address and the
/// registry index, so they are unique per factory and never reused.
fn survey_address(env: &Env, index: u32) -> Address {
    let mut salt = [0u8; 32];
    salt[28..].copy_from_slice(&index.to_be_bytes());
    env.deployer()
        .with_current_contract(BytesN::from_array(env, &salt))
        .deployed_address()
}

/// Check a creation request against the configuration.
///
/// Returns the per-respondent reward (`pool_amount / target_number`,
/// rounded down) when the request is acceptable.
fn validate_survey(
    config: &Config,
    schema: &SurveySchema,
    pool_amount: i128,
) -> Result<i128, SurveyError> {
    // A pool equal to the minimum is accepted.
    if pool_amount < config.min_pool_amount {
        return Err(SurveyError::InsufficientPool);
    }
    if schema.target_number == 0 {
        return Err(SurveyError::InvalidTargetNumber);
    }

    let reward_amount = pool_amount / i128::from(schema.target_number);
    if reward_amount <= config.min_reward_amount {
        return Err(SurveyError::InsufficientReward);
    }

    if schema.title.len() == 0 || schema.title.len() > MAX_TITLE_LENGTH {
        return Err(SurveyError::InvalidTitle);
    }
    if schema.description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(SurveyError::InvalidDescription);
    }
    if schema.questions.is_empty() || schema.questions.len() > MAX_QUESTIONS {
        return Err(SurveyError::NoQuestions);
    }
    for question in schema.questions.iter() {
        let options = question.options.len();
        if question.question.len() == 0 || options < MIN_OPTIONS || options > MAX_OPTIONS {
            return Err(SurveyError::InvalidQuestion);
        }
    }

    Ok(reward_amount)
}

fn validate_answers(survey: &Survey, answers: &Vec<u32>) -> Result<(), SurveyError> {
    if answers.len() != survey.questions.len() {
        return Err(SurveyError::InvalidAnswer);
    }
    for (question, choice) in survey.questions.iter().zip(answers.iter()) {
        if choice >= question.options.len() {
            return Err(SurveyError::InvalidAnswer);
        }
    }
    Ok(())
}

/// Mark `survey` closed and send the unspent pool back to its creator.
/// Storage is written before the transfer.
fn close(env: &Env, config: &Config, address: &Address, mut survey: Survey) -> i128 {
    let refund = survey.unspent();
    survey.status = SurveyStatus::Closed;
    env.storage()
        .persistent()
        .set(&DataKey::Survey(address.clone()), &survey);

    if refund > 0 {
        token::Client::new(env, &config.token).transfer(
            &env.current_contract_address(),
            &survey.creator,
            &refund,
        );
    }

    env.events()
        .publish((EVENT_SURVEY_CLOSED, address.clone()), (survey.creator, refund));
    log!(env, "survey closed", address.clone(), refund);

    refund
}

#[contractimpl]
impl SurveyFactory {
    /// Configure the factory. Can only be called once; the minimums are
    /// immutable afterwards.
    ///
    /// # Arguments
    /// * `token` - Token contract used to fund pools and pay rewards
    /// * `min_pool_amount` - A survey's pool must be at least this
    /// * `min_reward_amount` - The per-respondent reward must be strictly greater than this
    pub fn initialize(
        env: Env,
        token: Address,
        min_pool_amount: i128,
        min_reward_amount: i128,
    ) -> Result<(), SurveyError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(SurveyError::AlreadyInitialized);
        }
        if min_pool_amount < 0 || min_reward_amount < 0 {
            return Err(SurveyError::InvalidConfig);
        }

        let config = Config {
            token: token.clone(),
            min_pool_amount,
            min_reward_amount,
        };
        env.storage().instance().set(&DataKey::Config, &config);

        env.events().publish(
            (EVENT_INITIALIZED,),
            (token, min_pool_amount, min_reward_amount),
        );
        Ok(())
    }

    pub fn get_min_pool_amount(env: Env) -> i128 {
        load_config(&env).min_pool_amount
    }

    pub fn get_min_reward_amount(env: Env) -> i128 {
        load_config(&env).min_reward_amount
    }

    pub fn get_token(env: Env) -> Address {
        load_config(&env).token
    }

    /// Create and fund a new survey.
    ///
    /// The pool is pulled from `creator` only after every check passes, so
    /// a rejected call leaves no trace: no registry entry, no event, no
    /// transfer.
    ///
    /// # Arguments
    /// * `creator` - Survey owner; must authorize the call and hold the pool
    /// * `schema` - Title, description, target respondent count and questions
    /// * `pool_amount` - Total reward pool, in the token's smallest unit
    ///
    /// # Errors
    /// - `InsufficientPool` if `pool_amount` is below the minimum pool amount
    /// - `InvalidTargetNumber` if the target respondent count is zero
    /// - `InsufficientReward` if `pool_amount / target_number` is not above the minimum reward
    /// - `InvalidTitle`, `InvalidDescription`, `NoQuestions`, `InvalidQuestion`
    ///   for a malformed schema
    pub fn create_survey(
        env: Env,
        creator: Address,
        schema: SurveySchema,
        pool_amount: i128,
    ) -> Result<Address, SurveyError> {
        creator.require_auth();

        let config = load_config(&env);
        let reward_amount = match validate_survey(&config, &schema, pool_amount) {
            Ok(reward_amount) => reward_amount,
            Err(err) => {
                log!(&env, "create_survey rejected", err as u32, pool_amount);
                return Err(err);
            }
        };

        let index = survey_count(&env);
        let address = survey_address(&env, index);

        let survey = Survey {
            creator: creator.clone(),
            title: schema.title,
            description: schema.description,
            target_number: schema.target_number,
            questions: schema.questions,
            pool_amount,
            reward_amount,
            response_count: 0,
            status: SurveyStatus::Open,
        };
        env.storage()
            .persistent()
            .set(&DataKey::Survey(address.clone()), &survey);

        env.storage()
            .persistent()
            .set(&DataKey::SurveyAt(index), &address);
        env.storage()
            .persistent()
            .set(&DataKey::SurveyCount, &(index + 1));

        token::Client::new(&env, &config.token).transfer(
            &creator,
            &env.current_contract_address(),
            &pool_amount,
        );

        env.events().publish(
            (EVENT_SURVEY_CREATED, creator),
            (address.clone(), pool_amount, reward_amount),
        );
        log!(&env, "survey created", address.clone(), reward_amount);

        Ok(address)
    }

    /// Every survey created so far, in creation order.
    pub fn get_surveys(env: Env) -> Vec<Address> {
        load_surveys(&env, 0, survey_count(&env))
    }

    pub fn get_survey_count(env: Env) -> u32 {
        survey_count(&env)
    }

    /// Page through the registry.
    ///
    /// `limit` of 0, or above `MAX_PAGE_LIMIT`, is treated as `MAX_PAGE_LIMIT`.
    /// Returns the page and the cursor to pass as `start` for the next page,
    /// or `None` when the registry is exhausted.
    pub fn get_surveys_page(env: Env, start: u32, limit: u32) -> (Vec<Address>, Option<u32>) {
        let count = survey_count(&env);
        if start >= count {
            return (Vec::new(&env), None);
        }

        let limit = if limit == 0 || limit > MAX_PAGE_LIMIT {
            MAX_PAGE_LIMIT
        } else {
            limit
        };
        let end = start.saturating_add(limit).min(count);
        let page = load_surveys(&env, start, end);

        let cursor = if end < count { Some(end) } else { None };
        (page, cursor)
    }

    pub fn get_survey(env: Env, survey: Address) -> Option<Survey> {
        load_survey(&env, &survey).ok()
    }

    /// Answer a survey and collect the reward.
    ///
    /// `answers[i]` is the chosen option index for question `i`. Each
    /// respondent may answer once. The survey closes automatically when it
    /// reaches its target number of respondents, refunding the rounding
    /// remainder of the pool to the creator.
    ///
    /// Returns the reward paid to `respondent`.
    pub fn submit_answer(
        env: Env,
        respondent: Address,
        survey: Address,
        answers: Vec<u32>,
    ) -> Result<i128, SurveyError> {
        respondent.require_auth();

        let config = load_config(&env);
        let mut record = load_survey(&env, &survey)?;
        if record.status == SurveyStatus::Closed {
            return Err(SurveyError::SurveyClosed);
        }
        if record.creator == respondent {
            return Err(SurveyError::CreatorCannotRespond);
        }

        let answers_key = DataKey::Answers(survey.clone(), respondent.clone());
        if env.storage().persistent().has(&answers_key) {
            return Err(SurveyError::AlreadyResponded);
        }
        validate_answers(&record, &answers)?;

        env.storage().persistent().set(&answers_key, &answers);

        let respondents_key = DataKey::Respondents(survey.clone());
        let mut respondents: Vec<Address> = env
            .storage()
            .persistent()
            .get(&respondents_key)
            .unwrap_or_else(|| Vec::new(&env));
        respondents.push_back(respondent.clone());
        env.storage().persistent().set(&respondents_key, &respondents);

        record.response_count += 1;
        env.storage()
            .persistent()
            .set(&DataKey::Survey(survey.clone()), &record);

        let reward = record.reward_amount;
        token::Client::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &respondent,
            &reward,
        );

        env.events().publish(
            (EVENT_SURVEY_ANSWERED, survey.clone()),
            (respondent, reward),
        );

        if record.response_count >= record.target_number {
            close(&env, &config, &survey, record);
        }

        Ok(reward)
    }

    /// Close a survey early. Only the creator may do this; the unpaid part
    /// of the pool is refunded to them.
    ///
    /// Returns the refunded amount.
    pub fn close_survey(env: Env, creator: Address, survey: Address) -> Result<i128, SurveyError> {
        creator.require_auth();

        let config = load_config(&env);
        let record = load_survey(&env, &survey)?;
        if record.creator != creator {
            return Err(SurveyError::NotCreator);
        }
        if record.status == SurveyStatus::Closed {
            return Err(SurveyError::SurveyClosed);
        }

        Ok(close(&env, &config, &survey, record))
    }

    pub fn get_answers(env: Env, survey: Address, respondent: Address) -> Option<Vec<u32>> {
        env.storage()
            .persistent()
            .get(&DataKey::Answers(survey, respondent))
    }

    pub fn has_responded(env: Env, survey: Address, respondent: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Answers(survey, respondent))
    }

    /// Respondents of `survey`, in the order they answered.
    pub fn get_respondents(env: Env, survey: Address) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::Respondents(survey))
            .unwrap_or_else(|| Vec::new(&env))
    }
}
