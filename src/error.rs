#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a lookup by id or name has no match.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// The kind of entity that was looked up (`study`, `trial`, ...).
        kind: &'static str,
        /// The id or name that was looked up.
        key: String,
    },

    /// Returned when a trial is created against a study that does not exist.
    #[error("study '{0}' does not exist")]
    StudyNotFound(String),

    /// Returned when an entity is added under a name its table already holds.
    #[error("{kind} named '{name}' already exists")]
    DuplicateName {
        /// The kind of entity being added.
        kind: &'static str,
        /// The conflicting name.
        name: String,
    },

    /// Returned when an entity is added with an id other than the table's
    /// next sequential id.
    #[error("{kind} id out of sequence: expected {expected}, got {got}")]
    IdOutOfSequence {
        /// The kind of entity being added.
        kind: &'static str,
        /// The id the table expected next.
        expected: u64,
        /// The id carried by the entity.
        got: u64,
    },

    /// Returned when a study names an algorithm with no registered strategy.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Returned when a study configuration cannot be serialized or parsed.
    #[error("invalid study configuration: {0}")]
    InvalidConfiguration(String),

    /// Returned when a study is completed while some of its trials are not.
    #[error("study '{study}' still has {pending} pending trial(s)")]
    TrialsPending {
        /// The study name.
        study: String,
        /// Number of trials that are not completed.
        pending: usize,
    },

    /// Returned when a completion call targets a trial that is already completed.
    #[error("trial {0} is already completed")]
    TrialAlreadyCompleted(u64),

    /// Returned when an objective value is NaN or infinite.
    #[error("objective value must be finite, got {0}")]
    NonFiniteObjective(f64),

    /// Returned when a trial is completed from an empty metric series.
    #[error("metric series is empty")]
    EmptySeries,

    /// Returned when a strategy proposes more trials than were requested.
    #[error("strategy returned {got} suggestions but only {requested} were requested")]
    TooManySuggestions {
        /// The number of suggestions requested.
        requested: usize,
        /// The number of suggestions returned.
        got: usize,
    },

    /// Returned when a strategy proposes a trial for a different study.
    #[error("suggestion belongs to study '{got}', expected '{expected}'")]
    ForeignProposal {
        /// The study the suggestions were requested for.
        expected: String,
        /// The study named by the proposal.
        got: String,
    },

    /// Returned when a strategy fails to produce suggestions.
    #[error("strategy error: {0}")]
    Strategy(String),

    /// Returned when a snapshot cannot be written or read.
    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub(crate) fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Error::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}
