use super::Advisor;
use crate::error::{Error, Result};
use crate::strategy::TrialProposal;
use crate::study::Study;
use crate::trial::Trial;

impl Advisor {
    /// Asks the study's strategy for up to `count` new trial proposals.
    ///
    /// The strategy is resolved from the study's `algorithm` through the
    /// registration table and receives the study and its full trial history.
    /// The proposals are returned as-is; use
    /// [`persist_proposals`](Self::persist_proposals) or
    /// [`create_suggested_trials`](Self::create_suggested_trials) to store
    /// them as trials.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the study does not exist.
    /// - [`Error::UnknownAlgorithm`] if no strategy is registered under the
    ///   study's algorithm name. This is a configuration error; retrying
    ///   does not help.
    /// - [`Error::TooManySuggestions`] / [`Error::ForeignProposal`] if the
    ///   strategy breaks its contract.
    /// - Whatever error the strategy itself returns.
    pub fn get_suggestions(&self, study_name: &str, count: usize) -> Result<Vec<TrialProposal>> {
        let (study, trials) = self.history(study_name)?;

        let strategy = self.strategy_for(study.algorithm()).inspect_err(|_| {
            trace_debug!(
                study = study_name,
                algorithm = study.algorithm(),
                "unknown algorithm"
            );
        })?;
        let proposals = strategy.get_new_suggestions(&study, &trials, count)?;

        if proposals.len() > count {
            return Err(Error::TooManySuggestions {
                requested: count,
                got: proposals.len(),
            });
        }
        if let Some(foreign) = proposals.iter().find(|p| p.study_name != study.name()) {
            return Err(Error::ForeignProposal {
                expected: study.name().to_owned(),
                got: foreign.study_name.clone(),
            });
        }

        trace_info!(
            study = study_name,
            requested = count,
            produced = proposals.len(),
            "suggestions produced"
        );
        Ok(proposals)
    }

    /// Asks for a single proposal; `None` if the strategy has nothing left
    /// to propose.
    ///
    /// # Errors
    ///
    /// Same as [`get_suggestions`](Self::get_suggestions).
    pub fn get_suggestion(&self, study_name: &str) -> Result<Option<TrialProposal>> {
        Ok(self.get_suggestions(study_name, 1)?.pop())
    }

    /// Requests suggestions and persists every proposal as a pending trial.
    ///
    /// # Errors
    ///
    /// Everything [`get_suggestions`](Self::get_suggestions) and
    /// [`persist_proposals`](Self::persist_proposals) can return. When
    /// persisting fails no trial is created.
    pub fn create_suggested_trials(&self, study_name: &str, count: usize) -> Result<Vec<Trial>> {
        let proposals = self.get_suggestions(study_name, count)?;
        self.persist_proposals(proposals)
    }

    /// Stores one proposal as a pending trial.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudyNotFound`] if the proposal's study does not exist
    /// and [`Error::DuplicateName`] if its name is taken.
    pub fn persist_proposal(&self, proposal: TrialProposal) -> Result<Trial> {
        self.registry
            .write()
            .create_trial_with_params(
                &proposal.study_name,
                &proposal.name,
                proposal.parameter_values,
            )
            .cloned()
    }

    /// Stores a batch of proposals as pending trials, all or nothing.
    ///
    /// # Errors
    ///
    /// Same as [`persist_proposal`](Self::persist_proposal), also for names
    /// repeated within the batch.
    pub fn persist_proposals(&self, proposals: Vec<TrialProposal>) -> Result<Vec<Trial>> {
        self.registry.write().persist_proposals(proposals)
    }

    /// Snapshot of a study and its trials, taken under the read lock.
    fn history(&self, study_name: &str) -> Result<(Study, Vec<Trial>)> {
        let registry = self.registry.read();
        let study = registry.studies().get_by_name(study_name)?.clone();
        let trials = registry
            .trials_of(study_name)
            .into_iter()
            .cloned()
            .collect();
        Ok((study, trials))
    }
}
