//! Run Pipeline use case
//!
//! Orchestrates the three-stage answer pipeline: initial fan-out,
//! cross-referencing refinement, and a single synthesis call.

use crate::ports::completion_client::{CompletionClient, ServiceError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, ProgressReporter};
use crate::use_cases::fan_out::FanOutExecutor;
use roundtable_domain::{
    AnswerSet, ConversationHistory, DomainError, FinalAnswer, Model, PANEL_SIZE, PipelinePhase,
    PipelineState, PromptTemplate, Question, Stage, StagePrompt, Turn,
};
use serde_json::json;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can end a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{stage} stage failed: {error}")]
    Stage { stage: Stage, error: ServiceError },

    #[error("A pipeline run is already in progress")]
    Busy,

    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Pipeline state error: {0}")]
    State(#[from] DomainError),
}

impl PipelineError {
    fn at(stage: Stage) -> impl FnOnce(ServiceError) -> Self {
        move |error| PipelineError::Stage { stage, error }
    }

    /// The stage a service failure occurred in, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Drives pipeline runs for one conversation.
///
/// Holds the single run slot: at most one run is active at a time and a
/// second `run` is rejected with [`PipelineError::Busy`].
pub struct Orchestrator<C: CompletionClient + 'static> {
    client: Arc<C>,
    model: Model,
    state: Mutex<PipelineState>,
    logger: Arc<dyn ConversationLogger>,
    runs: AtomicU64,
}

impl<C: CompletionClient + 'static> Orchestrator<C> {
    pub fn new(client: Arc<C>, model: Model) -> Self {
        Self {
            client,
            model,
            state: Mutex::new(PipelineState::new()),
            logger: Arc::new(NoConversationLogger),
            runs: AtomicU64::new(0),
        }
    }

    /// Record intermediate and final answers to an audit transcript
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Snapshot of the run state
    pub fn state(&self) -> PipelineState {
        self.lock_state().clone()
    }

    pub fn phase(&self) -> PipelinePhase {
        self.lock_state().phase()
    }

    /// Run the pipeline without progress reporting
    pub async fn run_headless(
        &self,
        query: &str,
        history: &mut ConversationHistory,
    ) -> Result<FinalAnswer, PipelineError> {
        self.run(query, history, &NoProgress).await
    }

    /// Answer `query` in the context of `history`.
    ///
    /// On success exactly one Agent turn holding the final answer is
    /// appended to `history`. On failure `history` is left untouched.
    pub async fn run(
        &self,
        query: &str,
        history: &mut ConversationHistory,
        progress: &dyn ProgressReporter,
    ) -> Result<FinalAnswer, PipelineError> {
        let question = Question::try_new(query).map_err(|_| PipelineError::EmptyQuery)?;
        let _slot = self.begin(progress)?;
        let run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;

        info!("Run {}: starting pipeline with model {}", run, self.model);

        let result = self.execute(run, &question, history, progress).await;

        match &result {
            Ok(answer) => {
                self.enter(PipelinePhase::Succeeded, progress)?;
                info!("Run {}: succeeded in {}ms", run, answer.elapsed_ms);
            }
            Err(e) => {
                warn!("Run {}: failed: {}", run, e);
                self.logger.log(ConversationEvent::new(
                    "pipeline_failed",
                    json!({
                        "run": run,
                        "stage": e.stage().map(|s| s.as_str()),
                        "error": e.to_string(),
                    }),
                ));
                self.enter(PipelinePhase::Failed, progress)?;
            }
        }

        result
    }

    async fn execute(
        &self,
        run: u64,
        question: &Question,
        history: &mut ConversationHistory,
        progress: &dyn ProgressReporter,
    ) -> Result<FinalAnswer, PipelineError> {
        // Stage 1: Initial fan-out (entered by `begin`)
        let initial = self.phase_initial(question, history, progress).await?;
        self.log_answers(run, "initial_answer", &initial);

        // Stage 2: Refinement
        self.enter(PipelinePhase::Refinement, progress)?;
        let refined = self
            .phase_refinement(question, history, &initial, progress)
            .await?;
        self.log_answers(run, "refined_answer", &refined);

        // Stage 3: Synthesis
        self.enter(PipelinePhase::Synthesis, progress)?;
        let final_text = self
            .phase_synthesis(question, history, &refined, progress)
            .await?;

        let elapsed_ms = self
            .state()
            .elapsed()
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        history.push(Turn::agent(final_text.clone()));
        self.logger.log(ConversationEvent::new(
            "final_answer",
            json!({ "run": run, "text": final_text, "elapsed_ms": elapsed_ms }),
        ));

        Ok(FinalAnswer::new(final_text, self.model.clone(), elapsed_ms))
    }

    /// Stage 1: the same request issued to every agent
    async fn phase_initial(
        &self,
        question: &Question,
        history: &ConversationHistory,
        progress: &dyn ProgressReporter,
    ) -> Result<AnswerSet, PipelineError> {
        info!("Stage 1: Initial fan-out ({} agents)", PANEL_SIZE);

        let prompt = PromptTemplate::initial(question.content());
        let tasks = (0..PANEL_SIZE)
            .map(|_| self.call(history, &prompt))
            .collect();

        self.fan_out(Stage::InitialFanOut, tasks, progress).await
    }

    /// Stage 2: each agent revises its own answer against the other three
    async fn phase_refinement(
        &self,
        question: &Question,
        history: &ConversationHistory,
        initial: &AnswerSet,
        progress: &dyn ProgressReporter,
    ) -> Result<AnswerSet, PipelineError> {
        info!("Stage 2: Refinement ({} agents)", PANEL_SIZE);

        let tasks = (0..PANEL_SIZE)
            .map(|i| {
                let prompt = PromptTemplate::refinement(
                    question.content(),
                    initial.own(i),
                    &initial.others(i),
                );
                self.call(history, &prompt)
            })
            .collect();

        self.fan_out(Stage::Refinement, tasks, progress).await
    }

    /// Stage 3: one call over all refined answers
    async fn phase_synthesis(
        &self,
        question: &Question,
        history: &ConversationHistory,
        refined: &AnswerSet,
        progress: &dyn ProgressReporter,
    ) -> Result<String, PipelineError> {
        info!("Stage 3: Synthesis");

        let prompt = PromptTemplate::synthesis(question.content(), refined);
        let result = self
            .call(history, &prompt)
            .await
            .and_then(|text| {
                if text.trim().is_empty() {
                    Err(ServiceError::EmptyResponse)
                } else {
                    Ok(text)
                }
            });

        progress.on_agent_complete(Stage::Synthesis, 0, result.is_ok());
        result.map_err(PipelineError::at(Stage::Synthesis))
    }

    async fn fan_out<F>(
        &self,
        stage: Stage,
        tasks: Vec<F>,
        progress: &dyn ProgressReporter,
    ) -> Result<AnswerSet, PipelineError>
    where
        F: Future<Output = Result<String, ServiceError>> + Send + 'static,
    {
        let texts = FanOutExecutor::run_batch_observed(tasks, |index, success| {
            progress.on_agent_complete(stage, index, success)
        })
        .await
        .map_err(|e| PipelineError::at(stage)(ServiceError::from(e)))?;

        Ok(AnswerSet::from_texts(texts)?)
    }

    /// Build one detached service call for `prompt`
    fn call(
        &self,
        history: &ConversationHistory,
        prompt: &StagePrompt,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send + 'static + use<C> {
        let client = Arc::clone(&self.client);
        let model = self.model.clone();
        let contents = PromptTemplate::contents(history, prompt);
        let system_instruction = prompt.system_instruction;

        async move {
            client
                .generate(&model, &contents, system_instruction)
                .await
        }
    }

    fn log_answers(&self, run: u64, event_type: &'static str, answers: &AnswerSet) {
        for answer in answers.iter() {
            debug!(
                "Run {}: {} #{} ({} chars)",
                run,
                event_type,
                answer.index,
                answer.text.len()
            );
            self.logger.log(ConversationEvent::new(
                event_type,
                json!({ "run": run, "index": answer.index, "text": answer.text }),
            ));
        }
    }

    fn enter(
        &self,
        phase: PipelinePhase,
        progress: &dyn ProgressReporter,
    ) -> Result<(), PipelineError> {
        self.lock_state().advance(phase)?;
        debug!("Phase -> {}", phase);
        progress.on_phase_change(&phase);
        Ok(())
    }

    /// Take the run slot and enter the first stage in one critical section
    fn begin(&self, progress: &dyn ProgressReporter) -> Result<RunSlot<'_>, PipelineError> {
        {
            let mut state = self.lock_state();
            if state.is_busy() {
                return Err(PipelineError::Busy);
            }
            state.advance(PipelinePhase::InitialFanOut)?;
        }
        debug!("Phase -> {}", PipelinePhase::InitialFanOut);
        progress.on_phase_change(&PipelinePhase::InitialFanOut);
        Ok(RunSlot { state: &self.state })
    }

    fn lock_state(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the orchestrator's run slot for the lifetime of one run.
///
/// Re-arms the state machine on drop, including when the run future is
/// dropped mid-stage.
struct RunSlot<'a> {
    state: &'a Mutex<PipelineState>,
}

impl Drop for RunSlot<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.advance(PipelinePhase::Idle).is_err() {
            state.reset();
        }
    }
}
