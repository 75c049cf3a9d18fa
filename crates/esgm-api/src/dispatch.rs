//! Background evaluation of submitted projects.
//!
//! The evaluation is a placeholder: after a fixed delay the configured
//! evaluator assigns pillar scores, which are stored and the project is
//! marked `COMPLETED`. In `noop` mode projects stay `PENDING`.

use std::sync::Arc;
use std::time::Duration;

use esgm_core::{EvaluationConfig, ProjectId, ProjectStatus};
use esgm_eval::{Evaluator, build_evaluator};
use esgm_store::Store;
use tokio::task::JoinHandle;

/// Starts evaluations on the tokio runtime. Cheap to clone.
#[derive(Clone)]
pub struct EvaluationDispatcher {
    store: Store,
    evaluator: Option<Arc<dyn Evaluator>>,
    delay: Duration,
}

impl std::fmt::Debug for EvaluationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationDispatcher")
            .field("evaluator", &self.evaluator_name())
            .field("delay", &self.delay)
            .finish()
    }
}

impl EvaluationDispatcher {
    /// Dispatcher for the configured evaluation mode.
    pub fn new(store: Store, config: &EvaluationConfig) -> Self {
        Self {
            store,
            evaluator: build_evaluator(config).map(Arc::from),
            delay: config.delay(),
        }
    }

    /// Name of the active evaluator, `"noop"` when evaluation is off.
    pub fn evaluator_name(&self) -> &'static str {
        self.evaluator.as_ref().map_or("noop", |e| e.name())
    }

    /// Whether dispatching will score projects.
    pub fn is_active(&self) -> bool {
        self.evaluator.is_some()
    }

    /// Mark the project `PROCESSING` and score it in the background.
    ///
    /// Returns the task handle, or `None` in noop mode (the project is left
    /// as it is).
    pub async fn dispatch(
        &self,
        project_id: ProjectId,
    ) -> esgm_store::Result<Option<JoinHandle<()>>> {
        let Some(evaluator) = self.evaluator.clone() else {
            tracing::info!(project_id, "Evaluation disabled, project stays pending");
            return Ok(None);
        };

        self.store
            .update_project_status(project_id, ProjectStatus::Processing)
            .await?;
        tracing::debug!(
            project_id,
            evaluator = evaluator.name(),
            delay_ms = self.delay.as_millis() as u64,
            "Evaluation scheduled"
        );

        let store = self.store.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = evaluate(&store, evaluator.as_ref(), project_id).await {
                tracing::error!(project_id, error = %err, "Evaluation failed");
                if let Err(err) = store
                    .update_project_status(project_id, ProjectStatus::Failed)
                    .await
                {
                    tracing::error!(project_id, error = %err, "Could not mark project failed");
                }
            }
        });
        Ok(Some(handle))
    }

    /// Pick up projects left `PROCESSING` by a previous run.
    ///
    /// With an evaluator they are scheduled again; in noop mode they go back
    /// to `PENDING`. Returns how many projects were touched.
    pub async fn resume_interrupted(&self) -> esgm_store::Result<usize> {
        let stale = self.store.processing_projects().await?;
        for &project_id in &stale {
            if self.is_active() {
                self.dispatch(project_id).await?;
            } else {
                self.store
                    .update_project_status(project_id, ProjectStatus::Pending)
                    .await?;
            }
        }
        if !stale.is_empty() {
            tracing::info!(
                count = stale.len(),
                evaluator = self.evaluator_name(),
                "Resumed interrupted evaluations"
            );
        }
        Ok(stale.len())
    }
}


async fn evaluate(
    store: &Store,
    evaluator: &dyn Evaluator,
    project_id: ProjectId,
) -> esgm_store::Result<()> {
    let Some(input) = store.evaluation_input(project_id).await? else {
        tracing::debug!(project_id, "Project deleted before evaluation");
        return Ok(());
    };
    let outcome = evaluator.evaluate(&input);
    match store.save_evaluation(project_id, &outcome).await {
        Ok(evaluation) => {
            tracing::info!(
                project_id,
                evaluation_id = evaluation.evaluation_id,
                status = %evaluation.status,
                "Evaluation completed"
            );
            Ok(())
        }
        Err(err) if err.is_invalid_reference() => {
            tracing::debug!(project_id, "Project deleted during evaluation");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use esgm_core::{AnswerSubmission, CreateProjectRequest, EvaluationMode, EvaluationStatus};

    async fn store_with_project() -> (Store, ProjectId, i64) {
        let store = Store::open_in_memory().unwrap();
        store.migrate().await.unwrap();
        let user = store
            .create_user("d@example.com", "Dis", "Patch", "hash")
            .await
            .unwrap();
        let req = CreateProjectRequest {
            project_name: "Plant".to_string(),
            industry: "Manufacturing".to_string(),
            annual_revenue: Some(10.0),
            description: None,
            project_data: vec![AnswerSubmission::new(1, "10"), AnswerSubmission::new(12, "Yes")],
        };
        let project = store.create_project(user.user_id, &req).await.unwrap();
        (store, project.project_id, user.user_id)
    }

    fn config(mode: EvaluationMode) -> EvaluationConfig {
        EvaluationConfig {
            mode,
            delay_ms: 0,
            pass_threshold: 50.0,
            fixed_score: 80.0,
            seed: Some(7),
        }
    }

    #[tokio::test]
    async fn test_noop_leaves_project_pending() {
        let (store, project_id, user_id) = store_with_project().await;
        let dispatcher = EvaluationDispatcher::new(store.clone(), &config(EvaluationMode::Noop));
        assert!(!dispatcher.is_active());
        assert!(dispatcher.dispatch(project_id).await.unwrap().is_none());

        let view = store.get_project(project_id, user_id).await.unwrap().unwrap();
        assert_eq!(view.project.status, ProjectStatus::Pending);
        assert!(view.evaluation.is_none());
    }

    #[tokio::test]
    async fn test_fixed_completes_project() {
        let (store, project_id, user_id) = store_with_project().await;
        let dispatcher = EvaluationDispatcher::new(store.clone(), &config(EvaluationMode::Fixed));
        assert_eq!(dispatcher.evaluator_name(), "fixed");

        let handle = dispatcher.dispatch(project_id).await.unwrap().unwrap();
        handle.await.unwrap();

        let view = store.get_project(project_id, user_id).await.unwrap().unwrap();
        assert_eq!(view.project.status, ProjectStatus::Completed);
        let evaluation = view.evaluation.unwrap();
        assert_eq!(evaluation.overall_score, 80.0);
        assert_eq!(evaluation.status, EvaluationStatus::Passed);
        assert_eq!(evaluation.pillar_scores.len(), 2);
    }

    #[tokio::test]
    async fn test_random_scores_in_range() {
        let (store, project_id, user_id) = store_with_project().await;
        let dispatcher = EvaluationDispatcher::new(store.clone(), &config(EvaluationMode::Random));
        dispatcher.dispatch(project_id).await.unwrap().unwrap().await.unwrap();

        let view = store.get_project(project_id, user_id).await.unwrap().unwrap();
        let evaluation = view.evaluation.unwrap();
        assert!((0.0..100.0).contains(&evaluation.overall_score));
        for score in &evaluation.pillar_scores {
            assert!((0.0..100.0).contains(&score.score));
        }
    }

    #[tokio::test]
    async fn test_deleted_project_is_not_an_error() {
        let (store, project_id, user_id) = store_with_project().await;
        let mut cfg = config(EvaluationMode::Fixed);
        cfg.delay_ms = 50;
        let dispatcher = EvaluationDispatcher::new(store.clone(), &cfg);

        let handle = dispatcher.dispatch(project_id).await.unwrap().unwrap();
        assert!(store.delete_project(project_id, user_id).await.unwrap());
        handle.await.unwrap();

        assert!(store.get_project(project_id, user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resume_reschedules_interrupted_projects() {
        let (store, project_id, user_id) = store_with_project().await;
        store
            .update_project_status(project_id, ProjectStatus::Processing)
            .await
            .unwrap();

        let dispatcher = EvaluationDispatcher::new(store.clone(), &config(EvaluationMode::Fixed));
        assert_eq!(dispatcher.resume_interrupted().await.unwrap(), 1);

        for _ in 0..200 {
            let view = store.get_project(project_id, user_id).await.unwrap().unwrap();
            if view.project.status == ProjectStatus::Completed {
                assert_eq!(view.evaluation.unwrap().overall_score, 80.0);
                assert!(store.processing_projects().await.unwrap().is_empty());
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        unreachable!("interrupted project never completed");
    }

    #[tokio::test]
    async fn test_resume_in_noop_mode_returns_projects_to_pending() {
        let (store, project_id, user_id) = store_with_project().await;
        store
            .update_project_status(project_id, ProjectStatus::Processing)
            .await
            .unwrap();

        let dispatcher = EvaluationDispatcher::new(store.clone(), &config(EvaluationMode::Noop));
        assert_eq!(dispatcher.resume_interrupted().await.unwrap(), 1);

        let view = store.get_project(project_id, user_id).await.unwrap().unwrap();
        assert_eq!(view.project.status, ProjectStatus::Pending);
        assert_eq!(dispatcher.resume_interrupted().await.unwrap(), 0);
    }
}
