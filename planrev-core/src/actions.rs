//! Reject and copy: the two operator actions with side effects outside the UI.
//!
//! Nothing here mutates local state. A reject only reaches the backend; the caller
//! reloads the plan afterwards and the new snapshot shows the outcome.

use thiserror::Error;

use crate::api::{ApiError, ChangeApi};
use crate::selection::SelectionInfo;
use crate::types::{Plan, RejectTarget};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("no change is currently selected")]
    NoSelection,
    #[error("error rejecting change: {0}")]
    Remote(#[from] ApiError),
    #[error("failed to copy to clipboard: {0}")]
    Clipboard(#[from] ClipboardError),
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ClipboardError(pub String);

/// Somewhere copied text can go.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Identifies the replacement a reject would target.
///
/// # Errors
///
/// [`ActionError::NoSelection`] when no single replacement is selected.
pub fn reject_target(plan: &Plan, info: Option<&SelectionInfo<'_>>) -> Result<RejectTarget, ActionError> {
    let info = info.ok_or(ActionError::NoSelection)?;
    let rep = info.replacement.ok_or(ActionError::NoSelection)?;
    Ok(RejectTarget {
        plan_id: plan.id.clone(),
        branch: plan.branch.clone(),
        result_id: info.result.id.clone(),
        replacement_id: rep.id.clone(),
    })
}

/// Text a copy would place on the clipboard: the selected replacement's new span.
///
/// # Errors
///
/// [`ActionError::NoSelection`] when no single replacement is selected.
pub fn copy_text(info: Option<&SelectionInfo<'_>>) -> Result<String, ActionError> {
    info.and_then(|i| i.replacement)
        .map(|rep| rep.new.clone())
        .ok_or(ActionError::NoSelection)
}

/// Sends a reject to the backend.
///
/// Failures are logged here and returned; the caller surfaces them to the operator.
pub async fn reject<A: ChangeApi>(api: &A, target: &RejectTarget) -> Result<(), ActionError> {
    tracing::info!(
        plan = %target.plan_id,
        branch = %target.branch,
        result = %target.result_id,
        replacement = %target.replacement_id,
        "rejecting replacement"
    );
    if let Err(e) = api.reject_replacement(target).await {
        tracing::error!(replacement = %target.replacement_id, "error rejecting change: {e}");
        return Err(e.into());
    }
    Ok(())
}

/// Rejects whatever is selected in `info`.
///
/// With nothing selected this fails before the backend is contacted.
pub async fn reject_current<A: ChangeApi>(
    api: &A,
    plan: &Plan,
    info: Option<&SelectionInfo<'_>>,
) -> Result<(), ActionError> {
    let target = match reject_target(plan, info) {
        Ok(target) => target,
        Err(e) => {
            tracing::warn!("can't reject change: {e}");
            return Err(e);
        }
    };
    reject(api, &target).await
}

/// Copies `text` to `clipboard`.
pub fn copy_to_clipboard<C: Clipboard + ?Sized>(clipboard: &mut C, text: &str) -> Result<(), ActionError> {
    clipboard.set_text(text).map_err(|e| {
        tracing::warn!("clipboard write failed: {e}");
        ActionError::Clipboard(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::selection::tests::sample_plan;
    use crate::selection::Selection;

    #[derive(Default)]
    struct CountingApi {
        rejects: AtomicUsize,
        fail: bool,
    }

    impl ChangeApi for CountingApi {
        async fn reject_replacement(&self, target: &RejectTarget) -> Result<(), ApiError> {
            self.rejects.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ApiError::Conflict(target.replacement_id.clone()))
            } else {
                Ok(())
            }
        }

        async fn load_plan(&self, _plan_id: &str, _branch: &str) -> Result<Plan, ApiError> {
            Ok(sample_plan())
        }
    }

    #[derive(Default)]
    struct MemoryClipboard {
        text: Option<String>,
        broken: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.broken {
                return Err(ClipboardError("no display".to_owned()));
            }
            self.text = Some(text.to_owned());
            Ok(())
        }
    }

    #[tokio::test]
    async fn reject_without_selection_never_calls_the_api() {
        let plan = sample_plan();
        let mut sel = Selection::new(&plan);
        sel.move_entry_down(); // full-file sentinel on a.rs
        let api = CountingApi::default();

        let err = reject_current(&api, &plan, sel.info(&plan).as_ref()).await.unwrap_err();
        assert!(matches!(err, ActionError::NoSelection));
        let err = reject_current(&api, &plan, None).await.unwrap_err();
        assert!(matches!(err, ActionError::NoSelection));
        assert_eq!(api.rejects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reject_targets_the_selected_replacement() {
        let plan = sample_plan();
        let sel = Selection::new(&plan);
        let info = sel.info(&plan);
        let target = reject_target(&plan, info.as_ref()).unwrap();
        assert_eq!(target.result_id, "res-a.rs");
        assert_eq!(target.replacement_id, "r1");
        assert_eq!(target.plan_id, "plan-1");

        let api = CountingApi::default();
        reject_current(&api, &plan, info.as_ref()).await.unwrap();
        assert_eq!(api.rejects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn remote_failure_is_reported() {
        let plan = sample_plan();
        let sel = Selection::new(&plan);
        let api = CountingApi { fail: true, ..CountingApi::default() };
        let err = reject_current(&api, &plan, sel.info(&plan).as_ref()).await.unwrap_err();
        assert!(matches!(err, ActionError::Remote(ApiError::Conflict(_))));
        assert!(err.to_string().starts_with("error rejecting change"));
    }

    #[test]
    fn copy_writes_the_new_span() {
        let plan = sample_plan();
        let sel = Selection::new(&plan);
        let text = copy_text(sel.info(&plan).as_ref()).unwrap();
        let mut clip = MemoryClipboard::default();
        copy_to_clipboard(&mut clip, &text).unwrap();
        assert_eq!(clip.text.as_deref(), Some("new a"));
    }

    #[test]
    fn copy_fails_descriptively() {
        assert!(matches!(copy_text(None), Err(ActionError::NoSelection)));
        let mut clip = MemoryClipboard { broken: true, ..MemoryClipboard::default() };
        let err = copy_to_clipboard(&mut clip, "x").unwrap_err();
        assert_eq!(err.to_string(), "failed to copy to clipboard: no display");
    }
}
