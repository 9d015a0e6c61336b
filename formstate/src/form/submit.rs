use std::sync::Arc;

use log::debug;

use super::{Form, SubmitOutcome};
use crate::control::ControlHandle;
use crate::lock;
use crate::validation::Errors;
use crate::value::Value;

impl Form {
    /// Validate every field still in `Init`, then dispatch exactly one submit
    /// callback and mark the form as submitted.
    ///
    /// Fields that were already validated keep their current result. The
    /// `Init` fields are evaluated first and stored together in one update.
    pub fn submit(&self) -> SubmitOutcome {
        let batch: Vec<(String, Arc<dyn ControlHandle>, Value)> = {
            let state = lock::read(&self.shared.state);
            state
                .init_fields()
                .into_iter()
                .filter_map(|name| {
                    let handle = state.controls.get(&name)?.clone();
                    let value = state.value.get(&name).cloned().unwrap_or_default();
                    Some((name, handle, value))
                })
                .collect()
        };

        if !batch.is_empty() {
            let results: Vec<(String, Errors)> = batch
                .into_iter()
                .map(|(name, handle, value)| {
                    let errors = self.run(handle.as_ref(), &name, &value);
                    (name, errors)
                })
                .collect();

            let mut state = lock::write(&self.shared.state);
            for (name, errors) in results {
                state.next_ticket(&name);
                state.apply(&name, errors);
            }
        }

        self.finish_submit()
    }

    /// Like [`submit`](Self::submit), but `Init` fields also run their async
    /// hooks before the outcome is decided.
    pub async fn submit_async(&self) -> SubmitOutcome {
        let names = lock::read(&self.shared.state).init_fields();
        for name in names {
            if let Err(err) = self.validate_control_async(&name).await {
                debug!("Skipping '{}' during submit: {}", name, err);
            }
        }
        self.finish_submit()
    }

    fn finish_submit(&self) -> SubmitOutcome {
        let (outcome, value, errors) = {
            let state = lock::read(&self.shared.state);
            let outcome = if state.is_valid() {
                SubmitOutcome::Valid
            } else {
                SubmitOutcome::Invalid
            };
            (outcome, state.value.clone(), state.errors.clone())
        };

        debug!("Submitting form: {:?}", outcome);
        match outcome {
            SubmitOutcome::Valid => {
                if let Some(on_valid_submit) = &self.shared.options.on_valid_submit {
                    on_valid_submit(&value);
                }
            }
            SubmitOutcome::Invalid => {
                if let Some(on_invalid_submit) = &self.shared.options.on_invalid_submit {
                    on_invalid_submit(&errors, &value);
                }
            }
        }

        {
            let mut state = lock::write(&self.shared.state);
            state.submitted = true;
            state.submit_count += 1;
        }
        self.notify_render_all();
        outcome
    }
}
