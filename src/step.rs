//! Deferred-callback step.
//!
//! A `Step` starts pending and settles once, either resolved with a value
//! or rejected with a reason. Callbacks are registered through chainable
//! setters. Each slot holds a single callback, so registering again
//! replaces the previous one. Everything runs synchronously on the caller's
//! stack; nothing is scheduled.

use std::fmt;

use gjs_value::Value;
use tracing::{debug, warn};

/// Lifecycle of a step.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StepState {
    #[default]
    Pending,
    Resolved(Value),
    Rejected(Value),
}

impl StepState {
    fn settled_value(&self) -> Option<&Value> {
        match self {
            StepState::Pending => None,
            StepState::Resolved(value) | StepState::Rejected(value) => Some(value),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StepState::Pending => "pending",
            StepState::Resolved(_) => "resolved",
            StepState::Rejected(_) => "rejected",
        }
    }
}

/// Step transition errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("step already {0}")]
    AlreadySettled(&'static str),

    #[error("step is no longer pending")]
    NotPending,
}

type Callback<'a> = Box<dyn FnMut(&Value) + 'a>;

/// A deferred result with `then`/`done`/`progress`/`fail`/`always` hooks.
#[derive(Default)]
pub struct Step<'a> {
    state: StepState,
    then: Option<Callback<'a>>,
    done: Option<Callback<'a>>,
    progress: Option<Callback<'a>>,
    fail: Option<Callback<'a>>,
    always: Option<Callback<'a>>,
}

/// Create a pending step.
pub fn step<'a>() -> Step<'a> {
    Step::new()
}

fn fire(slot: &mut Option<Callback<'_>>, value: &Value) {
    if let Some(callback) = slot.as_mut() {
        callback(value);
    }
}

impl<'a> Step<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &StepState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == StepState::Pending
    }

    /// Called with the value on resolution, after `done`.
    pub fn then(&mut self, f: impl FnMut(&Value) + 'a) -> &mut Self {
        let mut callback: Callback<'a> = Box::new(f);
        if let StepState::Resolved(value) = &self.state {
            callback(value);
        }
        self.then = Some(callback);
        self
    }

    /// Called with the value on resolution.
    pub fn done(&mut self, f: impl FnMut(&Value) + 'a) -> &mut Self {
        let mut callback: Callback<'a> = Box::new(f);
        if let StepState::Resolved(value) = &self.state {
            callback(value);
        }
        self.done = Some(callback);
        self
    }

    /// Called for each `notify` while pending.
    pub fn progress(&mut self, f: impl FnMut(&Value) + 'a) -> &mut Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Called with the reason on rejection.
    pub fn fail(&mut self, f: impl FnMut(&Value) + 'a) -> &mut Self {
        let mut callback: Callback<'a> = Box::new(f);
        if let StepState::Rejected(reason) = &self.state {
            callback(reason);
        }
        self.fail = Some(callback);
        self
    }

    /// Called once the step settles either way.
    pub fn always(&mut self, f: impl FnMut(&Value) + 'a) -> &mut Self {
        let mut callback: Callback<'a> = Box::new(f);
        if let Some(value) = self.state.settled_value() {
            callback(value);
        }
        self.always = Some(callback);
        self
    }

    pub fn resolve(&mut self, value: impl Into<Value>) -> Result<(), StepError> {
        self.settle(StepState::Resolved(value.into()))
    }

    pub fn reject(&mut self, reason: impl Into<Value>) -> Result<(), StepError> {
        self.settle(StepState::Rejected(reason.into()))
    }

    /// Report progress. Only valid while pending.
    pub fn notify(&mut self, value: impl Into<Value>) -> Result<(), StepError> {
        if !self.is_pending() {
            return Err(StepError::NotPending);
        }
        fire(&mut self.progress, &value.into());
        Ok(())
    }

    fn settle(&mut self, next: StepState) -> Result<(), StepError> {
        if !self.is_pending() {
            let current = self.state.label();
            warn!(state = current, "step settled twice");
            return Err(StepError::AlreadySettled(current));
        }
        debug!(state = next.label(), "step settled");
        self.state = next;

        match &self.state {
            StepState::Resolved(value) => {
                fire(&mut self.done, value);
                fire(&mut self.then, value);
            }
            StepState::Rejected(reason) => fire(&mut self.fail, reason),
            StepState::Pending => {}
        }
        if let Some(value) = self.state.settled_value() {
            fire(&mut self.always, value);
        }
        Ok(())
    }
}

impl fmt::Debug for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("state", &self.state)
            .field("then", &self.then.is_some())
            .field("done", &self.done.is_some())
            .field("progress", &self.progress.is_some())
            .field("fail", &self.fail.is_some())
            .field("always", &self.always.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_resolve_fires_done_then_always() {
        let log = RefCell::new(Vec::new());
        let mut s = step();
        s.then(|v| log.borrow_mut().push(format!("then:{}", v)))
            .done(|v| log.borrow_mut().push(format!("done:{}", v)))
            .fail(|v| log.borrow_mut().push(format!("fail:{}", v)))
            .always(|v| log.borrow_mut().push(format!("always:{}", v)));

        s.resolve(7).unwrap();

        assert_eq!(*s.state(), StepState::Resolved(Value::Number(7.0)));
        drop(s);
        assert_eq!(log.into_inner(), vec!["done:7", "then:7", "always:7"]);
    }

    #[test]
    fn test_reject_fires_fail_and_always() {
        let log = RefCell::new(Vec::new());
        let mut s = step();
        s.done(|_| log.borrow_mut().push("done".to_string()))
            .fail(|v| log.borrow_mut().push(format!("fail:{}", v)))
            .always(|_| log.borrow_mut().push("always".to_string()));

        s.reject("boom").unwrap();

        drop(s);
        assert_eq!(log.into_inner(), vec!["fail:boom", "always"]);
    }

    #[test]
    fn test_settles_once() {
        let mut s = step();
        s.resolve(1).unwrap();
        assert_eq!(s.resolve(2), Err(StepError::AlreadySettled("resolved")));
        assert_eq!(s.reject("late"), Err(StepError::AlreadySettled("resolved")));
        assert_eq!(s.notify(0.5), Err(StepError::NotPending));
        assert_eq!(*s.state(), StepState::Resolved(Value::Number(1.0)));
    }

    #[test]
    fn test_progress_while_pending() {
        let seen = RefCell::new(Vec::new());
        let mut s = step();
        s.progress(|v| seen.borrow_mut().push(v.clone()));

        s.notify(0.25).unwrap();
        s.notify(0.75).unwrap();
        assert!(s.is_pending());

        drop(s);
        assert_eq!(
            seen.into_inner(),
            vec![Value::Number(0.25), Value::Number(0.75)]
        );
    }

    #[test]
    fn test_registering_replaces_callback() {
        let log = RefCell::new(Vec::new());
        let mut s = step();
        s.done(|_| log.borrow_mut().push("first"))
            .done(|_| log.borrow_mut().push("second"));

        s.resolve(Value::Null).unwrap();

        drop(s);
        assert_eq!(log.into_inner(), vec!["second"]);
    }

    #[test]
    fn test_late_registration_fires_immediately() {
        let log = RefCell::new(Vec::new());
        let mut s = step();
        s.reject("nope").unwrap();

        s.done(|_| log.borrow_mut().push("done".to_string()))
            .fail(|v| log.borrow_mut().push(format!("fail:{}", v)))
            .always(|_| log.borrow_mut().push("always".to_string()));

        drop(s);
        assert_eq!(log.into_inner(), vec!["fail:nope", "always"]);
    }

    #[test]
    fn test_debug_shows_registered_slots() {
        let mut s = step();
        s.done(|_| {});
        let text = format!("{:?}", s);
        assert!(text.contains("state: Pending"));
        assert!(text.contains("done: true"));
        assert!(text.contains("fail: false"));
    }
}
