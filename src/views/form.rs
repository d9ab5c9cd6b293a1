//! The state behind a single form page: what was typed, what to tell the user, and whether a
//! submission is in flight.
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success(String),
    Error(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Success(text) | Status::Error(text) => text,
        }
    }
}

/// idle -> submitting -> (success | error) -> idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub input: String,
    pub status: Option<Status>,
    pub busy: bool,
}

/// Holds the busy flag up for as long as it lives, so the flag drops back even if the
/// submission is cancelled part way.
struct BusyFlag<'a>(&'a mut bool);

impl<'a> BusyFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl FormState {
    pub fn with_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        match (&self.status, self.busy) {
            (_, true) => Phase::Submitting,
            (Some(Status::Success(_)), false) => Phase::Succeeded,
            (Some(Status::Error(_)), false) => Phase::Failed,
            (None, false) => Phase::Idle,
        }
    }

    /// Run one submission: clear the previous status, mark the form busy, send the current
    /// input and record the resulting status. Busy is cleared however `send` finishes.
    pub async fn submit<F, Fut>(&mut self, send: F)
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Status>,
    {
        self.status = None;
        let _busy = BusyFlag::raise(&mut self.busy);
        let status = send(self.input.clone()).await;
        self.status = Some(status);
    }

    pub fn clear_input_on_success(&mut self) {
        if matches!(self.status, Some(Status::Success(_))) {
            self.input.clear();
        }
    }
}
