//! Signup form flow.
//!
//! # Design
//! Two states, `Idle` and `Submitting`. A submit event while a request is in
//! flight is ignored. The event-driven host calls `begin` when the form is
//! submitted and `finish` once the response arrives; `submit` chains both
//! for hosts that perform the request inline.

use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{SignupRequest, SignupResponse};

/// Where a successful signup sends the page.
pub const HOME_PATH: &str = "/";

/// The page-level side effects the flow triggers.
pub trait PageHost {
    fn alert(&mut self, message: &str);
    fn navigate(&mut self, path: &str);
    fn report_error(&mut self, error: &ApiError);
}

/// Values of a submitted form, by input name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k.as_str() == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    /// Value of input `name`; an input missing from the form is `MissingElement`.
    pub fn value(&self, name: &str) -> Result<&str, ApiError> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| ApiError::MissingElement(name.to_string()))
    }
}

impl SignupRequest {
    pub fn from_form(form: &FormData) -> Result<Self, ApiError> {
        Ok(Self {
            first_name: form.value("first_name")?.to_string(),
            last_name: form.value("last_name")?.to_string(),
            username: form.value("username")?.to_string(),
            email: form.value("email")?.to_string(),
            password: form.value("password")?.to_string(),
            born_date: form.value("born_date")?.to_string(),
            description: form.value("description")?.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignupState {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was already in flight.
    Ignored,
    Created(SignupResponse),
    Failed(ApiError),
}

#[derive(Debug, Default)]
pub struct SignupFlow {
    state: SignupState,
}

impl SignupFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SignupState {
        self.state
    }

    /// Handle a submit event. Returns the request to send, or `None` when a
    /// submission is already in flight. A form missing an input leaves the
    /// flow idle.
    pub fn begin(&mut self, form: &FormData) -> Result<Option<SignupRequest>, ApiError> {
        if self.state == SignupState::Submitting {
            warn!("signup already in flight, ignoring submit");
            return Ok(None);
        }
        let request = SignupRequest::from_form(form)?;
        self.state = SignupState::Submitting;
        Ok(Some(request))
    }

    /// Apply the response of the in-flight request and return to idle.
    /// A response arriving while idle has no submission to answer and is
    /// dropped without touching the host.
    pub fn finish(
        &mut self,
        result: Result<SignupResponse, ApiError>,
        host: &mut impl PageHost,
    ) -> SubmitOutcome {
        if self.state == SignupState::Idle {
            warn!("signup response without a submission in flight, ignoring");
            return SubmitOutcome::Ignored;
        }
        self.state = SignupState::Idle;
        match result {
            Ok(response) => {
                info!(username = %response.user.username, "account created");
                host.alert(&format!(
                    "Congratulations, {}! Your account is created.",
                    response.user.username
                ));
                host.navigate(HOME_PATH);
                SubmitOutcome::Created(response)
            }
            Err(e) => {
                warn!(error = %e, "signup failed");
                host.report_error(&e);
                SubmitOutcome::Failed(e)
            }
        }
    }

    pub fn submit<T: Transport>(
        &mut self,
        form: &FormData,
        client: &ApiClient<T>,
        host: &mut impl PageHost,
    ) -> SubmitOutcome {
        let request = match self.begin(form) {
            Ok(Some(request)) => request,
            Ok(None) => return SubmitOutcome::Ignored,
            Err(e) => {
                host.report_error(&e);
                return SubmitOutcome::Failed(e);
            }
        };
        let result = client.signup(&request);
        self.finish(result, host)
    }
}
