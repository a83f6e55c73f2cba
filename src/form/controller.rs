use chrono::NaiveDate;

use crate::client::MessageRelay;
use crate::form::{Field, FormValues, FormVariant, RuleSet, ValidationErrors};

/// Banner shown once a message went out
pub const SENT_BANNER: &str = "Your message has been sent!";

/// Where a form instance is in its submit cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Sent,
    Failed(String),
}

/// Everything that can happen to a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Edit { field: Field, value: String },
    Submit { today: NaiveDate },
    Delivered,
    DeliveryFailed(String),
    DismissBanner,
}

/// The complete state of one form instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    variant: FormVariant,
    values: FormValues,
    errors: ValidationErrors,
    status: SubmissionStatus,
}

/// A field as a rendering layer displays it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldView<'a> {
    pub field: Field,
    pub value: &'a str,
    pub error: Option<&'static str>,
}

impl FormState {
    pub fn new(variant: FormVariant) -> Self {
        Self {
            variant,
            values: FormValues::default(),
            errors: ValidationErrors::default(),
            status: SubmissionStatus::Idle,
        }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn field(&self, field: Field) -> FieldView<'_> {
        FieldView {
            field,
            value: self.values.get(field),
            error: self.errors.get(field),
        }
    }

    /// The variant's fields in presentation order
    pub fn fields(&self) -> impl Iterator<Item = FieldView<'_>> + '_ {
        self.variant.fields().iter().map(|field| self.field(*field))
    }

    /// The submit control is disabled while a delivery is in flight
    pub fn can_submit(&self) -> bool {
        self.status != SubmissionStatus::Submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.can_submit() {
            "Send Message"
        } else {
            "Sending..."
        }
    }

    /// Top-level message for the last delivery, if any is shown
    pub fn banner(&self) -> Option<&str> {
        match &self.status {
            SubmissionStatus::Sent => Some(SENT_BANNER),
            SubmissionStatus::Failed(reason) => Some(reason.as_str()),
            SubmissionStatus::Idle | SubmissionStatus::Submitting => None,
        }
    }
}

/// Apply `action` to `state`
pub fn reduce(mut state: FormState, action: Action) -> FormState {
    use SubmissionStatus as S;

    match action {
        Action::Edit { field, value } => {
            state.values.set(field, value);
            state.errors.remove(field);
            if matches!(state.status, S::Sent | S::Failed(_)) {
                state.status = S::Idle;
            }
        }
        Action::Submit { .. } if state.status == S::Submitting => {}
        Action::Submit { today } => {
            state.errors = RuleSet::for_variant(state.variant).validate(&state.values, today);
            state.status = if state.errors.is_empty() {
                S::Submitting
            } else {
                S::Idle
            };
        }
        Action::Delivered if state.status == S::Submitting => {
            state.values = FormValues::default();
            state.errors = ValidationErrors::default();
            state.status = S::Sent;
        }
        Action::DeliveryFailed(reason) if state.status == S::Submitting => {
            state.status = S::Failed(reason);
        }
        Action::DismissBanner if state.status == S::Sent => {
            state.status = S::Idle;
        }
        Action::Delivered | Action::DeliveryFailed(_) | Action::DismissBanner => {}
    }

    state
}

/// Identifies a listener registered with [`FormController::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

type Listener = Box<dyn Fn(&FormState) + Send + Sync>;

/// State container for one form instance.
///
/// All changes go through [`reduce`]. Listeners are called after every
/// change, in the order they subscribed.
pub struct FormController {
    state: FormState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: usize,
}

impl FormController {
    pub fn new(variant: FormVariant) -> Self {
        Self {
            state: FormState::new(variant),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&FormState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn dispatch(&mut self, action: Action) {
        let next = reduce(self.state.clone(), action);
        if next == self.state {
            return;
        }

        self.state = next;
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        self.dispatch(Action::Edit {
            field,
            value: value.into(),
        });
    }

    /// Validate, then deliver the form through `relay` if it passed.
    ///
    /// Makes at most one delivery call. Returns the resulting status.
    #[tracing::instrument(
        name = "Submit contact form",
        skip(self, relay),
        fields(variant = ?self.state.variant)
    )]
    pub async fn submit<R>(&mut self, relay: &R, today: NaiveDate) -> &SubmissionStatus
    where
        R: MessageRelay + ?Sized,
    {
        self.dispatch(Action::Submit { today });
        if self.state.status != SubmissionStatus::Submitting {
            tracing::debug!(
                failing_fields = self.state.errors.len(),
                "Form did not pass validation"
            );
            return &self.state.status;
        }

        let params = self.state.values.template_params(self.state.variant);
        match relay.deliver(&params).await {
            Ok(response) => {
                tracing::info!(status = %response.status, "Message delivered");
                self.dispatch(Action::Delivered);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Message delivery failed");
                self.dispatch(Action::DeliveryFailed(e.user_message()));
            }
        }

        &self.state.status
    }
}
