//! Form session controller
//!
//! Owns the field state for one form session and routes edits, blurs and
//! submits through the validators and the notification manager.

use uuid::Uuid;

use crate::config::FormConfig;
use crate::form::{
    assemble_submission, is_complete, reconcile_from_slot, CanonicalPayload, Clock, DateInput,
    FieldName, FormFieldState, MessageLookup, NumberInput, PrefillSlot, SmokeStatus, SportEntry,
    SportLevel, SportList, SportListError, ValidationError, Validators,
};
use crate::notify::{
    ErrorNotificationManager, Notification, NotificationKind, Notifier, Transition,
};

/// One user's pass through the application form
pub struct FormSession<N, C> {
    id: Uuid,
    state: FormFieldState,
    validators: Validators<FormConfig>,
    manager: ErrorNotificationManager<N>,
    clock: C,
    prefill_consumed: bool,
}

impl<N: Notifier, C: Clock> FormSession<N, C> {
    pub fn new(config: FormConfig, notifier: N, clock: C) -> Self {
        let title = config.lookup(config.error_title_key());
        let manager = ErrorNotificationManager::new(notifier, title, config.error_auto_close());
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, "Form session created");
        Self {
            id,
            state: FormFieldState::default(),
            validators: Validators::new(config),
            manager,
            clock,
            prefill_consumed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &FormFieldState {
        &self.state
    }

    pub fn config(&self) -> &FormConfig {
        self.validators.messages()
    }

    pub fn manager(&self) -> &ErrorNotificationManager<N> {
        &self.manager
    }

    pub fn notifier(&self) -> &N {
        self.manager.notifier()
    }

    /// Inline error for `field`, if any
    pub fn error(&self, field: FieldName) -> Option<&ValidationError> {
        self.manager.error(field)
    }

    /// Run the one-shot prefill. Returns the number of fields applied.
    ///
    /// Only the first call reads the slot; later calls are no-ops.
    pub fn start(&mut self, slot: &mut dyn PrefillSlot) -> usize {
        if self.prefill_consumed {
            tracing::debug!(session = %self.id, "Prefill already consumed");
            return 0;
        }
        self.prefill_consumed = true;

        let prior = std::mem::take(&mut self.state);
        let outcome = reconcile_from_slot(slot, prior);
        self.state = outcome.state;

        let applied = outcome.applied_field_count;
        if applied > 0 {
            tracing::info!(session = %self.id, applied, "Form prefilled");
            let config = self.validators.messages();
            self.manager.announce(Notification {
                id: None,
                title: config.lookup("prefill.title"),
                message: config.lookup("prefill.message"),
                kind: NotificationKind::Info,
                auto_close: config.info_auto_close(),
            });
        }
        applied
    }

    /// Store raw UI text for `field`
    pub fn set_text(&mut self, field: FieldName, raw: &str) {
        match field {
            FieldName::FirstName => self.set_first_name(raw),
            FieldName::LastName => self.set_last_name(raw),
            FieldName::Smoke => self.set_smoke(SmokeStatus::parse(raw.trim())),
            FieldName::CigarettesPerDay => {
                self.set_cigarettes_per_day(NumberInput::number_from_text(raw))
            }
            FieldName::Height => self.set_height(NumberInput::number_from_text(raw)),
            FieldName::Weight => self.set_weight(NumberInput::number_from_text(raw)),
            FieldName::DateOfBirth => self.set_date_of_birth(DateInput::date_from_text(raw)),
            FieldName::InsurancePrice => {
                self.set_insurance_price(NumberInput::number_from_text(raw))
            }
        }
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.state.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.state.last_name = value.into();
    }

    /// Leaving smoker status clears the cigarette count and its error
    pub fn set_smoke(&mut self, value: Option<SmokeStatus>) {
        self.state.smoke = value;
        if !self.state.is_smoker() {
            self.state.cigarettes_per_day = NumberInput::Empty;
            self.manager.apply(FieldName::CigarettesPerDay, None);
        }
    }

    pub fn set_cigarettes_per_day(&mut self, value: NumberInput) {
        self.state.cigarettes_per_day = value;
    }

    pub fn set_height(&mut self, value: NumberInput) {
        self.state.height_cm = value;
    }

    pub fn set_weight(&mut self, value: NumberInput) {
        self.state.weight_kg = value;
    }

    pub fn set_date_of_birth(&mut self, value: DateInput) {
        self.state.date_of_birth = value;
    }

    pub fn set_insurance_price(&mut self, value: NumberInput) {
        self.state.insurance_price = value;
    }

    /// Replace every sports row at once
    pub fn set_sports(&mut self, sports: SportList) {
        self.state.sports = sports;
    }

    pub fn add_sport(&mut self) {
        self.state.sports.push_blank();
    }

    pub fn remove_sport(&mut self, index: usize) -> Result<SportEntry, SportListError> {
        self.state.sports.remove(index)
    }

    pub fn rename_sport(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), SportListError> {
        self.state.sports.get_mut(index)?.name = name.into();
        Ok(())
    }

    pub fn set_sport_level(
        &mut self,
        index: usize,
        level: SportLevel,
    ) -> Result<(), SportListError> {
        self.state.sports.get_mut(index)?.level = level;
        Ok(())
    }

    /// Validate `field` as the user leaves it
    pub fn blur(&mut self, field: FieldName) -> Transition {
        let today = self.clock.today();
        let outcome = self.validators.validate_field(field, &self.state, today);
        self.manager.apply(field, outcome)
    }

    pub fn is_complete(&self) -> bool {
        is_complete(&self.state, &self.validators, self.clock.today())
    }

    /// Validate everything and build the payload.
    ///
    /// Returns `None`, after one summary notice, when anything fails.
    pub fn submit(&mut self) -> Option<CanonicalPayload> {
        let today = self.clock.today();
        let errors = self.validators.validate_all(&self.state, today);
        let complete = is_complete(&self.state, &self.validators, today);
        let raised = self.manager.sweep(errors);

        if !complete || self.manager.has_errors() {
            tracing::info!(
                session = %self.id,
                failing = self.manager.errors().len(),
                raised,
                "Submission blocked"
            );
            let config = self.validators.messages();
            self.manager.announce(Notification {
                id: None,
                title: config.lookup(config.error_title_key()),
                message: config.lookup("errors.fix_fields"),
                kind: NotificationKind::Error,
                auto_close: config.summary_auto_close(),
            });
            return None;
        }

        match assemble_submission(&self.state, &self.validators, today) {
            Ok(payload) => {
                tracing::info!(session = %self.id, "Submission assembled");
                Some(payload)
            }
            Err(err) => {
                tracing::error!(session = %self.id, "{err}");
                None
            }
        }
    }

    /// Confirm a successful hand-off to the backend
    pub fn acknowledge_submitted(&mut self) {
        let config = self.validators.messages();
        self.manager.announce(Notification {
            id: None,
            title: config.lookup("title"),
            message: config.lookup("submitted"),
            kind: NotificationKind::Success,
            auto_close: config.success_auto_close(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{ErrorId, FixedClock, Input, MemorySlot, SportList};
    use crate::notify::{NotifierEvent, RecordingNotifier};
    use chrono::{Months, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn session() -> FormSession<RecordingNotifier, FixedClock> {
        FormSession::new(FormConfig::default(), RecordingNotifier::new(), FixedClock(today()))
    }

    fn fill_valid(s: &mut FormSession<RecordingNotifier, FixedClock>) {
        s.set_text(FieldName::FirstName, "Jane");
        s.set_text(FieldName::LastName, "Doe");
        s.set_text(FieldName::Smoke, "no");
        s.set_text(FieldName::Height, "170");
        s.set_text(FieldName::Weight, "65");
        s.set_text(FieldName::DateOfBirth, "15.06.2004");
        s.set_text(FieldName::InsurancePrice, "500");
        s.rename_sport(0, "Running").unwrap();
    }

    mod prefill {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_prefill_announces_once() {
            let mut s = session();
            let mut slot = MemorySlot::new(r#"{"first_name": "Jane", "sports": ["Chess"]}"#);
            assert_eq!(s.start(&mut slot), 2);
            assert_eq!(s.state().first_name, "Jane");

            let shown: Vec<_> = s.notifier().shown().collect();
            assert_eq!(shown.len(), 1);
            assert_eq!(shown[0].kind, NotificationKind::Info);
            assert_eq!(shown[0].title, "Prefilled");
        }

        #[test]
        fn test_empty_prefill_is_silent() {
            let mut s = session();
            let mut slot = MemorySlot::new("not json");
            assert_eq!(s.start(&mut slot), 0);
            assert!(s.notifier().events().is_empty());
        }

        #[test]
        fn test_second_start_does_not_read() {
            let mut s = session();
            let mut first = MemorySlot::new(r#"{"last_name": "Doe"}"#);
            s.start(&mut first);
            let mut second = MemorySlot::new(r#"{"last_name": "Smith"}"#);
            assert_eq!(s.start(&mut second), 0);
            assert_eq!(s.state().last_name, "Doe");
            assert!(!second.is_empty());
        }

        #[test]
        fn test_explicit_sports_replace_prefilled_rows() {
            let mut s = session();
            let mut slot = MemorySlot::new(r#"{"sports": ["Running", "Chess", "Golf"]}"#);
            s.start(&mut slot);
            assert_eq!(s.state().sports.len(), 3);

            let requested = SportList::from_entries(vec![
                SportEntry::hobby("Tennis"),
                SportEntry::new("Rugby", SportLevel::Competitive),
            ])
            .unwrap();
            s.set_sports(requested.clone());
            assert_eq!(s.state().sports, requested);
        }
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_blur_twice_notifies_once() {
            let mut s = session();
            assert_eq!(s.blur(FieldName::FirstName), Transition::Raised);
            assert_eq!(s.blur(FieldName::FirstName), Transition::Kept);
            let id = ErrorId::for_field(FieldName::FirstName);
            assert_eq!(s.notifier().shown_count(&id), 1);

            s.set_text(FieldName::FirstName, "Jane");
            assert_eq!(s.blur(FieldName::FirstName), Transition::Cleared);
            s.set_text(FieldName::FirstName, "");
            assert_eq!(s.blur(FieldName::FirstName), Transition::Raised);
            assert_eq!(s.notifier().shown_count(&id), 2);
        }

        #[test]
        fn test_leaving_smoker_clears_count_and_error() {
            let mut s = session();
            s.set_smoke(Some(SmokeStatus::Yes));
            s.set_text(FieldName::CigarettesPerDay, "45");
            assert_eq!(s.blur(FieldName::CigarettesPerDay), Transition::Raised);

            s.set_smoke(Some(SmokeStatus::No));
            assert_eq!(s.state().cigarettes_per_day, Input::Empty);
            assert!(s.error(FieldName::CigarettesPerDay).is_none());
            assert!(matches!(
                s.notifier().events().last(),
                Some(NotifierEvent::Hidden(id)) if *id == ErrorId::for_field(FieldName::CigarettesPerDay)
            ));
        }

        #[test]
        fn test_unknown_smoke_text_is_unset() {
            let mut s = session();
            s.set_text(FieldName::Smoke, "sometimes");
            assert_eq!(s.state().smoke, None);
        }

        #[test]
        fn test_sports_keep_one_row() {
            let mut s = session();
            assert_eq!(s.remove_sport(0), Err(SportListError::LastEntry));
            s.add_sport();
            s.rename_sport(1, "Rugby").unwrap();
            s.set_sport_level(1, SportLevel::Competitive).unwrap();
            let removed = s.remove_sport(0).unwrap();
            assert_eq!(removed, SportEntry::hobby(""));
            assert_eq!(
                s.state().sports,
                SportList::from_entries(vec![SportEntry::new("Rugby", SportLevel::Competitive)])
                    .unwrap()
            );
            assert_eq!(
                s.rename_sport(3, "Chess"),
                Err(SportListError::OutOfRange { index: 3, len: 1 })
            );
        }
    }

    mod submitting {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_incomplete_submit_raises_each_field_once() {
            let mut s = session();
            assert!(s.submit().is_none());
            assert!(s.submit().is_none());

            // 7 field errors once, plus one summary per attempt
            let shown: Vec<_> = s.notifier().shown().collect();
            let field_errors = shown.iter().filter(|n| n.id.is_some()).count();
            let summaries = shown.iter().filter(|n| n.id.is_none()).count();
            assert_eq!(field_errors, 7);
            assert_eq!(summaries, 2);
        }

        #[test]
        fn test_complete_submit_yields_payload() {
            let mut s = session();
            fill_valid(&mut s);
            assert!(s.is_complete());

            let payload = s.submit().unwrap();
            assert_eq!(
                payload,
                CanonicalPayload {
                    first_name: "Jane".into(),
                    last_name: "Doe".into(),
                    smokes: false,
                    cigarettes_per_day: None,
                    height_cm: 170.0,
                    weight_kg: 65.0,
                    date_of_birth: "15.06.2004".into(),
                    sports: vec!["Running".into()],
                    insurance_price: 500.0,
                }
            );
            assert!(s.notifier().events().is_empty());
        }

        #[test]
        fn test_fixing_fields_then_submitting_retracts_errors() {
            let mut s = session();
            s.submit();
            fill_valid(&mut s);
            assert!(s.submit().is_some());
            assert!(s.manager().registry().is_empty());
            assert!(!s.manager().has_errors());
        }

        #[test]
        fn test_dob_one_year_boundary() {
            let mut s = session();
            fill_valid(&mut s);
            let one_year = today().checked_sub_months(Months::new(12)).unwrap();
            s.set_date_of_birth(Input::Parsed(one_year));
            assert!(s.is_complete());

            s.set_date_of_birth(Input::Parsed(one_year.succ_opt().unwrap()));
            assert!(!s.is_complete());
            assert_eq!(s.blur(FieldName::DateOfBirth), Transition::Raised);
        }

        #[test]
        fn test_acknowledge_submitted() {
            let mut s = session();
            s.acknowledge_submitted();
            let shown: Vec<_> = s.notifier().shown().collect();
            assert_eq!(shown[0].kind, NotificationKind::Success);
            assert_eq!(shown[0].auto_close, std::time::Duration::from_millis(2500));
        }

        #[test]
        fn test_localized_titles_come_from_config() {
            let mut config = FormConfig::default();
            config
                .messages
                .insert("errors.title".into(), "Validierungsfehler".into());
            let mut s = FormSession::new(config, RecordingNotifier::new(), FixedClock(today()));
            s.blur(FieldName::Height);
            let shown: Vec<_> = s.notifier().shown().collect();
            assert_eq!(shown[0].title, "Validierungsfehler");
            assert_eq!(shown[0].message, "Height is required.");
        }
    }
}
