//! End-to-end checks of the public form API

use chrono::{Days, Months, NaiveDate};
use pax_form::form::{
    assemble_submission, date, is_complete, reconcile_prefill, CanonicalPayload, DefaultMessages,
    ErrorId, FieldName, FixedClock, FormFieldState, Input, MemorySlot, PrefillPayload,
    SmokeStatus, SportEntry, SportLevel, SportList, Validators,
};
use pax_form::notify::{NotificationKind, RecordingNotifier};
use pax_form::{FormConfig, FormSession};
use pretty_assertions::assert_eq;
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn validators() -> Validators<DefaultMessages> {
    Validators::new(DefaultMessages)
}

fn prefill(value: serde_json::Value) -> pax_form::form::PrefillOutcome {
    let payload = PrefillPayload::from_value(value).unwrap();
    reconcile_prefill(&payload, FormFieldState::default())
}

#[test]
fn test_name_pattern_accepts_joined_letter_runs() {
    let v = validators();
    let state = |name: &str| FormFieldState {
        first_name: name.to_string(),
        ..Default::default()
    };
    for name in ["Jane", "Jean-Luc", "D'Arcy", "Mary Jane", "Ådne"] {
        assert!(v.validate_field(FieldName::FirstName, &state(name), today()).is_none());
    }
    for name in ["", "   ", "42", "007"] {
        assert!(v.validate_field(FieldName::FirstName, &state(name), today()).is_some());
    }
}

#[test]
fn test_non_smoker_never_fails_cigarettes() {
    let v = validators();
    for value in [Input::Empty, Input::Parsed(-3.0), Input::Parsed(500.0)] {
        let state = FormFieldState {
            smoke: Some(SmokeStatus::No),
            cigarettes_per_day: value,
            ..Default::default()
        };
        assert!(v
            .validate_field(FieldName::CigarettesPerDay, &state, today())
            .is_none());
    }
}

#[test]
fn test_age_lower_bound_at_one_year() {
    let v = validators();
    let one_year = today().checked_sub_months(Months::new(12)).unwrap();
    let almost = one_year.checked_add_days(Days::new(1)).unwrap();

    let with_dob = |dob: NaiveDate| FormFieldState {
        date_of_birth: Input::Parsed(dob),
        ..Default::default()
    };

    let error = v
        .validate_field(FieldName::DateOfBirth, &with_dob(almost), today())
        .unwrap();
    assert_eq!(error.message, "Applicants must be at least 1 year old.");
    assert!(v
        .validate_field(FieldName::DateOfBirth, &with_dob(one_year), today())
        .is_none());
}

#[test]
fn test_prefill_prefers_snake_case() {
    let outcome = prefill(json!({"first_name": "Jane", "firstName": "Ignored"}));
    assert_eq!(outcome.state.first_name, "Jane");
    assert!(outcome.applied_field_count >= 1);
}

#[test]
fn test_prefill_sports_replace_as_hobby() {
    let outcome = prefill(json!({"sports": ["Running", "Chess"]}));
    let sports: Vec<_> = outcome.state.sports.iter().cloned().collect();
    assert_eq!(
        sports,
        vec![SportEntry::hobby("Running"), SportEntry::hobby("Chess")]
    );
}

#[test]
fn test_repeated_failure_notifies_once_until_fixed() {
    let mut session =
        FormSession::new(FormConfig::default(), RecordingNotifier::new(), FixedClock(today()));
    let id = ErrorId::for_field(FieldName::Weight);

    session.blur(FieldName::Weight);
    session.blur(FieldName::Weight);
    assert_eq!(session.notifier().shown_count(&id), 1);

    session.set_text(FieldName::Weight, "70");
    session.blur(FieldName::Weight);
    session.set_text(FieldName::Weight, "700");
    session.blur(FieldName::Weight);
    assert_eq!(session.notifier().shown_count(&id), 2);
}

#[test]
fn test_assemble_complete_state() {
    let dob = today().checked_sub_months(Months::new(240)).unwrap();
    let state = FormFieldState {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        smoke: SmokeStatus::parse("no"),
        cigarettes_per_day: Input::Empty,
        height_cm: Input::Parsed(170.0),
        weight_kg: Input::Parsed(65.0),
        date_of_birth: Input::Parsed(dob),
        sports: SportList::from_entries(vec![SportEntry::new("Running", SportLevel::Hobby)])
            .unwrap(),
        insurance_price: Input::Parsed(500.0),
    };

    assert!(is_complete(&state, &validators(), today()));
    let payload = assemble_submission(&state, &validators(), today()).unwrap();
    assert_eq!(
        payload,
        CanonicalPayload {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            smokes: false,
            cigarettes_per_day: None,
            height_cm: 170.0,
            weight_kg: 65.0,
            date_of_birth: date::format(dob),
            sports: vec!["Running".into()],
            insurance_price: 500.0,
        }
    );
    assert_eq!(payload.date_of_birth, "10.03.2005");
}

#[test]
fn test_date_parse_rejects_impossible_dates() {
    assert_eq!(date::parse("31.02.2020"), None);
    assert_eq!(date::parse("2020-13-01"), None);
}

#[test]
fn test_prefilled_session_submits() {
    let mut session =
        FormSession::new(FormConfig::default(), RecordingNotifier::new(), FixedClock(today()));
    let mut slot = MemorySlot::new(
        json!({
            "first_name": "Jane",
            "lastName": "Doe",
            "smokes": true,
            "cigarettesPerDay": "10",
            "height": 168,
            "weight_kg": 60,
            "dob": "1990-04-01",
            "sports": ["Swimming"],
            "insurance_price": 320.5
        })
        .to_string(),
    );

    assert_eq!(session.start(&mut slot), 9);
    assert!(slot.is_empty());
    assert!(session.is_complete());

    let payload = session.submit().unwrap();
    assert_eq!(payload.cigarettes_per_day, Some(10));
    assert_eq!(payload.height_cm, 168.0);
    assert_eq!(payload.date_of_birth, "01.04.1990");
    assert_eq!(payload.sports, vec!["Swimming".to_string()]);

    let kinds: Vec<_> = session.notifier().shown().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Info]);
}
