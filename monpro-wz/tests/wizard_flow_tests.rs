//! End-to-end wizard journey tests against the real question bank

use monpro_common::diagnostic::{AnswerValue, DeliveryMethod, Region, UserPath};
use monpro_common::question_bank::{question_count, questions_for_region};
use monpro_wz::{MemorySessionStore, WizardSession, WizardStage};

#[test]
fn full_scaler_journey_reaches_a_valid_submission() {
    let mut session = WizardSession::new(MemorySessionStore::new());

    session.set_region(Region::India);
    session.choose_path(UserPath::Scaler).unwrap();

    let questions = questions_for_region(UserPath::Scaler, Region::India);
    assert_eq!(questions.len(), question_count(UserPath::Scaler));

    // Answer every question with its first option and advance
    for step in 0..questions.len() {
        let question = &questions[step];
        assert_eq!(session.state().current_step, step);
        session.record_answer(question, &question.options[0].value);
        session.advance(&questions).unwrap();
    }
    assert_eq!(session.state().stage, WizardStage::DeliveryDetails);

    session.set_first_name("Anya");
    session.set_last_name("Rao");
    session.set_brand_name("Bloom");
    session.set_delivery_method(DeliveryMethod::Email);
    session.set_email("anya@example.com");

    let submission = session
        .state()
        .build_submission("2026-08-06T10:00:00Z".to_string())
        .unwrap();

    assert_eq!(submission.region, Region::India);
    assert_eq!(submission.path, UserPath::Scaler);
    assert_eq!(submission.answers.len(), questions.len());
    // Multi-select answers keep their array shape
    assert!(matches!(
        submission.answers.get("platform_stack"),
        Some(AnswerValue::Multi(_))
    ));
    assert!(matches!(
        submission.answers.get("order_volume"),
        Some(AnswerValue::Single(_))
    ));
}

#[test]
fn answers_only_ever_belong_to_the_current_path() {
    let mut session = WizardSession::new(MemorySessionStore::new());
    session.set_region(Region::Europe);

    session.choose_path(UserPath::Founder).unwrap();
    let founder_questions = questions_for_region(UserPath::Founder, Region::Europe);
    session.record_answer(&founder_questions[0], "shopify");

    // Switching to a different path discards the founder answers
    session.choose_path(UserPath::Operator).unwrap();
    assert!(session.state().answers.is_empty());

    let operator_questions = questions_for_region(UserPath::Operator, Region::Europe);
    session.record_answer(&operator_questions[0], "agency");
    assert_eq!(session.state().answers.len(), 1);
    assert!(session.state().answers.contains_key("business_type"));
}

#[test]
fn step_index_stays_within_the_question_range() {
    let mut session = WizardSession::new(MemorySessionStore::new());
    session.set_region(Region::Uk);
    session.choose_path(UserPath::Explorer).unwrap();

    let questions = questions_for_region(UserPath::Explorer, Region::Uk);

    // Backing out of step 0 leaves Answering instead of underflowing
    session.go_back();
    assert_eq!(session.state().stage, WizardStage::ChoosingPath);

    session.choose_path(UserPath::Explorer).unwrap();
    for question in &questions {
        session.record_answer(question, &question.options[0].value);
        session.advance(&questions).unwrap();
    }

    // Advancing past the last question entered delivery, not step n
    assert!(session.state().current_step < questions.len());
    assert_eq!(session.state().stage, WizardStage::DeliveryDetails);

    // Further advancing in delivery is rejected without state damage
    assert!(session.advance(&questions).is_err());
    assert_eq!(session.state().stage, WizardStage::DeliveryDetails);
}
