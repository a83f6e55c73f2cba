use std::net::TcpListener;

use serde_json::json;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use contact_form::error::FALLBACK_FAILURE_REASON;
use contact_form::form::{Field, FormController, FormVariant, SubmissionStatus};

use crate::helpers::{relay_client, today, TestForm, PUBLIC_KEY, SERVICE_ID, TEMPLATE_ID};

#[tokio::test]
async fn short_form_is_delivered_and_cleared() {
    let mut form = TestForm::spawn(FormVariant::Short).await;

    Mock::given(path("/api/v1.0/email/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&form.relay_server)
        .await;

    form.fill(&[
        (Field::Name, "Ann"),
        (Field::Email, "ann@x.com"),
        (Field::Message, "Hello there!"),
    ]);

    assert_eq!(SubmissionStatus::Sent, form.submit().await);
    assert!(form.controller.state().values().is_empty());

    let requests = form.relay_requests().await;
    assert_eq!(1, requests.len());
    assert_eq!(
        json!({
            "service_id": SERVICE_ID,
            "template_id": TEMPLATE_ID,
            "user_id": PUBLIC_KEY,
            "template_params": {
                "name": "Ann",
                "email": "ann@x.com",
                "message": "Hello there!",
            },
        }),
        requests[0]
    );
}

#[tokio::test]
async fn padded_email_is_sent_as_validated() {
    let mut form = TestForm::spawn(FormVariant::Short).await;

    Mock::given(body_partial_json(json!({
        "template_params": { "email": "ann@x.com" }
    })))
    .respond_with(ResponseTemplate::new(200))
    .expect(1)
    .mount(&form.relay_server)
    .await;

    form.fill(&[
        (Field::Name, "Ann"),
        (Field::Email, "  ann@x.com "),
        (Field::Message, "Hello there!"),
    ]);

    assert_eq!(SubmissionStatus::Sent, form.submit().await);

    let requests = form.relay_requests().await;
    assert_eq!(
        Some("ann@x.com"),
        requests[0]["template_params"]["email"].as_str()
    );
}

#[tokio::test]
async fn invalid_email_is_never_sent() {
    let mut form = TestForm::spawn(FormVariant::Short).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&form.relay_server)
        .await;

    form.fill(&[
        (Field::Name, "Ann"),
        (Field::Email, "not-an-email"),
        (Field::Message, "Hello there!"),
    ]);

    assert_eq!(SubmissionStatus::Idle, form.submit().await);

    let errors = form.controller.state().errors();
    assert_eq!(1, errors.len());
    assert_eq!(Some("Invalid email address"), errors.get(Field::Email));
}

#[tokio::test]
async fn missing_required_fields_block_submission() {
    let test_cases: Vec<(&str, Vec<(Field, &str)>)> = vec![
        (
            "missing name",
            vec![(Field::Email, "ann@x.com"), (Field::Message, "Hello there!")],
        ),
        (
            "missing email",
            vec![(Field::Name, "Ann"), (Field::Message, "Hello there!")],
        ),
        (
            "missing message",
            vec![(Field::Name, "Ann"), (Field::Email, "ann@x.com")],
        ),
        ("missing everything", vec![]),
    ];

    for (desc, values) in test_cases {
        let mut form = TestForm::spawn(FormVariant::Short).await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&form.relay_server)
            .await;

        form.fill(&values);

        assert_eq!(SubmissionStatus::Idle, form.submit().await, "{}", desc);
        assert!(!form.controller.state().errors().is_empty(), "{}", desc);
    }
}

#[tokio::test]
async fn unreachable_relay_keeps_values_for_retry() {
    let closed_uri = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();
        format!("http://127.0.0.1:{}", port)
    };
    let relay = relay_client(&closed_uri);
    let mut controller = FormController::new(FormVariant::Short);

    controller.edit(Field::Name, "Ann");
    controller.edit(Field::Email, "ann@x.com");
    controller.edit(Field::Message, "Hello there!");
    let values = controller.state().values().clone();

    let status = controller.submit(&relay, today()).await.clone();

    assert_eq!(
        SubmissionStatus::Failed(FALLBACK_FAILURE_REASON.into()),
        status
    );
    assert_eq!(&values, controller.state().values());
    assert!(controller.state().can_submit());
}

#[tokio::test]
async fn relay_rejection_text_is_not_shown() {
    let mut form = TestForm::spawn(FormVariant::Short).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(400).set_body_string("The template ID is invalid"))
        .expect(1)
        .mount(&form.relay_server)
        .await;

    form.fill(&[
        (Field::Name, "Ann"),
        (Field::Email, "ann@x.com"),
        (Field::Message, "Hello there!"),
    ]);

    assert_eq!(
        SubmissionStatus::Failed(FALLBACK_FAILURE_REASON.into()),
        form.submit().await
    );
    assert_eq!("Ann", form.controller.state().values().name);
}

#[tokio::test]
async fn retry_after_failure_sends_again() {
    let mut form = TestForm::spawn(FormVariant::Short).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&form.relay_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&form.relay_server)
        .await;

    form.fill(&[
        (Field::Name, "Ann"),
        (Field::Email, "ann@x.com"),
        (Field::Message, "Hello there!"),
    ]);

    assert_eq!(
        SubmissionStatus::Failed(FALLBACK_FAILURE_REASON.into()),
        form.submit().await
    );
    assert_eq!(SubmissionStatus::Sent, form.submit().await);
    assert_eq!(2, form.relay_requests().await.len());
}

#[tokio::test]
async fn extended_form_sends_every_field() {
    let mut form = TestForm::spawn(FormVariant::Extended).await;

    Mock::given(body_partial_json(json!({
        "template_params": {
            "name": "Ann",
            "surname": "Lee",
            "email": "ann@x.com",
            "country": "Ivory Coast",
            "dob": "2010-10-19",
            "message": "Hello there!",
        }
    })))
    .respond_with(ResponseTemplate::new(200))
    .expect(1)
    .mount(&form.relay_server)
    .await;

    form.fill(&[
        (Field::Name, "Ann"),
        (Field::Surname, "Lee"),
        (Field::Email, "ann@x.com"),
        (Field::Country, "Ivory Coast"),
        (Field::Dob, "2010-10-19"),
        (Field::Message, "Hello there!"),
    ]);

    assert_eq!(SubmissionStatus::Sent, form.submit().await);
}

#[tokio::test]
async fn extended_form_rejects_underage_sender() {
    let mut form = TestForm::spawn(FormVariant::Extended).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&form.relay_server)
        .await;

    form.fill(&[
        (Field::Name, "Ann"),
        (Field::Surname, "Lee"),
        (Field::Email, "ann@x.com"),
        (Field::Country, "Ivory Coast"),
        (Field::Dob, "2010-10-20"),
        (Field::Message, "Hello there!"),
    ]);

    assert_eq!(SubmissionStatus::Idle, form.submit().await);
    assert_eq!(
        Some("You must be at least 16 years old"),
        form.controller.state().errors().get(Field::Dob)
    );
}
