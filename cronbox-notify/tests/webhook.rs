use cronbox_common::CronboxError;
use cronbox_notify::{Notification, Notifier, WebhookNotifier};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn note() -> Notification {
    Notification::new(
        "bot@example.com",
        "cook@example.com",
        "Weekly Vegan Recipes - Week of Oct 11, 2026",
        "1. Vegan Chili\n   https://www.noracooks.com/vegan-chili",
    )
}

#[tokio::test]
async fn posts_the_notification_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/mail"))
        .and(header("authorization", "Bearer relay-token"))
        .and(body_json(json!({
            "sender": "bot@example.com",
            "recipient": "cook@example.com",
            "subject": "Weekly Vegan Recipes - Week of Oct 11, 2026",
            "body": "1. Vegan Chili\n   https://www.noracooks.com/vegan-chili"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(
        format!("{}/hooks/mail", server.uri()),
        Some("relay-token".into()),
    )
    .unwrap();
    notifier.deliver(&note()).await.expect("accepted");
    assert_eq!(notifier.channel(), "webhook");
}

#[tokio::test]
async fn rejected_post_is_a_delivery_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("relay down"))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(server.uri(), None).unwrap();
    let err = notifier.deliver(&note()).await.unwrap_err();
    assert!(matches!(err, CronboxError::Delivery(_)), "got {err:?}");
}

#[test]
fn invalid_endpoint_is_a_config_error() {
    let err = WebhookNotifier::new("not a url", None).err().expect("rejected");
    assert!(matches!(err, CronboxError::Config(_)));
}
