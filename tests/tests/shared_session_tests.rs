use domain::{ChatSession, Message, SessionError, SharedSession};
use tests::{GatedCompletion, ScriptedCompletion};

#[tokio::test]
async fn test_overlapping_request_fails_fast() {
    let shared = SharedSession::new(ChatSession::new("", ""));
    shared.add_user_message("slow question").await;
    let gated = GatedCompletion::default();
    let other = ScriptedCompletion::new();

    let first = shared.get_response(&gated);
    let second = async {
        gated.started.notified().await;
        let result = shared.get_response(&other).await;
        gated.release.notify_one();
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap(), "done");
    let err = second.unwrap_err();
    assert_eq!(err.downcast_ref::<SessionError>(), Some(&SessionError::Busy));
    assert!(other.requests().is_empty());
    assert_eq!(
        shared.messages().await,
        vec![Message::user("slow question"), Message::assistant("done")]
    );
}

#[tokio::test]
async fn test_sequential_requests_succeed() {
    let shared = SharedSession::new(ChatSession::new("", ""));
    let service = ScriptedCompletion::new()
        .reply(domain::Role::Assistant, "a")
        .reply(domain::Role::Assistant, "b");

    shared.set_credential("sk-test").await;
    shared.add_user_message("1").await;
    assert_eq!(shared.get_response(&service).await.unwrap(), "a");
    shared.add_user_message("2").await;
    assert_eq!(shared.get_response(&service).await.unwrap(), "b");

    assert_eq!(shared.messages().await.len(), 4);
    assert!(service.requests().iter().all(|r| r.credential == "sk-test"));

    shared.reset_chat().await;
    assert!(shared.messages().await.is_empty());
}
