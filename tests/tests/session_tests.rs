use domain::{ChatSession, Message, Role, SessionError, DEFAULT_SYSTEM_MESSAGE};
use tests::ScriptedCompletion;

#[test]
fn test_transcript_length_tracks_calls() {
    // A handful of fixed call patterns; true = user, false = system.
    let patterns: [&[bool]; 4] = [
        &[],
        &[true],
        &[false, true, true, false],
        &[true, false, true, false, true, true, false, false],
    ];
    for pattern in patterns {
        let mut session = ChatSession::new("", "");
        for (i, is_user) in pattern.iter().enumerate() {
            let content = format!("message {}", i);
            if *is_user {
                session.add_user_message(content);
            } else {
                session.add_system_message(content);
            }
        }
        assert_eq!(session.len(), pattern.len());
        for (i, (message, is_user)) in session.messages().iter().zip(pattern.iter()).enumerate() {
            let expected_role = if *is_user { Role::User } else { Role::System };
            assert_eq!(message.role, expected_role);
            assert_eq!(message.content, format!("message {}", i));
        }
    }
}

#[test]
fn test_reset_always_empties() {
    for count in [0, 1, 5, 40] {
        let mut session = ChatSession::new("key", DEFAULT_SYSTEM_MESSAGE);
        for i in 0..count {
            session.add_user_message(format!("{}", i));
        }
        session.reset_chat();
        assert_eq!(session.len(), 0);
    }
}

#[test]
fn test_constructor_system_message() {
    let session = ChatSession::new("", "You are a helpful assistant.");
    assert_eq!(session.messages(), &[Message::system("You are a helpful assistant.")]);

    let session = ChatSession::new("", "");
    assert!(session.is_empty());

    let session = ChatSession::default();
    assert_eq!(session.messages(), &[Message::system(DEFAULT_SYSTEM_MESSAGE)]);
}

#[tokio::test]
async fn test_reply_is_returned_and_appended() {
    let service = ScriptedCompletion::new().reply(Role::Assistant, "hello");
    let mut session = ChatSession::new("", "");
    session.add_user_message("hi");

    let reply = session.get_response(&service).await.unwrap();

    assert_eq!(reply, "hello");
    assert_eq!(session.last_message(), Some(&Message::assistant("hello")));
}

#[tokio::test]
async fn test_empty_choices_leave_transcript_unchanged() {
    let service = ScriptedCompletion::new().raw(r#"{"choices": []}"#);
    let mut session = ChatSession::new("", DEFAULT_SYSTEM_MESSAGE);
    session.add_user_message("hi");
    let before = session.messages().to_vec();

    let err = session.get_response(&service).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<SessionError>(),
        Some(&SessionError::InvalidResponse)
    );
    assert_eq!(session.messages(), before.as_slice());
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let service = ScriptedCompletion::new().failure("401 Unauthorized");
    let mut session = ChatSession::new("", "");
    session.add_user_message("hi");

    let err = session.get_response(&service).await.unwrap_err();

    assert_eq!(err.to_string(), "401 Unauthorized");
    assert_eq!(session.len(), 1);
}

#[tokio::test]
async fn test_two_plus_two_scenario() {
    let service = ScriptedCompletion::new()
        .raw(r#"{"choices":[{"message":{"role":"assistant","content":"4"}}]}"#);
    let mut session = ChatSession::new("", DEFAULT_SYSTEM_MESSAGE);
    session.add_user_message("What is 2+2?");

    let reply = session.get_response(&service).await.unwrap();

    assert_eq!(reply, "4");
    assert_eq!(
        session.messages(),
        &[
            Message::system(DEFAULT_SYSTEM_MESSAGE),
            Message::user("What is 2+2?"),
            Message::assistant("4"),
        ]
    );
}

#[tokio::test]
async fn test_request_carries_credential_model_and_history() {
    let service = ScriptedCompletion::new()
        .reply(Role::Assistant, "first")
        .reply(Role::Assistant, "second");
    let mut session = ChatSession::new("sk-old", "be brief").with_model("gpt-4o-mini");
    session.add_user_message("one");
    session.get_response(&service).await.unwrap();

    session.set_credential("sk-new");
    session.add_user_message("two");
    session.get_response(&service).await.unwrap();

    let requests = service.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].credential, "sk-old");
    assert_eq!(requests[0].model, "gpt-4o-mini");
    assert_eq!(requests[0].messages.len(), 2);
    assert_eq!(requests[1].credential, "sk-new");
    assert_eq!(
        requests[1].messages,
        vec![
            Message::system("be brief"),
            Message::user("one"),
            Message::assistant("first"),
            Message::user("two"),
        ]
    );
    assert_eq!(session.len(), 5);
}

#[tokio::test]
async fn test_reply_role_is_taken_verbatim() {
    let service = ScriptedCompletion::new().reply(Role::System, "noted");
    let mut session = ChatSession::new("", "");
    session.add_user_message("remember this");

    session.get_response(&service).await.unwrap();

    assert_eq!(session.last_message(), Some(&Message::system("noted")));
}
