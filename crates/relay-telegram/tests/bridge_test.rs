//! Polling loop tests against scripted Telegram and Claude fakes.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relay_telegram::{
    ApiResponse, Bridge, BridgeConfig, ChatBackend, Result, Role, TelegramApi, TelegramError,
    TokenPool, Turn, Update, UpdateOutcome, APOLOGY,
};

#[derive(Debug, Clone, PartialEq)]
struct Sent {
    token: String,
    chat_id: i64,
    text: String,
}

/// Replays scripted `getUpdates` and `sendMessage` results and records every
/// call. An empty script means success.
#[derive(Default)]
struct FakeTelegram {
    responses: Mutex<VecDeque<Result<ApiResponse<Vec<Update>>>>>,
    send_results: Mutex<VecDeque<Result<()>>>,
    polled_with: Mutex<Vec<(String, i64)>>,
    sent: Mutex<Vec<Sent>>,
}

impl FakeTelegram {
    fn scripted(responses: Vec<ApiResponse<Vec<Update>>>) -> Arc<Self> {
        Self::with_results(responses.into_iter().map(Ok).collect(), Vec::new())
    }

    fn with_results(
        responses: Vec<Result<ApiResponse<Vec<Update>>>>,
        send_results: Vec<Result<()>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            send_results: Mutex::new(send_results.into()),
            ..Default::default()
        })
    }

    /// Every send attempt, including failed ones.
    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn polled_with(&self) -> Vec<(String, i64)> {
        self.polled_with.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelegramApi for FakeTelegram {
    async fn get_updates(&self, token: &str, offset: i64) -> Result<ApiResponse<Vec<Update>>> {
        self.polled_with
            .lock()
            .unwrap()
            .push((token.to_string(), offset));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::success(Vec::new())))
    }

    async fn send_message(&self, token: &str, chat_id: i64, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent {
            token: token.to_string(),
            chat_id,
            text: text.to_string(),
        });
        self.send_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

/// Returns scripted replies and records the history it was given.
#[derive(Default)]
struct FakeClaude {
    replies: Mutex<VecDeque<Result<String>>>,
    seen: Mutex<Vec<Vec<Turn>>>,
}

impl FakeClaude {
    fn scripted(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    fn seen(&self) -> Vec<Vec<Turn>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeClaude {
    async fn complete(&self, history: &[Turn]) -> Result<String> {
        self.seen.lock().unwrap().push(history.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }
}

fn bridge(
    api: &Arc<FakeTelegram>,
    claude: &Arc<FakeClaude>,
    tokens: &str,
) -> Bridge<Arc<FakeTelegram>, Arc<FakeClaude>> {
    Bridge::new(
        api.clone(),
        claude.clone(),
        TokenPool::parse(tokens).unwrap(),
        BridgeConfig::default(),
    )
    .unwrap()
}

fn rate_limited() -> ApiResponse<Vec<Update>> {
    ApiResponse::failure(429, "Too Many Requests: retry after 5")
}

#[tokio::test]
async fn test_reply_sent_and_recorded() {
    let api = FakeTelegram::scripted(vec![ApiResponse::success(vec![Update::text(
        7,
        100,
        "/claude what is rust?",
    )])]);
    let claude = FakeClaude::scripted(vec![Ok("A language.".into())]);
    let mut bridge = bridge(&api, &claude, "tok-a");

    let mut offset = 0;
    assert_eq!(bridge.poll_once(&mut offset).await.unwrap(), 1);
    assert_eq!(offset, 8);

    assert_eq!(
        api.sent(),
        vec![Sent {
            token: "tok-a".into(),
            chat_id: 100,
            text: "A language.".into()
        }]
    );
    assert_eq!(claude.seen(), vec![vec![Turn::user("what is rust?")]]);
    assert_eq!(
        bridge.conversations().history(100),
        &[Turn::user("what is rust?"), Turn::assistant("A language.")]
    );
}

#[tokio::test]
async fn test_offset_advances_past_ignored_updates() {
    let api = FakeTelegram::scripted(vec![
        ApiResponse::success(vec![
            Update::text(40, 1, "hello there"),
            Update {
                update_id: 41,
                message: None,
            },
            Update::text(42, 1, "/claude"),
        ]),
        ApiResponse::success(Vec::new()),
    ]);
    let claude = FakeClaude::scripted(Vec::new());
    let mut bridge = bridge(&api, &claude, "tok-a");

    let mut offset = 0;
    bridge.poll_once(&mut offset).await.unwrap();
    assert_eq!(offset, 43);
    bridge.poll_once(&mut offset).await.unwrap();
    assert_eq!(offset, 43);

    assert!(api.sent().is_empty());
    assert!(claude.seen().is_empty());
    assert_eq!(bridge.conversations().chat_count(), 0);
    assert_eq!(
        api.polled_with(),
        vec![("tok-a".to_string(), 0), ("tok-a".to_string(), 43)]
    );
}

#[tokio::test]
async fn test_failed_completion_sends_apology() {
    let api = FakeTelegram::scripted(vec![ApiResponse::success(vec![
        Update::text(1, 5, "/claude first"),
        Update::text(2, 5, "/claude second"),
    ])]);
    let claude = FakeClaude::scripted(vec![
        Err(TelegramError::BackendError("overloaded".into())),
        Ok(String::new()),
    ]);
    let mut bridge = bridge(&api, &claude, "tok-a");

    let mut offset = 0;
    bridge.poll_once(&mut offset).await.unwrap();
    assert_eq!(offset, 3);

    let texts: Vec<String> = api.sent().into_iter().map(|s| s.text).collect();
    assert_eq!(texts, vec![APOLOGY, APOLOGY]);

    // User turns stay, no assistant turn is added
    let history = bridge.conversations().history(5);
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|t| t.role == Role::User));
}

#[tokio::test]
async fn test_long_reply_truncated_but_stored_whole() {
    let long = "z".repeat(5000);
    let api = FakeTelegram::scripted(vec![ApiResponse::success(vec![Update::text(
        1,
        9,
        "/claude essay please",
    )])]);
    let claude = FakeClaude::scripted(vec![Ok(long.clone())]);
    let mut bridge = bridge(&api, &claude, "tok-a");

    let mut offset = 0;
    bridge.poll_once(&mut offset).await.unwrap();

    let sent = api.sent();
    assert_eq!(sent[0].text.chars().count(), 4096);
    assert!(sent[0].text.ends_with("..."));
    assert_eq!(bridge.conversations().history(9)[1].content, long);
}

#[tokio::test]
async fn test_rate_limit_rotates_once_per_response() {
    let api = FakeTelegram::scripted(vec![
        rate_limited(),
        ApiResponse::success(vec![Update::text(3, 1, "/claude hi")]),
    ]);
    let claude = FakeClaude::scripted(Vec::new());
    let mut bridge = bridge(&api, &claude, "[tok-a,tok-b,tok-c]");

    let mut offset = 0;
    assert_eq!(bridge.poll_once(&mut offset).await.unwrap(), 1);
    assert_eq!(bridge.tokens().index(), 1);
    assert_eq!(
        api.polled_with(),
        vec![("tok-a".to_string(), 0), ("tok-b".to_string(), 0)]
    );
    // Replies go out with the token that is current after rotation
    assert_eq!(api.sent()[0].token, "tok-b");
}

#[tokio::test]
async fn test_rate_limit_wraps_to_first_token() {
    let api = FakeTelegram::scripted(vec![rate_limited(), rate_limited(), rate_limited()]);
    let claude = FakeClaude::scripted(Vec::new());
    let mut bridge = bridge(&api, &claude, "tok-a,tok-b");

    let mut offset = 5;
    let err = bridge.poll_once(&mut offset).await.unwrap_err();
    assert!(matches!(err, TelegramError::RateLimited(2)));
    assert_eq!(bridge.tokens().index(), 0);
    assert_eq!(offset, 5);

    // Next poll starts from the wrapped token
    assert!(bridge.poll_once(&mut offset).await.is_ok());
    assert_eq!(bridge.tokens().index(), 1);
    let tokens: Vec<String> = api.polled_with().into_iter().map(|(t, _)| t).collect();
    assert_eq!(tokens, vec!["tok-a", "tok-b", "tok-a", "tok-b"]);
}

#[tokio::test]
async fn test_send_failure_does_not_stop_the_batch() {
    let api = FakeTelegram::with_results(
        vec![Ok(ApiResponse::success(vec![
            Update::text(20, 5, "/claude one"),
            Update::text(21, 6, "/claude two"),
        ]))],
        vec![Err(TelegramError::ApiError {
            code: 400,
            description: "Bad Request: can't parse entities".into(),
        })],
    );
    let claude = FakeClaude::scripted(vec![Ok("*broken".into()), Ok("fine".into())]);
    let mut bridge = bridge(&api, &claude, "tok-a");

    let mut offset = 0;
    assert_eq!(bridge.poll_once(&mut offset).await.unwrap(), 2);
    assert_eq!(offset, 22);

    let sent = api.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!((sent[1].chat_id, sent[1].text.as_str()), (6, "fine"));

    // The reply is kept even though delivery failed
    assert_eq!(bridge.conversations().history(5)[1], Turn::assistant("*broken"));
    assert_eq!(bridge.conversations().history(6).len(), 2);
}

#[tokio::test]
async fn test_fetch_failure_keeps_token_and_offset() {
    let api = FakeTelegram::with_results(
        vec![Err(TelegramError::HttpError("connection reset".into()))],
        Vec::new(),
    );
    let claude = FakeClaude::scripted(Vec::new());
    let mut bridge = bridge(&api, &claude, "tok-a,tok-b");

    let mut offset = 7;
    let err = bridge.poll_once(&mut offset).await.unwrap_err();
    assert!(matches!(err, TelegramError::HttpError(_)));
    assert_eq!(bridge.tokens().index(), 0);
    assert_eq!(offset, 7);
    assert!(api.sent().is_empty());
    assert!(claude.seen().is_empty());

    // The retry asks for the same offset with the same token
    bridge.poll_once(&mut offset).await.unwrap();
    assert_eq!(
        api.polled_with(),
        vec![("tok-a".to_string(), 7), ("tok-a".to_string(), 7)]
    );
}

#[tokio::test]
async fn test_other_api_errors_do_not_rotate() {
    let api = FakeTelegram::scripted(vec![ApiResponse::failure(401, "Unauthorized")]);
    let claude = FakeClaude::scripted(Vec::new());
    let mut bridge = bridge(&api, &claude, "tok-a,tok-b");

    let mut offset = 0;
    let err = bridge.poll_once(&mut offset).await.unwrap_err();
    assert!(matches!(err, TelegramError::ApiError { code: 401, .. }));
    assert_eq!(bridge.tokens().index(), 0);
}

#[tokio::test]
async fn test_history_capped_at_twenty_turns() {
    let updates: Vec<Update> = (0..15)
        .map(|i| Update::text(i, 77, format!("/claude question {}", i)))
        .collect();
    let api = FakeTelegram::scripted(vec![ApiResponse::success(updates)]);
    let claude = FakeClaude::scripted(Vec::new());
    let mut bridge = bridge(&api, &claude, "tok-a");

    let mut offset = 0;
    bridge.poll_once(&mut offset).await.unwrap();

    let history = bridge.conversations().history(77);
    assert_eq!(history.len(), 20);
    assert_eq!(history[19], Turn::assistant("ok"));
    assert_eq!(history[18], Turn::user("question 14"));

    // Claude always sees the trimmed history ending with the new question
    let seen = claude.seen();
    assert!(seen.iter().all(|h| h.len() <= 20));
    assert_eq!(seen[14].last(), Some(&Turn::user("question 14")));
}

#[tokio::test]
async fn test_chats_keep_separate_histories() {
    let api = FakeTelegram::scripted(vec![ApiResponse::success(vec![
        Update::text(1, 10, "/claude one"),
        Update::text(2, 20, "/claude@relay_bot two"),
    ])]);
    let claude = FakeClaude::scripted(Vec::new());
    let mut bridge = bridge(&api, &claude, "tok-a");

    let mut offset = 0;
    bridge.poll_once(&mut offset).await.unwrap();

    assert_eq!(claude.seen()[1], vec![Turn::user("two")]);
    assert_eq!(bridge.conversations().history(10).len(), 2);
    assert_eq!(bridge.conversations().history(20).len(), 2);
}

#[tokio::test]
async fn test_handle_update_outcomes() {
    let api = FakeTelegram::scripted(Vec::new());
    let claude = FakeClaude::scripted(vec![Ok("fine".into()), Ok("   ".into())]);
    let mut bridge = bridge(&api, &claude, "tok-a");

    assert_eq!(
        bridge.handle_update(&Update::text(1, 1, "/start")).await,
        UpdateOutcome::Ignored
    );
    assert_eq!(
        bridge.handle_update(&Update::text(2, 1, "/claude hi")).await,
        UpdateOutcome::Replied
    );
    assert_eq!(
        bridge.handle_update(&Update::text(3, 1, "/claude again")).await,
        UpdateOutcome::Apologized
    );
}
