use std::sync::Arc;

use quiz_core::model::{
    AttemptError, AttemptState, ChoiceKey, QuizBoard, QuizId, RankFilter, RankTier,
    SUBMISSION_FAILED_MESSAGE, Subject,
};
use quiz_core::time::fixed_clock;
use serde_json::{Value, json};
use services::{
    ApiError, ClientServices, Method, ScriptedReply, ScriptedTransport, SessionStore,
    SubmissionOutcome,
};
use storage::{CredentialRecord, InMemoryCredentialRepository};

async fn logged_in_store() -> SessionStore {
    let credential = quiz_core::model::Credential::issue("jwt", quiz_core::time::fixed_now()).unwrap();
    let repo = InMemoryCredentialRepository::with_record(CredentialRecord::from_credential(&credential));
    SessionStore::restore(fixed_clock(), Arc::new(repo)).await
}

fn services(transport: &ScriptedTransport, filter: RankFilter) -> ClientServices {
    ClientServices::with_transport(Arc::new(transport.clone()), filter)
}

fn item(id: u64, rank: &str, level: i32) -> Value {
    json!({
        "quizId": id,
        "quizContent": format!("Question {id}"),
        "quizSubject": "finance",
        "quizRank": rank,
        "quizLevel": level,
        "option2": null,
        "option4": {
            "quizId": id,
            "choiceA": "a", "choiceB": "b", "choiceC": "c", "choiceD": "d",
            "correctAns": "2"
        }
    })
}

fn history_row(result_id: u64, quiz_id: u64, correct: bool, date: &str) -> Value {
    json!({
        "quizResultId": result_id,
        "isCorrect": correct,
        "quizDate": date,
        "quizId": {"quizId": quiz_id, "quizcontent": format!("Question {quiz_id}"), "subject": "finance", "quizLevel": 1}
    })
}

fn mixed_catalog() -> ScriptedReply {
    ScriptedReply::ok(json!([
        item(1, "BRONZE", 1),
        item(2, "SILVER", 1),
        item(3, "GOLD", 3),
        item(4, "SILVER", 2),
        {"quizId": 5, "quizContent": "broken"}
    ]))
}

#[tokio::test]
async fn exact_filter_keeps_only_matching_rank() {
    let transport = ScriptedTransport::new().on(
        Method::GET,
        "/quiz/generation/finance/SILVER",
        mixed_catalog(),
    );
    let services = services(&transport, RankFilter::Exact);
    let store = logged_in_store().await;

    let items = services
        .catalog()
        .list_quizzes(&store, &Subject::finance(), RankTier::Silver)
        .await
        .unwrap();

    let ids: Vec<u64> = items.iter().map(|item| item.id().value()).collect();
    assert_eq!(ids, vec![2, 4]);
    assert!(items.iter().all(|item| item.required_rank() == RankTier::Silver));

    let sent = transport.requests_to("/quiz/generation/finance/SILVER");
    assert_eq!(sent[0].bearer.as_deref(), Some("jwt"));
}

#[tokio::test]
async fn at_or_below_filter_admits_lower_ranks() {
    let transport = ScriptedTransport::new().on(
        Method::GET,
        "/quiz/generation/finance/SILVER",
        mixed_catalog(),
    );
    let services = services(&transport, RankFilter::AtOrBelow);
    let store = logged_in_store().await;

    let items = services
        .catalog()
        .list_quizzes(&store, &Subject::finance(), RankTier::Silver)
        .await
        .unwrap();
    let ids: Vec<u64> = items.iter().map(|item| item.id().value()).collect();
    assert_eq!(ids, vec![1, 2, 4]);
}

#[tokio::test]
async fn catalog_failure_surfaces_status() {
    let transport = ScriptedTransport::new().on(
        Method::GET,
        "/quiz/generation/credit/GOLD",
        ScriptedReply::status(401),
    );
    let services = services(&transport, RankFilter::Exact);
    let store = logged_in_store().await;

    let err = services
        .catalog()
        .list_quizzes(&store, &Subject::new("credit").unwrap(), RankTier::Gold)
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn completion_keeps_only_correct_results_and_is_idempotent() {
    let transport = ScriptedTransport::new().on(
        Method::GET,
        "/quiz/checkResult",
        ScriptedReply::ok(json!([
            history_row(1, 10, false, "2024-03-01T09:00:00"),
            history_row(2, 10, true, "2024-03-02T09:00:00"),
            history_row(3, 11, false, "2024-03-03T09:00:00"),
            history_row(4, 12, true, "2024-03-04T09:00:00"),
        ])),
    );
    let services = services(&transport, RankFilter::Exact);
    let store = logged_in_store().await;
    let tracker = services.completion();

    let first = tracker.load_completion(&store).await.unwrap();
    let second = tracker.load_completion(&store).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert!(first.contains(QuizId::new(10)));
    assert!(first.contains(QuizId::new(12)));
    assert!(!first.contains(QuizId::new(11)));
}

#[tokio::test]
async fn recent_results_are_newest_first() {
    let transport = ScriptedTransport::new().on(
        Method::GET,
        "/quiz/checkResult",
        ScriptedReply::ok(json!([
            history_row(1, 10, false, "2024-03-01T09:00:00"),
            history_row(2, 11, true, "2024-03-04T09:00:00"),
            history_row(3, 12, true, "2024-03-02T09:00:00"),
            history_row(4, 13, false, "2024-03-03T09:00:00"),
        ])),
    );
    let services = services(&transport, RankFilter::Exact);
    let store = logged_in_store().await;

    let recent = services
        .completion()
        .recent_results(&store, services::RECENT_RESULTS_LIMIT)
        .await
        .unwrap();
    let ids: Vec<u64> = recent.iter().map(|r| r.quiz_id.value()).collect();
    assert_eq!(ids, vec![11, 13, 12]);
}

async fn board_for(services: &ClientServices, store: &SessionStore, rank: RankTier) -> QuizBoard {
    let items = services
        .catalog()
        .list_quizzes(store, &Subject::finance(), rank)
        .await
        .unwrap();
    let completed = services.completion().load_completion(store).await.unwrap();
    QuizBoard::new(rank, items, completed)
}

#[tokio::test]
async fn correct_verdict_completes_item() {
    let transport = ScriptedTransport::new()
        .on(
            Method::GET,
            "/quiz/generation/finance/GOLD",
            ScriptedReply::ok(json!([item(42, "GOLD", 3)])),
        )
        .on(Method::GET, "/quiz/checkResult", ScriptedReply::ok(json!([])))
        .on(
            Method::GET,
            "/quiz/iscorrect/42/2",
            ScriptedReply::ok(json!({"isCorrect": true, "message": "정답입니다"})),
        );
    let services = services(&transport, RankFilter::Exact);
    let store = logged_in_store().await;
    let mut board = board_for(&services, &store, RankTier::Gold).await;
    let id = QuizId::new(42);

    board.open(id).unwrap();
    board.select(id, ChoiceKey::new(2).unwrap()).unwrap();
    let outcome = services.answers().submit(&store, &mut board, id).await.unwrap();

    assert!(outcome.is_correct());
    assert!(matches!(
        board.state(id),
        Some(AttemptState::Correct { message: Some(m) }) if m == "정답입니다"
    ));
    assert!(board.completion().contains(id));
    assert!(!board.can_submit(id));
}

#[tokio::test]
async fn incorrect_verdict_allows_retry() {
    let transport = ScriptedTransport::new()
        .on(
            Method::GET,
            "/quiz/generation/finance/BRONZE",
            ScriptedReply::ok(json!([item(7, "BRONZE", 1)])),
        )
        .on(Method::GET, "/quiz/checkResult", ScriptedReply::ok(json!([])))
        .on(
            Method::GET,
            "/quiz/iscorrect/7/3",
            ScriptedReply::ok(json!({"isCorrect": false, "message": "오답입니다"})),
        )
        .on(
            Method::GET,
            "/quiz/iscorrect/7/2",
            ScriptedReply::ok(json!({"isCorrect": true, "message": "정답입니다"})),
        );
    let services = services(&transport, RankFilter::Exact);
    let store = logged_in_store().await;
    let mut board = board_for(&services, &store, RankTier::Bronze).await;
    let id = QuizId::new(7);

    board.open(id).unwrap();
    board.select(id, ChoiceKey::new(3).unwrap()).unwrap();
    let outcome = services.answers().submit(&store, &mut board, id).await.unwrap();
    assert!(matches!(&outcome, SubmissionOutcome::Verdict(r) if !r.is_correct && r.message == "오답입니다"));
    assert!(matches!(board.state(id), Some(AttemptState::Incorrect { .. })));
    assert!(board.completion().is_empty());
    assert!(board.can_submit(id));

    board.select(id, ChoiceKey::new(2).unwrap()).unwrap();
    let outcome = services.answers().submit(&store, &mut board, id).await.unwrap();
    assert!(outcome.is_correct());
    assert!(board.is_complete(id));
}

#[tokio::test]
async fn transport_failure_keeps_item_open() {
    let transport = ScriptedTransport::new()
        .on(
            Method::GET,
            "/quiz/generation/finance/BRONZE",
            ScriptedReply::ok(json!([item(7, "BRONZE", 1)])),
        )
        .on(Method::GET, "/quiz/checkResult", ScriptedReply::ok(json!([])))
        .on(Method::GET, "/quiz/iscorrect/7/1", ScriptedReply::Unavailable);
    let services = services(&transport, RankFilter::Exact);
    let store = logged_in_store().await;
    let mut board = board_for(&services, &store, RankTier::Bronze).await;
    let id = QuizId::new(7);

    board.open(id).unwrap();
    board.select(id, ChoiceKey::new(1).unwrap()).unwrap();
    let outcome = services.answers().submit(&store, &mut board, id).await.unwrap();

    let SubmissionOutcome::Failed { message, error } = outcome else {
        panic!("expected a failed submission");
    };
    assert_eq!(message, SUBMISSION_FAILED_MESSAGE);
    assert_ne!(message, "오답입니다");
    assert!(matches!(error, ApiError::Transport(_)));
    assert!(matches!(
        board.state(id),
        Some(AttemptState::Open { selected: Some(_), notice: Some(_) })
    ));
    assert!(board.completion().is_empty());
}

#[tokio::test]
async fn completed_item_is_never_resubmitted() {
    let transport = ScriptedTransport::new()
        .on(
            Method::GET,
            "/quiz/generation/finance/BRONZE",
            ScriptedReply::ok(json!([item(9, "BRONZE", 1)])),
        )
        .on(
            Method::GET,
            "/quiz/checkResult",
            ScriptedReply::ok(json!([history_row(1, 9, true, "2024-03-01")])),
        );
    let services = services(&transport, RankFilter::Exact);
    let store = logged_in_store().await;
    let mut board = board_for(&services, &store, RankTier::Bronze).await;
    let id = QuizId::new(9);

    let err = services
        .answers()
        .submit(&store, &mut board, id)
        .await
        .unwrap_err();
    assert_eq!(err, AttemptError::AlreadyCompleted(id));
    assert!(transport.requests_to("/quiz/iscorrect/9/1").is_empty());
    assert!(
        transport
            .requests()
            .iter()
            .all(|request| !request.path().starts_with("/quiz/iscorrect"))
    );
}

#[tokio::test]
async fn level_locked_item_blocks_before_any_call() {
    let transport = ScriptedTransport::new()
        .on(
            Method::GET,
            "/quiz/generation/finance/BRONZE",
            ScriptedReply::ok(json!([item(8, "BRONZE", 2)])),
        )
        .on(Method::GET, "/quiz/checkResult", ScriptedReply::ok(json!([])));
    let services = services(&transport, RankFilter::Exact);
    let store = logged_in_store().await;
    let mut board = board_for(&services, &store, RankTier::Bronze).await;
    let id = QuizId::new(8);

    assert!(!board.can_submit(id));
    assert!(matches!(board.open(id), Err(AttemptError::LevelLocked { .. })));
    let err = services
        .answers()
        .submit(&store, &mut board, id)
        .await
        .unwrap_err();
    assert!(matches!(err, AttemptError::LevelLocked { .. }));
    assert!(
        transport
            .requests()
            .iter()
            .all(|request| !request.path().starts_with("/quiz/iscorrect"))
    );
}

#[tokio::test]
async fn submit_without_selection_sends_nothing() {
    let transport = ScriptedTransport::new()
        .on(
            Method::GET,
            "/quiz/generation/finance/BRONZE",
            ScriptedReply::ok(json!([item(7, "BRONZE", 1)])),
        )
        .on(Method::GET, "/quiz/checkResult", ScriptedReply::ok(json!([])));
    let services = services(&transport, RankFilter::Exact);
    let store = logged_in_store().await;
    let mut board = board_for(&services, &store, RankTier::Bronze).await;
    let id = QuizId::new(7);

    board.open(id).unwrap();
    let outcome = services.answers().submit(&store, &mut board, id).await.unwrap();
    assert!(matches!(outcome, SubmissionOutcome::NothingSelected));
    assert_eq!(transport.requests().len(), 2);
}
