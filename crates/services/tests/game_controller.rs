use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use composition_core::model::{GameSettings, GameSettingsError, Level, Question};
use composition_core::time::{fixed_clock, fixed_now};
use services::{
    EnglishResources, GameController, GameError, GameSettingsProvider, GameState,
    QuestionProvider,
};

/// Repository with fixed settings and a scripted question queue.
///
/// Once the queue is empty it keeps handing out `10 = 3 + ?`.
struct ScriptedRepository {
    settings: GameSettings,
    questions: Mutex<VecDeque<Question>>,
    fail_questions: AtomicBool,
    calls: AtomicU64,
}

impl ScriptedRepository {
    fn new(settings: GameSettings) -> Arc<Self> {
        Arc::new(Self {
            settings,
            questions: Mutex::new(VecDeque::new()),
            fail_questions: AtomicBool::new(false),
            calls: AtomicU64::new(0),
        })
    }

    fn with_questions(settings: GameSettings, questions: Vec<Question>) -> Arc<Self> {
        let repo = Self::new(settings);
        repo.questions.lock().unwrap().extend(questions);
        repo
    }
}

impl GameSettingsProvider for ScriptedRepository {
    fn game_settings(&self, _level: Level) -> Result<GameSettings, composition_core::Error> {
        Ok(self.settings)
    }
}

impl QuestionProvider for ScriptedRepository {
    fn generate_question(&self, _max_sum_value: u32) -> Result<Question, composition_core::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_questions.load(Ordering::SeqCst) {
            return Err(composition_core::model::QuestionError::NotEnoughOptions {
                max_sum_value: 10,
                required: 6,
            }
            .into());
        }
        let next = self.questions.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| question(10, 3)))
    }
}

struct BrokenSettings;

impl GameSettingsProvider for BrokenSettings {
    fn game_settings(&self, _level: Level) -> Result<GameSettings, composition_core::Error> {
        Err(GameSettingsError::InvalidGameTime.into())
    }
}

impl QuestionProvider for BrokenSettings {
    fn generate_question(&self, _max_sum_value: u32) -> Result<Question, composition_core::Error> {
        Ok(question(10, 3))
    }
}

fn question(sum: u32, visible: u32) -> Question {
    let right = sum - visible;
    Question::new(sum, visible, vec![right + 1, right, right + 2]).unwrap()
}

fn two_second_settings() -> GameSettings {
    GameSettings::new(10, 1, 50, 2).unwrap()
}

fn start(repo: Arc<ScriptedRepository>) -> GameController {
    GameController::start(Level::Test, repo, Arc::new(EnglishResources), fixed_clock()).unwrap()
}

async fn wait_finished(controller: &GameController) -> GameState {
    let mut rx = controller.subscribe();
    let state = rx.wait_for(GameState::is_finished).await.unwrap().clone();
    state
}

#[tokio::test(start_paused = true)]
async fn publishes_initial_state() {
    let controller = start(ScriptedRepository::new(two_second_settings()));
    let state = controller.state();

    assert_eq!(state.formatted_time, "00:02");
    assert_eq!(state.question.as_ref().unwrap().right_answer(), 7);
    assert_eq!(state.progress.count_of_questions, 0);
    assert_eq!(state.percent_of_right_answers, 0);
    assert_eq!(state.progress_answers, "Right answers: 0 (min 1)");
    assert!(!state.enough_count);
    assert!(!state.enough_percent);
    assert_eq!(state.min_percent, 50);
    assert!(state.result.is_none());
    assert!(!controller.is_finished());
}

#[tokio::test(start_paused = true)]
async fn right_answer_then_expiry_wins() {
    let controller = start(ScriptedRepository::new(two_second_settings()));

    let outcome = controller.choose_answer(7).unwrap();
    assert!(outcome.correct);

    let state = wait_finished(&controller).await;
    let result = state.result.unwrap();
    assert!(result.winner);
    assert_eq!(result.count_of_right_answers, 1);
    assert_eq!(result.count_of_questions, 1);
    assert_eq!(result.settings, two_second_settings());
    assert_eq!(result.started_at, fixed_now());
    assert_eq!(result.finished_at, fixed_now());
    assert_eq!(state.formatted_time, "00:00");
    assert!(state.question.is_none());
}

#[tokio::test(start_paused = true)]
async fn no_answers_loses_with_zero_percent() {
    let controller = start(ScriptedRepository::new(two_second_settings()));

    let state = wait_finished(&controller).await;
    let result = state.result.unwrap();
    assert!(!result.winner);
    assert_eq!(result.count_of_right_answers, 0);
    assert_eq!(result.count_of_questions, 0);
    assert_eq!(result.percent_of_right_answers(), 0);
    assert_eq!(state.percent_of_right_answers, 0);
}

#[tokio::test(start_paused = true)]
async fn answer_replaces_question_and_updates_progress() {
    let repo = ScriptedRepository::with_questions(
        two_second_settings(),
        vec![question(10, 3), question(9, 4), question(8, 6)],
    );
    let controller = start(repo);
    let mut rx = controller.subscribe();
    assert_eq!(rx.borrow_and_update().question.as_ref().unwrap().sum(), 10);

    controller.choose_answer(7).unwrap();
    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    let next = state.question.unwrap();
    assert_eq!((next.sum(), next.visible_number()), (9, 4));
    assert_eq!(state.progress.count_of_right_answers, 1);
    assert_eq!(state.progress.count_of_questions, 1);
    assert_eq!(state.percent_of_right_answers, 100);
    assert_eq!(state.progress_answers, "Right answers: 1 (min 1)");
    assert!(state.enough_count);
    assert!(state.enough_percent);

    let outcome = controller.choose_answer(7).unwrap();
    assert!(!outcome.correct);
    let state = controller.state();
    assert_eq!(state.question.unwrap().sum(), 8);
    assert_eq!(state.progress.count_of_questions, 2);
    assert_eq!(state.percent_of_right_answers, 50);
}

#[tokio::test(start_paused = true)]
async fn negative_selection_counts_as_wrong_answer() {
    let controller = start(ScriptedRepository::new(two_second_settings()));

    let outcome = controller.choose_answer(-1).unwrap();
    assert!(!outcome.correct);
    let progress = controller.progress();
    assert_eq!(progress.count_of_questions, 1);
    assert_eq!(progress.count_of_right_answers, 0);
    assert_eq!(controller.state().percent_of_right_answers, 0);
}

#[tokio::test(start_paused = true)]
async fn winner_is_decided_at_expiry_only() {
    let settings = GameSettings::new(10, 2, 60, 2).unwrap();
    let controller = start(ScriptedRepository::new(settings));

    controller.choose_answer(7).unwrap();
    controller.choose_answer(7).unwrap();
    assert!(controller.progress().is_winning());

    for _ in 0..3 {
        controller.choose_answer(1).unwrap();
    }
    assert_eq!(controller.progress().percent_of_right_answers, 40);

    let result = wait_finished(&controller).await.result.unwrap();
    assert!(!result.winner);
    assert_eq!(result.count_of_right_answers, 2);
    assert_eq!(result.count_of_questions, 5);
}

#[tokio::test(start_paused = true)]
async fn countdown_publishes_formatted_time() {
    let settings = GameSettings::new(10, 1, 50, 125).unwrap();
    let controller = start(ScriptedRepository::new(settings));
    assert_eq!(controller.state().formatted_time, "02:05");

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(controller.state().formatted_time, "02:04");

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(controller.state().formatted_time, "01:04");
    assert!(!controller.is_finished());
}

#[tokio::test(start_paused = true)]
async fn publishes_exactly_one_result() {
    let controller = start(ScriptedRepository::new(two_second_settings()));
    let mut rx = controller.subscribe();

    let first = rx.wait_for(GameState::is_finished).await.unwrap().clone();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!rx.has_changed().unwrap());
    assert_eq!(controller.state(), first);
    assert_eq!(controller.result(), first.result);
}

#[tokio::test(start_paused = true)]
async fn answer_after_finish_is_rejected() {
    let controller = start(ScriptedRepository::new(two_second_settings()));
    controller.choose_answer(7).unwrap();
    let finished = wait_finished(&controller).await;

    let err = controller.choose_answer(7).unwrap_err();
    assert!(matches!(err, GameError::Finished));
    assert_eq!(controller.progress().count_of_questions, 1);
    assert_eq!(controller.state(), finished);
}

#[tokio::test(start_paused = true)]
async fn failed_question_leaves_score_untouched() {
    let repo = ScriptedRepository::new(two_second_settings());
    let controller = start(Arc::clone(&repo));
    let before = controller.state();

    repo.fail_questions.store(true, Ordering::SeqCst);
    let err = controller.choose_answer(7).unwrap_err();
    assert!(matches!(err, GameError::QuestionGenerationFailed(_)));
    assert_eq!(controller.state(), before);
    assert_eq!(controller.progress().count_of_questions, 0);

    repo.fail_questions.store(false, Ordering::SeqCst);
    assert!(controller.choose_answer(7).unwrap().correct);
}

#[tokio::test(start_paused = true)]
async fn dropping_controller_stops_countdown() {
    let controller = start(ScriptedRepository::new(two_second_settings()));
    let rx = controller.subscribe();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let before = rx.borrow().clone();
    assert_eq!(before.formatted_time, "00:01");

    drop(controller);
    tokio::time::sleep(Duration::from_secs(10)).await;

    let after = rx.borrow().clone();
    assert!(after.result.is_none());
    assert_eq!(after, before);
}

#[tokio::test(start_paused = true)]
async fn settings_failure_is_reported() {
    let err = GameController::start(
        Level::Hard,
        Arc::new(BrokenSettings),
        Arc::new(EnglishResources),
        fixed_clock(),
    )
    .err()
    .unwrap();
    assert!(matches!(
        err,
        GameError::SettingsUnavailable {
            level: Level::Hard,
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn first_question_failure_is_reported() {
    let repo = ScriptedRepository::new(two_second_settings());
    repo.fail_questions.store(true, Ordering::SeqCst);
    let err = GameController::start(Level::Test, repo, Arc::new(EnglishResources), fixed_clock())
        .err()
        .unwrap();
    assert!(matches!(err, GameError::QuestionGenerationFailed(_)));
}

#[test]
fn start_requires_runtime() {
    let err = GameController::start(
        Level::Test,
        ScriptedRepository::new(two_second_settings()),
        Arc::new(EnglishResources),
        fixed_clock(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, GameError::RuntimeUnavailable));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_answers_across_expiry_stay_consistent() {
    let repo = ScriptedRepository::new(GameSettings::new(10, 1, 50, 1).unwrap());
    let controller = Arc::new(start(Arc::clone(&repo)));

    let workers = (0..4)
        .map(|worker| {
            let controller = Arc::clone(&controller);
            tokio::task::spawn_blocking(move || {
                let selection = if worker % 2 == 0 { 7 } else { -1 };
                let mut accepted = 0u32;
                loop {
                    match controller.choose_answer(selection) {
                        Ok(_) => accepted += 1,
                        Err(GameError::Finished) => return accepted,
                        Err(err) => panic!("unexpected error: {err}"),
                    }
                    std::thread::yield_now();
                }
            })
        })
        .collect::<Vec<_>>();

    let mut accepted = 0;
    for worker in workers {
        accepted += worker.await.unwrap();
    }

    let state = wait_finished(&controller).await;
    let result = state.result.clone().unwrap();
    assert!(state.question.is_none());
    assert_eq!(state.formatted_time, "00:00");
    assert_eq!(result.count_of_questions, accepted);
    assert_eq!(controller.progress().count_of_questions, result.count_of_questions);
    assert_eq!(controller.result(), Some(result.clone()));
    assert_eq!(
        repo.calls.load(Ordering::SeqCst),
        u64::from(result.count_of_questions) + 1
    );
}
