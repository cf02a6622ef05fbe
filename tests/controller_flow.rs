use multipick::{
    ControllerConfig, Entity, FetchFailure, FetchWorker, SearchProvider, SearchSelectController,
    Settlement,
};
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;

/// Answers after a per-query delay so responses can arrive out of order
struct Scripted;

impl SearchProvider for Scripted {
    fn search(&self, name: &str) -> Result<Vec<Entity>, FetchFailure> {
        match name {
            "slow" => {
                std::thread::sleep(Duration::from_millis(200));
                Ok(vec![Entity::new(1, "Slowpoke")])
            }
            "fail" => Err(FetchFailure::Status {
                status: 404,
                url: "http://localhost/?name=fail".into(),
            }),
            other => Ok(vec![Entity::new(2, format!("{} result", other))]),
        }
    }
}

fn settle_both(worker: &FetchWorker, controller: &mut SearchSelectController) -> Vec<Settlement> {
    let mut outcomes = Vec::new();
    while let Some(settled) = worker.recv_timeout(Duration::from_secs(5)) {
        outcomes.push(controller.settle(settled));
        if outcomes.len() >= 2 {
            break;
        }
    }
    outcomes
}

#[test]
fn slow_stale_response_never_overwrites_newer_results() {
    let worker = FetchWorker::new(Arc::new(Scripted));
    let mut controller = SearchSelectController::new(ControllerConfig::default());

    worker.dispatch(controller.update_query("slow").unwrap());
    worker.dispatch(controller.update_query("fast").unwrap());

    let outcomes = settle_both(&worker, &mut controller);

    assert_eq!(outcomes, [Settlement::Applied { count: 1 }, Settlement::Stale]);
    assert_eq!(controller.results(), [Entity::new(2, "fast result")]);
    assert!(!controller.is_loading());
}

#[test]
fn failure_keeps_previous_results() {
    let worker = FetchWorker::new(Arc::new(Scripted));
    let mut controller = SearchSelectController::new(ControllerConfig::default());

    worker.dispatch(controller.update_query("rick").unwrap());
    let first = worker.recv_timeout(Duration::from_secs(5)).unwrap();
    controller.settle(first);

    worker.dispatch(controller.update_query("fail").unwrap());
    assert!(controller.is_loading());
    let second = worker.recv_timeout(Duration::from_secs(5)).unwrap();

    assert_eq!(controller.settle(second), Settlement::Failed);
    assert!(!controller.is_loading());
    assert_eq!(controller.query(), "fail");
    assert_eq!(controller.results(), [Entity::new(2, "rick result")]);
    assert!(matches!(
        controller.last_error(),
        Some(FetchFailure::Status { status: 404, .. })
    ));
}

#[rstest]
#[case::empty_selection(vec![], "")]
#[case::kept_query(vec![Entity::new(7, "Jerry Smith")], "jer")]
fn replace_selection_and_query(#[case] picked: Vec<Entity>, #[case] expected_query: &str) {
    let mut controller = SearchSelectController::new(ControllerConfig::default());
    controller.update_query("jer");

    controller.replace_selection(picked.clone());

    assert_eq!(controller.query(), expected_query);
    assert_eq!(controller.selection().as_slice(), picked.as_slice());
}
