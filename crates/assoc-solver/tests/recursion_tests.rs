use super::*;
use crate::build::Build;
use crate::types::BriefType;
use assoc_common::Anchor;

fn anchor() -> Anchor {
    Anchor::new(1, 0, 0)
}

#[test]
fn test_budget_allows_within_limits() {
    let budget = ResolutionBudget::new(5, 100);
    assert_eq!(budget.enter(0), EnterResult::Entered);
    assert_eq!(budget.enter(4), EnterResult::Entered);
    assert_eq!(budget.visits(), 2);
}

#[test]
fn test_budget_depth_exceeded_at_limit() {
    let budget = ResolutionBudget::new(3, 100);
    assert_eq!(budget.enter(2), EnterResult::Entered);
    assert_eq!(budget.enter(3), EnterResult::DepthExceeded);
    // depth denial is not sticky: shallower entries still work
    assert_eq!(budget.enter(0), EnterResult::Entered);
}

#[test]
fn test_budget_visits_exceeded_is_sticky() {
    let budget = ResolutionBudget::new(10, 2);
    assert_eq!(budget.enter(0), EnterResult::Entered);
    assert_eq!(budget.enter(0), EnterResult::Entered);
    assert_eq!(budget.enter(0), EnterResult::VisitsExceeded);
    assert!(budget.is_exhausted());
    // once spent, everything is denied
    assert_eq!(budget.enter(0), EnterResult::VisitsExceeded);
}

#[test]
fn test_enter_result_predicates() {
    assert!(EnterResult::Entered.is_entered());
    assert!(EnterResult::DepthExceeded.is_denied());
    assert!(EnterResult::VisitsExceeded.is_denied());
}

#[test]
fn test_render_guard_marks_by_identity() {
    let a = Build::new(anchor(), BriefType::int()).get();
    let b = Build::new(anchor(), BriefType::int()).get();
    let members = vec![Rc::clone(&a)];

    let mut guard = RenderGuard::new();
    assert!(!guard.any_visiting(&members));
    guard.mark(&members);
    assert!(guard.any_visiting(&members));
    // a structurally equal but distinct shape is not "the same value"
    assert!(!guard.any_visiting(&[b]));
    guard.unmark(&members);
    assert!(!guard.any_visiting(&members));
}
