use super::*;
use crate::{
    error::ClientError,
    test_support::{post, rejected},
};

#[test]
fn starts_idle_without_a_user() {
    let machine = PostsMachine::default();
    assert_eq!(machine.view(), &PostsView::Idle);
    assert_eq!(machine.user(), None);
}

#[test]
fn empty_list_yields_no_posts_not_an_empty_ready_list() {
    let mut machine = PostsMachine::default();
    let ticket = machine.begin(UserId(1));
    assert_eq!(machine.view(), &PostsView::Loading);

    assert!(machine.resolve(ticket, Ok(Vec::new())));
    assert_eq!(machine.view(), &PostsView::Empty(ViewError::NoPosts));
    assert_eq!(machine.view().active_error(), Some(ViewError::NoPosts));
}

#[test]
fn non_empty_list_is_ready() {
    let mut machine = PostsMachine::default();
    let ticket = machine.begin(UserId(1));
    machine.resolve(ticket, Ok(vec![post(10, 1), post(11, 1)]));

    assert_eq!(machine.view().posts().len(), 2);
    assert_eq!(machine.find(PostId(11)).map(|p| p.id), Some(PostId(11)));
    assert_eq!(machine.view().active_error(), None);
}

#[test]
fn rejection_and_malformed_payload_both_fail_the_load() {
    let mut machine = PostsMachine::default();
    let ticket = machine.begin(UserId(1));
    machine.resolve(ticket, Err(rejected("boom")));
    assert_eq!(machine.view(), &PostsView::Error(ViewError::PostsLoadFailed));

    let ticket = machine.begin(UserId(1));
    machine.resolve(
        ticket,
        Err(ClientError::MalformedPayload {
            url: "http://test/posts".to_string(),
            expected: "array",
        }),
    );
    assert_eq!(machine.view(), &PostsView::Error(ViewError::PostsLoadFailed));
}

#[test]
fn reset_returns_to_idle_and_ignores_late_results() {
    let mut machine = PostsMachine::default();
    let ticket = machine.begin(UserId(1));
    machine.reset();

    assert!(!machine.resolve(ticket, Err(rejected("late"))));
    assert_eq!(machine.view(), &PostsView::Idle);
    assert_eq!(machine.user(), None);
}

#[test]
fn result_for_previous_user_does_not_overwrite_current_user() {
    let mut machine = PostsMachine::default();
    let first = machine.begin(UserId(1));
    let second = machine.begin(UserId(2));

    assert!(!machine.resolve(first, Ok(vec![post(10, 1)])));
    assert_eq!(machine.view(), &PostsView::Loading);

    assert!(machine.resolve(second, Ok(vec![post(20, 2)])));
    assert_eq!(machine.view().posts(), &[post(20, 2)]);
    assert_eq!(machine.user(), Some(UserId(2)));
}
