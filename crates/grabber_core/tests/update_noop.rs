use grabber_core::{update, AppState, Msg};

#[test]
fn unmount_before_mount_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::Unmounted);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn tick_does_not_dirty_state() {
    let (mut next, effects) = update(AppState::new(), Msg::Tick);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
