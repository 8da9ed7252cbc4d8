use super::*;

#[test]
fn status_then_logs_for_the_same_unit() {
    let mut i = Inspector::default();
    let status = i.open("a.service", InspectKind::Status);
    assert!(i.apply(&status, Ok("active (running)".into())));
    assert_eq!(
        i.current().unwrap().1,
        &InspectState::Loaded("active (running)".into())
    );

    let logs = i.open_logs().unwrap();
    assert_eq!(logs.unit, "a.service");
    assert_eq!(logs.kind, InspectKind::Logs);
    assert_eq!(i.current().unwrap().1, &InspectState::Loading);
}

#[test]
fn failure_is_shown_inline() {
    let mut i = Inspector::default();
    let req = i.open("a.service", InspectKind::Status);
    i.apply(
        &req,
        Err(GatewayError::Transport {
            message: "offline".into(),
        }),
    );
    assert_eq!(
        i.current().unwrap().1,
        &InspectState::Failed("Error loading status: offline".into())
    );
}

#[test]
fn stale_responses_are_dropped() {
    let mut i = Inspector::default();
    let old = i.open("a.service", InspectKind::Status);
    let _new = i.open("b.service", InspectKind::Status);
    assert!(!i.apply(&old, Ok("old".into())));

    i.close();
    assert!(!i.apply(&old, Ok("old".into())));
    assert!(i.open_logs().is_none());
}

#[test]
fn loading_text_names_the_kind() {
    assert_eq!(loading_text(InspectKind::Logs), "Loading logs...");
}
