//! End-to-end tailoring session scenarios
//!
//! Drives a session the way the window does (checkbox toggles, panel edits,
//! undo/redo, close buttons) and checks the profile, the display tree and
//! the history after each step.
//!
//! Test Organization:
//! - Selection toggles and cancel
//! - Profile metadata edits
//! - Value edits and input validation
//! - Synchronizer reentrancy
//! - Close flows
//! - Fatal errors

use std::cell::RefCell;
use std::rc::Rc;

use xccdf_tailor::config::EditorSettings;
use xccdf_tailor::error::TailoringError;
use xccdf_tailor::models::TextSet;
use xccdf_tailor::tailoring::{
    DisplayTree, Lifecycle, NodeId, TailoringHost, TailoringOutcome, TailoringSession,
};
use xccdf_tailor::xccdf::sample::{demo_benchmark, demo_profile};
use xccdf_tailor::xccdf::{Policy, Profile};

/// Host answering the discard prompt with a fixed choice
struct RecordingHost {
    discard: bool,
    prompts: usize,
    outcome: Option<TailoringOutcome>,
}

impl RecordingHost {
    fn answering(discard: bool) -> Self {
        RecordingHost {
            discard,
            prompts: 0,
            outcome: None,
        }
    }
}

impl TailoringHost for RecordingHost {
    fn confirm_discard(&mut self) -> bool {
        self.prompts += 1;
        self.discard
    }

    fn tailoring_finished(&mut self, outcome: TailoringOutcome) {
        self.outcome = Some(outcome);
    }
}

fn open_with(profile: Profile, new_profile: bool) -> (TailoringSession, Rc<RefCell<Policy>>) {
    let benchmark = Rc::new(demo_benchmark().unwrap());
    let policy = Rc::new(RefCell::new(Policy::new(Rc::clone(&benchmark), profile)));
    let session = TailoringSession::new(
        Some(Rc::clone(&policy)),
        Some(benchmark),
        new_profile,
        &EditorSettings::default(),
    )
    .unwrap();
    (session, policy)
}

fn open() -> (TailoringSession, Rc<RefCell<Policy>>) {
    open_with(demo_profile(), false)
}

fn node(session: &TailoringSession, item: &str) -> NodeId {
    session.tree().node_for_item(item).unwrap()
}

fn is_selected(policy: &Rc<RefCell<Policy>>, item: &str) -> bool {
    policy.borrow().is_selected(item).unwrap()
}

fn enabled(session: &TailoringSession, item: &str) -> bool {
    session.tree().node(node(session, item)).unwrap().is_enabled()
}

fn checked(session: &TailoringSession, item: &str) -> bool {
    session.tree().node(node(session, item)).unwrap().is_checked()
}

// ============================================================================
// Selection toggles and cancel
// ============================================================================

#[test]
fn test_toggle_then_cancel_restores_selection() {
    let (mut session, policy) = open();
    assert!(!is_selected(&policy, "rule_ssh_idle_timeout"));

    session
        .set_node_checked(node(&session, "rule_ssh_idle_timeout"), true)
        .unwrap();
    assert!(is_selected(&policy, "rule_ssh_idle_timeout"));
    assert_eq!(
        session.history().labels,
        vec!["select 'rule_ssh_idle_timeout'".to_string()]
    );

    let mut host = RecordingHost::answering(true);
    assert!(session.cancel(&mut host).unwrap());
    assert_eq!(host.prompts, 1);
    assert_eq!(
        host.outcome,
        Some(TailoringOutcome {
            new_profile: false,
            changes_confirmed: false
        })
    );
    assert!(!is_selected(&policy, "rule_ssh_idle_timeout"));
    assert!(!checked(&session, "rule_ssh_idle_timeout"));
}

#[test]
fn test_unselect_and_reselect_writes_two_overrides() {
    let (mut session, policy) = open();
    let rule = node(&session, "rule_banner_enabled");

    session.set_node_checked(rule, false).unwrap();
    session.set_node_checked(rule, true).unwrap();

    assert_eq!(session.history().labels.len(), 2);
    assert!(is_selected(&policy, "rule_banner_enabled"));
    assert_eq!(policy.borrow().profile().unwrap().selects().len(), 2);
}

#[test]
fn test_disabled_node_ignores_toggle() {
    let (mut session, policy) = open();
    assert!(!enabled(&session, "rule_disable_telnet"));

    session
        .set_node_checked(node(&session, "rule_disable_telnet"), false)
        .unwrap();
    assert!(!session.can_undo());
    assert!(is_selected(&policy, "rule_disable_telnet"));
}

// ============================================================================
// Profile metadata edits
// ============================================================================

#[test]
fn test_title_keystrokes_merge_into_one_entry() {
    let (mut session, policy) = open();

    for text in ["M", "My", "My Profile"] {
        session.edit_profile_title(text).unwrap();
    }
    assert_eq!(
        session.history().labels,
        vec!["profile title to \"My Profile\"".to_string()]
    );
    assert_eq!(session.window_title(), "Tailoring 'My Profile'");

    assert!(session.undo().unwrap());
    let title = policy.borrow().profile().unwrap().title.clone();
    assert_eq!(title.preferred("en-US"), "Default Profile");
    assert_eq!(session.profile_panel().title(), "Default Profile");
    // refreshing the panel after undo must not record anything
    assert_eq!(session.history().index, 0);
    assert_eq!(session.history().labels.len(), 1);

    assert!(session.redo().unwrap());
    assert_eq!(session.profile_panel().title(), "My Profile");
}

#[test]
fn test_description_label_is_truncated() {
    let (mut session, _policy) = open();
    session
        .edit_profile_description("Hardened profile for internet facing SSH bastions")
        .unwrap();
    assert_eq!(
        session.undo_text().as_deref(),
        Some("profile description to \"Hardened profile for internet fa...\"")
    );
}

#[test]
fn test_title_then_description_do_not_merge() {
    let (mut session, _policy) = open();
    session.edit_profile_title("A").unwrap();
    session.edit_profile_description("B").unwrap();
    session.edit_profile_title("AB").unwrap();
    assert_eq!(session.history().labels.len(), 3);
}

// ============================================================================
// Value edits and input validation
// ============================================================================

#[test]
fn test_boolean_value_validation() {
    let (mut session, policy) = open();
    session
        .select_item(Some(node(&session, "var_ssh_root_login")))
        .unwrap();
    assert_eq!(session.item_panel().value().unwrap().type_label, "(bool)");

    let rejected = session.edit_value("maybe");
    assert!(matches!(rejected, Err(TailoringError::InputRejected { .. })));
    assert!(session.is_open());
    assert!(!session.can_undo());

    session.edit_value("YES").unwrap();
    assert_eq!(policy.borrow().value_of("var_ssh_root_login").unwrap(), "YES");
    assert_eq!(
        session.undo_text().as_deref(),
        Some("set value 'var_ssh_root_login' to 'YES'")
    );
}

#[test]
fn test_boolean_value_typed_keystroke_by_keystroke() {
    let (mut session, policy) = open();
    session
        .select_item(Some(node(&session, "var_ssh_root_login")))
        .unwrap();
    assert_eq!(session.item_panel().value().unwrap().text(), "no");

    // backspace twice, then type "yes"
    for keystroke in ["n", "", "y", "ye"] {
        session.edit_value(keystroke).unwrap();
        assert_eq!(session.item_panel().value().unwrap().text(), keystroke);
        assert_eq!(policy.borrow().value_of("var_ssh_root_login").unwrap(), "no");
    }
    assert!(!session.can_undo());

    session.edit_value("yes").unwrap();
    assert_eq!(policy.borrow().value_of("var_ssh_root_login").unwrap(), "yes");
    assert_eq!(
        session.history().labels,
        vec!["set value 'var_ssh_root_login' to 'yes'".to_string()]
    );

    session.undo().unwrap();
    assert_eq!(session.item_panel().value().unwrap().text(), "no");
}

#[test]
fn test_retyping_stored_value_adds_no_history() {
    let (mut session, policy) = open();
    session
        .select_item(Some(node(&session, "var_ssh_root_login")))
        .unwrap();

    session.edit_value("n").unwrap();
    session.edit_value("no").unwrap();
    assert!(!session.can_undo());
    assert_eq!(policy.borrow().value_of("var_ssh_root_login").unwrap(), "no");
}

#[test]
fn test_number_value_accepts_signed_integers() {
    let (mut session, policy) = open();
    session
        .select_item(Some(node(&session, "var_password_min_len")))
        .unwrap();

    for bad in ["abc", "4.5", "1-"] {
        assert!(matches!(
            session.edit_value(bad),
            Err(TailoringError::InputRejected { .. })
        ));
    }
    assert_eq!(session.item_panel().value().unwrap().text(), "12");

    session.edit_value("1").unwrap();
    session.edit_value("14").unwrap();
    assert_eq!(session.history().labels, vec!["set value 'var_password_min_len' to '14'".to_string()]);

    session.undo().unwrap();
    assert_eq!(policy.borrow().value_of("var_password_min_len").unwrap(), "12");
    assert_eq!(session.item_panel().value().unwrap().text(), "12");

    session.edit_value("-").unwrap();
    session.edit_value("-3").unwrap();
    assert_eq!(policy.borrow().value_of("var_password_min_len").unwrap(), "-3");
    session.edit_value("+5").unwrap();
    assert_eq!(policy.borrow().value_of("var_password_min_len").unwrap(), "+5");
}

#[test]
fn test_expanding_a_stale_node_fails_the_session() {
    let (mut session, _policy) = open();
    let mut elsewhere = DisplayTree::new();
    let mut stale = elsewhere.root();
    for _ in 0..64 {
        stale = elsewhere.insert_child(elsewhere.root(), 0).unwrap();
    }
    assert!(!session.tree().contains(stale));

    assert!(matches!(
        session.set_node_expanded(stale, true),
        Err(TailoringError::UnknownNode(_))
    ));
    assert!(matches!(session.lifecycle(), Lifecycle::Failed(_)));
    assert_eq!(
        session.set_node_expanded(session.tree().root(), false),
        Err(TailoringError::SessionClosed)
    );
}

#[test]
fn test_value_edits_on_different_items_stay_separate() {
    let (mut session, _policy) = open();
    session
        .select_item(Some(node(&session, "var_password_min_len")))
        .unwrap();
    session.edit_value("20").unwrap();
    session
        .select_item(Some(node(&session, "var_banner_text")))
        .unwrap();
    session.edit_value("Go away").unwrap();
    assert_eq!(session.history().labels.len(), 2);
}

#[test]
fn test_selecting_items_is_not_an_edit() {
    let (mut session, _policy) = open();
    for item in ["grp_ssh", "var_banner_text", "rule_ssh_disable_root"] {
        session.select_item(Some(node(&session, item))).unwrap();
    }
    session.select_item(None).unwrap();
    assert_eq!(session.item_panel().title(), "<no item selected>");
    assert!(!session.can_undo());
}

// ============================================================================
// Synchronizer reentrancy
// ============================================================================

#[test]
fn test_group_toggle_records_one_command_and_cascades() {
    let (mut session, _policy) = open();

    session
        .set_node_checked(node(&session, "grp_ssh"), false)
        .unwrap();
    assert_eq!(session.history().labels, vec!["unselect 'grp_ssh'".to_string()]);
    for item in [
        "var_ssh_root_login",
        "rule_ssh_disable_root",
        "grp_ssh_crypto",
        "rule_ssh_strong_ciphers",
    ] {
        assert!(!enabled(&session, item), "{} should be disabled", item);
    }

    session.undo().unwrap();
    assert!(checked(&session, "grp_ssh"));
    assert!(enabled(&session, "rule_ssh_strong_ciphers"));
    // undo re-synchronized the node without creating a new entry
    assert_eq!(session.history().labels.len(), 1);
    assert_eq!(session.history().index, 0);
    assert!(!session.tree().sync_lock().is_held());
}

#[test]
fn test_inner_unchecked_group_stays_disabled_after_outer_reenable() {
    let (mut session, _policy) = open();
    session
        .set_node_checked(node(&session, "grp_ssh"), false)
        .unwrap();
    session
        .set_node_checked(node(&session, "grp_system"), false)
        .unwrap();
    session
        .set_node_checked(node(&session, "grp_system"), true)
        .unwrap();

    assert!(enabled(&session, "grp_ssh"));
    assert!(!enabled(&session, "rule_ssh_disable_root"));
    assert!(!enabled(&session, "rule_ssh_strong_ciphers"));
}

// ============================================================================
// Close flows
// ============================================================================

#[test]
fn test_confirm_keeps_changes_without_prompt() {
    let (mut session, policy) = open();
    session
        .set_node_checked(node(&session, "rule_banner_enabled"), false)
        .unwrap();

    let mut host = RecordingHost::answering(false);
    assert!(session.confirm_and_close(&mut host).unwrap());
    assert_eq!(host.prompts, 0);
    assert_eq!(
        host.outcome,
        Some(TailoringOutcome {
            new_profile: false,
            changes_confirmed: true
        })
    );
    assert!(!is_selected(&policy, "rule_banner_enabled"));
    assert!(matches!(session.lifecycle(), Lifecycle::Closed(_)));
}

#[test]
fn test_declined_prompt_keeps_session_open() {
    let (mut session, policy) = open();
    session.edit_profile_title("Kept").unwrap();

    let mut host = RecordingHost::answering(false);
    assert!(!session.cancel(&mut host).unwrap());
    assert_eq!(host.prompts, 1);
    assert!(host.outcome.is_none());
    assert!(session.is_open());
    assert_eq!(
        policy.borrow().profile().unwrap().title.preferred("en-US"),
        "Kept"
    );
    assert!(session.can_undo());
}

#[test]
fn test_delete_profile_discards_and_flags_new() {
    let (mut session, policy) = open();
    session
        .set_node_checked(node(&session, "rule_ssh_idle_timeout"), true)
        .unwrap();

    let mut declined = RecordingHost::answering(false);
    assert!(!session.delete_profile_and_discard(&mut declined).unwrap());
    assert!(!session.new_profile());

    let mut host = RecordingHost::answering(true);
    assert!(session.delete_profile_and_discard(&mut host).unwrap());
    assert_eq!(
        host.outcome,
        Some(TailoringOutcome {
            new_profile: true,
            changes_confirmed: false
        })
    );
    assert!(!is_selected(&policy, "rule_ssh_idle_timeout"));
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn test_profile_without_title_text_fails_the_session() {
    let profile = Profile::new("p", TextSet::new(), TextSet::new());
    let (mut session, _policy) = open_with(profile, true);

    assert_eq!(
        session.edit_profile_title("New title"),
        Err(TailoringError::NoEditableText { field: "title" })
    );
    assert!(matches!(session.lifecycle(), Lifecycle::Failed(_)));
    assert_eq!(
        session.set_node_checked(node(&session, "rule_banner_enabled"), false),
        Err(TailoringError::SessionClosed)
    );

    let mut host = RecordingHost::answering(true);
    session.abort(&mut host);
    assert_eq!(host.prompts, 0);
    assert_eq!(
        host.outcome,
        Some(TailoringOutcome {
            new_profile: true,
            changes_confirmed: false
        })
    );
}

#[test]
fn test_policy_on_other_benchmark_is_refused() {
    let benchmark = Rc::new(demo_benchmark().unwrap());
    let other = Rc::new(demo_benchmark().unwrap());
    let policy = Rc::new(RefCell::new(Policy::new(other, demo_profile())));
    let result = TailoringSession::new(
        Some(policy),
        Some(benchmark),
        false,
        &EditorSettings::default(),
    );
    assert!(matches!(result, Err(TailoringError::BenchmarkMismatch(_))));
}
