use super::*;

fn choices(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn line_with_history(entries: &[&str]) -> CommandLine {
    let mut line = CommandLine::new();
    for entry in entries {
        line.set_text(*entry);
        line.submit().expect("seed command should submit");
    }
    line
}

#[test]
fn starts_empty_and_idle() {
    let line = CommandLine::new();
    assert!(line.text().is_empty());
    assert!(line.history().is_empty());
    assert_eq!(line.history_cursor(), HistoryCursor::Idle);
    assert!(line.suggestions().is_empty());
    assert_eq!(line.suggestion_cursor(), SuggestionCursor::Unselected);
}

#[test]
fn up_walks_history_newest_first_and_stops_at_oldest() {
    let mut line = line_with_history(&["look", "go north", "take torch"]);

    assert_eq!(line.on_key(LineKey::Up), KeyOutcome::Consumed);
    assert_eq!(line.text(), "take torch");
    assert_eq!(line.history_cursor(), HistoryCursor::Browsing(2));

    line.on_key(LineKey::Up);
    assert_eq!(line.text(), "go north");
    line.on_key(LineKey::Up);
    assert_eq!(line.text(), "look");
    line.on_key(LineKey::Up);
    assert_eq!(line.text(), "look");
    assert_eq!(line.history_cursor(), HistoryCursor::Browsing(0));
}

#[test]
fn up_with_empty_history_is_ignored() {
    let mut line = CommandLine::new();
    assert_eq!(line.on_key(LineKey::Up), KeyOutcome::Ignored);
    assert!(line.text().is_empty());
    assert_eq!(line.history_cursor(), HistoryCursor::Idle);
}

#[test]
fn down_while_idle_without_suggestions_is_ignored() {
    let mut line = line_with_history(&["look"]);
    assert_eq!(line.on_key(LineKey::Down), KeyOutcome::Ignored);
    assert!(line.text().is_empty());
}

#[test]
fn history_round_trip_scenario() {
    let mut line = line_with_history(&["go north", "take torch"]);

    line.on_key(LineKey::Up);
    line.on_key(LineKey::Up);
    assert_eq!(line.text(), "go north");

    line.on_key(LineKey::Down);
    assert_eq!(line.text(), "take torch");

    line.on_key(LineKey::Down);
    assert!(line.text().is_empty());
    assert_eq!(line.history_cursor(), HistoryCursor::Idle);
}

#[test]
fn typing_resets_history_browsing() {
    let mut line = line_with_history(&["go north"]);
    line.on_key(LineKey::Up);
    assert!(line.history_cursor().is_browsing());

    line.insert_char('!');
    assert_eq!(line.text(), "go north!");
    assert_eq!(line.history_cursor(), HistoryCursor::Idle);
}

#[test]
fn suggestions_are_case_insensitive_prefix_matches_in_order() {
    let mut line = CommandLine::new();
    line.set_choices(choices(&["Go North (Cave)", "take torch", "go south"]));
    line.set_text("GO");
    assert_eq!(
        line.suggestions(),
        ["Go North (Cave)".to_string(), "go south".to_string()]
    );
}

#[test]
fn suggestions_are_empty_for_empty_text() {
    let mut line = CommandLine::new();
    line.set_choices(choices(&["go north", "take torch"]));
    line.set_text("");
    assert!(line.suggestions().is_empty());

    line.set_text("t");
    assert_eq!(line.suggestions().len(), 1);
    line.backspace();
    assert!(line.suggestions().is_empty());
}

#[test]
fn new_choice_set_refilters_current_text() {
    let mut line = CommandLine::new();
    line.set_choices(choices(&["go north"]));
    line.set_text("ta");
    assert!(line.suggestions().is_empty());

    line.set_choices(choices(&["take torch", "talk to hermit", "go west"]));
    assert_eq!(
        line.suggestions(),
        ["take torch".to_string(), "talk to hermit".to_string()]
    );
    assert_eq!(line.suggestion_cursor(), SuggestionCursor::Unselected);
}

#[test]
fn tab_completion_scenario() {
    let mut line = CommandLine::new();
    line.set_choices(choices(&["go north", "go south", "take torch"]));
    for c in "go".chars() {
        line.insert_char(c);
    }
    assert_eq!(line.suggestions(), ["go north".to_string(), "go south".to_string()]);

    assert_eq!(line.on_key(LineKey::Tab), KeyOutcome::Consumed);
    assert_eq!(line.text(), "go north");
    assert!(line.suggestions().is_empty());
    assert_eq!(line.suggestion_cursor(), SuggestionCursor::Unselected);
    assert_eq!(line.buffer().caret(), "go north".chars().count());
}

#[test]
fn tab_without_suggestions_is_ignored() {
    let mut line = CommandLine::new();
    line.set_text("xyz");
    assert_eq!(line.on_key(LineKey::Tab), KeyOutcome::Ignored);
    assert_eq!(line.text(), "xyz");
}

#[test]
fn down_and_up_cycle_through_suggestions_with_wraparound() {
    let mut line = CommandLine::new();
    line.set_choices(choices(&["go north", "go south", "go east"]));
    line.set_text("go");

    line.on_key(LineKey::Down);
    assert_eq!(line.suggestion_cursor(), SuggestionCursor::Selected(0));
    line.on_key(LineKey::Down);
    line.on_key(LineKey::Down);
    assert_eq!(line.suggestion_cursor(), SuggestionCursor::Selected(2));
    line.on_key(LineKey::Down);
    assert_eq!(line.suggestion_cursor(), SuggestionCursor::Selected(0));

    line.on_key(LineKey::Up);
    assert_eq!(line.suggestion_cursor(), SuggestionCursor::Selected(2));

    line.on_key(LineKey::Tab);
    assert_eq!(line.text(), "go east");
}

#[test]
fn up_from_unselected_selects_last_suggestion() {
    let mut line = CommandLine::new();
    line.set_choices(choices(&["go north", "go south"]));
    line.set_text("go");
    line.on_key(LineKey::Up);
    assert_eq!(line.suggestion_cursor(), SuggestionCursor::Selected(1));
}

#[test]
fn suggestion_navigation_still_works_after_commands_were_submitted() {
    let mut line = line_with_history(&["look"]);
    line.set_choices(choices(&["go north", "go south"]));
    line.set_text("go");

    line.on_key(LineKey::Down);
    assert_eq!(line.suggestion_cursor(), SuggestionCursor::Selected(0));
    assert_eq!(line.text(), "go");
    line.on_key(LineKey::Up);
    assert_eq!(line.suggestion_cursor(), SuggestionCursor::Selected(1));
    assert_eq!(line.history_cursor(), HistoryCursor::Idle);
}

#[test]
fn history_browsing_wins_over_matching_suggestions() {
    let mut line = line_with_history(&["go north", "go south"]);
    line.set_choices(choices(&["go north", "go south"]));

    line.on_key(LineKey::Up);
    assert_eq!(line.text(), "go south");
    assert_eq!(line.suggestions(), ["go south".to_string()]);

    line.on_key(LineKey::Up);
    assert_eq!(line.text(), "go north");
    assert_eq!(line.history_cursor(), HistoryCursor::Browsing(0));
}

#[test]
fn accepting_a_suggestion_ends_history_browsing() {
    let mut line = line_with_history(&["go"]);
    line.set_choices(choices(&["go north", "look"]));

    line.on_key(LineKey::Up);
    assert_eq!(line.text(), "go");
    assert!(line.history_cursor().is_browsing());

    assert_eq!(line.on_key(LineKey::Tab), KeyOutcome::Consumed);
    assert_eq!(line.text(), "go north");
    assert_eq!(line.history_cursor(), HistoryCursor::Idle);

    line.on_key(LineKey::Down);
    assert_eq!(line.text(), "go north");
}

#[test]
fn pick_suggestion_accepts_given_index() {
    let mut line = CommandLine::new();
    line.set_choices(choices(&["go north", "go south"]));
    line.set_text("go");
    assert!(line.pick_suggestion(1));
    assert_eq!(line.text(), "go south");
    assert!(line.suggestions().is_empty());
}

#[test]
fn pick_suggestion_out_of_range_is_noop() {
    let mut line = CommandLine::new();
    line.set_choices(choices(&["go north"]));
    line.set_text("go");
    assert!(!line.pick_suggestion(3));
    assert_eq!(line.text(), "go");
    assert_eq!(line.suggestions().len(), 1);
}

#[test]
fn whitespace_submit_is_rejected_without_touching_history() {
    let mut line = line_with_history(&["look"]);
    line.set_text(" ");
    assert_eq!(line.submit(), None);
    assert_eq!(line.history(), ["look".to_string()]);
    assert_eq!(line.text(), " ");
}

#[test]
fn submit_trims_records_and_clears() {
    let mut line = line_with_history(&["look"]);
    line.on_key(LineKey::Up);
    line.set_text("  take torch  ");
    assert_eq!(line.submit().as_deref(), Some("take torch"));
    assert_eq!(line.history(), ["look".to_string(), "take torch".to_string()]);
    assert!(line.text().is_empty());
    assert_eq!(line.history_cursor(), HistoryCursor::Idle);
}

#[test]
fn history_keeps_duplicates() {
    let line = line_with_history(&["look", "look"]);
    assert_eq!(line.history().len(), 2);
}

#[test]
fn history_limit_drops_oldest_entries() {
    let mut line = CommandLine::with_history_limit(2);
    for command in ["one", "two", "three"] {
        line.set_text(command);
        line.submit();
    }
    assert_eq!(line.history(), ["two".to_string(), "three".to_string()]);
}

#[test]
fn conversation_mode_targets_separate_buffer() {
    let mut line = CommandLine::new();
    line.set_text("go north");
    line.set_conversation_mode(true);
    for c in "hello".chars() {
        line.insert_char(c);
    }
    assert_eq!(line.conversation_text(), "hello");
    assert_eq!(line.text(), "go north");

    assert_eq!(line.submit().as_deref(), Some("hello"));
    assert!(line.conversation_text().is_empty());
    assert_eq!(line.text(), "go north");
    assert_eq!(line.history(), ["hello".to_string()]);
}

#[test]
fn conversation_mode_ignores_navigation_keys() {
    let mut line = line_with_history(&["look"]);
    line.set_conversation_mode(true);
    assert_eq!(line.on_key(LineKey::Up), KeyOutcome::Ignored);
    assert!(line.text().is_empty());
}

#[test]
fn submit_direct_records_without_touching_buffer() {
    let mut line = CommandLine::new();
    line.set_text("go");
    assert_eq!(line.submit_direct("take torch").as_deref(), Some("take torch"));
    assert_eq!(line.text(), "go");
    assert_eq!(line.history(), ["take torch".to_string()]);
    assert_eq!(line.submit_direct("   "), None);
}

#[test]
fn caret_editing_handles_multibyte_text() {
    let mut line = CommandLine::new();
    line.set_text("café");
    line.move_caret_left();
    line.backspace();
    assert_eq!(line.text(), "caé");
    line.move_caret_home();
    line.delete();
    assert_eq!(line.text(), "aé");
    line.move_caret_end();
    line.insert_char('!');
    assert_eq!(line.text(), "aé!");
}

#[test]
fn filter_choices_matches_free_function_contract() {
    let set = choices(&["Talk to Hermit", "take torch"]);
    assert_eq!(filter_choices(&set, "ta"), set);
    assert!(filter_choices(&set, "").is_empty());
    assert!(filter_choices(&set, "x").is_empty());
}
