// Unit tests for user-roster
// These tests drive the controller and data types through the public API

#[cfg(test)]
mod form_tests {
    use user_roster::app::{FormField, FormState};

    #[test]
    fn completeness_checks_presence_only() {
        let mut form = FormState::default();
        assert!(form.is_empty());
        assert!(!form.is_complete());

        form.name = "Alice".to_string();
        form.email = "a@x.com".to_string();
        assert!(!form.is_complete());

        form.age = "30".to_string();
        assert!(form.is_complete());

        // Whitespace counts as present; only empty strings block a submit
        form.age = " ".to_string();
        assert!(form.is_complete());
    }

    #[test]
    fn clear_resets_all_fields() {
        let mut form = FormState {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            age: "30".to_string(),
        };
        form.clear();
        assert!(form.is_empty());
    }

    #[test]
    fn focus_cycles_through_all_fields() {
        assert_eq!(FormField::Name.next(), FormField::Email);
        assert_eq!(FormField::Email.next(), FormField::Age);
        assert_eq!(FormField::Age.next(), FormField::Name);

        assert_eq!(FormField::Name.prev(), FormField::Age);
        assert_eq!(FormField::Age.prev(), FormField::Email);
        assert_eq!(FormField::Email.prev(), FormField::Name);
    }

    #[test]
    fn field_mut_targets_the_requested_field() {
        let mut form = FormState::default();
        form.field_mut(FormField::Email).push_str("a@x.com");
        assert_eq!(form.email, "a@x.com");
        assert!(form.name.is_empty());
        assert_eq!(form.field(FormField::Email), "a@x.com");
    }
}

#[cfg(test)]
mod controller_tests {
    use std::sync::mpsc::{self, Receiver};
    use user_roster::api::worker::{ApiEvent, ApiRequest};
    use user_roster::api::{UserDraft, UserId, UserRecord};
    use user_roster::app::keymap::Keymap;
    use user_roster::app::{
        AppState, FormField, FormMode, FormState, InputMode, ModalState, Theme,
    };
    use user_roster::error::ApiError;

    fn test_state() -> (AppState, Receiver<ApiRequest>) {
        let (tx, rx) = mpsc::channel();
        let app = AppState {
            records: vec![],
            form: FormState::default(),
            mode: FormMode::Creating,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            form_focus: FormField::Name,
            modal: None,
            status: None,
            theme: Theme::dark(),
            keymap: Keymap::default(),
            requests: tx,
            issued_seq: 0,
            applied_seq: 0,
        };
        (app, rx)
    }

    fn record(id: &str, name: &str, email: &str, age: i64) -> UserRecord {
        UserRecord {
            id: UserId::new(id),
            name: name.to_string(),
            email: email.to_string(),
            age,
        }
    }

    fn filled_form() -> FormState {
        FormState {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            age: "30".to_string(),
        }
    }

    #[test]
    fn submit_with_missing_field_issues_no_request() {
        let (mut app, rx) = test_state();
        app.form.name = "Alice".to_string();
        app.form.age = "30".to_string(); // email left empty
        let before = app.form.clone();

        app.submit_form();

        assert!(rx.try_recv().is_err());
        assert_eq!(app.form, before);
        assert!(matches!(app.modal, Some(ModalState::Info { .. })));
        assert_eq!(app.input_mode, InputMode::Modal);
    }

    #[test]
    fn submit_in_create_mode_posts_the_draft() {
        let (mut app, rx) = test_state();
        app.form = filled_form();

        app.submit_form();

        assert_eq!(
            rx.try_recv().expect("one request"),
            ApiRequest::Create {
                draft: UserDraft {
                    name: "Alice".to_string(),
                    email: "a@x.com".to_string(),
                    age: "30".to_string(),
                }
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn submit_in_edit_mode_updates_with_the_id() {
        let (mut app, rx) = test_state();
        app.form = filled_form();
        app.mode = FormMode::Editing(UserId::new("7"));

        app.submit_form();

        match rx.try_recv().expect("one request") {
            ApiRequest::Update { id, draft } => {
                assert_eq!(id, UserId::new("7"));
                assert_eq!(draft.name, "Alice");
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn create_success_clears_form_and_refreshes_once() {
        let (mut app, rx) = test_state();
        app.form = filled_form();

        app.apply_event(ApiEvent::Created { outcome: Ok(()) });

        assert!(app.form.is_empty());
        assert_eq!(app.mode, FormMode::Creating);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(rx.try_recv().expect("refresh"), ApiRequest::List { seq: 1 });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn update_success_returns_to_create_mode() {
        let (mut app, rx) = test_state();
        app.form = filled_form();
        app.mode = FormMode::Editing(UserId::new("7"));

        app.apply_event(ApiEvent::Updated {
            id: UserId::new("7"),
            outcome: Ok(()),
        });

        assert!(app.form.is_empty());
        assert_eq!(app.mode, FormMode::Creating);
        assert_eq!(app.status.as_deref(), Some("user updated"));
        assert_eq!(rx.try_recv().expect("refresh"), ApiRequest::List { seq: 1 });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn update_failure_keeps_form_and_edit_target() {
        let (mut app, rx) = test_state();
        app.form = filled_form();
        app.mode = FormMode::Editing(UserId::new("7"));

        app.apply_event(ApiEvent::Updated {
            id: UserId::new("7"),
            outcome: Err(ApiError::http(500, "boom")),
        });

        assert_eq!(app.form, filled_form());
        assert_eq!(app.mode, FormMode::Editing(UserId::new("7")));
        assert!(matches!(app.modal, Some(ModalState::Info { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn fetch_success_enters_edit_mode_with_record_fields() {
        let (mut app, _rx) = test_state();

        app.apply_event(ApiEvent::Fetched {
            id: UserId::new("9"),
            outcome: Ok(record("9", "Bob", "b@x.com", 41)),
        });

        assert_eq!(app.form.name, "Bob");
        assert_eq!(app.form.email, "b@x.com");
        assert_eq!(app.form.age, "41");
        assert_eq!(app.mode, FormMode::Editing(UserId::new("9")));
        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(app.form_focus, FormField::Name);
    }

    #[test]
    fn fetch_failure_changes_nothing_but_notifies() {
        let (mut app, rx) = test_state();
        app.records = vec![record("1", "Bob", "b@x.com", 41)];

        app.apply_event(ApiEvent::Fetched {
            id: UserId::new("1"),
            outcome: Err(ApiError::http(404, "gone")),
        });

        assert!(app.form.is_empty());
        assert_eq!(app.mode, FormMode::Creating);
        assert_eq!(app.records.len(), 1);
        assert!(matches!(app.modal, Some(ModalState::Info { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn begin_edit_requests_the_selected_record() {
        let (mut app, rx) = test_state();
        app.records = vec![
            record("1", "Bob", "b@x.com", 41),
            record("2", "Alice", "a@x.com", 30),
        ];
        app.selected_index = 1;

        app.begin_edit();

        assert_eq!(
            rx.try_recv().expect("one request"),
            ApiRequest::Fetch {
                id: UserId::new("2")
            }
        );
    }

    #[test]
    fn begin_edit_with_no_records_is_a_noop() {
        let (mut app, rx) = test_state();
        app.begin_edit();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn refresh_sequences_increase_monotonically() {
        let (mut app, rx) = test_state();
        app.request_refresh();
        app.request_refresh();
        assert_eq!(rx.try_recv().unwrap(), ApiRequest::List { seq: 1 });
        assert_eq!(rx.try_recv().unwrap(), ApiRequest::List { seq: 2 });
    }

    #[test]
    fn stale_list_responses_are_discarded() {
        let (mut app, _rx) = test_state();
        app.applied_seq = 5;
        app.records = vec![record("1", "Bob", "b@x.com", 41)];

        app.apply_event(ApiEvent::Listed {
            seq: 3,
            outcome: Ok(vec![record("2", "Alice", "a@x.com", 30)]),
        });
        assert_eq!(app.records[0].name, "Bob");
        assert_eq!(app.applied_seq, 5);

        app.apply_event(ApiEvent::Listed {
            seq: 6,
            outcome: Ok(vec![record("2", "Alice", "a@x.com", 30)]),
        });
        assert_eq!(app.records[0].name, "Alice");
        assert_eq!(app.applied_seq, 6);
    }

    #[test]
    fn failed_list_leaves_snapshot_unchanged() {
        let (mut app, _rx) = test_state();
        app.records = vec![record("1", "Bob", "b@x.com", 41)];

        app.apply_event(ApiEvent::Listed {
            seq: 1,
            outcome: Err(ApiError::transport("connection refused")),
        });

        assert_eq!(app.records.len(), 1);
        assert_eq!(app.applied_seq, 0);
        assert!(app.status.as_deref().unwrap_or("").contains("refresh failed"));
    }

    #[test]
    fn list_replaces_wholesale_and_clamps_selection() {
        let (mut app, _rx) = test_state();
        app.records = vec![
            record("1", "a", "a@x.com", 1),
            record("2", "b", "b@x.com", 2),
            record("3", "c", "c@x.com", 3),
        ];
        app.selected_index = 2;

        app.apply_event(ApiEvent::Listed {
            seq: 1,
            outcome: Ok(vec![record("9", "z", "z@x.com", 9)]),
        });

        assert_eq!(app.records.len(), 1);
        assert_eq!(app.records[0].id, UserId::new("9"));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn confirm_delete_opens_modal_without_sending() {
        let (mut app, rx) = test_state();
        app.records = vec![record("1", "Bob", "b@x.com", 41)];

        app.confirm_delete();

        match &app.modal {
            Some(ModalState::ConfirmDelete { id, selected, .. }) => {
                assert_eq!(*id, UserId::new("1"));
                assert_eq!(*selected, 1); // defaults to "No"
            }
            other => panic!("expected confirm modal, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn delete_success_triggers_exactly_one_refresh() {
        let (mut app, rx) = test_state();

        app.apply_event(ApiEvent::Deleted {
            id: UserId::new("1"),
            outcome: Ok(()),
        });

        assert_eq!(app.status.as_deref(), Some("user deleted"));
        assert_eq!(rx.try_recv().expect("refresh"), ApiRequest::List { seq: 1 });
        assert!(rx.try_recv().is_err());
    }
}

#[cfg(test)]
mod key_handling_tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::mpsc::{self, Receiver};
    use user_roster::api::worker::ApiRequest;
    use user_roster::api::{UserId, UserRecord};
    use user_roster::app::keymap::Keymap;
    use user_roster::app::update::{handle_form_key, handle_modal_key, handle_normal_key};
    use user_roster::app::{
        AppState, FormField, FormMode, FormState, InputMode, ModalState, Theme,
    };

    fn test_state() -> (AppState, Receiver<ApiRequest>) {
        let (tx, rx) = mpsc::channel();
        let app = AppState {
            records: vec![UserRecord {
                id: UserId::new("1"),
                name: "Bob".to_string(),
                email: "b@x.com".to_string(),
                age: 41,
            }],
            form: FormState::default(),
            mode: FormMode::Creating,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            form_focus: FormField::Name,
            modal: None,
            status: None,
            theme: Theme::dark(),
            keymap: Keymap::default(),
            requests: tx,
            issued_seq: 0,
            applied_seq: 0,
        };
        (app, rx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits_from_normal_mode() {
        let (mut app, _rx) = test_state();
        assert!(!handle_normal_key(&mut app, &press(KeyCode::Char('q'))));
    }

    #[test]
    fn enter_in_normal_mode_begins_edit() {
        let (mut app, rx) = test_state();
        assert!(handle_normal_key(&mut app, &press(KeyCode::Enter)));
        assert_eq!(
            rx.try_recv().expect("one request"),
            ApiRequest::Fetch {
                id: UserId::new("1")
            }
        );
    }

    #[test]
    fn n_opens_an_empty_create_form() {
        let (mut app, _rx) = test_state();
        app.form.name = "left over".to_string();
        assert!(handle_normal_key(&mut app, &press(KeyCode::Char('n'))));
        assert!(app.form.is_empty());
        assert_eq!(app.mode, FormMode::Creating);
        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(app.form_focus, FormField::Name);
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let (mut app, _rx) = test_state();
        app.input_mode = InputMode::Form;

        for c in "Ana".chars() {
            handle_form_key(&mut app, KeyCode::Char(c));
        }
        handle_form_key(&mut app, KeyCode::Tab);
        for c in "a@x.com".chars() {
            handle_form_key(&mut app, KeyCode::Char(c));
        }
        handle_form_key(&mut app, KeyCode::Tab);
        handle_form_key(&mut app, KeyCode::Char('9'));
        handle_form_key(&mut app, KeyCode::Backspace);
        handle_form_key(&mut app, KeyCode::Char('8'));

        assert_eq!(app.form.name, "Ana");
        assert_eq!(app.form.email, "a@x.com");
        assert_eq!(app.form.age, "8");
    }

    #[test]
    fn esc_leaves_the_form_without_discarding_it() {
        let (mut app, _rx) = test_state();
        app.input_mode = InputMode::Form;
        app.form.name = "Ana".to_string();

        handle_form_key(&mut app, KeyCode::Esc);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.form.name, "Ana");
    }

    #[test]
    fn unconfirmed_delete_sends_nothing() {
        let (mut app, rx) = test_state();
        assert!(handle_normal_key(&mut app, &press(KeyCode::Char('d'))));
        assert!(matches!(
            app.modal,
            Some(ModalState::ConfirmDelete { .. })
        ));

        // Enter on the default "No" answer
        handle_modal_key(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn confirmed_delete_sends_exactly_one_delete() {
        let (mut app, rx) = test_state();
        assert!(handle_normal_key(&mut app, &press(KeyCode::Delete)));

        handle_modal_key(&mut app, KeyCode::Left); // flip to "Yes"
        handle_modal_key(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        assert_eq!(
            rx.try_recv().expect("one request"),
            ApiRequest::Delete {
                id: UserId::new("1")
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn escape_cancels_the_delete_confirmation() {
        let (mut app, rx) = test_state();
        assert!(handle_normal_key(&mut app, &press(KeyCode::Char('d'))));
        handle_modal_key(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn navigation_clamps_to_list_bounds() {
        let (mut app, _rx) = test_state();
        assert!(handle_normal_key(&mut app, &press(KeyCode::Up)));
        assert_eq!(app.selected_index, 0);
        assert!(handle_normal_key(&mut app, &press(KeyCode::Down)));
        assert_eq!(app.selected_index, 0); // only one record
        assert!(handle_normal_key(&mut app, &press(KeyCode::PageDown)));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn help_modal_lists_current_bindings() {
        let (mut app, _rx) = test_state();
        assert!(handle_normal_key(&mut app, &press(KeyCode::Char('?'))));
        match &app.modal {
            Some(ModalState::Info { message }) => {
                assert!(message.contains("Quit"));
                assert!(message.contains("Refresh list"));
            }
            other => panic!("expected info modal, got {:?}", other),
        }
    }
}

#[cfg(test)]
mod app_state_tests {
    use std::sync::mpsc;
    use user_roster::api::worker::ApiRequest;
    use user_roster::app::{AppState, FormMode, InputMode};

    #[test]
    fn new_state_starts_empty_and_fetches_once() {
        let (tx, rx) = mpsc::channel();
        let app = AppState::new(tx);

        assert!(app.form.is_empty());
        assert_eq!(app.mode, FormMode::Creating);
        assert!(matches!(app.input_mode, InputMode::Normal));
        assert!(app.records.is_empty());
        assert_eq!(rx.try_recv().expect("startup fetch"), ApiRequest::List { seq: 1 });
        assert!(rx.try_recv().is_err());
    }
}

#[cfg(test)]
mod error_handling_tests {
    use std::error::Error as _;
    use user_roster::error::{ApiError, Context};

    #[test]
    fn context_wraps_and_chains_errors() {
        let base_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let result: Result<(), std::io::Error> = Err(base_error);

        let with_context = result.with_ctx(|| "Failed to read config file".to_string());

        assert!(with_context.is_err());
        let err = with_context.unwrap_err();
        let err_string = err.to_string();
        assert!(err_string.contains("Failed to read config file"));
        assert!(err_string.contains("file not found"));

        let source = err.source();
        assert!(source.is_some());
        assert!(source.unwrap().to_string().contains("file not found"));
    }

    #[test]
    fn api_error_display_includes_status_when_present() {
        let err = ApiError::http(404, "no such user");
        assert_eq!(err.to_string(), "HTTP 404: no such user");

        let err = ApiError::transport("connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }
}
