use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use formstate::prelude::*;
use futures::channel::oneshot;

fn form() -> Form {
    Form::new(FormOptions::new().registry(ValidatorRegistry::with_builtins()))
}

/// Install a hook whose first call waits for the returned sender.
fn gated(control: &Control) -> oneshot::Sender<Errors> {
    let (tx, rx) = oneshot::channel::<Errors>();
    let slot = Arc::new(Mutex::new(Some(rx)));
    control.set_async_validator(move |_, _| {
        let rx = slot.lock().unwrap().take();
        async move {
            match rx {
                Some(rx) => rx.await.unwrap_or_default(),
                None => Errors::new(),
            }
        }
    });
    tx
}

// ============================================================================
// Pending
// ============================================================================

#[tokio::test]
async fn test_pending_while_hook_runs() {
    let form = form();
    let name = Control::new(&form, "username", Rules::new().required()).unwrap();
    form.set_value("username", "taken").unwrap();
    let tx = gated(&name);

    let validation = form.validate_control_async("username");
    let observe = async {
        tokio::task::yield_now().await;
        assert_eq!(form.status_of("username"), Some(Status::Pending));
        assert!(name.is_pending());
        assert!(form.is_pending());
        assert!(!form.is_invalid());
        tx.send(Errors::single("notUnique")).unwrap();
    };
    let (status, ()) = tokio::join!(validation, observe);

    assert_eq!(status.unwrap(), Status::Invalid);
    assert_eq!(name.errors(), Errors::from(["notUnique"]));
    assert!(form.is_invalid());
}

#[tokio::test]
async fn test_hook_result_becomes_valid() {
    let form = form();
    let name = Control::new(&form, "username", Rules::new().required()).unwrap();
    name.set_async_validator(|value, _form| async move {
        if value == Value::from("admin") {
            Errors::single("reserved")
        } else {
            Errors::new()
        }
    });

    assert_eq!(name.on_change_async("alice").await.unwrap(), Status::Valid);
    assert_eq!(name.on_change_async("admin").await.unwrap(), Status::Invalid);
    assert_eq!(name.errors(), Errors::from(["reserved"]));
}

#[tokio::test]
async fn test_hook_skipped_when_sync_rules_fail() {
    let form = form();
    let name = Control::new(&form, "username", Rules::new().required()).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    name.set_async_validator(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Errors::new() }
    });

    assert_eq!(name.on_change_async("").await.unwrap(), Status::Invalid);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(name.errors(), Errors::from(["required"]));

    name.on_change_async("x").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sync_paths_ignore_hook() {
    let form = form();
    let name = Control::new(&form, "username", Rules::new().required()).unwrap();
    name.set_async_validator(|_, _| async { Errors::single("never") });

    name.on_change("x").unwrap();
    assert!(name.is_valid());

    name.clear_async_validator();
    assert_eq!(name.on_change_async("y").await.unwrap(), Status::Valid);
}

#[tokio::test]
async fn test_hook_sees_form() {
    let form = form();
    let _email = Control::new(&form, "email", Rules::new()).unwrap();
    let confirm = Control::new(&form, "confirm", Rules::new().required()).unwrap();
    confirm.set_async_validator(|value, form| async move {
        if form.value("email") == Some(value) {
            Errors::new()
        } else {
            Errors::single("mismatch")
        }
    });

    form.set_value("email", "a@b.c").unwrap();
    assert_eq!(confirm.on_change_async("a@b.c").await.unwrap(), Status::Valid);
    assert_eq!(confirm.on_change_async("x@y.z").await.unwrap(), Status::Invalid);
}

// ============================================================================
// Staleness
// ============================================================================

#[tokio::test]
async fn test_stale_result_is_discarded() {
    let form = form();
    let name = Control::new(&form, "username", Rules::new().required()).unwrap();
    let tx = gated(&name);

    let first = name.on_change_async("a");
    let interleave = async {
        tokio::task::yield_now().await;
        assert!(name.is_pending());
        name.on_change("ab").unwrap();
        tx.send(Errors::single("notUnique")).unwrap();
    };
    let (first, ()) = tokio::join!(first, interleave);

    assert_eq!(first.unwrap(), Status::Valid);
    assert_eq!(form.value("username"), Some(Value::from("ab")));
    assert_eq!(form.errors_of("username"), Some(Errors::new()));
}

#[tokio::test]
async fn test_result_for_removed_field_is_discarded() {
    let form = form();
    let name = Control::new(&form, "username", Rules::new().required()).unwrap();
    form.set_value("username", "bob").unwrap();
    let tx = gated(&name);

    let validation = form.validate_control_async("username");
    let remove = async {
        tokio::task::yield_now().await;
        form.remove_control("username").unwrap();
        tx.send(Errors::single("notUnique")).unwrap();
    };
    let (status, ()) = tokio::join!(validation, remove);

    assert!(status.is_ok());
    assert_eq!(form.status_of("username"), None);
    assert_eq!(form.errors_of("username"), None);
}

#[tokio::test]
async fn test_result_for_remounted_field_is_discarded() {
    let form = form();
    let old = Control::new(&form, "username", Rules::new().required()).unwrap();
    form.set_value("username", "bob").unwrap();
    form.validate_control("username").unwrap();
    let tx = gated(&old);

    let validation = form.validate_control_async("username");
    let remount = async {
        tokio::task::yield_now().await;
        form.remove_control("username").unwrap();

        let fresh = Control::new(&form, "username", Rules::new()).unwrap();
        form.set_value("username", "alice").unwrap();
        form.validate_control("username").unwrap();
        assert!(fresh.is_valid());

        tx.send(Errors::single("notUnique")).unwrap();
        fresh
    };
    let (status, fresh) = tokio::join!(validation, remount);

    assert!(status.is_ok());
    assert_eq!(form.status_of("username"), Some(Status::Valid));
    assert_eq!(form.errors_of("username"), Some(Errors::new()));
    assert!(fresh.errors().is_empty());
}

#[tokio::test]
async fn test_result_for_untouched_remount_is_discarded() {
    let form = form();
    let old = Control::new(&form, "username", Rules::new()).unwrap();
    let tx = gated(&old);

    let validation = form.validate_control_async("username");
    let remount = async {
        tokio::task::yield_now().await;
        old.detach();
        let fresh = Control::new(&form, "username", Rules::new()).unwrap();
        tx.send(Errors::single("notUnique")).unwrap();
        fresh
    };
    let (_, fresh) = tokio::join!(validation, remount);

    assert!(fresh.is_init());
    assert_eq!(form.status_of("username"), Some(Status::Init));
    assert_eq!(form.errors_of("username"), Some(Errors::new()));
}

#[tokio::test]
async fn test_set_errors_supersedes_pending_hook() {
    let form = form();
    let name = Control::new(&form, "username", Rules::new().required()).unwrap();
    form.set_value("username", "bob").unwrap();
    let tx = gated(&name);

    let validation = form.validate_control_async("username");
    let inject = async {
        tokio::task::yield_now().await;
        form.set_errors("username", Errors::single("notUnique")).unwrap();
        tx.send(Errors::new()).unwrap();
    };
    let (status, ()) = tokio::join!(validation, inject);

    assert_eq!(status.unwrap(), Status::Invalid);
    assert_eq!(name.errors(), Errors::from(["notUnique"]));
}

#[tokio::test]
async fn test_async_on_unknown_field() {
    let form = form();
    assert!(matches!(
        form.validate_control_async("ghost").await,
        Err(FormError::NotFound { .. })
    ));

    form.set_value_async("ghost", Value::from("x")).await.unwrap();
    assert_eq!(form.value("ghost"), Some(Value::from("x")));
}

// ============================================================================
// Submit
// ============================================================================

#[tokio::test]
async fn test_submit_async_runs_hooks_for_init_fields() {
    let reported = Arc::new(Mutex::new(None));
    let sink = reported.clone();
    let form = Form::new(
        FormOptions::new()
            .registry(ValidatorRegistry::with_builtins())
            .default_value([("username", "admin")])
            .on_invalid_submit(move |errors, _| *sink.lock().unwrap() = Some(errors.clone())),
    );
    let city = Control::new(&form, "city", Rules::new().required()).unwrap();
    let name = Control::new(&form, "username", Rules::new().required()).unwrap();
    name.set_async_validator(|_, _| async { Errors::single("reserved") });

    // Registered with a default value, so already validated synchronously.
    assert!(name.is_valid());
    assert_eq!(form.submit_async().await, SubmitOutcome::Invalid);
    assert!(city.is_invalid());

    let reported = reported.lock().unwrap().clone().unwrap();
    assert_eq!(reported["city"], Errors::from(["required"]));
    assert_eq!(reported["username"], Errors::new());
}

#[tokio::test]
async fn test_submit_async_awaits_pending_hook() {
    let form = form();
    let name = Control::new(&form, "username", Rules::new()).unwrap();
    name.set_async_validator(|_, _| async { Errors::single("reserved") });

    assert_eq!(form.submit_async().await, SubmitOutcome::Invalid);
    assert!(!form.is_pending());
    assert_eq!(name.errors(), Errors::from(["reserved"]));
    assert!(form.is_submitted());
}
