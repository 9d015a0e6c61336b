//! Signup form walkthrough.
//!
//! Run with: cargo run --example signup

use std::time::Duration;

use formstate::prelude::*;
use simplelog::{Config, LevelFilter, SimpleLogger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());

    let form = Form::new(
        FormOptions::new()
            .default_value([("country", "NL")])
            .on_valid_submit(|value| {
                let json = serde_json::to_string(value).unwrap_or_default();
                println!("Submitted: {}", json);
            })
            .on_invalid_submit(|errors, _| {
                for (field, errors) in errors.iter().filter(|(_, e)| !e.is_empty()) {
                    println!("  {}: {}", field, errors);
                }
            }),
    );

    let username = Control::new(&form, "username", Rules::new().required().min_length(3))?;
    let email = Control::new(&form, "email", Rules::new().required().email())?;
    let password = Control::new(&form, "password", Rules::new().required().min_length(8))?;
    let confirm = Control::new(
        &form,
        "confirm",
        Rules::new().required().equal_to_control("password"),
    )?;
    let _country = Control::new(&form, "country", Rules::new().try_pattern("^[A-Z]{2}$")?)?;

    username.set_async_validator(|value, _form| async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        match value.as_str() {
            Some("admin") | Some("root") => Errors::single("notUnique"),
            _ => Errors::new(),
        }
    });

    println!("Submitting empty form:");
    form.submit_async().await;

    username.mark_as_touched();
    println!("username 'admin' -> {}", username.on_change_async("admin").await?);
    println!("username 'alice' -> {}", username.on_change_async("alice").await?);

    email.on_change("alice@example")?;
    println!("email -> {} [{}]", email.status(), email.errors());
    email.on_change("alice@example.com")?;

    password.on_change("correct horse")?;
    confirm.on_change("correct horse")?;

    println!("Submitting filled form:");
    let outcome = form.submit_async().await;
    println!("Outcome: {:?}, submitted {} times", outcome, form.submit_count());

    Ok(())
}
