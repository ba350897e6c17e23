use super::context::App;
use anyhow::{Context, Result, bail};
use classroom_core::text::is_email;
use classroom_core::user::User;
use std::io::{self, BufRead, Write};

pub async fn login(app: &App, email: &str, password: Option<String>) -> Result<()> {
    let email = email.trim();
    if !is_email(email) {
        bail!("'{}' is not a valid email address", email);
    }

    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let user = app.session.login(email, &password).await?;
    println!("Signed in as {}", user.display_name());
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn logout(app: &App) -> Result<()> {
    app.session.logout().await?;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    app.require_session().await?;
    let user = app.session.refresh_identity().await?;
    print_profile(&user);
    Ok(())
}

fn print_profile(user: &User) {
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();

    println!("{}", user.display_name());
    println!("  Email:      {}", user.email);
    println!("  Role:       {}", user.role_label());
    println!("  Student ID: {}", or_dash(user.student_id()));
    println!("  Major:      {}", or_dash(user.major()));
    println!("  Year:       {}", or_dash(user.enrollment_year()));
}
