use super::context::App;
use anyhow::Result;

pub async fn list(app: &App, year: Option<&str>) -> Result<()> {
    app.require_session().await?;

    match year {
        Some(year) => app.members.select_year(year).await?,
        None => app.members.refresh().await?,
    }

    let year = app.members.selected_year().await;
    let members = app.members.members().await;
    println!(
        "Class of {} ({} members; years: {})",
        year,
        members.len(),
        app.members.class_years().join(", ")
    );
    for member in &members {
        println!(
            "  {:<32} {:<32} {}",
            member.display_name(),
            member.email,
            member.student_id().unwrap_or("-")
        );
    }
    Ok(())
}
