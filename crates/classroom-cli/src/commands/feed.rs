use super::context::App;
use anyhow::{Result, anyhow, bail};
use classroom_core::feed::Post;
use classroom_core::text::{format_timestamp, truncate};

const PREVIEW_CHARS: usize = 280;

pub async fn show(app: &App, limit: Option<usize>) -> Result<()> {
    app.require_session().await?;
    app.feed.fetch_feed().await?;

    let posts = app.feed.posts().await;
    if posts.is_empty() {
        println!("No posts yet");
        return Ok(());
    }
    for post in posts.iter().take(limit.unwrap_or(usize::MAX)) {
        print_post(app, post).await;
    }
    Ok(())
}

async fn print_post(app: &App, post: &Post) {
    let mut marks = Vec::new();
    if app.feed.is_liked_by_me(post).await {
        marks.push("liked");
    }
    if app.feed.can_delete_post(post).await {
        marks.push("yours");
    }
    let marks = if marks.is_empty() {
        String::new()
    } else {
        format!(" ({})", marks.join(", "))
    };

    println!(
        "[{}] {}  {}{}",
        post.id,
        post.created_by.email,
        format_timestamp(&post.created_at),
        marks
    );
    println!("  {}", truncate(&post.content, PREVIEW_CHARS));
    println!(
        "  likes: {}  comments: {}",
        post.like_count(),
        post.comment_count()
    );
    for comment in &post.comments {
        println!(
            "    [{}] {}: {}",
            comment.id, comment.created_by.email, comment.content
        );
    }
    println!();
}

pub async fn post(app: &App, text: &str) -> Result<()> {
    app.require_session().await?;
    if !app.feed.create_post(text).await? {
        bail!("Nothing to post");
    }
    println!("Posted");
    Ok(())
}

pub async fn like(app: &App, post_id: &str) -> Result<()> {
    app.require_session().await?;
    app.feed.fetch_feed().await?;

    let liked = app.feed.toggle_like_by_id(post_id).await?;
    let post = app.feed.post(post_id).await;
    let count = post.map(|p| p.like_count()).unwrap_or_default();
    if liked {
        println!("Liked {} ({} likes)", post_id, count);
    } else {
        println!("Unliked {} ({} likes)", post_id, count);
    }
    Ok(())
}

pub async fn comment(app: &App, post_id: &str, text: &str) -> Result<()> {
    app.require_session().await?;
    app.feed.set_draft(post_id, text).await;
    if !app.feed.submit_draft(post_id).await? {
        bail!("Nothing to comment");
    }
    println!("Commented on {}", post_id);
    Ok(())
}

pub async fn delete_post(app: &App, post_id: &str, confirmed: bool) -> Result<()> {
    app.require_session().await?;
    if !confirmed {
        bail!("Deleting a post cannot be undone; pass --yes to confirm");
    }

    app.feed.fetch_feed().await?;
    let post = app
        .feed
        .post(post_id)
        .await
        .ok_or_else(|| anyhow!("No post with id '{}'", post_id))?;
    if !app.feed.can_delete_post(&post).await {
        bail!("You can only delete your own posts");
    }

    app.feed.delete_post(post_id).await?;
    println!("Deleted post {}", post_id);
    Ok(())
}

pub async fn delete_comment(
    app: &App,
    post_id: &str,
    comment_id: &str,
    confirmed: bool,
) -> Result<()> {
    app.require_session().await?;
    if !confirmed {
        bail!("Deleting a comment cannot be undone; pass --yes to confirm");
    }

    app.feed.fetch_feed().await?;
    let post = app
        .feed
        .post(post_id)
        .await
        .ok_or_else(|| anyhow!("No post with id '{}'", post_id))?;
    let comment = post
        .comment(comment_id)
        .ok_or_else(|| anyhow!("No comment with id '{}' on post '{}'", comment_id, post_id))?;
    if !app.feed.can_delete_comment(comment).await {
        bail!("You can only delete your own comments");
    }

    app.feed.delete_comment(post_id, comment_id).await?;
    println!("Deleted comment {}", comment_id);
    Ok(())
}
