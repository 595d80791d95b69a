//! Terminal rendering of snapshot slices.

use colored::Colorize;
use solaris_core::chat::ChatSession;
use solaris_core::post::Post;
use solaris_core::seed;
use solaris_core::user::User;
use solaris_core::{AppSnapshot, NoticeLevel, Screen};

const DOCK: &str = "[/feed] [/stories] [/compose] [/messages] [/profile]";

pub fn banner() {
    println!("{}", "=== Solaris ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();
}

pub fn help() {
    let lines = [
        ("/login <email> <password>", "Sign in"),
        ("/register <email> <password> <name>", "Create an account"),
        ("/feed /stories /profile /messages /compose", "Switch screen"),
        ("/like <post-id>", "Like or unlike a post"),
        ("/open <session-id>", "Open a conversation"),
        ("/back", "Close the open conversation"),
        ("<text>", "Send to the open conversation"),
        ("/dismiss", "Dismiss the current notice"),
        ("quit", "Exit"),
    ];
    for (usage, description) in lines {
        println!("  {:<44} {}", usage.bright_cyan(), description.bright_black());
    }
}

/// Prints the pending notice, if any.
pub fn notice(snapshot: &AppSnapshot) {
    if let Some(notice) = &snapshot.notice {
        let text = match notice.level {
            NoticeLevel::Info => notice.text.bright_green(),
            NoticeLevel::Error => notice.text.bright_red(),
        };
        println!("{} {}", text, "(/dismiss)".bright_black());
    }
}

/// Prints the active screen.
pub fn screen(snapshot: &AppSnapshot) {
    notice(snapshot);

    if !snapshot.authenticated {
        auth();
        return;
    }

    if snapshot.demo_mode {
        println!("{}", "Demo mode: showing local data".yellow());
    }

    match snapshot.screen {
        Screen::Feed => feed(snapshot),
        Screen::Stories => stories(&snapshot.current_user),
        Screen::Profile => profile(snapshot),
        Screen::Messages => match snapshot.active_session() {
            Some(session) => conversation(session, snapshot.is_composing(&session.id)),
            None => inbox(&snapshot.sessions),
        },
        Screen::ComposePost => {
            println!("{}", "New post".bold());
            println!("{}", "Create mode coming soon".bright_black());
        }
    }

    if snapshot.screen.shows_dock() {
        println!();
        println!("{}", DOCK.bright_black());
    }
}

fn auth() {
    println!("{}", "Solaris".bright_magenta().bold());
    println!(
        "{}",
        "Sign in with /login <email> <password> or create an account with /register".bright_black()
    );
}

fn handle(user: &User) -> String {
    let handle = format!("@{}", user.username);
    if user.is_verified {
        format!("{} {}", handle.bold(), "✔".bright_blue())
    } else {
        handle.bold().to_string()
    }
}

fn post_card(post: &Post) {
    let mut header = handle(&post.user);
    if let Some(location) = &post.location {
        header.push_str(&format!(" · {}", location.bright_black()));
    }
    println!("{} {}", header, post.timestamp.bright_black());
    println!("  {}", post.caption);
    let heart = if post.liked_by_me {
        "♥".bright_red()
    } else {
        "♡".normal()
    };
    println!(
        "  {} {}  {}",
        heart,
        post.likes,
        format!("[{}]", post.id).bright_black()
    );
    println!();
}

fn feed(snapshot: &AppSnapshot) {
    println!("{}", "Feed".bold());
    println!();
    for post in &snapshot.posts {
        post_card(post);
    }
}

fn stories(current_user: &User) {
    println!("{}", "Stories".bold());
    println!("  {} (@{})", "Your story".bright_magenta(), current_user.username);
    for user in seed::users() {
        println!("  {} {}", "●".bright_magenta(), handle(&user));
    }
}

fn profile(snapshot: &AppSnapshot) {
    let user = &snapshot.current_user;
    println!("{} {}", user.name.bold(), handle(user));
    if !user.bio.is_empty() {
        println!("  {}", user.bio);
    }
    println!(
        "  {} posts  {} followers  {} following",
        user.posts, user.followers, user.following
    );
    println!();

    let posts = snapshot.profile_posts();
    if posts.is_empty() {
        println!("{}", "No posts yet".bright_black());
    }
    for post in posts {
        post_card(post);
    }
}

fn inbox(sessions: &[ChatSession]) {
    println!("{}", "Messages".bold());
    for session in sessions {
        let unread = if session.unread_count > 0 {
            format!(" ({})", session.unread_count).bright_red().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {}{}  {}",
            format!("[{}]", session.id).bright_black(),
            handle(&session.user),
            unread,
            session.preview().bright_black()
        );
    }
    println!();
    println!("{}", "/open <session-id> to chat".bright_black());
}

/// Prints an open conversation.
pub fn conversation(session: &ChatSession, composing: bool) {
    println!("{} {}", "←".bright_black(), handle(&session.user));
    for message in &session.messages {
        if message.is_me {
            println!("{} {}", "you:".green(), message.text.green());
        } else {
            println!(
                "{} {}",
                format!("{}:", session.user.username).bright_magenta(),
                message.text.bright_blue()
            );
        }
    }
    if composing {
        composing_indicator(&session.user);
    }
}

pub fn composing_indicator(user: &User) {
    println!("{}", format!("{} is typing...", user.name).bright_black().italic());
}

/// Prints one incoming message line, used when a reply arrives asynchronously.
pub fn incoming(session: &ChatSession, text: &str) {
    println!(
        "{} {}",
        format!("{}:", session.user.username).bright_magenta(),
        text.bright_blue()
    );
}
