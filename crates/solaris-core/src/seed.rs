//! Local seed dataset.
//!
//! The client starts from this data and keeps it whenever the backend is unavailable
//! or returns nothing, so the feed is never empty.

use crate::chat::{ChatSession, Message};
use crate::post::Post;
use crate::user::User;
use chrono::{Duration, Utc};

/// Id of the local account before any profile is fetched.
pub const CURRENT_USER_ID: &str = "me";

/// Username of the scripted assistant account.
pub const ASSISTANT_USERNAME: &str = "solaris.ai";

/// Instruction prepended to every prompt sent to the assistant.
pub const SOLARIS_PERSONA: &str = "You are a cool, energetic social media assistant named Solaris AI. Keep responses short, fun, and using emojis.";

pub fn current_user() -> User {
    User::new(
        CURRENT_USER_ID,
        "solaris_fan",
        "Alex Costa",
        "https://picsum.photos/200/200?random=100",
    )
    .with_bio("📸 Living in warm colors | 🌅 Sunset Lover | 📍 Rio de Janeiro")
    .with_counts(42, 1250, 340)
}

/// Accounts shown in stories and used as post owners and chat counterparts.
pub fn users() -> Vec<User> {
    vec![
        User::new(
            "u1",
            "julia.styles",
            "Júlia Styles",
            "https://picsum.photos/200/200?random=1",
        )
        .with_counts(120, 5400, 200)
        .verified(true),
        User::new(
            "u2",
            "marcos_fit",
            "Marcos Treino",
            "https://picsum.photos/200/200?random=2",
        )
        .with_counts(340, 12000, 50),
        User::new(
            "u3",
            "ana.travels",
            "Ana Viajante",
            "https://picsum.photos/200/200?random=3",
        )
        .with_counts(89, 3200, 400),
        assistant_user(),
    ]
}

pub fn assistant_user() -> User {
    User::new(
        "ai",
        ASSISTANT_USERNAME,
        "Solaris AI",
        "https://picsum.photos/200/200?random=99",
    )
    .with_counts(0, 1_000_000, 0)
    .verified(true)
}

pub fn posts() -> Vec<Post> {
    let users = users();
    let post = |id: &str,
                owner: &User,
                image: &str,
                caption: &str,
                likes: u32,
                liked_by_me: bool,
                timestamp: &str,
                location: &str| Post {
        id: id.to_string(),
        user: owner.clone(),
        image: image.to_string(),
        caption: caption.to_string(),
        likes,
        comments: Vec::new(),
        liked_by_me,
        timestamp: timestamp.to_string(),
        location: Some(location.to_string()),
    };

    vec![
        post(
            "p1",
            &users[0],
            "https://picsum.photos/600/600?random=10",
            "Enjoying today's incredible sunset! 🌅 #sunset #vibes",
            234,
            false,
            "2h",
            "Praia de Ipanema",
        ),
        post(
            "p2",
            &users[1],
            "https://picsum.photos/600/800?random=11",
            "Workout done! 💪 Never give up on your dreams.",
            890,
            true,
            "4h",
            "Smart Fit",
        ),
        post(
            "p3",
            &users[2],
            "https://picsum.photos/600/500?random=12",
            "Afternoon coffee in this marvelous city ☕",
            120,
            false,
            "6h",
            "Centro Histórico",
        ),
    ]
}

pub fn chat_sessions() -> Vec<ChatSession> {
    let users = users();
    let now = Utc::now();

    let mut greeting = Message::incoming("u1", "Hiii!");
    greeting.timestamp = now - Duration::seconds(100);
    let mut compliment = Message::incoming("u1", "Loved the new photo!");
    compliment.timestamp = now - Duration::seconds(5);

    vec![
        ChatSession {
            id: "c1".to_string(),
            user: users[0].clone(),
            last_message: "Loved the new photo!".to_string(),
            unread_count: 2,
            messages: vec![greeting, compliment],
        },
        ChatSession {
            id: "c2".to_string(),
            user: assistant_user(),
            last_message: "How can I help improve your profile today?".to_string(),
            unread_count: 0,
            messages: vec![Message::incoming(
                "ai",
                "Hi! I'm Solaris AI. How can I help improve your profile today? ✨",
            )],
        },
    ]
}
