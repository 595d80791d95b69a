//! REPL command parsing.

use solaris_core::Screen;

/// Slash commands offered for completion.
pub const COMMANDS: &[&str] = &[
    "/login", "/register", "/feed", "/stories", "/profile", "/messages", "/compose", "/like",
    "/open", "/back", "/dismiss", "/help",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, password: String },
    Register {
        email: String,
        password: String,
        name: String,
    },
    Go(Screen),
    Like(String),
    Open(String),
    Back,
    Dismiss,
    Help,
    Quit,
    /// Plain text sent to the open conversation
    Say(String),
    /// Malformed or unknown input, with a usage hint
    Invalid(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input == "quit" || input == "exit" {
            return Command::Quit;
        }
        let Some(rest) = input.strip_prefix('/') else {
            return Command::Say(input.to_string());
        };

        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        match (name, args.as_slice()) {
            ("login", [email, password]) => Command::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            ("login", _) => Command::Invalid("Usage: /login <email> <password>".to_string()),
            ("register", [email, password, name @ ..]) if !name.is_empty() => Command::Register {
                email: email.to_string(),
                password: password.to_string(),
                name: name.join(" "),
            },
            ("register", _) => {
                Command::Invalid("Usage: /register <email> <password> <name>".to_string())
            }
            ("like", [post_id]) => Command::Like(post_id.to_string()),
            ("like", _) => Command::Invalid("Usage: /like <post-id>".to_string()),
            ("open", [session_id]) => Command::Open(session_id.to_string()),
            ("open", _) => Command::Invalid("Usage: /open <session-id>".to_string()),
            ("back", []) => Command::Back,
            ("dismiss", []) => Command::Dismiss,
            ("help", _) => Command::Help,
            (screen, []) => match screen.parse::<Screen>() {
                Ok(screen) => Command::Go(screen),
                Err(_) => Command::Invalid(format!("Unknown command: /{screen}")),
            },
            (other, _) => Command::Invalid(format!("Unknown command: /{other}")),
        }
    }
}
