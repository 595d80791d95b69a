//! Screen selector.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The screen currently shown once the user is authenticated.
///
/// Exactly one screen is active at a time. The auth screen is not part of this enum:
/// it is implied by the snapshot's authentication flag.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Feed,
    Stories,
    Profile,
    Messages,
    #[strum(to_string = "compose_post", serialize = "compose")]
    ComposePost,
}

impl Screen {
    /// Whether the bottom navigation dock is shown on this screen.
    pub fn shows_dock(self) -> bool {
        self != Screen::Messages
    }
}
