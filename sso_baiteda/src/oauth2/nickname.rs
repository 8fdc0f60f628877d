//! Randomized placeholder nicknames for freshly authenticated accounts.
//!
//! The identity provider does not reliably supply a display name, so every
//! normalized profile gets one generated here instead.

use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "Amber", "Brisk", "Calm", "Dapper", "Eager", "Fuzzy", "Gentle", "Happy", "Ivory", "Jolly",
    "Keen", "Lively", "Mellow", "Nimble", "Polar", "Quiet", "Rapid", "Sunny", "Tidy", "Vivid",
];

const CREATURES: &[&str] = &[
    "Badger", "Crane", "Dolphin", "Falcon", "Gecko", "Heron", "Ibis", "Koala", "Lynx", "Marmot",
    "Newt", "Otter", "Panda", "Quail", "Raven", "Swift", "Tapir", "Urchin", "Wombat", "Yak",
];

/// Produce a nickname such as `BriskOtter42`. Never empty.
pub(crate) fn generate() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let creature = CREATURES[rng.random_range(0..CREATURES.len())];
    let suffix: u32 = rng.random_range(10..100);

    format!("{adjective}{creature}{suffix}")
}
