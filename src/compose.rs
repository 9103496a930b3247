//! Layout-driven compositions: grid tiles, contact sheets and captioned cards.

pub(crate) mod card;
pub(crate) mod split;
pub(crate) mod storyboard;
