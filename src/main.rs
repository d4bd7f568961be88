//! Vitrine: star field and emoji fountain demos in one window.

use bevy::prelude::*;
use demo_widgets::prelude::*;

fn main() -> AppExit {
    let _ = dotenvy::dotenv();

    ShowcaseBuilder::new().build().run()
}
