mod hud;
mod tabs;

pub use hud::{format_count, hud_plugin};
pub use tabs::{tabs_plugin, DemoTab, UnknownTab};
