//! Demo tabs: the active-demo state, the egui tab bar, and keyboard shortcuts.

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::lifecycle::{ClearFountain, ReinitializeDemo};

#[derive(States, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DemoTab {
    #[default]
    StarField,
    Fountain,
}

impl DemoTab {
    pub const ALL: [DemoTab; 2] = [DemoTab::StarField, DemoTab::Fountain];

    pub fn title(self) -> &'static str {
        match self {
            DemoTab::StarField => "Star field",
            DemoTab::Fountain => "Emoji fountain",
        }
    }
}

impl fmt::Display for DemoTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownTab(pub String);

impl fmt::Display for UnknownTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tab {:?} (expected `stars` or `fountain`)", self.0)
    }
}

impl FromStr for DemoTab {
    type Err = UnknownTab;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stars" | "star" | "starfield" | "astronomy" => Ok(DemoTab::StarField),
            "fountain" | "emoji" | "gravity" => Ok(DemoTab::Fountain),
            _ => Err(UnknownTab(raw.to_string())),
        }
    }
}

pub fn tabs_plugin(app: &mut App) {
    app.add_event::<ReinitializeDemo>()
        .add_event::<ClearFountain>()
        .add_systems(Update, (tab_bar_system, shortcut_system));
}

fn tab_bar_system(
    mut contexts: EguiContexts,
    current: Res<State<DemoTab>>,
    mut next: ResMut<NextState<DemoTab>>,
) {
    egui::TopBottomPanel::top("demo_tabs")
        .frame(
            egui::Frame::default()
                .fill(egui::Color32::from_rgba_premultiplied(15, 15, 25, 210))
                .inner_margin(egui::Margin::same(8)),
        )
        .show(contexts.ctx_mut(), |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.horizontal(|ui| {
                for tab in DemoTab::ALL {
                    if ui
                        .selectable_label(*current.get() == tab, tab.title())
                        .clicked()
                        && *current.get() != tab
                    {
                        next.set(tab);
                    }
                }
            });
        });
}

fn shortcut_system(
    keys: Res<ButtonInput<KeyCode>>,
    current: Res<State<DemoTab>>,
    mut next: ResMut<NextState<DemoTab>>,
    mut reinit: EventWriter<ReinitializeDemo>,
    mut clear: EventWriter<ClearFountain>,
) {
    if keys.just_pressed(KeyCode::Digit1) && *current.get() != DemoTab::StarField {
        next.set(DemoTab::StarField);
    }
    if keys.just_pressed(KeyCode::Digit2) && *current.get() != DemoTab::Fountain {
        next.set(DemoTab::Fountain);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        reinit.send(ReinitializeDemo);
    }
    if keys.just_pressed(KeyCode::KeyC) && *current.get() == DemoTab::Fountain {
        clear.send(ClearFountain);
    }
}
