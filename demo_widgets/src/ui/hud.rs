//! HUD overlay: per-demo stats, the fountain's Clear button, FPS counter.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::data::{CatalogTier, LoadState};
use crate::fountain::Fountain;
use crate::lifecycle::ClearFountain;
use crate::stars::StarField;
use crate::ui::DemoTab;

pub fn hud_plugin(app: &mut App) {
    app.add_plugins(FrameTimeDiagnosticsPlugin)
        .add_systems(Update, (hud_overlay_system, empty_state_system));
}

fn panel_frame() -> egui::Frame {
    egui::Frame::default()
        .fill(egui::Color32::from_rgba_premultiplied(15, 15, 25, 210))
        .inner_margin(egui::Margin::same(12))
        .corner_radius(egui::CornerRadius::same(6))
}

fn hud_overlay_system(
    mut contexts: EguiContexts,
    tab: Res<State<DemoTab>>,
    field: Res<StarField>,
    fountain: Res<Fountain>,
    diagnostics: Res<DiagnosticsStore>,
    mut clear: EventWriter<ClearFountain>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    egui::Window::new("Demo stats")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 50.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(panel_frame())
        .show(contexts.ctx_mut(), |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(200, 220, 240));

            ui.label(
                egui::RichText::new(tab.get().title())
                    .size(16.0)
                    .color(egui::Color32::from_rgb(100, 220, 180)),
            );
            ui.add_space(4.0);

            match tab.get() {
                DemoTab::StarField => {
                    let loader = field.loader();
                    ui.label(format!("Stars  {}", format_count(loader.records().len())));
                    ui.label(format!("Catalog  {}", tier_label(field.active_tier())));
                    if loader.detailed().state() == LoadState::InFlight {
                        ui.label("Loading detailed catalog...");
                    }
                    ui.label(format!("Zoom  {:.2}", field.camera.zoom));
                }
                DemoTab::Fountain => {
                    ui.label(format!("Emoji  {}", format_count(fountain.emoji_count())));
                    ui.label(format!(
                        "Capacity  {}",
                        format_count(fountain.pool().capacity())
                    ));
                    ui.horizontal_wrapped(|ui| {
                        let registry = fountain.pool().registry();
                        for kind in registry.kinds() {
                            let [r, g, b, _] = kind.tint().to_srgba().to_u8_array();
                            ui.label(
                                egui::RichText::new(format!("{} {}", kind.glyph(), registry.count(kind)))
                                    .color(egui::Color32::from_rgb(r, g, b)),
                            );
                        }
                    });
                    ui.add_space(4.0);
                    if ui.button("Clear").clicked() {
                        clear.send(ClearFountain);
                    }
                }
            }

            ui.separator();
            ui.label(format!("FPS  {fps:.0}"));
        });
}

/// Centered hint shown until there is something on screen.
fn empty_state_system(
    mut contexts: EguiContexts,
    tab: Res<State<DemoTab>>,
    field: Res<StarField>,
    fountain: Res<Fountain>,
) {
    let hint = match tab.get() {
        DemoTab::StarField if field.cloud().is_none() => {
            let loader = field.loader();
            let failed = |state: LoadState| state == LoadState::Failed;
            if failed(loader.coarse().state()) && failed(loader.detailed().state()) {
                "Star catalog unavailable"
            } else {
                "Loading stars..."
            }
        }
        DemoTab::Fountain if !fountain.interacted() => "Click or tap to launch emoji",
        _ => return,
    };

    egui::Area::new(egui::Id::new("empty_state"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(contexts.ctx_mut(), |ui| {
            ui.label(
                egui::RichText::new(hint)
                    .size(18.0)
                    .color(egui::Color32::from_rgb(160, 170, 190)),
            );
        });
}

fn tier_label(tier: Option<CatalogTier>) -> String {
    match tier {
        Some(tier) => tier.to_string(),
        None => "none".to_string(),
    }
}

/// `1234567` -> `1,234,567`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_count_inserts_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(120_500), "120,500");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn missing_tier_reads_as_none() {
        assert_eq!(tier_label(None), "none");
        assert_eq!(tier_label(Some(CatalogTier::Detailed)), "detailed");
    }
}
