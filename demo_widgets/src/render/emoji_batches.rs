//! Per-kind slot batches: `capacity` pre-spawned entities for each emoji
//! kind, positioned from physics every frame and zero-scaled when unused.
//!
//! Slots draw the kind's face glyph from the bundled font. Kinds the font
//! can't draw, or any kind when the font failed to load, get a tinted disc.

use std::collections::HashMap;

use bevy::asset::LoadState as AssetLoadState;
use bevy::prelude::*;

use crate::fountain::EmojiKind;

pub const NARROW_WINDOW_WIDTH: f32 = 800.0;
pub const NARROW_EMOJI_SIZE: f32 = 1.35;
pub const WIDE_EMOJI_SIZE: f32 = 1.25;
/// Drawn disc and collider radius as a fraction of the emoji size.
pub const RADIUS_FACTOR: f32 = 0.38;

pub const EMOJI_FONT_PATH: &str = "fonts/DejaVuSans.ttf";
/// Glyphs are rasterized at this size and scaled down to the emoji size.
pub const GLYPH_FONT_SIZE: f32 = 64.0;

#[derive(Resource, Clone)]
pub struct EmojiFont(pub Handle<Font>);

pub fn load_emoji_font(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(EmojiFont(asset_server.load(EMOJI_FONT_PATH)));
}

/// How new slot batches are drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum SlotStyle {
    Glyph(Handle<Font>),
    Disc,
}

impl SlotStyle {
    /// `None` while the font is still loading. Without a font or an asset
    /// server every batch is a disc.
    pub fn resolve(font: Option<&EmojiFont>, assets: Option<&AssetServer>) -> Option<Self> {
        let (Some(font), Some(assets)) = (font, assets) else {
            return Some(SlotStyle::Disc);
        };
        match assets.get_load_state(font.0.id()) {
            Some(AssetLoadState::Loaded) => Some(SlotStyle::Glyph(font.0.clone())),
            Some(AssetLoadState::Failed(err)) => {
                warn!("emoji font unavailable, drawing discs: {err}");
                Some(SlotStyle::Disc)
            }
            _ => None,
        }
    }
}

/// Visual size shared by every slot batch.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct EmojiVisuals {
    pub size: f32,
}

impl Default for EmojiVisuals {
    fn default() -> Self {
        Self {
            size: WIDE_EMOJI_SIZE,
        }
    }
}

impl EmojiVisuals {
    pub fn for_window_width(width: f32) -> Self {
        let size = if width < NARROW_WINDOW_WIDTH {
            NARROW_EMOJI_SIZE
        } else {
            WIDE_EMOJI_SIZE
        };
        Self { size }
    }

    pub fn radius(&self) -> f32 {
        self.size * RADIUS_FACTOR
    }
}

/// Marker + data for one slot entity.
#[derive(Component, Clone, Copy, Debug)]
pub struct EmojiSlot {
    pub kind: EmojiKind,
    pub index: usize,
    /// Uniform scale while the slot is live.
    pub scale: f32,
}

/// Slot entities per kind, indexed by slot.
#[derive(Resource, Default)]
pub struct SlotBatches {
    batches: HashMap<EmojiKind, Vec<Entity>>,
}

impl SlotBatches {
    pub fn get(&self, kind: EmojiKind) -> Option<&[Entity]> {
        self.batches.get(&kind).map(Vec::as_slice)
    }

    pub fn contains(&self, kind: EmojiKind) -> bool {
        self.batches.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Spawn the batch for `kind` unless it already exists. All slots start
    /// hidden at zero scale.
    #[allow(clippy::too_many_arguments)]
    pub fn ensure(
        &mut self,
        kind: EmojiKind,
        capacity: usize,
        visuals: &EmojiVisuals,
        style: &SlotStyle,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<ColorMaterial>,
    ) {
        if self.batches.contains_key(&kind) {
            return;
        }

        let slots = match (style, kind.outline_glyph()) {
            (SlotStyle::Glyph(font), Some(face)) => {
                let scale = visuals.size / GLYPH_FONT_SIZE;
                (0..capacity)
                    .map(|index| {
                        commands
                            .spawn((
                                Text2d::new(face.to_string()),
                                TextFont {
                                    font: font.clone(),
                                    font_size: GLYPH_FONT_SIZE,
                                    ..default()
                                },
                                TextColor(kind.tint()),
                                Transform::from_scale(Vec3::ZERO),
                                EmojiSlot { kind, index, scale },
                            ))
                            .id()
                    })
                    .collect()
            }
            _ => {
                let mesh = meshes.add(Circle::new(visuals.radius()));
                let material = materials.add(ColorMaterial::from(kind.tint()));
                (0..capacity)
                    .map(|index| {
                        commands
                            .spawn((
                                Mesh2d(mesh.clone()),
                                MeshMaterial2d(material.clone()),
                                Transform::from_scale(Vec3::ZERO),
                                Visibility::Visible,
                                EmojiSlot {
                                    kind,
                                    index,
                                    scale: 1.0,
                                },
                            ))
                            .id()
                    })
                    .collect()
            }
        };

        debug!("created {capacity} slots for {:?}", kind);
        self.batches.insert(kind, slots);
    }

    /// Despawn every slot entity.
    pub fn despawn_all(&mut self, commands: &mut Commands) {
        for entity in self.batches.drain().flat_map(|(_, slots)| slots) {
            commands.entity(entity).despawn_recursive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_windows_get_larger_emoji() {
        assert_eq!(EmojiVisuals::for_window_width(640.0).size, NARROW_EMOJI_SIZE);
        assert_eq!(EmojiVisuals::for_window_width(800.0).size, WIDE_EMOJI_SIZE);
        assert!((EmojiVisuals::default().radius() - 0.475).abs() < 1e-6);
    }

    #[derive(Resource)]
    struct Prepared(bool);

    fn prepare_batches(
        mut commands: Commands,
        mut batches: ResMut<SlotBatches>,
        mut meshes: ResMut<Assets<Mesh>>,
        mut materials: ResMut<Assets<ColorMaterial>>,
        mut prepared: ResMut<Prepared>,
    ) {
        if prepared.0 {
            return;
        }
        let visuals = EmojiVisuals::default();
        for _ in 0..2 {
            batches.ensure(
                EmojiKind::Grinning,
                4,
                &visuals,
                &SlotStyle::Disc,
                &mut commands,
                &mut meshes,
                &mut materials,
            );
        }
        batches.ensure(
            EmojiKind::Dizzy,
            4,
            &visuals,
            &SlotStyle::Disc,
            &mut commands,
            &mut meshes,
            &mut materials,
        );
        prepared.0 = true;
    }

    #[test]
    fn ensure_spawns_one_batch_per_kind() {
        let mut app = App::new();
        app.init_resource::<SlotBatches>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<ColorMaterial>>()
            .insert_resource(Prepared(false))
            .add_systems(Update, prepare_batches);
        app.update();

        let batches = app.world().resource::<SlotBatches>();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches.get(EmojiKind::Grinning).map(<[_]>::len), Some(4));

        let world = app.world_mut();
        let slot_count = world.query::<&EmojiSlot>().iter(world).count();
        assert_eq!(slot_count, 8);
    }

    fn glyph_batches(
        mut commands: Commands,
        mut batches: ResMut<SlotBatches>,
        mut meshes: ResMut<Assets<Mesh>>,
        mut materials: ResMut<Assets<ColorMaterial>>,
        mut prepared: ResMut<Prepared>,
    ) {
        if prepared.0 {
            return;
        }
        let style = SlotStyle::Glyph(Handle::default());
        for kind in [EmojiKind::Sunglasses, EmojiKind::RaisedEyebrow] {
            batches.ensure(
                kind,
                3,
                &EmojiVisuals::default(),
                &style,
                &mut commands,
                &mut meshes,
                &mut materials,
            );
        }
        prepared.0 = true;
    }

    #[test]
    fn glyph_style_falls_back_to_discs_for_faces_the_font_lacks() {
        let mut app = App::new();
        app.init_resource::<SlotBatches>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<ColorMaterial>>()
            .insert_resource(Prepared(false))
            .add_systems(Update, glyph_batches);
        app.update();

        let world = app.world_mut();
        let glyphs: Vec<_> = world
            .query::<(&EmojiSlot, &Text2d)>()
            .iter(world)
            .map(|(slot, text)| (slot.kind, text.0.clone(), slot.scale))
            .collect();
        assert_eq!(glyphs.len(), 3);
        for (kind, text, scale) in glyphs {
            assert_eq!(kind, EmojiKind::Sunglasses);
            assert_eq!(text, "\u{1F60E}");
            assert!((scale - WIDE_EMOJI_SIZE / GLYPH_FONT_SIZE).abs() < 1e-6);
        }

        let discs: Vec<_> = world
            .query_filtered::<&EmojiSlot, With<Mesh2d>>()
            .iter(world)
            .map(|slot| (slot.kind, slot.scale))
            .collect();
        assert_eq!(discs, vec![(EmojiKind::RaisedEyebrow, 1.0); 3]);
    }

    #[test]
    fn missing_font_resolves_to_discs() {
        assert_eq!(SlotStyle::resolve(None, None), Some(SlotStyle::Disc));
    }
}
