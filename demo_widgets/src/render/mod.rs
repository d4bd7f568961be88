//! Renderer traits and default implementations.

pub(crate) mod emoji_batches;
mod point_cloud;

use bevy::prelude::*;

use crate::data::IndexedStar;

pub use emoji_batches::{EmojiVisuals, SlotBatches};
pub use point_cloud::{star_cloud_mesh, PointCloudRenderer, PointCloudSettings, StarCloud};

/// Builds the GPU-side representation of the active star set. The cloud is
/// always rebuilt from scratch, never patched.
pub trait StarRenderer: Send + Sync + 'static {
    fn setup(&self, _app: &mut App) {}

    /// Spawn the cloud entity, or `None` when there is nothing to draw.
    /// Each star carries its catalog index, which seeds its jitter.
    fn spawn_cloud(
        &self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        stars: &[IndexedStar<'_>],
    ) -> Option<Entity>;
}

#[derive(Resource)]
pub struct RendererResource(pub Box<dyn StarRenderer>);

impl RendererResource {
    pub fn new(renderer: impl StarRenderer) -> Self {
        Self(Box::new(renderer))
    }
}
