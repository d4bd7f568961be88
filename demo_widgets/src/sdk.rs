//! SDK entry points and builder for composing the showcase app.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config;
use crate::data::{CatalogChannel, CatalogFetcher, CatalogSources, HttpCatalogFetcher};
use crate::fountain::{fountain_plugin, Fountain};
use crate::render::{PointCloudRenderer, RendererResource, StarRenderer};
use crate::stars::{star_field_plugin, FetcherResource, StarField};
use crate::ui::{hud_plugin, tabs_plugin, DemoTab};

/// Builder for constructing the showcase app. Anything not set explicitly is
/// read from the environment (see [`crate::config`]).
pub struct ShowcaseBuilder {
    sources: Option<CatalogSources>,
    fetcher: Option<Box<dyn CatalogFetcher>>,
    renderer: Option<Box<dyn StarRenderer>>,
    fountain_capacity: Option<usize>,
    magnitude_range: Option<(f64, f64)>,
    initial_tab: Option<DemoTab>,
    rng_seed: Option<u64>,
    window_title: String,
    window_resolution: (f32, f32),
    clear_color: Color,
    enable_hud: bool,
}

impl Default for ShowcaseBuilder {
    fn default() -> Self {
        Self {
            sources: None,
            fetcher: None,
            renderer: None,
            fountain_capacity: None,
            magnitude_range: None,
            initial_tab: None,
            rng_seed: None,
            window_title: "Vitrine".to_string(),
            window_resolution: (1280.0, 720.0),
            clear_color: Color::BLACK,
            enable_hud: true,
        }
    }
}

impl ShowcaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog locations for the default HTTP/file fetcher.
    pub fn catalog_sources(mut self, sources: CatalogSources) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Provide a custom catalog fetcher. Overrides `catalog_sources`.
    pub fn fetcher(mut self, fetcher: impl CatalogFetcher) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Provide a custom star renderer implementation.
    pub fn renderer(mut self, renderer: impl StarRenderer) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn fountain_capacity(mut self, capacity: usize) -> Self {
        self.fountain_capacity = Some(capacity);
        self
    }

    /// Only draw stars with `min <= magnitude <= max`.
    pub fn magnitude_range(mut self, min: f64, max: f64) -> Self {
        self.magnitude_range = Some((min, max));
        self
    }

    pub fn initial_tab(mut self, tab: DemoTab) -> Self {
        self.initial_tab = Some(tab);
        self
    }

    /// Seed the fountain's random source for reproducible runs.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn window_resolution(mut self, width: f32, height: f32) -> Self {
        self.window_resolution = (width, height);
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn disable_hud(mut self) -> Self {
        self.enable_hud = false;
        self
    }

    /// Build the Bevy app with the selected configuration and plugins.
    pub fn build(self) -> App {
        let fetcher = self.fetcher.unwrap_or_else(|| {
            let sources = self.sources.unwrap_or_else(config::catalog_sources);
            Box::new(HttpCatalogFetcher::new(sources))
        });
        let renderer = self
            .renderer
            .unwrap_or_else(|| Box::new(PointCloudRenderer::default()));
        let capacity = self
            .fountain_capacity
            .unwrap_or_else(config::fountain_capacity);
        let rng = match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let star_field = match self.magnitude_range {
            Some((min, max)) => StarField::default().with_magnitude_range(min, max),
            None => StarField::default(),
        };
        let initial_tab = self.initial_tab.unwrap_or_else(config::initial_tab);

        let mut app = App::new();
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: self.window_title,
                resolution: self.window_resolution.into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(ClearColor(self.clear_color))
        .insert_resource(CatalogChannel::default())
        .insert_resource(FetcherResource(fetcher))
        .insert_resource(star_field)
        .insert_resource(Fountain::new(capacity, rng))
        .insert_state(initial_tab);

        renderer.setup(&mut app);
        app.insert_resource(RendererResource(renderer));

        app.add_plugins((tabs_plugin, star_field_plugin, fountain_plugin));
        if self.enable_hud {
            app.add_plugins(hud_plugin);
        }

        app
    }
}
