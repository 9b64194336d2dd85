#![allow(
    clippy::allow_attributes,
    reason = "allow attributes are needed for wasm"
)]

use bevy::asset::{AssetMetaCheck, AssetPlugin};
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{
    Backends, PowerPreference, RenderCreation, WgpuSettings, WgpuSettingsPriority,
};
use bevy::window::{PresentMode, WindowMode, WindowResolution};

#[cfg(target_arch = "wasm32")]
use crate::RibbitCommunicationPlugin;
use crate::RibbitMessageHandler;

#[cfg(not(target_arch = "wasm32"))]
pub const FONT: &str = "../../bits_helpers/assets/fonts/FiraSans-Bold.ttf";
#[cfg(target_arch = "wasm32")]
pub const FONT: &str = concat!(
    "../../bits_helpers-",
    env!("CARGO_PKG_VERSION"),
    "/assets/fonts/FiraSans-Bold.ttf"
);

// typical smartphone screen ratio (9:16)
pub const WINDOW_WIDTH: f32 = 360.0;
pub const WINDOW_HEIGHT: f32 = 640.0;

/// Browsers refuse surfaces larger than this on either side.
const MAX_SURFACE_SIZE: f32 = 2048.0;

/// Logical window size a bit is designed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitWindow {
    pub width: f32,
    pub height: f32,
}

impl BitWindow {
    pub const PORTRAIT: Self = Self {
        width: WINDOW_WIDTH,
        height: WINDOW_HEIGHT,
    };

    pub const LANDSCAPE: Self = Self {
        width: WINDOW_HEIGHT * 1.5,
        height: WINDOW_WIDTH * 1.5,
    };

    pub const fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for BitWindow {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

/// Builds the Bevy app every bit starts from: assets, window, renderer and
/// frame pacing set up the way the Ribbit host expects.
#[allow(clippy::extra_unused_type_parameters)]
pub fn get_default_app<T: RibbitMessageHandler>(
    bit_name: &str,
    bit_version: &str,
    window: BitWindow,
) -> App {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(asset_plugin(bit_name, bit_version))
            .set(window_plugin(bit_name, window))
            .set(render_plugin()),
    );

    // Keeps mobile devices from burning battery on idle frames.
    app.add_plugins(bevy_framepace::FramepacePlugin);
    app.insert_resource(ClearColor(Color::BLACK));

    #[cfg(target_arch = "wasm32")]
    {
        app.add_plugins(RibbitCommunicationPlugin::<T>::default());
        app.add_systems(PreUpdate, fit_browser_window);
    }

    app
}

#[allow(unused_variables, reason = "bit_name and bit_version are used in wasm")]
fn asset_plugin(bit_name: &str, bit_version: &str) -> AssetPlugin {
    AssetPlugin {
        mode: bevy::asset::AssetMode::Unprocessed,
        #[cfg(not(target_arch = "wasm32"))]
        file_path: "assets".to_owned(),
        #[cfg(target_arch = "wasm32")]
        file_path: format!("bits/{bit_name}-{bit_version}/assets"),
        processed_file_path: "imported_assets/Default".to_owned(),
        watch_for_changes_override: None,
        meta_check: AssetMetaCheck::Never,
    }
}

fn window_plugin(bit_name: &str, window: BitWindow) -> WindowPlugin {
    WindowPlugin {
        primary_window: Some(Window {
            title: bit_name.to_owned(),
            present_mode: PresentMode::Fifo,
            resolution: WindowResolution::new(window.width, window.height),
            canvas: Some("#bit".into()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // Leave browser shortcuts such as F5 and Ctrl+R alone.
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    }
}

fn render_plugin() -> RenderPlugin {
    RenderPlugin {
        render_creation: RenderCreation::Automatic(WgpuSettings {
            backends: Some(Backends::BROWSER_WEBGPU | Backends::GL),
            power_preference: PowerPreference::HighPerformance,
            priority: WgpuSettingsPriority::Functionality,
            ..default()
        }),
        ..default()
    }
}

/// Surface size to request for a browser viewport, clamped to what wgpu accepts.
pub fn clamp_surface_size(width: f32, height: f32) -> Vec2 {
    Vec2::new(width.min(MAX_SURFACE_SIZE), height.min(MAX_SURFACE_SIZE))
}

#[cfg(target_arch = "wasm32")]
fn fit_browser_window(
    mut windows: Query<&mut Window, With<bevy::window::PrimaryWindow>>,
) {
    let Some(browser) = web_sys::window() else {
        return;
    };
    let (Ok(width), Ok(height)) = (browser.inner_width(), browser.inner_height()) else {
        return;
    };
    let (Some(width), Some(height)) = (width.as_f64(), height.as_f64()) else {
        return;
    };
    let target = clamp_surface_size(width as f32, height as f32);

    for mut window in &mut windows {
        let current = Vec2::new(window.resolution.width(), window.resolution.height());
        if current.abs_diff_eq(target, f32::EPSILON) {
            continue;
        }
        window.resolution.set(target.x, target.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_is_portrait_turned_sideways() {
        let portrait = BitWindow::PORTRAIT.size();
        let landscape = BitWindow::LANDSCAPE.size();
        assert!(
            (landscape.x / landscape.y - portrait.y / portrait.x).abs() < 1e-4,
            "same aspect ratio, rotated"
        );
        assert_eq!(landscape, Vec2::new(960.0, 540.0), "scaled up for desktop play");
    }

    #[test]
    fn surface_is_clamped_per_axis() {
        assert_eq!(
            clamp_surface_size(1284.0, 2418.0),
            Vec2::new(1284.0, 2048.0),
            "only the oversized axis is clamped"
        );
    }
}
