use eframe::egui;
use tracing::{debug, error, info, trace, warn};

use glance_core::{
    placement, Changes, DecodedImage, DiskLoader, PanDrag, Picture, Property, Vector,
    ViewController,
};
use glance_settings::{SettingsExt, SettingsFile, WindowBounds, WindowBoundsKeeper};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const APP_NAME: &str = "Glance";
pub(crate) const WINDOW_BOUNDS_KEY: &str = "WindowBounds";
pub(crate) const SHOW_FILE_NAME_KEY: &str = "ShowFileName";
pub(crate) const DEFAULT_WINDOW_SIZE: [f32; 2] = [1024.0, 768.0];
/// Scroll distance egui reports for one wheel notch.
pub(crate) const SCROLL_POINTS_PER_NOTCH: f64 = 40.0;
pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

pub(crate) struct GlanceApp {
    pub(crate) controller: ViewController<DiskLoader>,
    pub(crate) settings: SettingsFile,
    pub(crate) bounds_keeper: WindowBoundsKeeper,

    pub(crate) drag: PanDrag,
    pub(crate) texture: Option<egui::TextureHandle>,
    /// Controller changes not yet reflected in the texture and title.
    pub(crate) pending: Changes,
    /// Why the current entry shows no image.
    pub(crate) load_error: Option<String>,
    /// Last window rectangle seen in normal (not maximized, not full screen) state.
    pub(crate) normal_bounds: Option<WindowBounds>,

    pub(crate) show_hud: bool,
    pub(crate) show_file_name: bool,
}

impl GlanceApp {
    pub(crate) fn new(
        mut controller: ViewController<DiskLoader>,
        mut settings: SettingsFile,
        bounds_keeper: WindowBoundsKeeper,
    ) -> Self {
        controller.subscribe(|property| trace!(property = property.name(), "View changed"));

        let show_file_name = settings
            .get_bool(SHOW_FILE_NAME_KEY, true, true)
            .unwrap_or_else(|e| {
                warn!("Ignoring setting: {e}");
                true
            });

        let initial_failed = controller
            .current_entry()
            .is_some_and(|entry| !entry.is_loaded());

        let mut pending = Changes::from(Property::Image);
        pending.insert(Property::ImageFileName);

        let mut app = Self {
            controller,
            settings,
            bounds_keeper,
            drag: PanDrag::default(),
            texture: None,
            pending,
            load_error: None,
            normal_bounds: None,
            show_hud: true,
            show_file_name,
        };
        // Retry the first image so the HUD can show why it failed.
        if initial_failed {
            app.navigate(0);
        }
        app
    }

    /// Move through the image list. A file that fails to decode is still
    /// selected; the error is kept for the HUD.
    pub(crate) fn navigate(&mut self, offset: isize) {
        self.drag.end();
        match self.controller.shift(offset) {
            Ok(changes) => {
                if changes.contains(Property::Image) {
                    self.load_error = None;
                }
                self.pending |= changes;
            }
            Err(e) => {
                warn!("{e}");
                self.load_error = Some(e.to_string());
                self.pending.insert(Property::Image);
                self.pending.insert(Property::ImageFileName);
            }
        }
    }

    pub(crate) fn is_fullscreen(ctx: &egui::Context) -> bool {
        ctx.input(|i| i.viewport().fullscreen.unwrap_or(false))
    }

    pub(crate) fn set_fullscreen(ctx: &egui::Context, fullscreen: bool) {
        debug!(fullscreen, "Switching full screen");
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(fullscreen));
    }

    pub(crate) fn toggle_fullscreen(ctx: &egui::Context) {
        Self::set_fullscreen(ctx, !Self::is_fullscreen(ctx));
    }

    /// Flip the HUD file name label and remember the choice.
    pub(crate) fn toggle_file_name(&mut self) {
        self.show_file_name = !self.show_file_name;
        if let Err(e) = self
            .settings
            .set_bool(SHOW_FILE_NAME_KEY, self.show_file_name)
        {
            warn!("Could not update {SHOW_FILE_NAME_KEY}: {e}");
        }
    }

    pub(crate) fn window_title(&self) -> String {
        match self.controller.image_file_name() {
            Some(name) if !name.is_empty() => format!("{name} - {APP_NAME}"),
            _ => APP_NAME.to_owned(),
        }
    }

    // -- Rendering -------------------------------------------------------

    /// Re-upload the texture and retitle the window after the controller
    /// reported a new image.
    fn apply_pending(&mut self, ctx: &egui::Context) {
        let pending = std::mem::take(&mut self.pending);
        if pending.contains(Property::Image) {
            self.texture = self
                .controller
                .image()
                .map(|image| upload_texture(ctx, image));
        }
        if pending.contains(Property::ImageFileName) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));
        }
    }

    fn draw_image(&self, painter: &egui::Painter, canvas: egui::Rect) {
        let (Some(texture), Some(image)) = (&self.texture, self.controller.image()) else {
            return;
        };
        let state = self.controller.state();
        let (top_left, size) = placement(
            state.viewport(),
            Vector::new(image.width() as f64, image.height() as f64),
            state.translate(),
            state.scale,
        );
        let rect = egui::Rect::from_min_size(
            canvas.min + egui::vec2(top_left.x as f32, top_left.y as f32),
            egui::vec2(size.x as f32, size.y as f32),
        );
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
    }

    fn draw_empty_message(&self, painter: &egui::Painter, canvas: egui::Rect) {
        let text = if self.controller.is_empty() {
            format!("No images in {}", self.controller.directory().display())
        } else if self.load_error.is_some() {
            "Image could not be loaded".to_owned()
        } else {
            return;
        };
        painter.text(
            canvas.center(),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(16.0),
            egui::Color32::GRAY,
        );
    }

    /// Remember the window rectangle while it is in normal state, so a
    /// minimized, maximized or full-screen exit still restores the last normal size.
    fn track_window_bounds(&mut self, ctx: &egui::Context) {
        if let Some(bounds) = ctx.input(|i| normal_bounds(i.viewport())) {
            self.normal_bounds = Some(bounds);
        }
    }
}

/// Upload `image` as the canvas texture, shrunk to the GPU's texture limit.
pub(crate) fn upload_texture(ctx: &egui::Context, image: &DecodedImage) -> egui::TextureHandle {
    let max_side = ctx.input(|i| i.max_texture_side);
    let fitted = image.fit_within(u32::try_from(max_side).unwrap_or(u32::MAX));
    let color_image = egui::ColorImage::from_rgba_unmultiplied(
        [fitted.width() as usize, fitted.height() as usize],
        fitted.pixels(),
    );
    ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR)
}

/// Window rectangle worth persisting, or `None` while the window is
/// minimized, maximized, full screen, or not yet placed.
pub(crate) fn normal_bounds(viewport: &egui::ViewportInfo) -> Option<WindowBounds> {
    let abnormal = [viewport.minimized, viewport.maximized, viewport.fullscreen];
    if abnormal.into_iter().any(|state| state.unwrap_or(false)) {
        return None;
    }
    let (outer, inner) = (viewport.outer_rect?, viewport.inner_rect?);
    Some(WindowBounds::new(
        outer.min.x as f64,
        outer.min.y as f64,
        inner.width() as f64,
        inner.height() as f64,
    ))
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for GlanceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.handle_keyboard(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let available = ui.available_size();
                let (response, painter) =
                    ui.allocate_painter(available, egui::Sense::click_and_drag());
                let canvas = response.rect;

                self.pending |= self
                    .controller
                    .set_display(canvas.width() as f64, canvas.height() as f64);
                self.handle_canvas_input(ctx, &response);
                self.apply_pending(ctx);

                self.draw_image(&painter, canvas);
                self.draw_empty_message(&painter, canvas);
            });

        self.show_hud(ctx);
        self.track_window_bounds(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(bounds) = self.normal_bounds {
            if let Err(e) = self.bounds_keeper.store(&mut self.settings, bounds) {
                error!("Could not record window bounds: {e}");
            }
        }
        match self.settings.flush() {
            Ok(true) => info!("Saved settings to {}", self.settings.path().display()),
            Ok(false) => debug!("Settings unchanged"),
            Err(e) => error!("Failed to save settings: {e}"),
        }
    }
}
