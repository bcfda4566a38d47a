use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use log::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::display::{Display, TextureStore};
use crate::export::{self, format_number, position_json};
use crate::position::{clamp_percent, parse_strict, Axis, PlotEvent, PlotOptions, PointerButton};
use crate::session::{Direction, ImageId, Session, SourceFile};

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico", "tga", "qoi",
];

const STATUS_SECONDS: f64 = 6.0;
const CAPTION_HEIGHT: f32 = 36.0;
const THUMB_SIZE: egui::Vec2 = egui::vec2(120.0, 90.0);
/// Canvas size for files that could not be decoded.
const PLACEHOLDER_SIZE: egui::Vec2 = egui::vec2(400.0, 300.0);

// ── Actions ─────────────────────────────────────────────────────────────────

/// Everything the UI can ask for. Panels only read the session and queue
/// actions; `apply` is the single place that changes state.
enum Action {
    OpenPicker,
    Upload(Vec<SourceFile>),
    Select(Option<ImageId>),
    Plot(ImageId, PlotEvent),
    SetCoordinate(ImageId, Axis, String),
    Reset(ImageId),
    ResetAll,
    Delete(ImageId),
    AskDeleteAll,
    DeleteAll,
    Navigate(Direction),
    ShowJson,
    CopyJson,
    SaveJson,
    SetSecondaryClears(bool),
    SetStrict(bool),
    Quit,
}

/// Text being typed into a coordinate field, kept until the field loses
/// focus so partial input like "1." survives a frame.
type Drafts = HashMap<(ImageId, Axis), String>;

struct Status {
    text: String,
    is_error: bool,
    expires_at: f64,
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct HotspotApp {
    session: Session<Display>,
    textures: TextureStore,
    /// Effective settings, including command-line overrides.
    config: AppConfig,
    /// Settings as stored on disk, without command-line overrides.
    saved_config: AppConfig,
    config_path: Option<PathBuf>,
    drafts: Drafts,
    export_cache: Option<(u64, String)>,

    show_json: bool,
    confirm_delete_all: bool,
    confirm_close: bool,
    allow_close: bool,
    status: Option<Status>,
}

impl HotspotApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        saved_config: AppConfig,
        config: AppConfig,
        initial: Vec<SourceFile>,
    ) -> Self {
        let mut app = Self::with_context(
            cc.egui_ctx.clone(),
            saved_config,
            config,
            AppConfig::config_path(),
        );
        app.upload(&cc.egui_ctx, initial);
        app
    }

    fn with_context(
        ctx: egui::Context,
        saved_config: AppConfig,
        config: AppConfig,
        config_path: Option<PathBuf>,
    ) -> Self {
        Self {
            session: Session::new(),
            textures: TextureStore::new(ctx),
            config,
            saved_config,
            config_path,
            drafts: Drafts::new(),
            export_cache: None,
            show_json: false,
            confirm_delete_all: false,
            confirm_close: false,
            allow_close: false,
            status: None,
        }
    }

    fn plot_options(&self) -> PlotOptions {
        self.config.plot_options()
    }

    fn set_status(&mut self, ctx: &egui::Context, text: impl Into<String>, is_error: bool) {
        let now = ctx.input(|i| i.time);
        self.status = Some(Status {
            text: text.into(),
            is_error,
            expires_at: now + STATUS_SECONDS,
        });
    }

    /// Apply a toolbar setting to the running app and to the stored config.
    fn change_setting(&mut self, edit: impl Fn(&mut AppConfig)) {
        edit(&mut self.config);
        edit(&mut self.saved_config);
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(err) = self.saved_config.save_to(path) {
            warn!("Could not save config: {err}");
        }
    }

    /// Export text, recomputed only when the session changed.
    fn export_json(&mut self) -> &str {
        let revision = self.session.revision();
        let stale = self.export_cache.as_ref().map(|(r, _)| *r) != Some(revision);
        if stale {
            let json = export::to_json(&self.session.serialize()).unwrap_or_else(|err| {
                error!("Failed to serialize positions: {err}");
                String::new()
            });
            self.export_cache = Some((revision, json));
        }
        self.export_cache
            .as_ref()
            .map(|(_, json)| json.as_str())
            .unwrap_or_default()
    }

    fn upload(&mut self, ctx: &egui::Context, files: Vec<SourceFile>) {
        if files.is_empty() {
            return;
        }
        let added = self.session.upload(files, &mut self.textures);
        info!("Loaded {} image(s), {} total", added.len(), self.session.len());
        let undecodable = added
            .iter()
            .filter_map(|id| self.session.image(*id))
            .filter(|image| image.display().texture().is_none())
            .count();
        if undecodable > 0 {
            self.set_status(ctx, format!("{undecodable} file(s) could not be displayed"), true);
        }
    }

    fn read_files(&mut self, ctx: &egui::Context, paths: &[PathBuf]) -> Vec<SourceFile> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match SourceFile::read(path) {
                Ok(file) => files.push(file),
                Err(err) => {
                    error!("{err}");
                    self.set_status(ctx, err.to_string(), true);
                }
            }
        }
        files
    }

    fn apply(&mut self, ctx: &egui::Context, action: Action) {
        match action {
            Action::OpenPicker => {
                let picked = rfd::FileDialog::new()
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_files();
                if let Some(paths) = picked {
                    let files = self.read_files(ctx, &paths);
                    self.upload(ctx, files);
                }
            }
            Action::Upload(files) => self.upload(ctx, files),
            Action::Select(id) => self.session.select_active(id),
            Action::Plot(id, event) => {
                let options = self.plot_options();
                let Some(position) = self.session.plot(id, &event, &options) else {
                    return;
                };
                if self.config.strict_coordinates {
                    let clamped = position.clamped();
                    for axis in Axis::ALL {
                        if let Some(value) = clamped.get(axis) {
                            self.session.set_axis(id, axis, value);
                        }
                    }
                }
            }
            Action::SetCoordinate(id, axis, raw) => {
                if !self.config.strict_coordinates {
                    self.session.set_coordinate(id, axis, &raw);
                } else if let Some(value) = parse_strict(&raw) {
                    self.session.set_axis(id, axis, clamp_percent(value));
                } else {
                    self.set_status(ctx, format!("\"{raw}\" is not a number"), true);
                }
            }
            Action::Reset(id) => self.session.reset_position(id),
            Action::ResetAll => self.session.reset_all(),
            Action::Delete(id) => {
                self.session.delete_image(id, &mut self.textures);
                self.drafts.retain(|(draft_id, _), _| *draft_id != id);
            }
            Action::AskDeleteAll => self.confirm_delete_all = true,
            Action::DeleteAll => {
                self.session.delete_all(&mut self.textures);
                self.drafts.clear();
                self.confirm_delete_all = false;
                info!("Deleted all images");
            }
            Action::Navigate(direction) => {
                self.session.navigate(direction);
            }
            Action::ShowJson => self.show_json = true,
            Action::CopyJson => {
                let json = self.export_json().to_owned();
                ctx.copy_text(json);
                self.set_status(ctx, "Successfully copied to clipboard", false);
            }
            Action::SaveJson => {
                let Some(path) = rfd::FileDialog::new()
                    .add_filter("JSON", &["json"])
                    .set_file_name("positions.json")
                    .save_file()
                else {
                    return;
                };
                match export::write_json(&path, &self.session.serialize()) {
                    Ok(()) => self.set_status(ctx, format!("Saved {}", path.display()), false),
                    Err(err) => {
                        error!("{err}");
                        self.set_status(ctx, err.to_string(), true);
                    }
                }
            }
            Action::SetSecondaryClears(enabled) => {
                self.change_setting(|config| config.secondary_clears = enabled);
            }
            Action::SetStrict(enabled) => {
                self.change_setting(|config| config.strict_coordinates = enabled);
            }
            Action::Quit => {
                self.allow_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() {
            let mut files = Vec::new();
            for file in dropped {
                if let Some(bytes) = file.bytes {
                    files.push(SourceFile::new(file.name, bytes));
                } else if let Some(path) = file.path {
                    files.extend(self.read_files(ctx, &[path]));
                } else {
                    warn!("Dropped file {} has neither path nor contents", file.name);
                }
            }
            actions.push(Action::Upload(files));
        }

        if !ctx.wants_keyboard_input() {
            let (previous, next) = ctx.input(|i| {
                (
                    i.modifiers.ctrl && i.key_pressed(egui::Key::ArrowLeft),
                    i.modifiers.ctrl && i.key_pressed(egui::Key::ArrowRight),
                )
            });
            if previous {
                actions.push(Action::Navigate(Direction::Previous));
            }
            if next {
                actions.push(Action::Navigate(Direction::Next));
            }
        }

        let close_requested = ctx.input(|i| i.viewport().close_requested());
        if close_requested && self.session.has_unsaved_work() && !self.allow_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.confirm_close = true;
        }
    }

    fn toolbar(&self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Hotspot Picker");
                ui.separator();
                if ui.button("Add images…").clicked() {
                    actions.push(Action::OpenPicker);
                }
                ui.separator();
                let mut secondary = self.config.secondary_clears;
                if ui.checkbox(&mut secondary, "Right-click clears").changed() {
                    actions.push(Action::SetSecondaryClears(secondary));
                }
                let mut strict = self.config.strict_coordinates;
                if ui
                    .checkbox(&mut strict, "Strict input")
                    .on_hover_text("Reject non-numeric coordinates and clamp to 0-100")
                    .changed()
                {
                    actions.push(Action::SetStrict(strict));
                }
                ui.separator();
                ui.label(format!("{} image(s)", self.session.len()));

                if let Some(status) = &self.status {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let color = if status.is_error {
                            ui.visuals().error_fg_color
                        } else {
                            egui::Color32::from_rgb(70, 170, 100)
                        };
                        ui.colored_label(color, &status.text);
                    });
                }
            });
        });
    }

    fn json_window(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        if !self.show_json {
            return;
        }
        let json = self.export_json().to_owned();
        let mut open = true;
        let mut close = false;
        egui::Window::new("JSON")
            .open(&mut open)
            .collapsible(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                    let mut text = json.as_str();
                    ui.add(
                        egui::TextEdit::multiline(&mut text)
                            .code_editor()
                            .desired_width(f32::INFINITY),
                    );
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Copy").clicked() {
                        actions.push(Action::CopyJson);
                    }
                    if ui.button("Save…").clicked() {
                        actions.push(Action::SaveJson);
                    }
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            });
        if !open || close {
            self.show_json = false;
        }
    }

    fn confirm_windows(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        if self.confirm_delete_all {
            let mut cancel = false;
            confirm_window(ctx, "Delete All", |ui| {
                ui.label("Are you sure you want to delete all images?");
                ui.label(egui::RichText::new("You cannot undo this action").small().weak());
                ui.separator();
                ui.horizontal(|ui| {
                    cancel = ui.button("Cancel").clicked();
                    if ui.button("Confirm").clicked() {
                        actions.push(Action::DeleteAll);
                    }
                });
            });
            if cancel {
                self.confirm_delete_all = false;
            }
        }

        if self.confirm_close {
            let mut cancel = false;
            confirm_window(ctx, "Unsaved positions", |ui| {
                ui.label("Positions are only kept in memory. Quit anyway?");
                ui.separator();
                ui.horizontal(|ui| {
                    cancel = ui.button("Cancel").clicked();
                    if ui.button("Quit").clicked() {
                        actions.push(Action::Quit);
                    }
                });
            });
            if cancel {
                self.confirm_close = false;
            }
        }
    }
}

impl Drop for HotspotApp {
    fn drop(&mut self) {
        self.session.teardown(&mut self.textures);
        debug!("session torn down, {} textures live", self.textures.live());
    }
}

// ── Panels ──────────────────────────────────────────────────────────────────

fn confirm_window(ctx: &egui::Context, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, add_contents);
}

fn upload_surface(ctx: &egui::Context, actions: &mut Vec<Action>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let rect = ui.available_rect_before_wrap().shrink(16.0);
        let stroke = if hovering {
            egui::Stroke::new(1.75, ui.visuals().selection.stroke.color)
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };
        ui.painter()
            .rect_stroke(rect, 4.0, stroke, egui::StrokeKind::Inside);

        ui.vertical_centered(|ui| {
            ui.add_space((rect.height() / 2.0 - 40.0).max(0.0));
            ui.label(egui::RichText::new("Drag and drop image(s)").weak());
            ui.add_space(8.0);
            if ui.button("Browse").clicked() {
                actions.push(Action::OpenPicker);
            }
        });
    });
}

fn positions_panel(
    ctx: &egui::Context,
    session: &Session<Display>,
    drafts: &mut Drafts,
    actions: &mut Vec<Action>,
) {
    egui::SidePanel::right("positions")
        .resizable(true)
        .default_width(360.0)
        .show(ctx, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto())
                .columns(Column::remainder().at_least(60.0), 2)
                .column(Column::auto())
                .column(Column::auto())
                .header(28.0, |mut header| {
                    header.col(|ui| {
                        if ui.button("JSON").on_hover_text("Show JSON").clicked() {
                            actions.push(Action::ShowJson);
                        }
                    });
                    header.col(|ui| {
                        ui.strong("Left (%)");
                    });
                    header.col(|ui| {
                        ui.strong("Top (%)");
                    });
                    header.col(|ui| {
                        if ui.button("Clear").on_hover_text("Clear All").clicked() {
                            actions.push(Action::ResetAll);
                        }
                    });
                    header.col(|ui| {
                        if ui.button("Delete").on_hover_text("Delete All").clicked() {
                            actions.push(Action::AskDeleteAll);
                        }
                    });
                })
                .body(|mut body| {
                    for image in session.images() {
                        let id = image.id();
                        let position = session.position(id).unwrap_or_default();
                        body.row(26.0, |mut row| {
                            row.col(|ui| {
                                let active = session.active_id() == Some(id);
                                if ui.radio(active, "").on_hover_text(image.name()).clicked() {
                                    actions.push(Action::Select(Some(id)));
                                }
                            });
                            for axis in Axis::ALL {
                                row.col(|ui| {
                                    let value = position.get(axis).unwrap_or(0.0);
                                    coordinate_field(ui, id, axis, value, drafts, actions);
                                });
                            }
                            row.col(|ui| {
                                if ui.small_button("Clear").clicked() {
                                    actions.push(Action::Reset(id));
                                }
                            });
                            row.col(|ui| {
                                if ui.small_button("Delete").clicked() {
                                    actions.push(Action::Delete(id));
                                }
                            });
                        });
                    }
                });
        });
}

fn coordinate_field(
    ui: &mut egui::Ui,
    id: ImageId,
    axis: Axis,
    value: f64,
    drafts: &mut Drafts,
    actions: &mut Vec<Action>,
) {
    let key = (id, axis);
    let mut text = drafts
        .get(&key)
        .cloned()
        .unwrap_or_else(|| format_number(value));
    let response = ui.add(
        egui::TextEdit::singleline(&mut text)
            .hint_text("0.00")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        actions.push(Action::SetCoordinate(id, axis, text.clone()));
        drafts.insert(key, text);
    } else if !response.has_focus() {
        drafts.remove(&key);
    }
}

fn filmstrip(ctx: &egui::Context, session: &Session<Display>, actions: &mut Vec<Action>) {
    egui::TopBottomPanel::bottom("filmstrip")
        .exact_height(THUMB_SIZE.y + 36.0)
        .show(ctx, |ui| {
            egui::ScrollArea::horizontal().show(ui, |ui| {
                ui.horizontal(|ui| {
                    for image in session.images() {
                        let active = session.active_id() == Some(image.id());
                        ui.vertical(|ui| {
                            ui.set_width(THUMB_SIZE.x);
                            let (rect, response) =
                                ui.allocate_exact_size(THUMB_SIZE, egui::Sense::click());
                            let visuals = ui.visuals();
                            let painter = ui.painter();
                            painter.rect_filled(rect, 4.0, visuals.extreme_bg_color);
                            match image.display().texture() {
                                Some(texture) => {
                                    let fitted = fit_size(
                                        image.display().size(),
                                        rect.shrink(4.0).size(),
                                        true,
                                    );
                                    painter.image(
                                        texture.id(),
                                        egui::Rect::from_center_size(rect.center(), fitted),
                                        full_uv(),
                                        egui::Color32::WHITE,
                                    );
                                }
                                None => {
                                    painter.text(
                                        rect.center(),
                                        egui::Align2::CENTER_CENTER,
                                        "?",
                                        egui::FontId::proportional(24.0),
                                        visuals.weak_text_color(),
                                    );
                                }
                            }
                            let stroke = if active {
                                egui::Stroke::new(2.0, visuals.selection.stroke.color)
                            } else {
                                visuals.widgets.noninteractive.bg_stroke
                            };
                            painter.rect_stroke(rect, 4.0, stroke, egui::StrokeKind::Inside);
                            if response.on_hover_text(image.name()).clicked() {
                                actions.push(Action::Select(Some(image.id())));
                            }
                            let caption = egui::RichText::new(image.name()).small().weak();
                            ui.add(egui::Label::new(caption).truncate());
                        });
                    }
                    let plus = egui::Button::new(egui::RichText::new("+").size(28.0));
                    let add = ui.add_sized(THUMB_SIZE, plus);
                    if add.on_hover_text("Add").clicked() {
                        actions.push(Action::OpenPicker);
                    }
                });
            });
        });
}

fn canvas(
    ctx: &egui::Context,
    session: &Session<Display>,
    marker_half_size: f32,
    actions: &mut Vec<Action>,
) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(image) = session.active_image() else {
            ui.centered_and_justified(|ui| {
                let hint = "Select an image from the filmstrip below to begin";
                ui.label(egui::RichText::new(hint).weak());
            });
            return;
        };
        let id = image.id();
        let display = image.display();

        let available = ui.available_size() - egui::vec2(0.0, CAPTION_HEIGHT);
        let natural = if display.texture().is_some() {
            display.size()
        } else {
            PLACEHOLDER_SIZE
        };
        let size = fit_size(natural, available, false);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
        let mut response = response.on_hover_cursor(egui::CursorIcon::Crosshair);

        let painter = ui.painter();
        match display.texture() {
            Some(texture) => {
                painter.image(texture.id(), rect, full_uv(), egui::Color32::WHITE);
            }
            None => {
                painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("Cannot display {}", image.name()),
                    egui::FontId::proportional(14.0),
                    ui.visuals().weak_text_color(),
                );
            }
        }

        let position = session.position(id).unwrap_or_default();
        if position.is_marked() {
            let left = position.left.unwrap_or(0.0) as f32;
            let top = position.top.unwrap_or(0.0) as f32;
            let corner =
                rect.min + egui::vec2(left / 100.0 * rect.width(), top / 100.0 * rect.height());
            let center = corner + egui::Vec2::splat(marker_half_size);
            painter.circle_filled(center, marker_half_size, ui.visuals().selection.bg_fill);
            let ring = egui::Stroke::new(1.0, egui::Color32::WHITE);
            painter.circle_stroke(center, marker_half_size + 1.5, ring);

            let hit_size = egui::Vec2::splat(marker_half_size * 2.0 + 4.0);
            let marker = egui::Rect::from_center_size(center, hit_size);
            if response.hover_pos().is_some_and(|p| marker.contains(p)) {
                response = response.on_hover_text(position_json(position));
            }
        }

        let button = if response.clicked() {
            Some(PointerButton::Primary)
        } else if response.secondary_clicked() {
            Some(PointerButton::Secondary)
        } else {
            None
        };
        if let (Some(button), Some(pointer)) = (button, response.interact_pointer_pos()) {
            let local = pointer - rect.min;
            actions.push(Action::Plot(
                id,
                PlotEvent {
                    x: local.x as f64,
                    y: local.y as f64,
                    width: rect.width() as f64,
                    height: rect.height() as f64,
                    button,
                },
            ));
        }

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let previous = ui
                .add_enabled(!session.is_first_active(), egui::Button::new("◀"))
                .on_hover_text("Previous");
            if previous.clicked() {
                actions.push(Action::Navigate(Direction::Previous));
            }
            ui.label(egui::RichText::new(image.name()).weak());
            let next = ui
                .add_enabled(!session.is_last_active(), egui::Button::new("▶"))
                .on_hover_text("Next");
            if next.clicked() {
                actions.push(Action::Navigate(Direction::Next));
            }
        });
    });
}

fn full_uv() -> egui::Rect {
    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0))
}

/// Scale `natural` to fit inside `available`, keeping the aspect ratio.
/// Without `upscale` images never grow past their own size.
fn fit_size(natural: egui::Vec2, available: egui::Vec2, upscale: bool) -> egui::Vec2 {
    if natural.x <= 0.0 || natural.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let mut scale = (available.x / natural.x).min(available.y / natural.y).max(0.0);
    if !upscale {
        scale = scale.min(1.0);
    }
    natural * scale
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for HotspotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        if let Some(status) = &self.status {
            if now >= status.expires_at {
                self.status = None;
            } else {
                ctx.request_repaint_after(Duration::from_secs_f64(status.expires_at - now));
            }
        }

        let mut actions = Vec::new();
        self.handle_input(ctx, &mut actions);
        self.toolbar(ctx, &mut actions);

        if self.session.is_empty() {
            upload_surface(ctx, &mut actions);
        } else {
            let marker_half_size = self.config.marker_half_size as f32;
            positions_panel(ctx, &self.session, &mut self.drafts, &mut actions);
            filmstrip(ctx, &self.session, &mut actions);
            canvas(ctx, &self.session, marker_half_size, &mut actions);
        }

        self.json_window(ctx, &mut actions);
        self.confirm_windows(ctx, &mut actions);

        if !actions.is_empty() {
            for action in actions {
                self.apply(ctx, action);
            }
            ctx.request_repaint();
        }
    }
}
