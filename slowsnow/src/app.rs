//! slowSnow host application — embeds the snowfall overlay.

use chrono::Local;
use egui::{Align2, Color32, Context, FontId, Key};
use serde::{Deserialize, Serialize};
use snowcore::storage::config_dir;
use snowcore::{PrefStore, Snowfall, SnowfallConfig};

/// Night-sky backdrop the snow reads well against.
const BACKDROP: Color32 = Color32::from_rgb(24, 28, 38);

/// Host settings. The snow module only ever reads these; whoever manages
/// the viewer's profile writes them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShellSettings {
    /// Viewer's name; scopes the snow preference.
    #[serde(default)]
    pub user_name: String,
}

impl ShellSettings {
    pub fn load() -> Self {
        let path = config_dir("slowsnow").join("settings.json");
        snowcore::storage::read_json(&path).unwrap_or_default()
    }
}

pub struct SlowSnowApp {
    settings: ShellSettings,
    snow: Snowfall,
    show_about: bool,
}

impl SlowSnowApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        apply_theme(&cc.egui_ctx);

        let settings = ShellSettings::load();
        let user = if settings.user_name.is_empty() {
            None
        } else {
            Some(settings.user_name.as_str())
        };
        let mut snow = Snowfall::new(
            SnowfallConfig::default(),
            PrefStore::for_app("slowsnow"),
            user,
        );
        snow.boot();

        Self {
            settings,
            snow,
            show_about: false,
        }
    }

    fn viewer_label(&self) -> &str {
        if self.settings.user_name.is_empty() {
            "anon"
        } else {
            &self.settings.user_name
        }
    }
}

impl eframe::App for SlowSnowApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(Key::Space)) && !self.show_about {
            self.snow.toggle();
        }

        // Menu bar
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("file", |ui| {
                    if ui.button("quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("view", |ui| {
                    let label = if self.snow.is_enabled() {
                        "snow off    space"
                    } else {
                        "snow on     space"
                    };
                    if ui.button(label).clicked() {
                        self.snow.toggle();
                        ui.close_menu();
                    }
                });
                ui.menu_button("help", |ui| {
                    if ui.button("about").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(Local::now().format("%H:%M").to_string());
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let state = if self.snow.is_enabled() {
                "snow falling"
            } else {
                "snow paused"
            };
            ui.label(format!(
                "{}  |  {} flakes  |  viewer: {}",
                state,
                self.snow.config().flake_count,
                self.viewer_label()
            ));
        });

        // Snow goes in first: above the backdrop fill, below the text
        // and the surrounding panels.
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKDROP))
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                ui.allocate_rect(rect, egui::Sense::hover());

                let painter = ui.painter();
                self.snow.frame(ctx, painter);

                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "a quiet evening",
                    FontId::proportional(22.0),
                    Color32::from_gray(220),
                );
                painter.text(
                    egui::pos2(rect.center().x, rect.center().y + 28.0),
                    Align2::CENTER_CENTER,
                    "press space to toggle the snow",
                    FontId::proportional(13.0),
                    Color32::from_gray(140),
                );
            });

        // About dialog
        if self.show_about {
            egui::Window::new("about slowSnow")
                .collapsible(false)
                .resizable(false)
                .default_width(300.0)
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("slowSnow");
                        ui.label("version 0.1.0");
                        ui.add_space(8.0);
                        ui.label("decorative snowfall for the slow computer");
                    });
                    ui.add_space(8.0);
                    ui.separator();
                    ui.add_space(4.0);
                    ui.label("controls:");
                    ui.label("  space: snow on/off");
                    ui.add_space(4.0);
                    ui.label("your choice is remembered per viewer,");
                    ui.label("with a shared fallback for guests.");
                    ui.add_space(8.0);
                    ui.vertical_centered(|ui| {
                        if ui.button("ok").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}

fn apply_theme(ctx: &Context) {
    let mut style = (*ctx.style()).clone();
    let mut visuals = egui::Visuals::dark();
    visuals.window_rounding = egui::Rounding::ZERO;
    visuals.menu_rounding = egui::Rounding::ZERO;
    visuals.window_shadow = egui::epaint::Shadow::NONE;
    visuals.popup_shadow = egui::epaint::Shadow::NONE;
    style.visuals = visuals;
    ctx.set_style(style);
}
