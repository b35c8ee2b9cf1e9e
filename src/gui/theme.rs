//! テーマ設定 - ライトテーマ

use egui::{Color32, CornerRadius, Stroke, Style, Visuals};

/// カラーパレット
pub struct Colors;

impl Colors {
    pub const BG_PANEL: Color32 = Color32::from_rgb(246, 247, 250);
    pub const BG_GROUP: Color32 = Color32::from_rgb(255, 255, 255);
    pub const BG_LOG: Color32 = Color32::from_rgb(236, 239, 244);
    pub const ACCENT: Color32 = Color32::from_rgb(37, 99, 235);
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(17, 24, 39);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(107, 114, 128);
    pub const SUCCESS: Color32 = Color32::from_rgb(22, 163, 74);
    pub const WARNING: Color32 = Color32::from_rgb(217, 119, 6);
    pub const ERROR: Color32 = Color32::from_rgb(220, 38, 38);
    pub const BORDER: Color32 = Color32::from_rgb(209, 213, 219);
}

/// フォーム向けのライトテーマ
pub fn light_theme() -> Style {
    let mut visuals = Visuals::light();

    visuals.panel_fill = Colors::BG_PANEL;
    visuals.window_fill = Colors::BG_GROUP;
    visuals.extreme_bg_color = Colors::BG_GROUP;
    visuals.faint_bg_color = Colors::BG_LOG;

    let radius = CornerRadius::same(6);
    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.corner_radius = radius;
    }
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, Colors::BORDER);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, Colors::ACCENT);
    visuals.widgets.active.bg_fill = Colors::ACCENT;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.selection.bg_fill = Colors::ACCENT.gamma_multiply(0.25);
    visuals.selection.stroke = Stroke::new(1.0, Colors::ACCENT);

    Style {
        visuals,
        ..Style::default()
    }
}
