use crate::model::{GanttChart, GanttRow};
use crate::ui::theme;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const SIDE_MARGIN: f32 = 12.0;

/// Render the laid-out chart rows, scaled to the panel width.
pub fn show_gantt_chart(chart: &GanttChart, selected: Option<usize>, ui: &mut Ui) {
    let rows = chart.rows();
    if rows.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("Nothing to chart").color(theme::TEXT_DIM));
        });
        return;
    }

    let available = ui.available_size();
    let chart_height = rows.len() as f32 * (ROW_HEIGHT + ROW_PADDING) + ROW_PADDING;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(available.x, chart_height.max(available.y)),
                Sense::hover(),
            );
            let canvas = response.rect;
            painter.rect_filled(canvas, 0.0, theme::BG_DARK);

            let track_left = canvas.left() + SIDE_MARGIN;
            let track_width = (canvas.width() - SIDE_MARGIN * 2.0).max(1.0);

            for (i, row) in rows.iter().enumerate() {
                let y = canvas.top() + i as f32 * (ROW_HEIGHT + ROW_PADDING) + ROW_PADDING;
                if i % 2 == 0 {
                    painter.rect_filled(
                        Rect::from_min_size(Pos2::new(canvas.left(), y), Vec2::new(canvas.width(), ROW_HEIGHT)),
                        0.0,
                        theme::BG_PANEL,
                    );
                }
                let bar_rect = draw_bar(&painter, row, i, track_left, track_width, y, selected == Some(i));

                let bar_response = ui.interact(bar_rect, egui::Id::new(("gantt-bar", i)), Sense::hover());
                if bar_response.hovered() {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("gantt-tip", i)),
                        |ui| {
                            ui.strong(&row.name);
                            ui.label(format!("Offset {:.1}%, width {:.1}%", row.offset_pct, row.width_pct));
                        },
                    );
                }
            }

            if let Some(x) = chart.now_marker_pct().and_then(|pct| now_line_x(pct, track_left, track_width)) {
                draw_now_line(&painter, x, canvas);
            }
        });
}

fn pct_to_px(pct: f64, track_width: f32) -> f32 {
    (pct / 100.0) as f32 * track_width
}

/// Horizontal position of the now line, or `None` once now has left the track.
fn now_line_x(pct: f64, track_left: f32, track_width: f32) -> Option<f32> {
    (0.0..=100.0)
        .contains(&pct)
        .then(|| track_left + pct_to_px(pct, track_width))
}

fn draw_bar(
    painter: &egui::Painter,
    row: &GanttRow,
    index: usize,
    track_left: f32,
    track_width: f32,
    y: f32,
    is_selected: bool,
) -> Rect {
    let x_start = track_left + pct_to_px(row.offset_pct, track_width);
    // Negative widths come from events that end before they start
    let bar_width = pct_to_px(row.width_pct, track_width).max(theme::MIN_BAR_WIDTH);
    let inset = theme::BAR_INSET;

    let bar_rect = Rect::from_min_size(
        Pos2::new(x_start, y + inset),
        Vec2::new(bar_width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, theme::bar_color(index));
    if is_selected {
        painter.rect_stroke(bar_rect.expand(1.5), rounding, Stroke::new(1.5, Color32::WHITE));
    }

    // Label inside the bar, clipped to it
    painter.with_clip_rect(bar_rect.shrink(2.0)).text(
        Pos2::new(bar_rect.left() + 6.0, bar_rect.center().y),
        egui::Align2::LEFT_CENTER,
        &row.name,
        theme::font_bar(),
        theme::TEXT_ON_BAR,
    );

    bar_rect
}

fn draw_now_line(painter: &egui::Painter, x: f32, canvas: Rect) {
    painter.line_segment(
        [Pos2::new(x, canvas.top()), Pos2::new(x, canvas.bottom())],
        Stroke::new(1.5, theme::NOW_LINE),
    );

    // Top badge
    let badge_w = 36.0;
    let badge_rect = Rect::from_min_size(Pos2::new(x - badge_w / 2.0, canvas.top()), Vec2::new(badge_w, 14.0));
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::NOW_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Now",
        theme::font_small(),
        Color32::WHITE,
    );
}
