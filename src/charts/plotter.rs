//! Chart Plotter Module
//! Draws the dashboard charts with egui_plot from aggregated rows.

use crate::stats::{
    AdoptionTrend, ModeTotal, RegionSalesVsStations, StationLoad, TrendSeries, YearlyTotal,
};
use egui::{Align2, Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};
use std::collections::{BTreeMap, BTreeSet};

/// Accent color used for headings and single-series charts.
pub const ACCENT_COLOR: Color32 = Color32::from_rgb(114, 209, 255);
/// Color for points whose value is undefined.
pub const MISSING_COLOR: Color32 = Color32::from_rgb(120, 120, 120);

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(114, 209, 255), // Sky
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

// Continuous teal scale endpoints
const TEAL_LOW: [f32; 3] = [209.0, 238.0, 234.0];
const TEAL_HIGH: [f32; 3] = [42.0, 86.0, 116.0];

const CHART_HEIGHT: f32 = 320.0;

/// One named line of `(x, y)` points.
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Map `value` within `[min, max]` onto the teal scale.
    pub fn teal_scale(value: f64, min: f64, max: f64) -> Color32 {
        let t = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0) as f32
        } else {
            0.5
        };
        let channel = |i: usize| (TEAL_LOW[i] + (TEAL_HIGH[i] - TEAL_LOW[i]) * t).round() as u8;
        Color32::from_rgb(channel(0), channel(1), channel(2))
    }

    /// Min and max of the defined values, if any.
    pub fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
        values.into_iter().filter(|v| v.is_finite()).fold(None, |range, v| {
            Some(match range {
                Some((lo, hi)) => (f64::min(lo, v), f64::max(hi, v)),
                None => (v, v),
            })
        })
    }

    /// Series of the per-mode sales trend.
    pub fn trend_series(trend: &[TrendSeries]) -> Vec<NamedSeries> {
        trend
            .iter()
            .map(|s| NamedSeries {
                name: s.mode.clone(),
                points: s.points.iter().map(|&(x, y)| [x as f64, y]).collect(),
            })
            .collect()
    }

    /// One series per region of the yearly totals.
    pub fn growth_series(growth: &[YearlyTotal]) -> Vec<NamedSeries> {
        let mut by_region: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
        for row in growth {
            by_region
                .entry(row.region.as_str())
                .or_default()
                .push([row.year as f64, row.value]);
        }
        by_region
            .into_iter()
            .map(|(name, points)| NamedSeries {
                name: name.to_string(),
                points,
            })
            .collect()
    }

    /// Lines with markers, x axis as years.
    pub fn draw_year_lines(ui: &mut egui::Ui, id: &str, series: &[NamedSeries], y_label: &str) {
        Plot::new(id)
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(y_label)
            .x_axis_formatter(|mark, _range| Self::integer_label(mark.value))
            .show(ui, |plot_ui| {
                for (i, s) in series.iter().enumerate() {
                    let color = Self::series_color(i);
                    plot_ui.line(
                        Line::new(PlotPoints::new(s.points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(&s.name),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::new(s.points.clone()))
                            .radius(4.0)
                            .color(color)
                            .name(&s.name),
                    );
                }
            });
    }

    /// Sessions per station, bars colored by wait time.
    pub fn draw_station_load(ui: &mut egui::Ui, stations: &[StationLoad]) {
        let labels: Vec<String> = stations.iter().map(|s| s.station_id.clone()).collect();
        let range = Self::value_range(stations.iter().filter_map(|s| s.wait_minutes));

        let bars: Vec<Bar> = stations
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let fill = match (s.wait_minutes, range) {
                    (Some(wait), Some((lo, hi))) => Self::teal_scale(wait, lo, hi),
                    _ => MISSING_COLOR,
                };
                let wait = s
                    .wait_minutes
                    .map_or_else(|| "n/a".to_string(), |w| format!("{:.0} min", w));
                Bar::new(i as f64, s.total_sessions as f64)
                    .width(0.7)
                    .fill(fill)
                    .name(format!("{} (wait {})", s.station_id, wait))
            })
            .collect();

        Plot::new("station_load")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("StationID")
            .y_axis_label("TotalSessions")
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("TotalSessions"));
            });

        if let Some((lo, hi)) = range {
            Self::draw_scale_caption(ui, "AvgWaitTime", lo, hi);
        }
    }

    /// Total sales against existing stations, one labelled point per region.
    pub fn draw_sales_vs_stations(ui: &mut egui::Ui, rows: &[RegionSalesVsStations]) {
        let range = Self::value_range(rows.iter().map(|r| r.ev_sales));

        Plot::new("sales_vs_stations")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("ExistingStations")
            .y_axis_label("EV Sales")
            .show(ui, |plot_ui| {
                for row in rows {
                    let (lo, hi) = range.unwrap_or((0.0, 1.0));
                    let scale = if hi > 0.0 { (row.ev_sales / hi).max(0.0) } else { 0.0 };
                    let x = row.existing_stations as f64;

                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[x, row.ev_sales]]))
                            .radius(4.0 + 10.0 * scale as f32)
                            .color(Self::teal_scale(row.ev_sales, lo, hi))
                            .name(&row.region),
                    );
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(x, row.ev_sales),
                            RichText::new(&row.region).size(11.0),
                        )
                        .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            });
    }

    /// Wait time against sessions for every station with a parsed wait.
    pub fn draw_sessions_vs_wait(ui: &mut egui::Ui, stations: &[StationLoad]) {
        let range = Self::value_range(stations.iter().filter_map(|s| s.wait_minutes));

        Plot::new("sessions_vs_wait")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("TotalSessions")
            .y_axis_label("AvgWaitTime")
            .show(ui, |plot_ui| {
                let Some((lo, hi)) = range else {
                    return;
                };
                for s in stations {
                    if let Some(wait) = s.wait_minutes {
                        plot_ui.points(
                            Points::new(PlotPoints::new(vec![[s.total_sessions as f64, wait]]))
                                .radius(5.0)
                                .color(Self::teal_scale(wait, lo, hi))
                                .name(&s.station_id),
                        );
                    }
                }
            });
    }

    /// Grouped bars: regions on the x axis, one bar per mode.
    pub fn draw_mode_totals(ui: &mut egui::Ui, totals: &[ModeTotal]) {
        let regions: Vec<String> = totals
            .iter()
            .map(|t| t.region.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let modes: Vec<&str> = totals
            .iter()
            .map(|t| t.mode.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let group_width = 0.8;
        let bar_width = group_width / modes.len().max(1) as f64;

        let charts: Vec<BarChart> = modes
            .iter()
            .enumerate()
            .map(|(j, mode)| {
                let offset = (j as f64 - (modes.len() as f64 - 1.0) / 2.0) * bar_width;
                let color = Self::series_color(j);
                let bars = totals
                    .iter()
                    .filter(|t| t.mode == *mode)
                    .filter_map(|t| {
                        let x = regions.iter().position(|r| *r == t.region)? as f64;
                        Some(
                            Bar::new(x + offset, t.value)
                                .width(bar_width * 0.95)
                                .name(format!("{} / {}", t.region, mode)),
                        )
                    })
                    .collect();
                BarChart::new(bars).color(color).name(*mode)
            })
            .collect();

        Plot::new("mode_totals")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("region")
            .y_axis_label("value")
            .x_axis_formatter(move |mark, _range| Self::category_label(&regions, mark.value))
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    /// Adoption rate against mean wait, with the OLS trend line.
    pub fn draw_adoption_vs_wait(ui: &mut egui::Ui, trend: &AdoptionTrend) {
        let rows = &trend.joined.rows;
        let range = Self::value_range(rows.iter().map(|r| r.avg_wait_minutes));
        let x_range = Self::value_range(rows.iter().map(|r| r.adoption_rate));

        Plot::new("adoption_vs_wait")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("EV_AdoptionRate")
            .y_axis_label("AvgWaitTime")
            .show(ui, |plot_ui| {
                let (lo, hi) = range.unwrap_or((0.0, 1.0));
                for row in rows {
                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[
                            row.adoption_rate,
                            row.avg_wait_minutes,
                        ]]))
                        .radius(6.0)
                        .color(Self::teal_scale(row.avg_wait_minutes, lo, hi))
                        .name(&row.region),
                    );
                }

                if let (Some(fit), Some((x0, x1))) = (trend.fit, x_range) {
                    plot_ui.line(
                        Line::new(PlotPoints::new(vec![
                            [x0, fit.predict(x0)],
                            [x1, fit.predict(x1)],
                        ]))
                        .color(ACCENT_COLOR)
                        .width(2.0)
                        .name(format!("OLS trend (R² = {:.3})", fit.r_squared)),
                    );
                }
            });
    }

    fn draw_scale_caption(ui: &mut egui::Ui, label: &str, lo: f64, hi: f64) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
            for step in 0..=4 {
                let value = lo + (hi - lo) * step as f64 / 4.0;
                let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                ui.painter()
                    .rect_filled(rect, 2.0, Self::teal_scale(value, lo, hi));
                ui.label(RichText::new(format!("{:.0}", value)).size(11.0));
            }
        });
    }

    /// Label for a category axis tick; blank between categories.
    fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if (value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    fn integer_label(value: f64) -> String {
        if (value - value.round()).abs() < 1e-6 {
            format!("{:.0}", value)
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teal_scale_spans_endpoints() {
        assert_eq!(
            ChartPlotter::teal_scale(0.0, 0.0, 10.0),
            Color32::from_rgb(209, 238, 234)
        );
        assert_eq!(
            ChartPlotter::teal_scale(10.0, 0.0, 10.0),
            Color32::from_rgb(42, 86, 116)
        );
        assert_eq!(
            ChartPlotter::teal_scale(99.0, 0.0, 10.0),
            ChartPlotter::teal_scale(10.0, 0.0, 10.0)
        );
    }

    #[test]
    fn value_range_ignores_non_finite() {
        assert_eq!(
            ChartPlotter::value_range([3.0, f64::NAN, -1.0, 7.5]),
            Some((-1.0, 7.5))
        );
        assert_eq!(ChartPlotter::value_range(Vec::<f64>::new()), None);
    }

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let labels = vec!["S1".to_string(), "S2".to_string()];
        assert_eq!(ChartPlotter::category_label(&labels, 1.0), "S2");
        assert_eq!(ChartPlotter::category_label(&labels, 0.5), "");
        assert_eq!(ChartPlotter::category_label(&labels, 2.0), "");
        assert_eq!(ChartPlotter::category_label(&labels, -1.0), "");
    }

    #[test]
    fn growth_series_group_by_region() {
        let growth = vec![
            YearlyTotal {
                region: "West".to_string(),
                year: 2022,
                value: 120.0,
            },
            YearlyTotal {
                region: "East".to_string(),
                year: 2022,
                value: 60.0,
            },
            YearlyTotal {
                region: "West".to_string(),
                year: 2023,
                value: 150.0,
            },
        ];

        let series = ChartPlotter::growth_series(&growth);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "East");
        assert_eq!(series[1].points, vec![[2022.0, 120.0], [2023.0, 150.0]]);
    }
}
