//! SVG pie chart of a month: one slice per expense, plus savings if any

use std::f64::consts::PI;
use std::path::{Path as FsPath, PathBuf};

use anyhow::Context;
use svg::{
    node::element::{path::Data, Circle, Path, Rectangle as Rect, Text},
    Document,
};

use crate::util::entry::{Amount, MonthEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub amount: Amount,
    pub color: String,
}

/// Slices of a month, ready to be drawn
///
/// Slice sizes are relative to the sum of the slices, percentages in the
/// legend are relative to the salary.
#[derive(Debug)]
pub struct PieChart {
    title: String,
    salary: Amount,
    slices: Vec<Slice>,
}

/// `count` colors with evenly spaced hues
pub fn hues(count: usize) -> Vec<String> {
    let step = 360.0 / count as f64;
    (0..count)
        .map(|i| format!("hsl({}, 70%, 65%)", i as f64 * step))
        .collect()
}

impl PieChart {
    pub fn from(entry: &MonthEntry) -> Self {
        let mut parts = entry
            .expenses()
            .iter()
            .map(|e| (e.name.clone(), e.amount))
            .collect::<Vec<_>>();
        if entry.savings().is_positive() {
            parts.push(("Savings".to_string(), entry.savings()));
        }
        let colors = hues(parts.len());
        let slices = parts
            .into_iter()
            .zip(colors)
            .map(|((label, amount), color)| Slice { label, amount, color })
            .collect();
        Self {
            title: entry.label().to_string(),
            salary: entry.salary(),
            slices,
        }
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn to_document(&self, currency: &str) -> Document {
        let legend_height = MARGIN * 2.0 + LEGEND_STEP * self.slices.len() as f64;
        let height = (RADIUS * 2.0 + MARGIN * 2.0).max(legend_height);
        let document = Document::new()
            .set("viewBox", (0.0, 0.0, WIDTH, height))
            .add(self.title_node());
        let document = self.draw_wedges(document);
        self.legend(currency)
            .into_iter()
            .fold(document, |doc, (swatch, text)| doc.add(swatch).add(text))
    }

    pub fn render(&self, file: &FsPath, currency: &str) -> std::io::Result<()> {
        svg::save(file, &self.to_document(currency))
    }

    fn title_node(&self) -> Text {
        Text::new()
            .set("x", CENTER.0)
            .set("y", MARGIN / 2.0 + 4.0)
            .set("text-anchor", "middle")
            .set("font-family", "sans-serif")
            .set("font-size", 14)
            .add(svg::node::Text::new(self.title.clone()))
    }

    fn draw_wedges(&self, mut doc: Document) -> Document {
        let total = self
            .slices
            .iter()
            .filter(|s| s.amount.is_positive())
            .map(|s| s.amount)
            .sum::<Amount>();
        if !total.is_positive() {
            return doc.add(full_circle("none").set("stroke", "gray"));
        }
        // start at the top, clockwise
        let mut angle = -PI / 2.0;
        for slice in self.slices.iter().filter(|s| s.amount.is_positive()) {
            let sweep = slice.amount.ratio(total) * 2.0 * PI;
            if sweep >= 2.0 * PI - 1e-9 {
                return doc.add(full_circle(&slice.color).set("stroke", "white"));
            }
            let start = point(angle);
            angle += sweep;
            let end = point(angle);
            let large = if sweep > PI { 1.0 } else { 0.0 };
            let data = Data::new()
                .move_to(CENTER)
                .line_to(start)
                .elliptical_arc_to((RADIUS, RADIUS, 0.0, large, 1.0, end.0, end.1))
                .close();
            doc = doc.add(
                Path::new()
                    .set("fill", slice.color.clone())
                    .set("stroke", "white")
                    .set("stroke-width", 1)
                    .set("d", data),
            );
        }
        doc
    }

    fn legend(&self, currency: &str) -> Vec<(Rect, Text)> {
        let x = CENTER.0 + RADIUS + MARGIN;
        self.slices
            .iter()
            .enumerate()
            .map(|(i, slice)| {
                let y = MARGIN + LEGEND_STEP * i as f64;
                let swatch = Rect::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", 14)
                    .set("height", 14)
                    .set("fill", slice.color.clone());
                let caption = format!(
                    "{}: {}{} ({}%)",
                    slice.label,
                    currency,
                    slice.amount,
                    slice.amount.percent_of(self.salary).round()
                );
                let text = Text::new()
                    .set("x", x + 20.0)
                    .set("y", y + 12.0)
                    .set("font-family", "sans-serif")
                    .set("font-size", 13)
                    .add(svg::node::Text::new(caption));
                (swatch, text)
            })
            .collect()
    }
}

fn full_circle(fill: &str) -> Circle {
    Circle::new()
        .set("cx", CENTER.0)
        .set("cy", CENTER.1)
        .set("r", RADIUS)
        .set("fill", fill)
}

fn point(angle: f64) -> (f64, f64) {
    (
        CENTER.0 + RADIUS * angle.cos(),
        CENTER.1 + RADIUS * angle.sin(),
    )
}

/// Where the chart of the `idx`-th recorded month goes
pub fn chart_path(dir: &FsPath, idx: usize, label: &str) -> PathBuf {
    let name = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect::<String>();
    dir.join(format!("{:02}-{}.svg", idx + 1, name))
}

/// Draw the chart of a month into `dir`
pub fn write_chart(dir: &FsPath, idx: usize, entry: &MonthEntry, currency: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create chart directory {}", dir.display()))?;
    let file = chart_path(dir, idx, entry.label());
    let chart = PieChart::from(entry);
    tracing::debug!(file = %file.display(), slices = chart.slices().len(), "drawing chart");
    chart
        .render(&file, currency)
        .with_context(|| format!("cannot write chart {}", file.display()))?;
    tracing::info!(file = %file.display(), "chart written");
    Ok(file)
}

const RADIUS: f64 = 180.0;
const MARGIN: f64 = 30.0;
const CENTER: (f64, f64) = (MARGIN + RADIUS, MARGIN + RADIUS);
const LEGEND_STEP: f64 = 24.0;
const WIDTH: f64 = 900.0;

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::entry::Expense;

    fn month(salary: isize, expenses: &[(&str, isize)]) -> MonthEntry {
        MonthEntry::new(
            "2024-Jan",
            Amount::units(salary),
            expenses
                .iter()
                .map(|(n, a)| Expense::new(n, Amount::units(*a)))
                .collect(),
        )
    }

    #[test]
    fn evenly_spaced_hues() {
        assert_eq!(
            hues(4),
            vec![
                "hsl(0, 70%, 65%)",
                "hsl(90, 70%, 65%)",
                "hsl(180, 70%, 65%)",
                "hsl(270, 70%, 65%)"
            ]
        );
        assert!(hues(0).is_empty());
    }

    #[test]
    fn savings_slice_only_when_positive() {
        let chart = PieChart::from(&month(1000, &[("Rent", 400)]));
        let labels = chart.slices().iter().map(|s| s.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Rent", "Savings"]);
        assert_eq!(chart.slices()[1].amount, Amount::units(600));
        assert_eq!(chart.slices()[1].color, "hsl(180, 70%, 65%)");

        let chart = PieChart::from(&month(1000, &[("Rent", 600), ("Car", 400)]));
        assert_eq!(chart.slices().len(), 2);
        let chart = PieChart::from(&month(1000, &[("Rent", 1600)]));
        assert_eq!(chart.slices().len(), 1);
    }

    #[test]
    fn document_contents() {
        let chart = PieChart::from(&month(50000, &[("Rent", 16000), ("Food", 4000)]));
        let svg = chart.to_document("₹").to_string();
        assert_eq!(svg.matches("<path").count(), 3);
        assert!(svg.contains("Rent: ₹16000.00 (32%)"));
        assert!(svg.contains("Savings: ₹30000.00 (60%)"));
        assert!(svg.contains("2024-Jan"));
    }

    #[test]
    fn single_slice_is_a_circle() {
        let chart = PieChart::from(&month(1000, &[]));
        let svg = chart.to_document("$").to_string();
        assert_eq!(svg.matches("<path").count(), 0);
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.contains("Savings: $1000.00 (100%)"));
    }

    #[test]
    fn nothing_to_draw() {
        let chart = PieChart::from(&month(0, &[("Rent", 0)]));
        let svg = chart.to_document("$").to_string();
        assert!(svg.contains("stroke=\"gray\""));
    }

    #[test]
    fn chart_file_names() {
        let dir = FsPath::new("out");
        assert_eq!(chart_path(dir, 0, "2024-Jan"), PathBuf::from("out/01-2024-Jan.svg"));
        assert_eq!(chart_path(dir, 11, "March 2024"), PathBuf::from("out/12-March_2024.svg"));
    }
}
