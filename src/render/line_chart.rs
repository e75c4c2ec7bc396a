use crate::core::frontier::batch_size_at;
use crate::core::smoothing::basis_spline;
use crate::domain::model::{Estimate, Precision};
use crate::render::viewport::Viewport;

pub const X_LABEL: &str = "Sequence Length";
pub const Y_LABEL: &str = "Batch Size";

const AXIS_WIDTH: usize = 7;

#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub width: usize,
    pub height: usize,
}

/// Character grid with row 0 at the top.
struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    fn new(area: PlotArea) -> Self {
        Self {
            width: area.width,
            height: area.height,
            cells: vec![' '; area.width * area.height],
        }
    }

    fn plot(&mut self, col: i64, row: i64, glyph: char) {
        if col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height {
            self.cells[row as usize * self.width + col as usize] = glyph;
        }
    }

    /// Bresenham, so steep parts of a curve stay connected.
    fn line(&mut self, from: (i64, i64), to: (i64, i64), glyph: char) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x, y, glyph);
            if (x, y) == to {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn row(&self, row: usize) -> String {
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .collect()
    }
}

/// Normalised screen position to a canvas cell. Off-canvas positions are
/// kept so lines can be clipped by `Canvas::plot`.
fn to_cell(area: PlotArea, screen: (f64, f64)) -> (i64, i64) {
    let col = (screen.0 * area.width.saturating_sub(1) as f64).round();
    let row = ((1.0 - screen.1) * area.height.saturating_sub(1) as f64).round();
    (col as i64, row as i64)
}

/// Frontier curves with y-axis labels, x-axis labels and a legend.
pub fn render(
    estimate: &Estimate,
    area: PlotArea,
    viewport: &Viewport,
    samples_per_segment: usize,
) -> String {
    let mut canvas = Canvas::new(area);

    // Narrow precisions are drawn last and win on overlaps.
    for row in &estimate.precisions {
        let precision = row.footprint.precision;
        let data: Vec<(f64, f64)> = row
            .frontier
            .points
            .iter()
            .map(|p| (p.seq_length as f64, p.batch_size))
            .collect();

        let cells: Vec<(i64, i64)> = basis_spline(&data, samples_per_segment)
            .into_iter()
            .map(|(seq, batch)| to_cell(area, viewport.apply(seq, batch)))
            .collect();

        match cells.as_slice() {
            [] => {}
            [only] => canvas.plot(only.0, only.1, precision.marker()),
            _ => {
                for pair in cells.windows(2) {
                    if pair[0] != pair[1] {
                        canvas.line(pair[0], pair[1], precision.marker());
                    }
                }
            }
        }
    }

    let (x_lo, x_hi) = viewport.x_domain();
    let (y_lo, y_hi) = viewport.y_domain();
    let mut lines = Vec::with_capacity(area.height + 4);

    lines.push(format!("{:>w$}", Y_LABEL, w = AXIS_WIDTH));
    for r in 0..area.height {
        let label = if r == 0 {
            format!("{:.0}", y_hi)
        } else if r == area.height - 1 {
            format!("{:.0}", y_lo)
        } else if r == area.height / 2 {
            format!("{:.0}", (y_lo + y_hi) / 2.0)
        } else {
            String::new()
        };
        lines.push(format!("{:>w$} |{}", label, canvas.row(r), w = AXIS_WIDTH - 2));
    }
    lines.push(format!("{:>w$} +{}", "", "-".repeat(area.width), w = AXIS_WIDTH - 2));

    let left = format!("{:.0}", x_lo);
    let mid = format!("{:.0}", (x_lo + x_hi) / 2.0);
    let right = format!("{:.0}", x_hi);
    let mut ticks = vec![' '; area.width + 2];
    place(&mut ticks, 0, &left);
    place(&mut ticks, (area.width / 2).saturating_sub(mid.len() / 2), &mid);
    place(&mut ticks, (area.width + 1).saturating_sub(right.len()), &right);
    lines.push(format!(
        "{:>w$}{}",
        "",
        ticks.into_iter().collect::<String>(),
        w = AXIS_WIDTH - 1
    ));
    lines.push(format!(
        "{:>w$}{:^width$}",
        "",
        X_LABEL,
        w = AXIS_WIDTH,
        width = area.width
    ));
    lines.push(legend(estimate));

    lines.join("\n")
}

fn place(buffer: &mut [char], start: usize, text: &str) {
    for (i, ch) in text.chars().enumerate() {
        if let Some(slot) = buffer.get_mut(start + i) {
            *slot = ch;
        }
    }
}

pub fn legend(estimate: &Estimate) -> String {
    let entries: Vec<String> = estimate
        .precisions
        .iter()
        .map(|p| {
            let precision = p.footprint.precision;
            format!("{} {} ({})", precision.marker(), precision, precision.color())
        })
        .collect();
    format!("Legend: {}", entries.join("  "))
}

/// What hovering a chart cell would show.
pub fn tooltip_at_cell(area: PlotArea, viewport: &Viewport, col: usize, row: usize) -> String {
    let sx = col as f64 / area.width.saturating_sub(1).max(1) as f64;
    let sy = 1.0 - row as f64 / area.height.saturating_sub(1).max(1) as f64;
    let (seq, batch) = viewport.invert((sx, sy));
    format!("Sequence Length: {:.0}\nBatch Size: {:.0}", seq, batch)
}

/// Batch size each precision allows at `seq_length`. `None` when the
/// precision has no memory left.
pub fn batch_sizes_at(estimate: &Estimate, seq_length: u32) -> Vec<(Precision, Option<f64>)> {
    estimate
        .precisions
        .iter()
        .map(|p| {
            let available = p.frontier.available_memory_gb;
            let batch = (available > 0.0 && estimate.per_token_memory_gb > 0.0 && seq_length > 0)
                .then(|| batch_size_at(available, estimate.per_token_memory_gb, seq_length));
            (p.footprint.precision, batch)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::estimate;
    use crate::domain::model::{CalculatorMode, DeviceSpec, ModelSpec, ReadyInputs};

    fn llama_on(memory_gb: f64) -> Estimate {
        estimate(&ReadyInputs {
            model: ModelSpec {
                name: Some("LLaMA 2 (7B)".to_string()),
                params_billions: 7.0,
                hidden_size: 4096,
                intermediate_size: Some(11008),
                num_layers: 32,
            },
            device: DeviceSpec::new("Test", memory_gb),
            mode: CalculatorMode::Standard,
        })
    }

    #[test]
    fn test_render_draws_every_fitting_precision() {
        let area = PlotArea {
            width: 60,
            height: 16,
        };
        let chart = render(&llama_on(40.0), area, &Viewport::identity(), 2);

        for marker in ['#', '*', '+', 'o'] {
            let plotted = chart
                .lines()
                .filter(|l| l.contains('|'))
                .any(|l| l.contains(marker));
            assert!(plotted, "marker {} missing:\n{}", marker, chart);
        }
        assert!(chart.contains(X_LABEL));
        assert!(chart.contains("4096"));
        assert!(chart.contains("128"));
        assert!(chart.contains("#e45f5b"));
    }

    #[test]
    fn test_render_skips_precisions_without_room() {
        let area = PlotArea {
            width: 40,
            height: 10,
        };
        let chart = render(&llama_on(24.0), area, &Viewport::identity(), 1);
        let plot_rows: Vec<&str> = chart.lines().skip(1).take(area.height).collect();
        assert!(plot_rows.iter().all(|l| !l.contains('#')));
        assert!(plot_rows.iter().any(|l| l.contains('o')));
    }

    #[test]
    fn test_zoomed_axis_labels() {
        let area = PlotArea {
            width: 40,
            height: 10,
        };
        let viewport = Viewport::from_controls(2.0, 0.5, 0.5).unwrap();
        let chart = render(&llama_on(24.0), area, &viewport, 1);
        assert!(chart.contains("1024"));
        assert!(chart.contains("2048"));
    }

    #[test]
    fn test_tooltip_inverts_cell() {
        let area = PlotArea {
            width: 41,
            height: 17,
        };
        let tooltip = tooltip_at_cell(area, &Viewport::identity(), 20, 8);
        assert_eq!(tooltip, "Sequence Length: 2048\nBatch Size: 64");
    }

    #[test]
    fn test_batch_sizes_at() {
        let estimate = llama_on(24.0);
        let at = batch_sizes_at(&estimate, 1000);
        assert_eq!(at[0], (Precision::Fp32, None));
        let (precision, batch) = at[1];
        assert_eq!(precision, Precision::Fp16);
        // 10 GB / (1000 × 0.000524288 GB)
        assert!((batch.unwrap() - 19.073486328125).abs() < 1e-9);
    }
}
