pub mod bar_chart;
pub mod line_chart;
pub mod viewport;

use crate::domain::model::Estimate;
use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use line_chart::PlotArea;
use viewport::Viewport;

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub bar_width: usize,
    pub plot: PlotArea,
    pub viewport: Viewport,
    pub samples_per_segment: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            bar_width: 50,
            plot: PlotArea {
                width: 64,
                height: 20,
            },
            viewport: Viewport::identity(),
            samples_per_segment: 2,
        }
    }
}

impl ChartOptions {
    pub fn new(bar_width: usize, plot_width: usize, plot_height: usize, viewport: Viewport) -> Result<Self> {
        validate_range("bar_width", bar_width, 16, 400)?;
        validate_range("plot_width", plot_width, 16, 400)?;
        validate_range("plot_height", plot_height, 4, 200)?;
        Ok(Self {
            bar_width,
            plot: PlotArea {
                width: plot_width,
                height: plot_height,
            },
            viewport,
            ..Self::default()
        })
    }
}

/// Both charts as they appear in the terminal.
pub fn render_text(estimate: &Estimate, options: &ChartOptions) -> String {
    let model = estimate.model.name.as_deref().unwrap_or("Custom model");
    let mut out = String::new();

    out.push_str(&format!(
        "{} on {} ({} GB)\n\n",
        model,
        estimate.device.name,
        format_gb(estimate.device.memory_gb)
    ));
    out.push_str(estimate.mode.footprint_title());
    out.push('\n');
    out.push_str(&bar_chart::render(estimate, options.bar_width));
    out.push_str("\n\n");
    out.push_str(estimate.mode.frontier_title());
    out.push('\n');

    if estimate.frontier_drawable {
        out.push_str(&line_chart::render(
            estimate,
            options.plot,
            &options.viewport,
            options.samples_per_segment,
        ));
    } else {
        out.push_str("No precision leaves memory for inference on this device.");
    }
    out.push('\n');
    out
}

/// Prints a GB amount the way a number input shows it: no trailing zeros.
pub fn format_gb(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
