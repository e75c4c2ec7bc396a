use crate::domain::model::{Estimate, PrecisionEstimate};
use crate::render::format_gb;

pub const OUT_OF_MEMORY: &str = "Out of Memory";

const MODEL: char = '█';
const ACTIVATION: char = '▒';
const REMAINING: char = '░';
const DASH: char = '-';

/// One row per precision: title, stacked bar, `used / capacity GB`.
pub fn render(estimate: &Estimate, width: usize) -> String {
    let title_width = estimate
        .precisions
        .iter()
        .map(|p| p.footprint.precision.row_title().len())
        .max()
        .unwrap_or(0);

    estimate
        .precisions
        .iter()
        .map(|row| {
            format!(
                "{:<title_width$}  [{}]  {:.2} / {} GB",
                row.footprint.precision.row_title(),
                bar(row, estimate.device.memory_gb, width),
                row.footprint.total_gb,
                format_gb(estimate.device.memory_gb),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The bar body, scaled so `width` cells equal the device capacity.
pub fn bar(row: &PrecisionEstimate, capacity_gb: f64, width: usize) -> String {
    if row.out_of_memory || capacity_gb <= 0.0 {
        return out_of_memory_box(width);
    }

    let scale = |gb: f64| ((gb / capacity_gb) * width as f64).round() as usize;
    let model = scale(row.footprint.total_gb).min(width);
    let activation = scale(row.footprint.activation_gb).min(width - model);
    let remaining = width - model - activation;

    let mut out = String::with_capacity(width * 3);
    out.extend(std::iter::repeat_n(MODEL, model));
    out.extend(std::iter::repeat_n(ACTIVATION, activation));
    out.extend(std::iter::repeat_n(REMAINING, remaining));
    out
}

fn out_of_memory_box(width: usize) -> String {
    if width < OUT_OF_MEMORY.len() + 2 {
        return OUT_OF_MEMORY.chars().take(width).collect();
    }
    let padding = width - OUT_OF_MEMORY.len() - 2;
    let left = padding / 2;
    let right = padding - left;
    let dashes = |n: usize| {
        (0..n)
            .map(|i| if i % 2 == 0 { DASH } else { ' ' })
            .collect::<String>()
    };
    format!("{} {} {}", dashes(left), OUT_OF_MEMORY, dashes(right))
}
