//! Sparkline rendering for the emission trend.

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render values as Unicode block characters, scaled to the largest value.
/// Characters: ▁ ▂ ▃ ▄ ▅ ▆ ▇ █
pub fn render_sparkline(values: &[f64]) -> String {
    if values.is_empty() {
        return String::new();
    }

    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max);

    if max <= 0.0 {
        return BLOCKS[0].to_string().repeat(values.len());
    }

    values
        .iter()
        .map(|&v| {
            let level = (v / max * 7.0).clamp(0.0, 7.0);
            // NaN clamps to NaN; `as usize` maps it to 0
            BLOCKS[level as usize]
        })
        .collect()
}
