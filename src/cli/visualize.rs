use colored::*;

/// Create an ASCII histogram
pub fn ascii_histogram(data: &[(String, u64)], width: usize, use_color: bool) -> String {
    let mut output = String::new();

    if data.is_empty() {
        return output;
    }

    let max_value = data.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);
    let total: u64 = data.iter().map(|(_, v)| *v).sum();
    let max_label_len = data.iter().map(|(s, _)| s.len()).max().unwrap_or(0);

    for (label, value) in data {
        let relative = *value as f64 / max_value as f64;
        let bar_width = (relative * width as f64) as usize;
        let share = if total == 0 { 0.0 } else { *value as f64 / total as f64 * 100.0 };

        let bar = if use_color {
            match (relative * 100.0) as u32 {
                0..=25 => "█".repeat(bar_width).red().to_string(),
                26..=50 => "█".repeat(bar_width).yellow().to_string(),
                51..=75 => "█".repeat(bar_width).blue().to_string(),
                _ => "█".repeat(bar_width).green().to_string(),
            }
        } else {
            "█".repeat(bar_width)
        };

        let empty = "░".repeat(width - bar_width);

        output.push_str(&format!(
            "{:>width$} {}{} {:>6} ({:5.1}%)\n",
            label,
            bar,
            empty,
            value,
            share,
            width = max_label_len
        ));
    }

    output
}

/// Create a box plot representation scaled to `[lo, hi]`
pub fn box_plot(
    q: &crate::core::stats::Quartiles,
    lo: f64,
    hi: f64,
    width: usize,
    use_color: bool,
) -> String {
    let range = hi - lo;
    if range <= 0.0 || width < 2 {
        return "─".repeat(width);
    }

    let last = width - 1;
    let scale = |v: f64| ((((v - lo) / range) * last as f64).round() as usize).min(last);

    let min_pos = scale(q.min);
    let q1_pos = scale(q.q1);
    let median_pos = scale(q.median);
    let q3_pos = scale(q.q3);
    let max_pos = scale(q.max);

    let mut plot = vec![' '; width];

    // Whiskers
    for cell in plot.iter_mut().take(q1_pos + 1).skip(min_pos) {
        *cell = '─';
    }
    for cell in plot.iter_mut().take(max_pos + 1).skip(q3_pos) {
        *cell = '─';
    }

    // Box
    for cell in plot.iter_mut().take(q3_pos + 1).skip(q1_pos) {
        *cell = '█';
    }

    plot[min_pos] = '├';
    plot[max_pos] = '┤';
    plot[median_pos] = '│';

    let result: String = plot.into_iter().collect();

    if use_color {
        result.cyan().to_string()
    } else {
        result
    }
}
