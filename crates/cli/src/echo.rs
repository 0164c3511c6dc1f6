use owo_colors::OwoColorize;
use siftpage_core::{Page, ScoredParent};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Siftpage".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Pick the best title, text and image from candidate pages\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 500.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 2000.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print one fetched candidate page
pub fn print_page(index: usize, page: &Page) {
    eprintln!(
        "  {} {}",
        format!("#{}", index + 1).dimmed(),
        page.url().as_str().bright_white().underline()
    );
    eprintln!(
        "    {} {}",
        "Title:".dimmed(),
        page.title().unwrap_or_else(|| "(none)".to_string()).bright_white()
    );
}

/// Print the highest scoring content parents of a page
pub fn print_scores(scores: &[ScoredParent<'_>], limit: usize) {
    if scores.is_empty() {
        eprintln!("    {}", "No scored paragraphs".dimmed());
        return;
    }

    let mut ranked: Vec<&ScoredParent<'_>> = scores.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    for scored in ranked.into_iter().take(limit) {
        let element = scored.element;
        let mut label = element.tag_name();
        if let Some(id) = element.attr("id") {
            label.push('#');
            label.push_str(id);
        }
        if let Some(class) = element.attr("class") {
            for name in class.split_whitespace() {
                label.push('.');
                label.push_str(name);
            }
        }
        eprintln!("    {} {}", format!("{:>6}", scored.score).bright_white(), label.dimmed());
    }
}

/// Print timing summary
pub fn print_timing_summary(total: std::time::Duration, timings: &[(String, std::time::Duration)]) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!(
        "  {} {:>8.2}ms\n",
        format!("{}:", "Total").bold().dimmed(),
        total.as_secs_f64() * 1000.0
    );
}
