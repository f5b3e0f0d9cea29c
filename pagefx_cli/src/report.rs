//! Report rendering: a styled terminal transcript or plain JSON.

use anyhow::{Context, Result};
use console::style;
use pagefx_core::{Effect, ScrollBehavior};

use crate::runner::RunReport;

pub fn to_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize run report")
}

pub fn print_human(report: &RunReport) {
    println!(
        "{} {}",
        style("Scenario:").cyan().bold(),
        style(&report.scenario).bold()
    );
    println!(
        "{}",
        style(format!(
            "{} steps, {}ms simulated, {} effects",
            report.steps,
            report.duration_ms,
            report.effects.len()
        ))
        .dim()
    );
    println!();

    for record in &report.effects {
        println!(
            "{} {}",
            style(format!("[{:>6}ms]", record.at_ms)).dim(),
            describe(&record.effect)
        );
    }

    println!();
    println!("{}", style("Final state").cyan().bold());
    let summary = &report.summary;
    println!("  scroll position   {}", summary.scroll_y);
    println!("  menu open         {}", summary.menu_open);
    println!("  header scrolled   {}", summary.header_scrolled);
    println!(
        "  active nav link   {}",
        summary.active_link.as_deref().unwrap_or("-")
    );
    println!("  animated targets  {}", summary.animated_targets);
    println!("  images pending    {}", summary.pending_images);
    println!("  back-to-top shown {}", summary.scroll_top_visible);
}

/// One line per effect, node handles rendered as `#n`.
fn describe(effect: &Effect) -> String {
    match effect {
        Effect::ClassAdded { node, class } => format!("#{} gained class \"{}\"", node, class),
        Effect::ClassRemoved { node, class } => format!("#{} lost class \"{}\"", node, class),
        Effect::TextSet { node, text } => format!("#{} text set to \"{}\"", node, text),
        Effect::ValueSet { node, value } => format!("#{} value set to \"{}\"", node, value),
        Effect::StyleSet {
            node,
            property,
            value,
        } => format!("#{} style {}: {}", node, property, value),
        Effect::DisabledSet { node, disabled } => {
            if *disabled {
                format!("#{} disabled", node)
            } else {
                format!("#{} enabled", node)
            }
        }
        Effect::LabelSet { node, label } => format!("#{} label set to \"{}\"", node, label),
        Effect::NodeInserted { node, parent } => format!("#{} inserted under #{}", node, parent),
        Effect::NodeRemoved { node } => format!("#{} removed", node),
        Effect::ImageLoaded { node, src } => format!("#{} image loaded: {}", node, src),
        Effect::ScrollRequested { top, behavior } => {
            let mode = match behavior {
                ScrollBehavior::Smooth => "smooth",
                ScrollBehavior::Auto => "auto",
            };
            format!("scroll requested to {} ({})", top, mode)
        }
        Effect::SubmissionStarted { form, data } => {
            format!("#{} submission started with {} fields", form, data.len())
        }
        Effect::SubmissionCompleted { form } => format!("#{} submission completed", form),
        Effect::ValidationFailed { form, errors } => {
            format!("#{} validation failed with {} errors", form, errors)
        }
    }
}
