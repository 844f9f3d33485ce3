//! Text views of command results.

use console::{measure_text_width, pad_str, Alignment};
use rigger_engine::{Candidate, ParamGroup, Parameter, ScanResult};

use crate::commands::{PlanReport, WriteReport};
use crate::diff::style_diff;
use crate::output::Styles;

/// Left-aligns `s` to `width` terminal columns.
fn pad_right(s: &str, width: usize) -> String {
    pad_str(s, width, Alignment::Left, None).into_owned()
}

/// Right-aligns `s` to `width` terminal columns.
fn pad_left(s: &str, width: usize) -> String {
    pad_str(s, width, Alignment::Right, None).into_owned()
}

fn column_width<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(measure_text_width).max().unwrap_or(0)
}

fn location(param: &Parameter) -> String {
    match (&param.source.selector, param.source.line) {
        (Some(selector), Some(line)) => format!("{} ({}:{})", selector, param.source.file.display(), line),
        (Some(selector), None) => selector.clone(),
        (None, _) => param.source.file.display().to_string(),
    }
}

/// Parameters under one heading per group, in group order.
pub fn render_params(params: &[Parameter], styles: &Styles) -> String {
    if params.is_empty() {
        return styles.muted.apply_to("No parameters found").to_string();
    }
    let values: Vec<String> = params
        .iter()
        .map(|p| p.default.render(p.unit.as_deref()))
        .collect();
    let label_width = column_width(params.iter().map(|p| p.label.as_str()));
    let value_width = column_width(values.iter().map(String::as_str));

    let mut sections = Vec::new();
    for group in ParamGroup::ALL {
        let members: Vec<(&Parameter, &String)> = params
            .iter()
            .zip(&values)
            .filter(|(p, _)| p.group == group)
            .collect();
        if members.is_empty() {
            continue;
        }
        let mut lines = vec![styles.heading.apply_to(group.as_str()).to_string()];
        for (param, value) in members {
            lines.push(format!(
                "  {}  {}  {}  {}",
                styles.name.apply_to(pad_right(&param.label, label_width)),
                styles.value.apply_to(pad_right(value, value_width)),
                param.css_var,
                styles.muted.apply_to(location(param)),
            ));
        }
        sections.push(lines.join("\n"));
    }
    sections.join("\n\n")
}

pub fn render_candidates(candidates: &[Candidate], styles: &Styles) -> String {
    if candidates.is_empty() {
        return styles.muted.apply_to("No CSS files found").to_string();
    }
    let scores: Vec<String> = candidates.iter().map(|c| c.score.to_string()).collect();
    let score_width = column_width(scores.iter().map(String::as_str));
    candidates
        .iter()
        .zip(&scores)
        .map(|(candidate, score)| {
            format!(
                "{}  {}  {}",
                styles.value.apply_to(pad_left(score, score_width)),
                styles.name.apply_to(candidate.file.display()),
                styles.muted.apply_to(&candidate.reason),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_scan(result: &ScanResult, styles: &Styles) -> String {
    let stylesheet = result
        .css_file
        .as_ref()
        .map(|file| file.display().to_string())
        .unwrap_or_else(|| "none".to_string());

    let mut out = vec![
        format!("{} {}", styles.heading.apply_to("Project:"), result.project_type),
        format!("{} {}", styles.heading.apply_to("Stylesheet:"), stylesheet),
        format!(
            "{} {}",
            styles.heading.apply_to("Candidates:"),
            result.css_candidates.len()
        ),
        format!("{} {}", styles.heading.apply_to("Parameters:"), result.params.len()),
        String::new(),
        render_params(&result.params, styles),
    ];
    if !result.diagnostics.is_empty() {
        out.push(String::new());
        out.push(styles.heading.apply_to("Diagnostics").to_string());
        for line in &result.diagnostics {
            out.push(format!("  {}", styles.muted.apply_to(line)));
        }
    }
    out.join("\n")
}

pub fn render_plan(report: &PlanReport, styles: &Styles) -> String {
    if report.diff.is_empty() {
        return format!("{} is up to date", report.file.display());
    }
    format!(
        "{}\n{}",
        style_diff(&report.diff, styles),
        styles.muted.apply_to(format!(
            "{} parameters, {} insertions(+), {} deletions(-)",
            report.params, report.inserted, report.deleted
        ))
    )
}

pub fn render_written(report: &WriteReport, styles: &Styles) -> String {
    report
        .files
        .iter()
        .map(|file| format!("{} {}", styles.added.apply_to("wrote"), file.display()))
        .chain(std::iter::once(format!("{} parameters", report.params)))
        .collect::<Vec<_>>()
        .join("\n")
}
