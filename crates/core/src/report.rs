use crate::model::{RemovalOutcome, UninstallReport};

const RULE_WIDTH: usize = 50;

pub fn render_text_report(report: &UninstallReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![rule.clone()];
    if report.dry_run {
        lines.push("PREVIEW - the items below would be removed (nothing was deleted)".to_string());
    } else {
        lines.push("Uninstall report".to_string());
    }
    lines.push(rule.clone());

    push_removals(&mut lines, "Executables", &report.executables);

    let managers = &report.package_managers;
    if !managers.is_empty() {
        lines.push(String::new());
        lines.push("[Package managers]".to_string());
        for name in &managers.succeeded {
            if report.dry_run {
                lines.push(format!("  ✓ {name}: would attempt uninstall"));
            } else {
                lines.push(format!("  ✓ {name}: uninstalled"));
            }
        }
        for item in &managers.failed {
            lines.push(format!("  ✗ {}: uninstall failed ({})", item.target, item.reason));
        }
        for name in &managers.skipped {
            lines.push(format!("  - {name}: not installed, skipped"));
        }
    }

    push_section(
        &mut lines,
        "Config directories",
        &report.config_dirs,
        &report.config_dirs_skipped,
    );
    push_removals(&mut lines, "Cache directories", &report.cache_dirs);
    push_section(
        &mut lines,
        "Data directories",
        &report.data_dirs,
        &report.data_dirs_skipped,
    );
    push_removals(&mut lines, "State directories", &report.state_dirs);

    if !report.project_dirs.is_empty() {
        push_removals(&mut lines, "Project directories", &report.project_dirs);
    } else if report.project_scan_skipped {
        lines.push(String::new());
        lines.push("[Project directories]".to_string());
        lines.push("  - project scan skipped".to_string());
    }

    lines.push(String::new());
    lines.push(rule.clone());
    if report.dry_run {
        lines.push(format!(
            "Preview complete: {} item(s) would be removed",
            report.total_removed()
        ));
    } else {
        lines.push(if report.is_complete() {
            "Uninstall complete".to_string()
        } else {
            "Uninstall partially complete".to_string()
        });
        lines.push(format!("  removed: {}", report.total_removed()));
        if report.total_failed() > 0 {
            lines.push(format!("  failed: {}", report.total_failed()));
        }
        lines.push(format!(
            "  package managers uninstalled: {}",
            report.package_managers.succeeded.len()
        ));
    }
    lines.push(rule);

    lines.join("\n")
}

fn push_removals(lines: &mut Vec<String>, title: &str, outcome: &RemovalOutcome) {
    push_section(lines, title, outcome, &[]);
}

fn push_section(lines: &mut Vec<String>, title: &str, outcome: &RemovalOutcome, kept: &[String]) {
    if outcome.is_empty() && kept.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("[{title}]"));
    for path in &outcome.removed {
        lines.push(format!("  ✓ removed: {path}"));
    }
    for item in &outcome.failed {
        lines.push(format!("  ✗ failed: {} ({})", item.target, item.reason));
    }
    for path in kept {
        lines.push(format!("  - kept: {path}"));
    }
}
