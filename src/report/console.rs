use crate::report::report_model::ReplayReport;

// ============================================================================
// Console reporter
// ============================================================================

/// Format a replay report for terminal output.
///
/// Produces output like:
/// ```text
/// ✓ PASS  Login form (1 frame, 1 capture)
///     https://example.com/login  username="bob" fields=[username, pw]
/// ✗ FAIL  Late form (1 frame, 0 captures)
///     [FAIL] https://example.com/late: expected 1 captures, got 0
///
/// === Results: 1 passed, 1 failed (2 total), 1 capture ===
/// ```
/// Passwords are never printed.
pub fn format_console_report(report: &ReplayReport) -> String {
    let mut out = String::new();

    for result in &report.results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({}, {})\n",
            marker,
            result.scenario_name,
            plural(result.frames.len(), "frame"),
            plural(result.capture_count(), "capture")
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for frame in &result.frames {
            for capture in &frame.captures {
                let names: Vec<_> = capture.fields.names().collect();
                out.push_str(&format!(
                    "    {}  username=\"{}\" fields=[{}]\n",
                    capture.origin_url,
                    capture.username,
                    names.join(", ")
                ));
            }
            for mismatch in &frame.mismatches {
                out.push_str(&format!("    [FAIL] {}: {}\n", frame.url, mismatch));
            }
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total), {}",
        report.passed,
        report.failed,
        report.total,
        plural(report.captures, "capture")
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
