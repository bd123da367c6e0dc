use sdw_updater_core::{targets, ResultSet, UpdateStatus};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

const HEADERS: [&str; 4] = ["TARGET", "KIND", "TEMPLATE", "STATUS"];

/// One table row per result: name, target kind, backing template, status.
fn result_rows(results: &ResultSet) -> Vec<[String; 4]> {
    results
        .iter()
        .map(|(name, status)| {
            let (kind, template) = match targets::lookup(name) {
                Ok(t) => (t.kind.to_string(), t.template.to_string()),
                Err(_) => (String::new(), String::new()),
            };
            [name.to_string(), kind, template, status.to_string()]
        })
        .collect()
}

fn render_table(rows: &[[String; 4]]) -> String {
    let mut widths = HEADERS.map(str::len);
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let line = |cells: [&str; 4]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:w$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let rule = widths.map(|w| "-".repeat(w));
    let mut out = vec![line(HEADERS), line(rule.each_ref().map(String::as_str))];
    out.extend(rows.iter().map(|r| line(r.each_ref().map(String::as_str))));
    out.join("\n")
}

/// Result table followed by the overall verdict.
pub fn print_results(results: &ResultSet) {
    if results.is_empty() {
        println!("No targets.");
    } else {
        println!("{}", render_table(&result_rows(results)));
    }
    print_overall(results.overall());
}

fn print_overall(status: UpdateStatus) {
    println!("\nOverall: {status}");
}
