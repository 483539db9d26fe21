//! Table formatting for command output

use meshscope_common::Host;

/// Render rows as a column-aligned table with headers.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let num_cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(num_cols) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let render = |cells: Vec<&str>| -> String {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:<width$}", cell, width = w)
            })
            .collect();
        line.join("  ").trim_end().to_string()
    };

    let mut lines = vec![render(headers.to_vec())];
    for row in rows {
        lines.push(render(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

/// Print a table to stdout.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", format_table(headers, rows));
}

/// One-line summary of a resolved host.
///
/// Complete hosts print their FQDN; external hosts print the original
/// hostname, since their dotted projection is not meaningful.
pub fn describe_host(host: &Host) -> String {
    if host.complete_input {
        host.to_string()
    } else {
        format!("{} (external)", host.service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_columns() {
        let table = format_table(
            &["KIND", "PLURAL"],
            &[
                vec!["VirtualService".to_string(), "virtualservices".to_string()],
                vec!["rule".to_string(), "rules".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "KIND            PLURAL");
        assert_eq!(lines[1], "VirtualService  virtualservices");
        assert_eq!(lines[2], "rule            rules");
    }

    #[test]
    fn headers_only_when_empty() {
        assert_eq!(format_table(&["A", "B"], &[]), "A  B");
    }

    #[test]
    fn describes_complete_and_external_hosts() {
        let complete = Host {
            service: "reviews".to_string(),
            namespace: "bookinfo".to_string(),
            cluster: "svc.cluster.local".to_string(),
            complete_input: true,
        };
        assert_eq!(
            describe_host(&complete),
            "reviews.bookinfo.svc.cluster.local"
        );

        let external = Host {
            service: "api.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(describe_host(&external), "api.example.com (external)");
    }
}
