use crate::graph::ValidationIssue;
use crate::sla::{Priority, WeightDistributor};
use itertools::Itertools;

/// Formats validator output and SLA allocations as plain text.
pub struct ReportFormatter;

impl ReportFormatter {
    /// One issue per line, or a single all-clear line.
    pub fn format_issues(issues: &[ValidationIssue]) -> String {
        if issues.is_empty() {
            return "No issues found".to_string();
        }
        issues.iter().map(|i| format!("- {}", i)).join("\n")
    }

    /// A fixed-width table of steps with their share and time per tier.
    pub fn format_allocations(distributor: &WeightDistributor) -> String {
        let header: Vec<String> = ["Step", "Role", "Weight", "Share"]
            .into_iter()
            .map(str::to_string)
            .chain(Priority::ALL.iter().map(|p| p.label().to_string()))
            .collect();

        let rows: Vec<Vec<String>> = distributor
            .rows()
            .into_iter()
            .map(|row| {
                let mut cells = vec![
                    row.name,
                    if row.role_name.is_empty() {
                        "-".to_string()
                    } else {
                        row.role_name
                    },
                    Self::format_number(row.weight),
                    format!("{}%", Self::format_number(row.percentage)),
                ];
                cells.extend(row.allocations.iter().map(|(_, a)| a.to_string()));
                cells
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                rows.iter()
                    .map(|r| r[col].chars().count())
                    .chain(std::iter::once(header[col].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let render = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let separator = widths.iter().map(|w| "-".repeat(*w)).join("-+-");
        std::iter::once(render(&header))
            .chain(std::iter::once(separator))
            .chain(rows.iter().map(|r| render(r)))
            .join("\n")
    }

    /// Whole numbers print without a fraction, others with one decimal.
    fn format_number(n: f64) -> String {
        if n.fract() == 0.0 {
            format!("{}", n as i64)
        } else {
            format!("{:.1}", n)
        }
    }
}
