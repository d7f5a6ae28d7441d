//! Console report of a study run.

use crate::study::StudyResults;
use inletox_budget::drawdown::GroupedRates;
use inletox_core::quantities::{BIOLOGICAL_NET, PHYSICAL_TRANSPORT, STORAGE};

const BANNER_WIDTH: usize = 61;

/// Three-line section header centred in `=`.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("{rule}\n{title:=^width$}\n{rule}\n", width = BANNER_WIDTH)
}

fn group_means(drawdown: &GroupedRates, term: &str) -> String {
    let comparison = drawdown.comparison(term);
    format!(
        "{term} [mg/L per day]\n    oxygenated: {:.3} (n = {})\n    hypoxic:    {:.3} (n = {})\n",
        comparison.oxygenated_mean(),
        comparison.oxygenated.len(),
        comparison.hypoxic_mean(),
        comparison.hypoxic.len()
    )
}

/// Render the budget error, drawdown and regression sections.
pub fn render(results: &StudyResults) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&banner("Budget Error"));
    out.push('\n');
    out.push_str(&results.budget_error.to_string());
    out.push_str("\n\n");

    out.push_str(&banner("Drawdown Period Group Means"));
    out.push('\n');
    for term in [STORAGE, PHYSICAL_TRANSPORT, BIOLOGICAL_NET] {
        out.push_str(&group_means(&results.drawdown, term));
        out.push('\n');
    }
    out.push_str(&format!(
        "Mean net decrease of all inlets: {:.3} mg/L per day\n\n",
        results.net_decrease.mean_of_means
    ));

    out.push_str(&banner("Multiple Linear Regression"));
    out.push('\n');
    out.push_str(&results.regression.to_string());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_layout() {
        let text = banner("Budget Error");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "========================Budget Error========================="
        );
        assert!(lines.iter().all(|l| l.len() == BANNER_WIDTH));
    }
}
