//! Conflict battery: sample identifiers run through the route table to spot
//! patterns that shadow each other.

use itertools::Itertools;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Sample callback identifiers covering the studio bot's button vocabulary.
///
/// Every identifier a keyboard can produce should have a representative
/// here, otherwise overlaps on it go unnoticed at startup.
pub const DEFAULT_SAMPLES: &[&str] = &[
    // menus
    "main_menu",
    "back_to_main",
    "help",
    "noop",
    // projects
    "project_details_42",
    "project_revisions_42",
    "project_status_42_done",
    "project_files_42",
    "project_list",
    "project_",
    // revisions
    "revision_new_42",
    "revision_view_7",
    "revision_approve_7",
    // chat with the studio
    "chat_open_42",
    "chat_reply_42",
    // hosting & billing
    "hosting_list",
    "hosting_details_3",
    "hosting_pay_3",
    "hosting_renew_3",
    // finance
    "finance_stats",
    "finance_income_2024_05",
    "finance_expense_add",
    // admin
    "admin_panel",
    "admin_users",
    "admin_project_42",
    "admin_broadcast",
    // pagination
    "page_2",
    "projects_page_3",
];

/// A sample identifier matched by more than one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub sample: String,
    /// Patterns in dispatch order; the first one wins.
    pub patterns: Vec<String>,
}

impl Conflict {
    /// The pattern that receives the identifier at dispatch time
    pub fn winner(&self) -> &str {
        self.patterns.first().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' matched by {} routes: {} (dispatches to {})",
            self.sample,
            self.patterns.len(),
            self.patterns.iter().join(", "),
            self.winner()
        )
    }
}

/// Runs every sample through `routes` (given in dispatch order) and reports
/// each sample matched by two or more of them.
pub(crate) fn find_conflicts<'a, I>(samples: &[String], routes: I) -> Vec<Conflict>
where
    I: IntoIterator<Item = (&'a str, &'a Regex)>,
    I::IntoIter: Clone,
{
    let routes = routes.into_iter();
    samples
        .iter()
        .filter_map(|sample| {
            let patterns: Vec<String> = routes
                .clone()
                .filter(|(_, re)| re.is_match(sample))
                .map(|(pattern, _)| pattern.to_string())
                .collect();
            (patterns.len() > 1).then(|| Conflict {
                sample: sample.clone(),
                patterns,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchored(pattern: &str) -> Regex {
        Regex::new(&format!(r"\A(?:{pattern})")).unwrap()
    }

    #[test]
    fn test_default_samples_fit_telegram_limit() {
        for sample in DEFAULT_SAMPLES {
            assert!(sample.len() <= 64, "sample '{}' exceeds 64 bytes", sample);
        }
    }

    #[test]
    fn test_default_samples_unique() {
        let unique: Vec<&&str> = DEFAULT_SAMPLES.iter().unique().collect();
        assert_eq!(unique.len(), DEFAULT_SAMPLES.len(), "samples must be unique");
    }

    #[test]
    fn test_find_conflicts_reports_only_shared_samples() {
        let specific = anchored(r"project_details_\d+$");
        let catch_all = anchored("project_");
        let admin = anchored("admin_");
        let samples: Vec<String> = ["project_details_42", "project_list", "admin_panel", "help"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let routes = vec![
            (r"project_details_\d+$", &specific),
            ("project_", &catch_all),
            ("admin_", &admin),
        ];
        let conflicts = find_conflicts(&samples, routes);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].sample, "project_details_42");
        assert_eq!(conflicts[0].patterns, vec![r"project_details_\d+$", "project_"]);
        assert_eq!(conflicts[0].winner(), r"project_details_\d+$");
    }

    #[test]
    fn test_conflict_display_names_winner() {
        let conflict = Conflict {
            sample: "project_details_42".to_string(),
            patterns: vec!["^project_details_".to_string(), "^project_".to_string()],
        };
        assert_eq!(
            conflict.to_string(),
            "'project_details_42' matched by 2 routes: ^project_details_, ^project_ (dispatches to ^project_details_)"
        );
    }
}
