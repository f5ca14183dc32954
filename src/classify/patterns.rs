//! Static pattern-family table.
//!
//! Each family associates one canonical CV path with an ordered list of
//! matching rules. The table itself is ordered: when two families score the
//! same confidence for a field, the earlier declaration wins, so the order
//! here is part of the classification contract.

use std::sync::OnceLock;

use regex::Regex;

/// One matching rule inside a pattern family.
///
/// `veto` rejects the rule when the search text also matches a disqualifying
/// pattern (e.g. a bare "name" field that is actually a username or email).
#[derive(Debug)]
pub struct Rule {
    pub pattern: Regex,
    pub veto: Option<Regex>,
}

impl Rule {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: case_insensitive(pattern),
            veto: None,
        }
    }

    fn with_veto(pattern: &str, veto: &str) -> Self {
        Self {
            pattern: case_insensitive(pattern),
            veto: Some(case_insensitive(veto)),
        }
    }

    /// Find the matched substring in `text`, honoring the veto.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        if let Some(veto) = &self.veto {
            if veto.is_match(text) {
                return None;
            }
        }
        self.pattern.find(text).map(|m| m.as_str())
    }
}

/// Ordered set of rules associated with one canonical path.
#[derive(Debug)]
pub struct PatternFamily {
    /// Canonical path into the CV record, or a virtual aggregate key
    pub path: &'static str,
    pub rules: Vec<Rule>,
}

impl PatternFamily {
    fn new(path: &'static str, rules: Vec<Rule>) -> Self {
        Self { path, rules }
    }
}

/// Compile a pattern with case-insensitive matching.
///
/// All patterns in the table are static literals, so compilation cannot fail
/// at runtime; the panic here would only fire on a broken table edit.
fn case_insensitive(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).unwrap_or_else(|e| {
        panic!("invalid built-in pattern {pattern:?}: {e}");
    })
}

static FAMILIES: OnceLock<Vec<PatternFamily>> = OnceLock::new();

/// The classification table, built once per process.
pub fn pattern_families() -> &'static [PatternFamily] {
    FAMILIES.get_or_init(build_families)
}

fn build_families() -> Vec<PatternFamily> {
    vec![
        PatternFamily::new(
            "personal_info.full_name",
            vec![
                // A bare "name" field that also mentions email/user is a
                // login field, not the applicant's name.
                Rule::with_veto("full?.name|name", "email|user"),
                Rule::new("^name$"),
                Rule::new("applicant.?name"),
            ],
        ),
        PatternFamily::new(
            "personal_info.first_name",
            vec![
                Rule::new("first.?name|fname|given.?name"),
                Rule::new("^firstname$"),
            ],
        ),
        PatternFamily::new(
            "personal_info.last_name",
            vec![
                Rule::new("last.?name|lname|surname|family.?name"),
                Rule::new("^lastname$"),
            ],
        ),
        PatternFamily::new(
            "personal_info.email",
            vec![Rule::new("email|e.?mail"), Rule::new("^email$")],
        ),
        PatternFamily::new(
            "personal_info.phone",
            vec![
                Rule::new("phone|cel|tel|mobile|cell|contact"),
                Rule::new("phone.?number"),
            ],
        ),
        PatternFamily::new(
            "personal_info.address",
            vec![Rule::new("address|addr"), Rule::new("street|location")],
        ),
        PatternFamily::new(
            "personal_info.country",
            vec![Rule::new("country|nation"), Rule::new("^country$")],
        ),
        PatternFamily::new(
            "experience[0].company",
            vec![
                Rule::new("current.?company"),
                Rule::new("company|organization|employer|workplace"),
            ],
        ),
        PatternFamily::new(
            "experience[0].job_title",
            vec![
                Rule::new("position|title|job.?title|role|current.?role"),
                Rule::new("^title$"),
            ],
        ),
        PatternFamily::new(
            "education[0].institution",
            vec![
                Rule::new("school|university|college|institution"),
                Rule::new("education.*institution"),
            ],
        ),
        PatternFamily::new("education[0].degree", vec![Rule::new("^degree$")]),
        PatternFamily::new(
            "skills_text",
            vec![
                Rule::new("skills|skill|competenc|abilities"),
                Rule::new("technical.?skills"),
            ],
        ),
        PatternFamily::new(
            "cover_letter",
            vec![
                Rule::new("cover.?letter|motivation|why.*interested"),
                Rule::new("message|additional.*info"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builds() {
        let families = pattern_families();
        assert!(!families.is_empty());
        assert_eq!(families[0].path, "personal_info.full_name");
    }

    #[test]
    fn test_declaration_order_is_stable() {
        let paths: Vec<_> = pattern_families().iter().map(|f| f.path).collect();
        // full_name is declared before email so that equal-confidence ties
        // resolve to the earlier family.
        let full_name = paths.iter().position(|p| *p == "personal_info.full_name");
        let email = paths.iter().position(|p| *p == "personal_info.email");
        assert!(full_name < email);
    }

    #[test]
    fn test_veto_rejects_login_name_fields() {
        let families = pattern_families();
        let full_name = &families[0];
        assert!(full_name.rules[0].find("username").is_none());
        assert_eq!(full_name.rules[0].find("full name"), Some("full name"));
    }

    #[test]
    fn test_rule_find_returns_matched_substring() {
        let rule = Rule::new("email|e.?mail");
        assert_eq!(rule.find("work email address"), Some("email"));
        assert!(rule.find("phone number").is_none());
    }
}
