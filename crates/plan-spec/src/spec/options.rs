use serde::Serialize;

/// A stored code paired with the label shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub code: &'static str,
    pub label: &'static str,
}

impl Choice {
    const fn new(code: &'static str, label: &'static str) -> Self {
        Self { code, label }
    }
}

/// Fixed, ordered option list backing a single-choice field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceTable {
    pub name: &'static str,
    pub choices: &'static [Choice],
}

impl ChoiceTable {
    /// Returns the label registered for `code`, if any.
    pub fn find(&self, code: &str) -> Option<&'static str> {
        self.choices
            .iter()
            .find(|choice| choice.code == code)
            .map(|choice| choice.label)
    }

    /// Resolves `code` to its display label, passing unknown codes through unchanged.
    pub fn resolve<'a>(&self, code: &'a str) -> &'a str {
        match self.find(code) {
            Some(label) => label,
            None => {
                if !code.is_empty() {
                    tracing::debug!(table = self.name, code, "no label for option code");
                }
                code
            }
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> {
        self.choices.iter().map(|choice| choice.code)
    }
}

pub static EXAM_PERIODS: ChoiceTable = ChoiceTable {
    name: "exam_periods",
    choices: &[
        Choice::new("winter2024", "בגרות חורף 2024"),
        Choice::new("summer2024", "בגרות קיץ 2024"),
        Choice::new("winter2025", "בגרות חורף 2025"),
    ],
};

pub static SUBJECTS: ChoiceTable = ChoiceTable {
    name: "subjects",
    choices: &[
        Choice::new("math", "מתמטיקה"),
        Choice::new("english", "אנגלית"),
        Choice::new("communication", "תקשורת"),
        Choice::new("art", "אומנות"),
        Choice::new("autocad", "אוטוקד"),
        Choice::new("civics", "אזרחות"),
    ],
};

pub static TIME_PERIODS: ChoiceTable = ChoiceTable {
    name: "time_periods",
    choices: &[
        Choice::new("jan2025", "ינואר 2025"),
        Choice::new("feb2025", "פברואר 2025"),
        Choice::new("jun2025", "יוני 2025"),
        Choice::new("jul2025", "יולי 2025"),
        Choice::new("aug2025", "אוגוסט 2025"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_code_resolves_to_its_label() {
        for table in [&EXAM_PERIODS, &SUBJECTS, &TIME_PERIODS] {
            for choice in table.choices {
                assert_eq!(table.resolve(choice.code), choice.label);
            }
        }
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(EXAM_PERIODS.resolve("unknown_code"), "unknown_code");
        assert_eq!(SUBJECTS.resolve(""), "");
        // lookup is exact, not case-insensitive
        assert_eq!(SUBJECTS.resolve("MATH"), "MATH");
    }

    #[test]
    fn codes_are_unique_per_table() {
        for table in [&EXAM_PERIODS, &SUBJECTS, &TIME_PERIODS] {
            let mut codes = table.codes().collect::<Vec<_>>();
            let total = codes.len();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), total, "duplicate code in {}", table.name);
        }
    }
}
