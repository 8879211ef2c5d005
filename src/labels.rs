use crate::model::LabelledCode;
use std::collections::HashMap;

/// Labels for the headline and the twelve second-level categories.
pub const FALLBACK_LABELS: [(&str, &str); 13] = [
    ("CP00", "All items"),
    ("CP01", "Food and non-alcoholic beverages"),
    ("CP02", "Alcoholic beverages, tobacco and narcotics"),
    ("CP03", "Clothing and footwear"),
    ("CP04", "Housing, water, electricity, gas and other fuels"),
    ("CP05", "Furnishings, household equipment and routine household maintenance"),
    ("CP06", "Health"),
    ("CP07", "Transport"),
    ("CP08", "Communication"),
    ("CP09", "Recreation and culture"),
    ("CP10", "Education"),
    ("CP11", "Restaurants and hotels"),
    ("CP12", "Miscellaneous goods and services"),
];

/// Two-tier label lookup: metadata labels first, built-in table second.
#[derive(Debug, Clone)]
pub struct LabelResolver {
    primary: HashMap<String, String>,
    fallback: HashMap<&'static str, &'static str>,
}

impl LabelResolver {
    /// `pairs` are expected deduplicated; if not, the first label per code is kept.
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        let mut primary = HashMap::new();
        for (code, label) in pairs {
            primary.entry(code).or_insert(label);
        }
        Self {
            primary,
            fallback: FALLBACK_LABELS.into_iter().collect(),
        }
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        self.primary
            .get(code)
            .map(String::as_str)
            .or_else(|| self.fallback.get(code).copied())
    }

    /// Label when known, the raw code otherwise.
    pub fn display<'a>(&'a self, code: &'a str) -> &'a str {
        self.label(code).unwrap_or(code)
    }

    pub fn resolve_all<S: AsRef<str>>(&self, codes: &[S]) -> Vec<LabelledCode> {
        codes
            .iter()
            .map(|code| {
                let code = code.as_ref();
                LabelledCode {
                    code: code.to_string(),
                    label: self.label(code).map(str::to_string),
                }
            })
            .collect()
    }
}

impl Default for LabelResolver {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
