//! Label encoding for categorical model inputs (category, cuisine type).

use tracing::debug;

/// Maps free-form labels to dense integer codes.
///
/// Labels are normalised (trimmed, lowercased). Known labels get codes
/// `1..=len()`; anything unseen during fitting encodes to [`LabelEncoder::UNKNOWN`]
/// instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelEncoder {
    labels: Vec<String>,
}

impl LabelEncoder {
    pub const UNKNOWN: usize = 0;

    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut labels: Vec<String> = labels.into_iter().map(normalize).collect();
        labels.sort();
        labels.dedup();
        labels.retain(|l| !l.is_empty());
        Self { labels }
    }

    /// Number of known labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn encode(&self, label: &str) -> usize {
        let key = normalize(label);
        match self.labels.binary_search(&key) {
            Ok(idx) => idx + 1,
            Err(_) => {
                debug!(label, "unseen label; using default code");
                Self::UNKNOWN
            }
        }
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        code.checked_sub(1)
            .and_then(|idx| self.labels.get(idx))
            .map(String::as_str)
    }

    /// Append `len()` indicator columns for `label`. Unknown labels are all zeros,
    /// which leaves them on the intercept.
    pub fn one_hot_into(&self, label: &str, out: &mut Vec<f64>) {
        let code = self.encode(label);
        out.extend((1..=self.labels.len()).map(|c| if c == code { 1.0 } else { 0.0 }));
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_and_case_insensitive() {
        let enc = LabelEncoder::fit(["Main Course", "Dessert", "main course ", "Beverage"]);
        assert_eq!(enc.len(), 3);
        assert_eq!(enc.encode("MAIN COURSE"), enc.encode("main course"));
        assert_ne!(enc.encode("Dessert"), LabelEncoder::UNKNOWN);
        assert_eq!(enc.decode(enc.encode("Dessert")), Some("dessert"));
    }

    #[test]
    fn unseen_labels_map_to_default_code() {
        let enc = LabelEncoder::fit(["Thai", "Italian"]);
        assert_eq!(enc.encode("Martian"), LabelEncoder::UNKNOWN);
        assert_eq!(enc.decode(LabelEncoder::UNKNOWN), None);

        let mut row = Vec::new();
        enc.one_hot_into("Martian", &mut row);
        assert_eq!(row, vec![0.0, 0.0]);
    }

    #[test]
    fn one_hot_sets_exactly_one_column_for_known_labels() {
        let enc = LabelEncoder::fit(["a", "b", "c"]);
        let mut row = Vec::new();
        enc.one_hot_into("b", &mut row);
        assert_eq!(row, vec![0.0, 1.0, 0.0]);
    }
}
