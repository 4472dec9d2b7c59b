//! Text normalization for pattern matching.

/// Two normalized views over raw document text.
///
/// Pattern rules disagree on granularity: line-anchored captures want the
/// text re-joined from trimmed, non-empty lines, while date reconstruction
/// wants all whitespace collapsed so tokens split by OCR line noise become
/// adjacent again.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    lines: Vec<String>,
    joined: String,
    flat: String,
}

impl NormalizedText {
    /// Build both views. Total on empty or whitespace-only input.
    pub fn new(raw: &str) -> Self {
        let lines: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        let joined = lines.join("\n");
        let flat = raw.split_whitespace().collect::<Vec<_>>().join(" ");

        Self { lines, joined, flat }
    }

    /// Trimmed, non-empty lines in document order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The line view re-joined with single newlines.
    pub fn line_view(&self) -> &str {
        &self.joined
    }

    /// All whitespace runs collapsed to single spaces.
    pub fn flat_view(&self) -> &str {
        &self.flat
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_yields_empty_views() {
        let text = NormalizedText::new("");
        assert!(text.is_empty());
        assert!(text.lines().is_empty());
        assert_eq!(text.line_view(), "");
        assert_eq!(text.flat_view(), "");
    }

    #[test]
    fn test_whitespace_only_input_is_empty() {
        let text = NormalizedText::new("  \n\t \n\n ");
        assert!(text.is_empty());
        assert!(text.lines().is_empty());
    }

    #[test]
    fn test_line_view_drops_blank_lines_and_trims() {
        let text = NormalizedText::new("  CFE  \n\n\n TOTAL A PAGAR \n");
        assert_eq!(text.lines(), ["CFE", "TOTAL A PAGAR"]);
        assert_eq!(text.line_view(), "CFE\nTOTAL A PAGAR");
    }

    #[test]
    fn test_flat_view_collapses_all_whitespace() {
        let text = NormalizedText::new("CORTE A\n  PARTIR\t5  ENE 24");
        assert_eq!(text.flat_view(), "CORTE A PARTIR 5 ENE 24");
    }
}
