const BOM: char = '\u{feff}';

pub struct CsvParser;

impl CsvParser {
    /// Splits raw report text into trimmed, non-empty lines.
    /// A leading byte-order mark is dropped first.
    pub fn split_lines(text: &str) -> Vec<String> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        text.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    /// Parses a raw line string into a vector of fields.
    ///
    /// A quote toggles quoted mode wherever it appears; a doubled quote inside
    /// quotes is a literal `"`. Commas only split outside quotes. An
    /// unterminated quote simply runs to the end of the line.
    pub fn parse_line(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes && chars.peek() == Some(&'"') => {
                    chars.next();
                    current.push('"');
                }
                '"' => {
                    in_quotes = !in_quotes;
                }
                ',' if !in_quotes => {
                    fields.push(current.trim().to_string());
                    current.clear();
                }
                _ => {
                    current.push(c);
                }
            }
        }
        fields.push(current.trim().to_string());
        fields
    }
}
