//! Length facets (`length`, `minLength`, `maxLength`).

use csvw_model::{Constraint, Datatype, DatatypeDescriptor, Diagnostic, DiagnosticKind};

use super::Cell;

/// Length of a lexical form: octets for binary types, characters otherwise.
pub(crate) fn measure(datatype: Datatype, text: &str) -> usize {
    match datatype {
        Datatype::Base64Binary => text.trim_end_matches('=').len() * 3 / 4,
        Datatype::HexBinary => text.len() / 2,
        _ => text.chars().count(),
    }
}

/// `text` is the lexical form of the cell content.
pub(crate) fn check(cell: &Cell<'_>, text: &str, descriptor: &DatatypeDescriptor) -> Vec<Diagnostic> {
    if !descriptor.has_length_facets() {
        return Vec::new();
    }
    let length = measure(descriptor.base, text);
    let mut diagnostics = Vec::new();

    if let Some(expected) = descriptor.length
        && length != expected
    {
        diagnostics.push(cell.error(DiagnosticKind::Length, Constraint::Length(expected)));
    }
    if let Some(min_length) = descriptor.min_length
        && length < min_length
    {
        diagnostics.push(cell.error(DiagnosticKind::MinLength, Constraint::MinLength(min_length)));
    }
    if let Some(max_length) = descriptor.max_length
        && length > max_length
    {
        diagnostics.push(cell.error(DiagnosticKind::MaxLength, Constraint::MaxLength(max_length)));
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_lengths_count_octets() {
        assert_eq!(measure(Datatype::HexBinary, "0FB7"), 2);
        assert_eq!(measure(Datatype::Base64Binary, "AQID"), 3);
        assert_eq!(measure(Datatype::Base64Binary, "AQI="), 2);
        assert_eq!(measure(Datatype::Base64Binary, "AQ=="), 1);
    }

    #[test]
    fn text_length_counts_characters() {
        assert_eq!(measure(Datatype::String, "héllo"), 5);
    }
}
