use crate::ExtractedField;

/// Join fields into the reply body, one per line, in extraction order.
#[must_use]
pub fn assemble(fields: &[ExtractedField]) -> String {
    fields
        .iter()
        .map(ExtractedField::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
