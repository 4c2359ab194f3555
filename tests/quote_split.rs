use quote_engine::quote::{parse_lines, split_quote, Quote, SplitPolicy, DEFAULT_AUTHOR};

#[test]
fn trims_body_and_author() {
    let q = split_quote("War is peace. - Orwell", SplitPolicy::ExactlyOne).unwrap();
    assert_eq!(q.body(), "War is peace.");
    assert_eq!(q.author(), "Orwell");
}

#[test]
fn strict_policy_rejects_missing_and_extra_delimiters() {
    assert!(split_quote("no delimiter here", SplitPolicy::ExactlyOne).is_err());
    assert!(split_quote("Be nice - Jean-Paul", SplitPolicy::ExactlyOne).is_err());
}

#[test]
fn first_policy_keeps_rest_as_author() {
    let q = split_quote("Be nice - Jean-Paul", SplitPolicy::First).unwrap();
    assert_eq!(q, Quote::new("Be nice", "Jean-Paul"));
    assert!(split_quote("no delimiter here", SplitPolicy::First).is_err());
}

#[test]
fn empty_halves_are_errors() {
    assert!(split_quote(" - Orwell", SplitPolicy::ExactlyOne).is_err());
    assert!(split_quote("War is peace. -   ", SplitPolicy::ExactlyOne).is_err());
}

#[test]
fn blank_lines_are_skipped_and_errors_carry_line_numbers() {
    let quotes = parse_lines("a - b\n\n   \nc - d\n", SplitPolicy::ExactlyOne).unwrap();
    assert_eq!(quotes.len(), 2);

    let (line, _) = parse_lines("a - b\n\nbroken\n", SplitPolicy::ExactlyOne).unwrap_err();
    assert_eq!(line, 3);
}

#[test]
fn anonymous_quote_uses_default_author() {
    let q = Quote::anonymous("Woof");
    assert_eq!(q.author(), DEFAULT_AUTHOR);
    assert_eq!(q.to_string(), "\"Woof\" - unknown");
}
