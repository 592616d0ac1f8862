// Line normalization: strips parenthetical asides and surrounding whitespace.
//
// Lyric and verse corpora carry stage directions and ad-libs in parentheses
// ("(whispered)", "(Chorus)"). These are removed one span at a time, where a
// span is the first `(` paired with the first `)` at or after it. Removal is
// driven by a two-state machine: `Scanning` keeps removing spans, `Done` is
// entered as soon as there is no `(` left or the first `(` has no closing
// `)`. An unmatched `(` is not an error; whatever remains is kept.
//
// Removing a span can leave doubled spaces at the seam ("a (b) c" becomes
// "a  c"), so the final pass collapses whitespace runs to a single space as
// well as trimming the ends. Both passes are fixed points, which makes
// `clean_line` idempotent.

/// State of the aside-removal scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// At least one more `( ... )` span may be present.
    Scanning,
    /// No removable span remains.
    Done,
}

/// Remove every well-formed parenthetical span and normalize whitespace.
pub fn clean_line(line: &str) -> String {
    let mut text = line.to_string();
    let mut state = ScanState::Scanning;
    while state == ScanState::Scanning {
        state = remove_first_aside(&mut text);
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One transition of the scan: removes the first `( ... )` span if there is
/// one and reports whether scanning should continue.
fn remove_first_aside(text: &mut String) -> ScanState {
    let Some(open) = text.find('(') else {
        return ScanState::Done;
    };
    let Some(close_offset) = text[open..].find(')') else {
        return ScanState::Done;
    };
    text.replace_range(open..=open + close_offset, "");
    ScanState::Scanning
}

/// Number of whitespace-separated words in a line.
pub fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}
