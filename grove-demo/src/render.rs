use grove_store::{TreeStore, VisibleRow};

const INDENT: &str = "  ";

/// Draw the visible rows of `store` as an indented outline.
///
/// Open rows get `▼`, closed rows with known children get `▶`, rows that
/// were never opened get `•`. A loading row is followed by a placeholder.
pub fn outline(store: &TreeStore) -> String {
    let mut out = String::new();
    for row in store.rows() {
        push_row(&mut out, &row);
    }
    if out.is_empty() {
        out.push_str("(empty)\n");
    }
    out
}

fn push_row(out: &mut String, row: &VisibleRow<'_>) {
    let marker = match (row.has_disclosure(), row.expanded) {
        (false, _) => '•',
        (true, true) => '▼',
        (true, false) => '▶',
    };
    out.push_str(&INDENT.repeat(row.depth));
    out.push(marker);
    out.push(' ');
    out.push_str(row.node.name());
    out.push('\n');

    if row.is_loading() {
        out.push_str(&INDENT.repeat(row.depth + 1));
        out.push_str("Loading...\n");
    }
}
