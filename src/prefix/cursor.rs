//! Cursor token extraction for term completion

use tower_lsp::lsp_types::Position;

/// The prefixed identifier being typed at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorToken {
    /// Full token text from its start up to the cursor (e.g. `foaf:Pers`)
    pub text: String,
    /// Prefix part including its colon (e.g. `foaf:`)
    pub prefix: String,
    /// Everything after the first colon (e.g. `Pers`)
    pub suffix: String,
}

/// Returns line `index` of `text`, honouring `\n`, `\r\n` and `\r` endings.
pub(crate) fn nth_line(text: &str, index: usize) -> Option<&str> {
    let mut rest = text;
    for _ in 0..index {
        let end = rest.find(['\r', '\n'])?;
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
    }
    Some(match rest.find(['\r', '\n']) {
        Some(end) => &rest[..end],
        None => rest,
    })
}

/// Finds the whitespace-delimited word that ends at the cursor and splits it
/// at its first colon.
///
/// Returns `None` when the word contains no colon, i.e. the cursor is not
/// inside a prefixed identifier. Positions past the end of the line are
/// clamped to the line end.
pub fn extract_cursor_token(text: &str, position: Position) -> Option<CursorToken> {
    let line = nth_line(text, position.line as usize)?;
    let chars: Vec<char> = line.chars().collect();
    let end = (position.character as usize).min(chars.len());

    let start = chars[..end]
        .iter()
        .rposition(|c| c.is_whitespace())
        .map_or(0, |space| space + 1);

    let word: String = chars[start..end].iter().collect();
    let (prefix, suffix) = word.split_once(':')?;

    Some(CursorToken {
        prefix: format!("{}:", prefix),
        suffix: suffix.to_string(),
        text: word,
    })
}
