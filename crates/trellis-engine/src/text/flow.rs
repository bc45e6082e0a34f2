use crate::coords::Rect;

use super::{TextMetrics, WhiteSpace, WordBreak};

/// Places the characters of `text` into `bounds` line by line.
///
/// `advance` supplies each character's width; `emit` receives every placed
/// character with its cell. Flow stops at the first character whose line would
/// cross the bottom edge (or, for non-wrapping modes, the right edge) and
/// reports that character's byte offset as the overflow cursor.
///
/// Rules:
/// - `\n` breaks the line when newlines are preserved, otherwise it is a space.
/// - Collapsing modes merge space runs and drop line-leading spaces.
/// - In wrapping modes a word that does not fit moves to the next line as a
///   whole, except under `break-all`, which fills every line to the edge.
/// - A character that still does not fit mid-line starts a new line.
pub fn flow(
    text: &str,
    bounds: Rect,
    white_space: WhiteSpace,
    word_break: WordBreak,
    line_h: u32,
    advance: impl Fn(char) -> u32,
    mut emit: impl FnMut(char, Rect),
) -> TextMetrics {
    if text.is_empty() {
        return TextMetrics::default();
    }
    if bounds.is_empty() || line_h == 0 {
        return TextMetrics { width: 0, height: 0, overflow: Some(0) };
    }

    let x0 = bounds.x as i64;
    let y0 = bounds.y as i64;
    let x1 = bounds.right();
    let y1 = bounds.bottom();
    let lh = line_h as i64;

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let wraps = white_space.wraps();
    let collapses = white_space.collapses_spaces();

    let mut cx = x0;
    let mut cy = y0;
    let mut max_w = 0i64;
    let mut in_word = false;
    let mut prev_space = false;
    let mut overflow = None;
    let mut i = 0;

    while i < chars.len() {
        let (at, raw) = chars[i];

        if raw == '\n' && white_space.preserves_newlines() {
            cx = x0;
            cy += lh;
            in_word = false;
            prev_space = false;
            i += 1;
            continue;
        }
        let c = if raw == '\n' { ' ' } else { raw };

        if cy + lh > y1 {
            overflow = Some(at);
            break;
        }

        if c == ' ' {
            i += 1;
            in_word = false;
            if collapses && (cx == x0 || prev_space) {
                continue;
            }
            prev_space = true;
            cx += advance(' ') as i64;
            continue;
        }
        prev_space = false;

        let adv = advance(c) as i64;

        if !wraps {
            if cx + adv > x1 {
                overflow = Some(at);
                break;
            }
        } else {
            if !in_word && cx != x0 && word_break != WordBreak::BreakAll {
                let word_px: i64 = chars[i..]
                    .iter()
                    .map(|&(_, w)| w)
                    .take_while(|&w| w != ' ' && w != '\n')
                    .map(|w| advance(w) as i64)
                    .sum();
                if cx + word_px > x1 {
                    cx = x0;
                    cy += lh;
                    continue;
                }
            }
            in_word = true;

            if cx != x0 && cx + adv > x1 {
                cx = x0;
                cy += lh;
                continue;
            }
        }

        emit(c, Rect::new(cx as i32, cy as i32, adv as u32, line_h));
        cx += adv;
        max_w = max_w.max(cx - x0);
        i += 1;
    }

    TextMetrics {
        width: max_w.clamp(0, u32::MAX as i64) as u32,
        height: (cy - y0 + lh).clamp(0, u32::MAX as i64) as u32,
        overflow,
    }
}
