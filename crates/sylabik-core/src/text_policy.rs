//! Text shaping for titles, page counters and waiting previews.

use core::fmt::Write;

use heapless::String;

pub const TITLE_MAX_CHARS: usize = 32;
pub const PREVIEW_MAX_CHARS: usize = 120;

const ELLIPSIS: char = '…';

/// Collapse whitespace runs to single spaces and keep at most `max_chars`
/// characters. Clipped text ends on a word edge followed by `…`; a single word
/// longer than the limit is cut on a char edge instead.
pub fn clip_words<const N: usize>(source: &str, max_chars: usize) -> String<N> {
    let mut out = String::new();
    if max_chars == 0 {
        return out;
    }

    if compact_fits(source, max_chars, N) {
        for word in source.split_whitespace() {
            if !out.is_empty() {
                let _ = out.push(' ');
            }
            let _ = out.push_str(word);
        }
        return out;
    }

    // Room for the ellipsis is held back from both limits.
    let char_budget = max_chars - 1;
    let byte_budget = N.saturating_sub(ELLIPSIS.len_utf8());
    let mut chars = 0usize;

    for word in source.split_whitespace() {
        let gap = usize::from(!out.is_empty());
        let word_chars = word.chars().count();
        if chars + gap + word_chars > char_budget || out.len() + gap + word.len() > byte_budget {
            if out.is_empty() {
                for ch in word.chars() {
                    if chars + 1 > char_budget || out.len() + ch.len_utf8() > byte_budget {
                        break;
                    }
                    let _ = out.push(ch);
                    chars += 1;
                }
            }
            break;
        }

        if gap == 1 {
            let _ = out.push(' ');
        }
        let _ = out.push_str(word);
        chars += gap + word_chars;
    }

    let _ = out.push(ELLIPSIS);
    out
}

fn compact_fits(source: &str, max_chars: usize, max_bytes: usize) -> bool {
    let mut chars = 0usize;
    let mut bytes = 0usize;
    for (index, word) in source.split_whitespace().enumerate() {
        let gap = usize::from(index > 0);
        chars += gap + word.chars().count();
        bytes += gap + word.len();
        if chars > max_chars || bytes > max_bytes {
            return false;
        }
    }
    true
}

/// `"page/total suffix"`. A suffix that does not fit is dropped whole.
pub fn page_counter_label<const N: usize>(page: u16, total: u16, suffix: &str) -> String<N> {
    let mut out = String::new();
    if write!(out, "{page}/{total}").is_err() {
        out.clear();
        return out;
    }

    let counter_len = out.len();
    if !suffix.is_empty() && write!(out, " {suffix}").is_err() {
        out.truncate(counter_len);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_label_with_suffix() {
        let label: String<24> = page_counter_label(2, 3, "Książeczka");
        assert_eq!(label, "2/3 Książeczka");
    }

    #[test]
    fn counter_label_drops_suffix_that_does_not_fit() {
        let label: String<8> = page_counter_label(12, 40, "ż");
        assert_eq!(label, "12/40 ż");

        let tight: String<6> = page_counter_label(12, 40, "żż");
        assert_eq!(tight, "12/40");
    }

    #[test]
    fn counter_that_does_not_fit_is_empty() {
        let label: String<4> = page_counter_label(120, 400, "");
        assert_eq!(label, "");
    }

    #[test]
    fn short_text_is_only_compacted() {
        let text: String<64> = clip_words("  Mama   ma kota.  ", TITLE_MAX_CHARS);
        assert_eq!(text, "Mama ma kota.");
    }

    #[test]
    fn long_text_is_cut_between_words() {
        let text: String<64> = clip_words("Kot pije wodę z miski", 15);
        assert_eq!(text, "Kot pije wodę…");
    }

    #[test]
    fn single_long_word_is_cut_inside() {
        let text: String<32> = clip_words("Historyjka", 6);
        assert_eq!(text, "Histo…");
    }

    #[test]
    fn byte_capacity_keeps_char_edges() {
        // Each Polish letter takes two bytes; the ellipsis takes three.
        let text: String<8> = clip_words("żółw żółw", PREVIEW_MAX_CHARS);
        assert_eq!(text, "żó…");
    }

    #[test]
    fn blank_text_stays_empty() {
        let text: String<16> = clip_words(" \t\n ", PREVIEW_MAX_CHARS);
        assert_eq!(text, "");
    }
}
