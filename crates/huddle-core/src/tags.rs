//! Mention extraction from raw message text.

use std::collections::HashSet;

/// Preview length, in characters, of the notification text taken from the
/// scanned body starting at the first confirmed `@`.
pub const PREVIEW_LEN: usize = 20;

/// Result of scanning a text for mentions. `handles` is non-empty, in
/// first-occurrence order with duplicates collapsed; `first_at` is the byte
/// offset of the `@` of the first confirmed mention.
#[derive(Debug, PartialEq, Eq)]
pub struct MentionScan {
    pub handles: Vec<String>,
    pub first_at: usize,
}

/// Scan `text` left to right for `@handle` tokens.
///
/// A token mentions a handle only when the maximal alphanumeric run after
/// the `@` equals a known handle exactly (case-sensitive). The maximal-run
/// rule is what enforces the boundary: `@harrypotter1` never matches the
/// handle `harrypotter`, because the run is `harrypotter1`. Unknown tokens
/// are skipped, not errors.
pub fn extract_mentions(text: &str, known_handles: &HashSet<String>) -> Option<MentionScan> {
    let mut handles: Vec<String> = Vec::new();
    let mut first_at = None;

    let mut chars = text.char_indices().peekable();
    while let Some((at, c)) = chars.next() {
        if c != '@' {
            continue;
        }

        let mut candidate = String::new();
        while let Some(&(_, next)) = chars.peek() {
            if next.is_alphanumeric() {
                candidate.push(next);
                chars.next();
            } else {
                break;
            }
        }

        if candidate.is_empty() || !known_handles.contains(&candidate) {
            continue;
        }
        if first_at.is_none() {
            first_at = Some(at);
        }
        if !handles.contains(&candidate) {
            handles.push(candidate);
        }
    }

    first_at.map(|first_at| MentionScan { handles, first_at })
}

/// The notification preview: the original text from `at` onward, hard-cut at
/// [`PREVIEW_LEN`] characters. No ellipsis.
pub fn mention_preview(text: &str, at: usize) -> String {
    text[at..].chars().take(PREVIEW_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(handles: &[&str]) -> HashSet<String> {
        handles.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn matches_known_handle_at_word_boundary() {
        let scan = extract_mentions("@harrypotter is here", &known(&["harrypotter"])).unwrap();
        assert_eq!(scan.handles, vec!["harrypotter"]);
        assert_eq!(scan.first_at, 0);
    }

    #[test]
    fn longer_run_does_not_match_prefix_handle() {
        assert_eq!(
            extract_mentions("@harrypotter1", &known(&["harrypotter"])),
            None
        );
    }

    #[test]
    fn match_may_end_at_end_of_string() {
        let scan = extract_mentions("hey @harrypotter", &known(&["harrypotter"])).unwrap();
        assert_eq!(scan.handles, vec!["harrypotter"]);
        assert_eq!(scan.first_at, 4);
    }

    #[test]
    fn case_and_at_sign_are_required() {
        let handles = known(&["harrypotter"]);
        assert_eq!(extract_mentions("@HARRYPOTTER", &handles), None);
        assert_eq!(extract_mentions("harrypotter", &handles), None);
        assert_eq!(extract_mentions("@randomname", &handles), None);
    }

    #[test]
    fn duplicates_collapse_in_first_occurrence_order() {
        let scan =
            extract_mentions("@bob hi @alice hi @bob", &known(&["alice", "bob"])).unwrap();
        assert_eq!(scan.handles, vec!["bob", "alice"]);
        assert_eq!(scan.first_at, 0);
    }

    #[test]
    fn first_offset_is_first_confirmed_mention_not_first_at_sign() {
        let scan = extract_mentions("@nobody then @bob", &known(&["bob"])).unwrap();
        assert_eq!(scan.handles, vec!["bob"]);
        assert_eq!(scan.first_at, 13);
    }

    #[test]
    fn doubled_at_sign_still_matches() {
        let scan = extract_mentions("@@bob", &known(&["bob"])).unwrap();
        assert_eq!(scan.handles, vec!["bob"]);
        assert_eq!(scan.first_at, 1);
    }

    #[test]
    fn preview_is_twenty_chars_hard_cut() {
        // "@harrypotter is here" is exactly 20 chars, so it survives whole.
        let text = "@harrypotter is here";
        let scan = extract_mentions(text, &known(&["harrypotter"])).unwrap();
        assert_eq!(mention_preview(text, scan.first_at), "@harrypotter is here");

        let long = "@harrypotter was here first";
        assert_eq!(mention_preview(long, 0), "@harrypotter was her");
    }

    #[test]
    fn preview_shorter_than_limit_is_left_alone() {
        assert_eq!(mention_preview("@bob hi", 0), "@bob hi");
    }
}
