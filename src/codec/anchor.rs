//! Best-effort search for where the chunk walk should begin.
//!
//! Savegames carry version and header bytes ahead of the first chunk whose
//! length is not decoded here, so the walk is anchored at the earliest
//! literal occurrence of a well-known chunk tag instead.

/// Tags whose first occurrence marks a plausible walk start
pub const ANCHOR_TAGS: [&[u8; 4]; 5] = [b"VEHS", b"STNS", b"INDS", b"PLYR", b"INDY"];

/// Offset of the earliest anchor tag in `stream`, if any
pub fn find_chunk_anchor(stream: &[u8]) -> Option<usize> {
    ANCHOR_TAGS
        .iter()
        .filter_map(|tag| find_tag(stream, tag))
        .min()
}

fn find_tag(haystack: &[u8], tag: &[u8; 4]) -> Option<usize> {
    haystack.windows(tag.len()).position(|window| window == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earliest_anchor_wins() {
        let stream = b"\x00\x01junkPLYR\x00STNS\x00VEHS";
        assert_eq!(find_chunk_anchor(stream), Some(6));
    }

    #[test]
    fn test_indy_is_an_anchor() {
        assert_eq!(find_chunk_anchor(b"abINDY"), Some(2));
    }

    #[test]
    fn test_no_anchor() {
        assert_eq!(find_chunk_anchor(b"MAP \x08\x00\x00\x00\x00"), None);
        assert_eq!(find_chunk_anchor(b"VEH"), None);
        assert_eq!(find_chunk_anchor(b""), None);
    }
}
