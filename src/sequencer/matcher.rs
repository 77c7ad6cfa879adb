use crate::ring_buffer::RingBuffer;

/// Incremental substring matcher over a bounded window of received bytes.
///
/// Bytes are pushed one at a time; after each push the window is checked for
/// ending with the expected pattern, which is equivalent to checking whether
/// the pattern occurs anywhere in the stream since the last [`clear`]. The
/// first match latches.
///
/// Patterns longer than `W` can never match.
///
/// [`clear`]: ResponseMatcher::clear
#[derive(Debug, Clone, Default)]
pub struct ResponseMatcher<const W: usize> {
    window: RingBuffer<u8, W>,
    received: usize,
    matched: bool,
}

impl<const W: usize> ResponseMatcher<W> {
    pub fn new() -> Self {
        Self {
            window: RingBuffer::new(),
            received: 0,
            matched: false,
        }
    }

    pub fn clear(&mut self) {
        self.window.clear();
        self.received = 0;
        self.matched = false;
    }

    /// Feed one byte, returning whether `pattern` has been seen.
    pub fn push(&mut self, byte: u8, pattern: &[u8]) -> bool {
        if self.matched {
            return true;
        }
        self.window.push_overwrite(byte);
        self.received += 1;

        if !pattern.is_empty() && pattern.len() <= W && self.window.ends_with(pattern) {
            self.matched = true;
        }
        self.matched
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Number of bytes seen since the last clear.
    pub fn received(&self) -> usize {
        self.received
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn feed<const W: usize>(m: &mut ResponseMatcher<W>, data: &[u8], pattern: &[u8]) -> bool {
        data.iter().any(|b| m.push(*b, pattern))
    }

    #[test]
    fn finds_pattern_anywhere_in_stream() {
        let mut m = ResponseMatcher::<16>::new();
        assert!(feed(&mut m, b"\r\n+CREG: 0,1\r\n\r\nOK\r\n", b"+CREG: 0,1"));
        assert!(m.is_matched());
    }

    #[test]
    fn pattern_split_across_reads() {
        let mut m = ResponseMatcher::<16>::new();
        assert!(!feed(&mut m, b"\r\nSEND ", b"SEND OK"));
        assert!(feed(&mut m, b"OK\r\n", b"SEND OK"));
    }

    #[test]
    fn long_noise_before_match_is_bounded() {
        let mut m = ResponseMatcher::<8>::new();
        let noise = [b'x'; 300];
        assert!(!feed(&mut m, &noise, b"OK"));
        assert!(feed(&mut m, b"\r\nOK", b"OK"));
        assert_eq!(m.received(), 304);
    }

    #[test]
    fn first_match_latches_until_clear() {
        let mut m = ResponseMatcher::<8>::new();
        assert!(feed(&mut m, b"OK", b"OK"));
        assert!(m.push(b'z', b"OK"));

        m.clear();
        assert!(!m.is_matched());
        assert_eq!(m.received(), 0);
        assert!(!feed(&mut m, b"ERROR", b"OK"));
    }

    #[test]
    fn oversized_or_empty_pattern_never_matches() {
        let mut m = ResponseMatcher::<4>::new();
        assert!(!feed(&mut m, b"CONNECT OK", b"CONNECT OK"));
        assert!(!feed(&mut m, b"anything", b""));
    }
}
