//! Bounded store of sensor samples with text serialization.

use core::fmt::Write;

use heapless::{String, Vec};

/// Fixed-capacity, append-only sample store.
///
/// Appends beyond capacity are dropped; the buffer never wraps. Use
/// [`SampleBuffer::is_full`] to observe the overflow.
#[derive(Debug, Clone)]
pub struct SampleBuffer<const N: usize> {
    samples: [i32; N],
    count: usize,
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleBuffer<N> {
    pub const fn new() -> Self {
        Self {
            samples: [0; N],
            count: 0,
        }
    }

    pub fn append(&mut self, value: i32) {
        if let Some(slot) = self.samples.get_mut(self.count) {
            *slot = value;
            self.count += 1;
        }
    }

    pub fn clear(&mut self) {
        self.samples.fill(0);
        self.count = 0;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn is_full(&self) -> bool {
        self.count >= N
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples[..self.count]
    }

    /// Render all samples as space separated decimals.
    ///
    /// Output stops at the last sample that fits in `L - 1` bytes, leaving room
    /// for a terminator when the text is copied into a C string of size `L`.
    /// A sample is either written completely or not at all.
    pub fn serialize_to_string<const L: usize>(&self) -> String<L> {
        render(self.samples())
    }

    /// Split the samples into at most `max_chunks` contiguous chunks.
    ///
    /// Each chunk holds `count / max_chunks` samples (at least one) and is
    /// rendered like [`SampleBuffer::serialize_to_string`]. When `count` is not
    /// a multiple of `max_chunks`, the trailing remainder is not emitted. Empty
    /// partitions are skipped, so fewer chunks than requested may come back.
    ///
    /// Samples that did not fit the text of their chunk are counted in
    /// [`Chunks::truncated`].
    pub fn serialize_to_chunks<const CAP: usize, const M: usize>(
        &self,
        max_chunks: usize,
    ) -> Chunks<CAP, M> {
        let mut chunks = Chunks {
            texts: Vec::new(),
            truncated: 0,
        };
        if max_chunks == 0 || self.is_empty() {
            return chunks;
        }

        let per_chunk = core::cmp::max(self.count / max_chunks, 1);
        for part in self
            .samples()
            .chunks(per_chunk)
            .take(core::cmp::min(max_chunks, M))
        {
            let (text, written) = render_counted(part);
            if chunks.texts.push(text).is_err() {
                break;
            }
            chunks.truncated += part.len() - written;
        }

        chunks
    }
}

/// Output of [`SampleBuffer::serialize_to_chunks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunks<const CAP: usize, const M: usize> {
    pub texts: Vec<String<CAP>, M>,
    /// Samples cut from the end of a chunk because its text was full.
    pub truncated: usize,
}

fn render<const L: usize>(samples: &[i32]) -> String<L> {
    render_counted(samples).0
}

/// Render `samples`, returning the text and how many samples made it in.
fn render_counted<const L: usize>(samples: &[i32]) -> (String<L>, usize) {
    let limit = L.saturating_sub(1);
    let mut out = String::new();
    let mut written = 0;

    for sample in samples {
        let mut token: String<12> = String::new();
        // An i32 is at most 11 characters, so this cannot fail.
        write!(token, "{}", sample).ok();

        let sep = usize::from(written > 0);
        if out.len() + sep + token.len() > limit {
            break;
        }
        if sep == 1 {
            out.push(' ').ok();
        }
        out.push_str(&token).ok();
        written += 1;
    }

    (out, written)
}
