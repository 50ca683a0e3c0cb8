//! Escape sequence stripping.
//!
//! Removes the terminal control sequences a shell session emits around its
//! visible text:
//! - CSI: `ESC [` params (`0-9 ; : < = > ?`), intermediates (`0x20-0x2f`), final byte
//! - OSC: `ESC ]` ... terminated by BEL or `ESC \`
//! - Charset selection: `ESC (` / `ESC )` followed by one alphanumeric
//! - Keypad mode and cursor save/restore: `ESC =`, `ESC >`, `ESC 7`, `ESC 8`
//!
//! Anything else introduced by ESC is left in place. `\r`, `\b` and `\n` are
//! never touched; interpreting them is the job of [`super::LineRenderer`].

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;

/// Upper bound on bytes held back while waiting for an escape sequence to
/// complete in streaming mode. Past it the stalled ESC is released as text
/// and scanning resumes right after it.
const MAX_PENDING: usize = 4096;

/// Outcome of trying to recognize a sequence starting at an ESC byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sequence {
    /// A recognized sequence ending just before this index.
    Complete(usize),
    /// Input ran out before the sequence could be classified.
    Incomplete,
    /// Not a sequence we strip.
    Unrecognized,
}

/// Strip recognized escape sequences from a complete buffer.
///
/// Sequences cut off by the end of the buffer are left in place.
pub fn strip_escapes(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    scan(input, &mut out, true);
    out
}

/// Text variant of [`strip_escapes`].
pub fn strip_escapes_str(input: &str) -> String {
    // Every stripped sequence is pure ASCII, so UTF-8 boundaries survive.
    String::from_utf8_lossy(&strip_escapes(input.as_bytes())).into_owned()
}

/// Streaming stripper that carries incomplete trailing sequences between
/// calls, so a sequence split across two reads is still removed.
#[derive(Debug, Default)]
pub struct EscapeStripper {
    pending: Vec<u8>,
}

impl EscapeStripper {
    /// Create a stripper with no pending input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk and return the stripped bytes that are final.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<u8> {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(chunk);

        let mut out = Vec::with_capacity(input.len());
        let mut consumed = scan(&input, &mut out, false);
        while input.len() - consumed > MAX_PENDING {
            out.push(input[consumed]);
            consumed += 1;
            consumed += scan(&input[consumed..], &mut out, false);
        }

        self.pending = input[consumed..].to_vec();
        out
    }

    /// Release whatever is still held back, unmodified.
    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pending)
    }
}

/// Copy `input` into `out` minus recognized sequences.
///
/// Returns the number of bytes consumed. When `at_eof` is false, scanning
/// stops at the start of a sequence that might still complete.
fn scan(input: &[u8], out: &mut Vec<u8>, at_eof: bool) -> usize {
    let mut i = 0;
    while i < input.len() {
        let byte = input[i];
        if byte != ESC {
            out.push(byte);
            i += 1;
            continue;
        }

        match classify(input, i) {
            Sequence::Complete(end) => i = end,
            Sequence::Incomplete if !at_eof => return i,
            Sequence::Incomplete | Sequence::Unrecognized => {
                out.push(byte);
                i += 1;
            }
        }
    }
    i
}

fn classify(input: &[u8], start: usize) -> Sequence {
    let Some(&kind) = input.get(start + 1) else {
        return Sequence::Incomplete;
    };

    match kind {
        b'[' => classify_csi(input, start + 2),
        b']' => classify_osc(input, start + 2),
        b'(' | b')' => match input.get(start + 2) {
            None => Sequence::Incomplete,
            Some(c) if c.is_ascii_alphanumeric() => Sequence::Complete(start + 3),
            Some(_) => Sequence::Unrecognized,
        },
        b'=' | b'>' | b'7' | b'8' => Sequence::Complete(start + 2),
        _ => Sequence::Unrecognized,
    }
}

fn classify_csi(input: &[u8], mut i: usize) -> Sequence {
    while i < input.len() && (0x30..=0x3f).contains(&input[i]) {
        i += 1;
    }
    while i < input.len() && (0x20..=0x2f).contains(&input[i]) {
        i += 1;
    }
    match input.get(i) {
        None => Sequence::Incomplete,
        Some(c) if (0x40..=0x7e).contains(c) => Sequence::Complete(i + 1),
        Some(_) => Sequence::Unrecognized,
    }
}

fn classify_osc(input: &[u8], mut i: usize) -> Sequence {
    while i < input.len() {
        match input[i] {
            BEL => return Sequence::Complete(i + 1),
            ESC => match input.get(i + 1) {
                Some(b'\\') => return Sequence::Complete(i + 2),
                None => return Sequence::Incomplete,
                Some(_) => i += 1,
            },
            _ => i += 1,
        }
    }
    Sequence::Incomplete
}
