//! # Diagnostic Sinks
//!
//! A [`TagSink`] receives every decoded tag. Sinks are write-only: they
//! cannot stop the walk or report failure back to it.

use crate::tag::Tag;
use arrayvec::ArrayString;
use core::fmt::{self, Write};

/// Consumer of decoded boot information tags.
pub trait TagSink<'a> {
    fn tag(&mut self, tag: &Tag<'a>);
}

impl<'a, S: TagSink<'a> + ?Sized> TagSink<'a> for &mut S {
    #[inline]
    fn tag(&mut self, tag: &Tag<'a>) {
        (**self).tag(tag);
    }
}

/// Fan-out to two sinks, e.g. a console and a collector.
impl<'a, A: TagSink<'a>, B: TagSink<'a>> TagSink<'a> for (A, B) {
    #[inline]
    fn tag(&mut self, tag: &Tag<'a>) {
        self.0.tag(tag);
        self.1.tag(tag);
    }
}

/// Renders tags as text lines into any [`fmt::Write`].
pub struct FmtSink<W> {
    out: W,
}

impl<W: Write> FmtSink<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<'a, W: Write> TagSink<'a> for FmtSink<W> {
    fn tag(&mut self, tag: &Tag<'a>) {
        // Best-effort diagnostics.
        let _ = tag.write_lines(&mut self.out);
    }
}

/// Length of the line buffer of [`LogSink`]; longer lines are split.
const LOG_LINE_CAPACITY: usize = 160;

/// Forwards rendered tags to the `log` facade, one record per line.
pub struct LogSink {
    level: log::Level,
}

impl LogSink {
    #[must_use]
    pub const fn new(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(log::Level::Info)
    }
}

impl<'a> TagSink<'a> for LogSink {
    fn tag(&mut self, tag: &Tag<'a>) {
        let mut lines = LogLines {
            level: self.level,
            line: ArrayString::new(),
        };
        let _ = tag.write_lines(&mut lines);
        lines.flush();
    }
}

/// Collects characters into a fixed buffer and logs on every newline.
struct LogLines {
    level: log::Level,
    line: ArrayString<LOG_LINE_CAPACITY>,
}

impl LogLines {
    fn flush(&mut self) {
        if !self.line.is_empty() {
            log::log!(target: "bootinfo", self.level, "{}", self.line);
            self.line.clear();
        }
    }
}

impl Write for LogLines {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if c == '\n' {
                self.flush();
            } else if self.line.try_push(c).is_err() {
                self.flush();
                let _ = self.line.try_push(c);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::BasicMemInfo;

    #[derive(Default)]
    struct Count(usize);

    impl TagSink<'_> for Count {
        fn tag(&mut self, _tag: &Tag<'_>) {
            self.0 += 1;
        }
    }

    #[test]
    fn fmt_sink_renders_lines() {
        let mut sink = FmtSink::new(String::new());
        sink.tag(&Tag::CommandLine("root=/dev/sda1"));
        sink.tag(&Tag::BasicMemInfo(BasicMemInfo {
            mem_lower: 639,
            mem_upper: 1024,
        }));
        assert_eq!(
            sink.into_inner(),
            "Kernel command line: root=/dev/sda1\nmem_lower = 639KB, mem_upper = 1024KB\n"
        );
    }

    #[test]
    fn pair_fans_out() {
        let mut pair = (Count::default(), Count::default());
        pair.tag(&Tag::CommandLine(""));
        pair.tag(&Tag::CommandLine(""));
        assert_eq!((pair.0.0, pair.1.0), (2, 2));
    }

    #[test]
    fn log_lines_split_long_lines() {
        let mut lines = LogLines {
            level: log::Level::Info,
            line: ArrayString::new(),
        };
        let long = "x".repeat(LOG_LINE_CAPACITY + 10);
        lines.write_str(&long).unwrap();
        assert_eq!(lines.line.len(), 10);
        lines.write_str("\n").unwrap();
        assert!(lines.line.is_empty());
    }

    #[test]
    fn log_sink_accepts_tags() {
        let mut sink = LogSink::default();
        sink.tag(&Tag::CommandLine("quiet"));
    }
}
