use std::collections::BTreeMap;

use crate::error::Result;

/// Derived value streams produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stream {
    Pattern,
    Condensed,
    Letters,
    Digits,
    Specials,
}

impl Stream {
    pub const ALL: [Stream; 5] = [
        Stream::Pattern,
        Stream::Condensed,
        Stream::Letters,
        Stream::Digits,
        Stream::Specials,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Stream::Pattern => "pattern",
            Stream::Condensed => "condensed",
            Stream::Letters => "letters",
            Stream::Digits => "digits",
            Stream::Specials => "specials",
        }
    }
}

/// Destination for classifier output, one value per call.
pub trait StreamSink {
    fn append(&mut self, stream: Stream, value: &str) -> Result<()>;
}

impl<S: StreamSink + ?Sized> StreamSink for &mut S {
    fn append(&mut self, stream: Stream, value: &str) -> Result<()> {
        (**self).append(stream, value)
    }
}

/// Fans every value out to two sinks, left first.
impl<A: StreamSink, B: StreamSink> StreamSink for (A, B) {
    fn append(&mut self, stream: Stream, value: &str) -> Result<()> {
        self.0.append(stream, value)?;
        self.1.append(stream, value)
    }
}

/// Keeps every value in memory; intended for small corpora and tests.
impl StreamSink for BTreeMap<Stream, Vec<String>> {
    fn append(&mut self, stream: Stream, value: &str) -> Result<()> {
        self.entry(stream).or_default().push(value.to_string());
        Ok(())
    }
}
