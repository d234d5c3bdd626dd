// src/readers/streammerger.rs

//! Implements a [`StreamMerger`], the k-way merge of [`LineSource`]s into
//! one output ordered by datetime.
//!
//! The source with the earliest buffered line is selected with a min-heap
//! keyed by `(datetime, source index)`; ties go to the earlier source as
//! passed by the user. Continuation lines are written directly after the
//! line they continue.

use crate::common::{Count, SourceError, NLu8};
use crate::data::datetime::DateTimeL;
use crate::data::line::LineData;
use crate::readers::linesource::{LineSource, LineSourceStatus};

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::Write;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Index into [`StreamMerger`] sources.
pub type SourceIndex = usize;

type MergeKey = Reverse<(DateTimeL, SourceIndex)>;

/// Merges the lines of many [`LineSource`]s in datetime order.
#[derive(Debug)]
pub struct StreamMerger {
    sources: Vec<LineSource>,
    /// one entry per source with a buffered line
    heap: BinaryHeap<MergeKey>,
    primed: bool,
    count_lines_written: Count,
}

impl StreamMerger {
    pub fn new(sources: Vec<LineSource>) -> StreamMerger {
        defñ!("({} sources)", sources.len());
        let capacity: usize = sources.len();
        StreamMerger {
            sources,
            heap: BinaryHeap::with_capacity(capacity),
            primed: false,
            count_lines_written: 0,
        }
    }

    pub fn sources(&self) -> &[LineSource] {
        &self.sources
    }

    pub const fn count_lines_written(&self) -> Count {
        self.count_lines_written
    }

    /// Push `index` to the heap if its source has a buffered line.
    fn push_source(&mut self, index: SourceIndex) {
        if let Some(linedata) = self.sources[index].current() {
            self.heap.push(Reverse((*linedata.dt(), index)));
        }
    }

    /// Advance every source to its first line to emit.
    ///
    /// Every source completes its seek phase before any line is written, so
    /// an error in any seek phase is returned before output begins.
    pub fn prime(&mut self) -> Result<(), SourceError> {
        defn!();
        if self.primed {
            defx!("already primed");
            return Ok(());
        }
        self.primed = true;
        for index in 0..self.sources.len() {
            if self.sources[index].status() == LineSourceStatus::Seeking {
                if let Err(err) = self.sources[index].advance() {
                    defx!("source {} error {}", index, err);
                    return Err(err);
                }
            }
            self.push_source(index);
        }
        defx!("{} sources with lines", self.heap.len());

        Ok(())
    }

    fn write_line<W: Write>(
        &mut self,
        writer: &mut W,
        linedata: &LineData,
    ) -> Result<(), SourceError> {
        writer
            .write_all(linedata.as_bytes())
            .map_err(SourceError::Write)?;
        writer
            .write_all(&[NLu8])
            .map_err(SourceError::Write)?;
        self.count_lines_written += 1;

        Ok(())
    }

    /// Write all in-range lines of all sources to `writer`, each followed by
    /// `'\n'`, in datetime order. Returns the count of lines written.
    ///
    /// The first error from any source, or from writing, stops the merge.
    /// Lines already written are kept.
    pub fn merge<W: Write>(
        &mut self,
        writer: &mut W,
    ) -> Result<Count, SourceError> {
        defn!();
        let result = self.merge_lines(writer);
        let result_flush = writer.flush().map_err(SourceError::Write);
        match (result, result_flush) {
            (Err(err), _) | (Ok(_), Err(err)) => {
                defx!("error {}", err);
                Err(err)
            }
            (Ok(()), Ok(())) => {
                defx!("wrote {} lines", self.count_lines_written);
                Ok(self.count_lines_written)
            }
        }
    }

    fn merge_lines<W: Write>(
        &mut self,
        writer: &mut W,
    ) -> Result<(), SourceError> {
        self.prime()?;
        while let Some(Reverse((_dt, index))) = self.heap.pop() {
            defo!("select source {} at {:?}", index, _dt);
            // write the selected line and any continuation lines after it
            while let Some(linedata) = self.sources[index].take_current() {
                self.write_line(writer, &linedata)?;
                self.sources[index].advance()?;
                match self.sources[index].current() {
                    Some(next) if next.is_continuation() => continue,
                    _ => break,
                }
            }
            self.push_source(index);
        }

        Ok(())
    }
}
