mod consolidated;
mod individual;

pub use consolidated::ConsolidatedBuffer;
pub use individual::IndividualWriter;

use std::path::PathBuf;

use crate::models::{FlushOutcome, OptionOutcome, PeriodOption};

/// Where normalized tables go for the length of one session.
#[derive(Debug)]
pub enum OutputAccumulator {
    Individual(IndividualWriter),
    Consolidated {
        buffer: ConsolidatedBuffer,
        path: PathBuf,
    },
}

impl OutputAccumulator {
    pub fn accept(&mut self, option: &PeriodOption, body: &str) -> OptionOutcome {
        match self {
            OutputAccumulator::Individual(writer) => writer.write_csv(option, body),
            OutputAccumulator::Consolidated { buffer, .. } => buffer.add_csv(option, body),
        }
    }

    /// Flushes the consolidated buffer; individual output has nothing left
    /// to do.
    pub fn finish(self) -> Option<FlushOutcome> {
        match self {
            OutputAccumulator::Individual(_) => None,
            OutputAccumulator::Consolidated { buffer, path } => Some(buffer.flush(&path)),
        }
    }
}
