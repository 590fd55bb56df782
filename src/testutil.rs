//! Test support: an in-memory recording sink.

use crate::sink::{FieldValue, OutputSink, PduSummary};
use heapless::Vec;

/// One record as received by the sink, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Record {
    Summary(PduSummary),
    Field {
        indent: usize,
        label: &'static str,
        value: FieldValue,
    },
    Hexdump(Vec<u8, 64>),
    Malformed(&'static str),
}

/// Sink that records everything it receives, for assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub records: Vec<Record, 32>,
}

impl OutputSink for RecordingSink {
    fn summary(&mut self, summary: &PduSummary) {
        self.records.push(Record::Summary(*summary)).unwrap();
    }

    fn field(&mut self, indent: usize, label: &'static str, value: FieldValue) {
        self.records
            .push(Record::Field {
                indent,
                label,
                value,
            })
            .unwrap();
    }

    fn hexdump(&mut self, bytes: &[u8]) {
        let mut copy = Vec::new();
        copy.extend_from_slice(bytes).unwrap();
        self.records.push(Record::Hexdump(copy)).unwrap();
    }

    fn malformed(&mut self, reason: &'static str) {
        self.records.push(Record::Malformed(reason)).unwrap();
    }
}
