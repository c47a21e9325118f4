//! Transcript partitioning backed by the ledger model.

use crate::ports::outbound::TranscriptPartitioner;
use shared_types::{
    partition_transcripts, LedgerError, LedgerParameters, PartitionedTranscript, PreTranscript,
};

/// Partitions by replaying programs with [`partition_transcripts`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerPartitioner;

impl TranscriptPartitioner for LedgerPartitioner {
    fn partition(
        &self,
        pre_transcripts: &[PreTranscript],
        parameters: &LedgerParameters,
    ) -> Result<Vec<PartitionedTranscript>, LedgerError> {
        partition_transcripts(pre_transcripts, parameters)
    }
}
