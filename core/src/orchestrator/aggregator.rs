//! Merging of previously produced summaries

use crate::config::RunParameters;
use crate::summary::{ResultsDocument, Summary};

/// Concatenate stored results in input order under fresh run parameters
///
/// No de-duplication and no re-sorting. Parameters recorded in the inputs
/// are ignored so the combined report carries one authoritative set.
pub fn aggregate_summaries(
    params: RunParameters,
    documents: impl IntoIterator<Item = ResultsDocument>,
) -> Summary {
    let mut summary = Summary::new(params);
    for document in documents {
        summary.results.extend(document.results);
    }
    summary
}
