use crate::llm_adapter::SummaryOutcome;
use crate::utils::text::char_len;
use interfaces::{FeedEntry, ResultFragment};

/// Build the delivered block for one accepted entry.
pub fn compose_fragment(entry: &FeedEntry, summary: String) -> ResultFragment {
    ResultFragment {
        link: entry.link.clone(),
        title: entry.title.clone(),
        published: entry.published.to_rfc2822(),
        summary,
    }
}

/// Pick the summary to publish.
///
/// The AI reply wins only when it is strictly longer than the local summary.
/// `None` means the entry was judged not relevant and must be dropped.
pub fn choose_summary(local: &str, outcome: SummaryOutcome) -> Option<String> {
    match outcome {
        SummaryOutcome::Summary(ai) if char_len(&ai) > char_len(local) => Some(ai),
        SummaryOutcome::Summary(_) | SummaryOutcome::Failed(_) => Some(local.to_string()),
        SummaryOutcome::NotRelevant => None,
    }
}

