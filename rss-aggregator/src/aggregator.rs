use crate::artifact::{save_debug_copy, DEBUG_FILE_NAME};
use crate::config::AppConfig;
use crate::content::{ContentResolver, Resolution};
use crate::digest::{choose_summary, compose_fragment};
use crate::filter::{RelevanceFilter, SeenTitles, Verdict};
use crate::llm_adapter::{SummaryOutcome, Summarizer};
use crate::selector::{EntrySelector, SelectOutcome};
use crate::sources::LinkRules;
use crate::traits::FetchText;
use crate::types::RunReport;
use crate::utils::text::char_len;
use interfaces::{Delivery, FeedEntry, OutputBatch};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// State accumulated while walking the feed list.
#[derive(Debug, Default)]
pub struct DigestRun {
    pub batch: OutputBatch,
    pub seen: SeenTitles,
    pub report: RunReport,
}

struct RunSettings {
    min_chars: usize,
    feed_delay: Duration,
    debug: bool,
    debug_path: PathBuf,
    overall_summary: bool,
}

pub struct RssAggregator {
    fetcher: Arc<dyn FetchText>,
    summarizer: Arc<dyn Summarizer>,
    selector: EntrySelector,
    filter: RelevanceFilter,
    resolver: ContentResolver,
    settings: RunSettings,
}

impl RssAggregator {
    pub fn new(fetcher: Arc<dyn FetchText>, summarizer: Arc<dyn Summarizer>, config: &AppConfig) -> Self {
        Self {
            fetcher,
            summarizer,
            selector: EntrySelector::default(),
            filter: RelevanceFilter::new(&config.ignore_titles),
            resolver: ContentResolver::new(config.content_mode, config.min_chars),
            settings: RunSettings {
                min_chars: config.min_chars,
                feed_delay: config.feed_delay,
                debug: config.debug,
                debug_path: PathBuf::from(DEBUG_FILE_NAME),
                overall_summary: config.overall_summary,
            },
        }
    }

    /// Replace the per-site link repair rules used during selection.
    pub fn with_link_rules(mut self, rules: LinkRules) -> Self {
        self.selector = EntrySelector::new(rules);
        self
    }

    /// Write the debug copy somewhere other than `news.html` in the working directory.
    pub fn with_debug_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.debug_path = path.into();
        self
    }

    /// Collect, then deliver if anything worth sending was found.
    pub async fn run(&self, feeds: &[String], reference_date: &str, delivery: &dyn Delivery) -> RunReport {
        let run = self.collect(feeds, reference_date).await;
        self.finish(run, delivery).await
    }

    /// Walk every feed in order and build the batch.
    pub async fn collect(&self, feeds: &[String], reference_date: &str) -> DigestRun {
        let mut run = DigestRun::default();
        run.report.feeds_total = feeds.len();
        info!("Processing {} feeds for {}", feeds.len(), reference_date);

        for (index, url) in feeds.iter().enumerate() {
            match self.selector.select(self.fetcher.as_ref(), url, reference_date).await {
                SelectOutcome::Selected(entries) => {
                    run.report.entries_selected += entries.len();
                    for entry in &entries {
                        self.process_entry(entry, &mut run).await;
                    }
                }
                SelectOutcome::Skipped(reason) => {
                    warn!(url = %url, "Skipping feed: {}", reason);
                    run.report.feeds_skipped += 1;
                }
            }

            if index + 1 < feeds.len() && !self.settings.feed_delay.is_zero() {
                tokio::time::sleep(self.settings.feed_delay).await;
            }
        }

        run.report.fragments = run.batch.len();
        info!(
            "Collected {} fragments from {} entries ({} feeds skipped)",
            run.report.fragments, run.report.entries_selected, run.report.feeds_skipped
        );
        run
    }

    async fn process_entry(&self, entry: &FeedEntry, run: &mut DigestRun) {
        match self.filter.check(&entry.title, &mut run.seen) {
            Verdict::Accept => {}
            Verdict::Ignored { .. } => {
                run.report.entries_ignored += 1;
                return;
            }
            Verdict::Duplicate => {
                run.report.entries_duplicate += 1;
                return;
            }
        }

        let content = match self.resolver.resolve(self.fetcher.as_ref(), entry).await {
            Resolution::Resolved(content) => content,
            Resolution::Discarded(reason) => {
                debug!(url = %entry.link, "Discarding entry: {}", reason);
                run.report.entries_discarded += 1;
                return;
            }
        };

        let outcome = match &content.summarizer_input {
            Some(input) => self.summarizer.summarize(input).await,
            None => SummaryOutcome::Failed("no content to summarize".to_string()),
        };
        if let SummaryOutcome::Failed(reason) = &outcome {
            debug!(url = %entry.link, "Using feed summary: {}", reason);
        }

        let Some(summary) = choose_summary(&content.local_summary, outcome) else {
            debug!(url = %entry.link, "Entry judged not relevant");
            run.report.entries_discarded += 1;
            return;
        };

        if char_len(&summary) < self.settings.min_chars {
            debug!(url = %entry.link, "Summary too short to publish");
            run.report.entries_discarded += 1;
            return;
        }

        info!("Adding '{}'", entry.title);
        run.batch.push(compose_fragment(entry, summary));
    }

    /// Write the debug copy, attach the overall summary and hand the batch over.
    pub async fn finish(&self, run: DigestRun, delivery: &dyn Delivery) -> RunReport {
        let DigestRun { mut batch, mut report, .. } = run;

        if self.settings.debug {
            save_debug_copy(&self.settings.debug_path, &batch.render_fragments_page()).await;
        }

        if !batch.is_deliverable(self.settings.min_chars) {
            info!("Nothing new to deliver");
            return report;
        }

        if self.settings.overall_summary {
            match self.summarizer.summarize(&batch.render_text()).await {
                SummaryOutcome::Summary(summary) => batch.set_overall_summary(summary),
                SummaryOutcome::NotRelevant => debug!("Overall summary judged not relevant"),
                SummaryOutcome::Failed(reason) => warn!("Overall summary unavailable: {}", reason),
            }
        }

        match delivery.deliver(&batch).await {
            Ok(()) => {
                info!("Delivered {} fragments via {}", batch.len(), delivery.channel_name());
                report.delivered = true;
            }
            Err(e) => error!("Delivery via {} failed: {:#}", delivery.channel_name(), e),
        }

        report
    }
}
