use crate::api::{AppIndex, PriceApi, PriceStore};
use crate::fetch::{fetch_prices, PriceMap, Tally, BATCH_SIZE};
use crate::schema::app::PriceRecord;
use anyhow::Result;
use chrono::NaiveDate;
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Price sync; app IDs -> storefront prices -> dated price history
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Summary of one run, logged once the job finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncReport {
    pub date: NaiveDate,
    /// Pages read from the index, including any that came back empty.
    pub pages: usize,
    pub app_ids: usize,
    pub tally: Tally,
    pub rows_written: u64,
    pub dry_run: bool,
}

/// Everything read and looked up before the write.
#[derive(Debug, Default)]
pub struct Collected {
    pub prices: PriceMap,
    pub tally: Tally,
    pub pages: usize,
    pub app_ids: usize,
}

pub struct SyncJob<A> {
    api: A,
    dry_run: bool,
    progress: ProgressBar,
}

impl<A: PriceApi> SyncJob<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            dry_run: false,
            progress: ProgressBar::hidden(),
        }
    }

    /// Collect prices as usual, but skip the insert.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Tick `progress` once per page of the index.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Read the index page by page, looking up each page's prices.
    ///
    /// The cursor starts at the top `entry_id` and drops by [`BATCH_SIZE`] after every page,
    /// whatever the page held. With gaps in `entry_id` the pages overlap and some app IDs are
    /// looked up twice; the second answer replaces the first.
    pub async fn collect<D>(&self, db: &mut D) -> Result<Collected>
    where
        D: AppIndex + ?Sized,
    {
        let step = BATCH_SIZE as i64;
        let mut cursor = db.top_entry_id().await?;
        let pages = page_count(cursor, step);
        debug!("top entry_id {cursor}, {pages} pages to read");
        self.progress.set_length(pages as u64);

        let mut collected = Collected::default();
        while cursor > 0 {
            let app_ids = db.app_ids(cursor, step).await?;
            collected.pages += 1;
            collected.app_ids += app_ids.len();

            if app_ids.is_empty() {
                warn!("no app IDs at or below entry_id {cursor}");
            } else {
                let tally = fetch_prices(&self.api, &app_ids, &mut collected.prices).await?;
                collected.tally += tally;
            }

            cursor -= step;
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        Ok(collected)
    }

    /// Run the whole job: collect every price, then write them all, dated `today`, in one
    /// insert. Nothing is written unless collection finishes.
    pub async fn run<D>(&self, db: &mut D, today: NaiveDate) -> Result<SyncReport>
    where
        D: AppIndex + PriceStore + ?Sized,
    {
        let time = std::time::Instant::now();
        let Collected {
            prices,
            tally,
            pages,
            app_ids,
        } = self.collect(db).await?;

        let records = records(prices, today);
        let rows_written = if self.dry_run {
            info!("dry run; {} prices not written", records.len());
            0
        } else if records.is_empty() {
            warn!("no prices collected, nothing to write");
            0
        } else {
            db.insert(records).await?
        };

        let report = SyncReport {
            date: today,
            pages,
            app_ids,
            tally,
            rows_written,
            dry_run: self.dry_run,
        };
        info!(
            "price sync for {today}: {} app IDs over {} batches, {} answered; {} priced, {} unsuccessful, {} empty; {} rows written in {} ms",
            report.app_ids,
            report.tally.batches,
            report.tally.answered(),
            report.tally.fetched,
            report.tally.unsuccessful,
            report.tally.empty,
            report.rows_written,
            time.elapsed().as_millis()
        );

        Ok(report)
    }
}

/// Pages the cursor walks through from `top` down to zero, `ceil(top / step)`.
pub fn page_count(top: i64, step: i64) -> i64 {
    if top > 0 {
        (top - 1) / step + 1
    } else {
        0
    }
}

/// Date every collected price with the day of the run.
pub fn records(prices: PriceMap, today: NaiveDate) -> Vec<PriceRecord> {
    prices
        .into_iter()
        .map(|(app_id, price)| PriceRecord {
            app_id,
            date: today,
            price,
        })
        .collect()
}
