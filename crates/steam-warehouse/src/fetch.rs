use crate::api::PriceApi;
use crate::schema::app::{AppId, Lookup, Outcome};
use anyhow::Result;
use std::collections::BTreeMap;
use std::ops::AddAssign;
use tracing::{debug, trace};

/// Most app IDs the storefront will answer for in a single request.
pub const BATCH_SIZE: usize = 800;

/// App ID to its formatted price, for every app that came back priced.
pub type PriceMap = BTreeMap<AppId, String>;

/// Running counts of batches sent and of each [`Outcome`] seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub batches: usize,
    pub fetched: usize,
    pub unsuccessful: usize,
    pub empty: usize,
}

impl Tally {
    pub fn answered(&self) -> usize {
        self.fetched + self.unsuccessful + self.empty
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.batches += rhs.batches;
        self.fetched += rhs.fetched;
        self.unsuccessful += rhs.unsuccessful;
        self.empty += rhs.empty;
    }
}

/// Look up `app_ids` in consecutive batches of at most [`BATCH_SIZE`], one request per batch,
/// merging the priced apps into `prices`.
///
/// The first failed request ends the whole lookup; batches already merged stay in `prices`
/// but nothing is written anywhere.
pub async fn fetch_prices<A>(api: &A, app_ids: &[AppId], prices: &mut PriceMap) -> Result<Tally>
where
    A: PriceApi + ?Sized,
{
    let mut tally = Tally::default();
    for batch in app_ids.chunks(BATCH_SIZE) {
        let lookup = api.fetch(batch).await?;
        tally += merge(prices, lookup);
        tally.batches += 1;
        trace!("batch {} merged: {} app IDs", tally.batches, batch.len());
    }

    debug!(
        "{} app IDs looked up in {} batches: {} priced, {} unsuccessful, {} empty",
        app_ids.len(),
        tally.batches,
        tally.fetched,
        tally.unsuccessful,
        tally.empty
    );
    Ok(tally)
}

/// Fold one batch's outcomes into `prices`; only [`Outcome::Fetched`] entries are kept.
pub fn merge(prices: &mut PriceMap, lookup: Lookup) -> Tally {
    let mut tally = Tally::default();
    for (app_id, outcome) in lookup {
        match outcome {
            Outcome::Fetched(price) => {
                prices.insert(app_id, price);
                tally.fetched += 1;
            }
            Outcome::Unsuccessful => tally.unsuccessful += 1,
            Outcome::Empty => tally.empty += 1,
        }
    }
    tally
}
