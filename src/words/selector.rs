//! Picks the words for a review session
//!
//! Due words are taken first, in file order, up to the batch capacity. Any
//! remaining slots are filled with never-reviewed words sampled at random.
//! The final batch is shuffled so due words are not always shown first.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use super::models::{
    BucketCounts, FrequencyCode, ReviewBatch, SelectionEntry, SelectionOrigin, WordRecord,
    BATCH_CAPACITY,
};

/// A selected batch together with the list tally
#[derive(Debug, Clone)]
pub struct Selection {
    pub batch: ReviewBatch,
    pub counts: BucketCounts,
}

/// Tally the word list by bucket
///
/// Dated words are counted under their current frequency regardless of
/// whether they are due; an unset code with a date counts as tomorrow.
pub fn count_buckets(records: &[WordRecord], today: NaiveDate) -> BucketCounts {
    let mut counts = BucketCounts {
        total: records.len(),
        ..Default::default()
    };

    for record in records {
        if record.frequency.is_burned() {
            counts.burned += 1;
            continue;
        }
        if record.next_review.is_none() {
            counts.pending += 1;
            continue;
        }
        if record.is_due(today) {
            counts.due += 1;
        }
        match record.frequency {
            FrequencyCode::Unset | FrequencyCode::Tomorrow => counts.tomorrow += 1,
            FrequencyCode::Week => counts.week += 1,
            FrequencyCode::Month => counts.month += 1,
            FrequencyCode::ThreeMonths => counts.three_months += 1,
            FrequencyCode::Burned => {}
        }
    }

    counts
}

/// Select up to `BATCH_CAPACITY` words for review on `today`
pub fn select<R: Rng + ?Sized>(records: &[WordRecord], today: NaiveDate, rng: &mut R) -> Selection {
    let mut entries: Vec<SelectionEntry> = records
        .iter()
        .filter(|r| r.is_due(today))
        .take(BATCH_CAPACITY)
        .map(|r| SelectionEntry::from_record(r, SelectionOrigin::Due))
        .collect();
    let due_selected = entries.len();

    let pending: Vec<&WordRecord> = records
        .iter()
        .filter(|r| !r.frequency.is_burned() && r.next_review.is_none())
        .collect();

    let shortfall = BATCH_CAPACITY - entries.len();
    entries.extend(
        pending
            .choose_multiple(&mut *rng, shortfall)
            .map(|r| SelectionEntry::from_record(r, SelectionOrigin::Pending)),
    );

    log::info!(
        "Selected {} words ({} due, {} new) from {} records",
        entries.len(),
        due_selected,
        entries.len() - due_selected,
        records.len()
    );

    entries.shuffle(rng);

    Selection {
        batch: ReviewBatch::new(entries),
        counts: count_buckets(records, today),
    }
}
