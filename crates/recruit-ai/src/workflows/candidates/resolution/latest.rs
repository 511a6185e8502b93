use super::super::domain::{ReviewTrack, ValidationDecision, ValidationRecord};

/// Latest record per review track, selected in a single pass over the history.
///
/// A record replaces the one currently held for its track only when its
/// `created_at` is strictly later, so on equal timestamps the record that
/// appears first in the input wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatestDecisions<'a> {
    pub sales: Option<&'a ValidationRecord>,
    pub tech: Option<&'a ValidationRecord>,
}

impl<'a> LatestDecisions<'a> {
    pub fn collect<I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ValidationRecord>,
    {
        records.into_iter().fold(Self::default(), |mut latest, record| {
            let slot = match record.track {
                ReviewTrack::Sales => &mut latest.sales,
                ReviewTrack::Tech => &mut latest.tech,
            };
            if slot.map_or(true, |held| record.created_at > held.created_at) {
                *slot = Some(record);
            }
            latest
        })
    }

    pub fn record(&self, track: ReviewTrack) -> Option<&'a ValidationRecord> {
        match track {
            ReviewTrack::Sales => self.sales,
            ReviewTrack::Tech => self.tech,
        }
    }

    pub fn decision(&self, track: ReviewTrack) -> Option<ValidationDecision> {
        self.record(track).map(|record| record.decision)
    }
}
