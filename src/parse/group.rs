use std::collections::HashMap;

use tracing::debug;

use crate::normalize::money;
use crate::parse::SawtDetail;

/// Order-preserving roll-up of withholding rows.
///
/// Rows sharing (TIN, name, ATC code, rate-to-2dp) accumulate into one group;
/// the first occurrence of a key fixes that group's position, and sequence
/// numbers are assigned 1..n over the first-seen order. Implemented as a map
/// of accumulators plus an explicit key list, so ordering never depends on
/// map iteration.
#[derive(Debug, Default)]
pub struct Aggregator {
    groups: HashMap<String, Accumulator>,
    order: Vec<String>,
}

#[derive(Debug)]
struct Accumulator {
    tin: String,
    corp: String,
    atc: String,
    rate: f64,
    amount: f64,
    withheld: f64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tin: &str, corp: &str, atc: &str, rate: f64, amount: f64, withheld: f64) {
        let key = format!("{}|{}|{}|{}", tin, corp, atc, money(rate));
        let acc = self.groups.entry(key.clone()).or_insert_with(|| {
            self.order.push(key);
            Accumulator {
                tin: tin.to_string(),
                corp: corp.to_string(),
                atc: atc.to_string(),
                rate,
                amount: 0.0,
                withheld: 0.0,
            }
        });
        acc.amount += amount;
        acc.withheld += withheld;
        debug!(tin, atc, amount, withheld, "accumulated into group");
    }

    /// Emit grouped details in first-seen order with 1-based sequence numbers.
    pub fn into_details(mut self) -> Vec<SawtDetail> {
        let mut details = Vec::with_capacity(self.order.len());
        for (i, key) in self.order.iter().enumerate() {
            let acc = self
                .groups
                .remove(key)
                .expect("every ordered key has an accumulator");
            details.push(SawtDetail {
                seq: (i + 1) as u32,
                tin: acc.tin,
                corp: acc.corp,
                atc: acc.atc,
                rate: acc.rate,
                amount: acc.amount,
                withheld: acc.withheld,
            });
        }
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_rows_merge_at_first_position() {
        let mut agg = Aggregator::new();
        agg.add("111111111", "ACME", "WC158", 2.0, 100.0, 2.0);
        agg.add("222222222", "OTHER", "WC010", 1.0, 50.0, 0.5);
        agg.add("111111111", "ACME", "WC158", 2.0, 200.0, 4.0);

        let details = agg.into_details();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].seq, 1);
        assert_eq!(details[0].tin, "111111111");
        assert_eq!(details[0].amount, 300.0);
        assert_eq!(details[0].withheld, 6.0);
        assert_eq!(details[1].seq, 2);
        assert_eq!(details[1].corp, "OTHER");
    }

    #[test]
    fn differing_rate_is_a_different_group() {
        let mut agg = Aggregator::new();
        agg.add("111111111", "ACME", "WC158", 2.0, 100.0, 2.0);
        agg.add("111111111", "ACME", "WC158", 5.0, 100.0, 5.0);
        assert_eq!(agg.into_details().len(), 2);
    }
}
