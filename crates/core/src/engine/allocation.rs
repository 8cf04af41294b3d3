use crate::domain::recommendation::{Allocation, SavingsRecommendation};

pub struct AllocationBand {
    /// Exclusive upper age bound; `None` for the last band.
    pub below_age: Option<u32>,
    pub kind: &'static str,
    pub allocation: Allocation,
    pub description: &'static str,
}

/// Ordered by age; each allocation sums to 100.
pub static BANDS: [AllocationBand; 3] = [
    AllocationBand {
        below_age: Some(30),
        kind: "aggressive_growth",
        allocation: Allocation {
            stocks: 80,
            bonds: 15,
            cash: 5,
        },
        description: "Young age allows for aggressive growth strategy",
    },
    AllocationBand {
        below_age: Some(50),
        kind: "balanced_growth",
        allocation: Allocation {
            stocks: 65,
            bonds: 25,
            cash: 10,
        },
        description: "Balanced approach for steady growth",
    },
    AllocationBand {
        below_age: None,
        kind: "conservative",
        allocation: Allocation {
            stocks: 45,
            bonds: 40,
            cash: 15,
        },
        description: "Conservative approach for retirement preparation",
    },
];

pub fn band_for_age(age: u32) -> &'static AllocationBand {
    BANDS
        .iter()
        .find(|band| band.below_age.map_or(true, |limit| age < limit))
        .unwrap_or(&BANDS[BANDS.len() - 1])
}

pub fn recommend(age: u32) -> SavingsRecommendation {
    let band = band_for_age(age);
    SavingsRecommendation {
        kind: band.kind.to_string(),
        allocation: band.allocation,
        description: band.description.to_string(),
    }
}
