// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription plan catalogue.

use serde::{Deserialize, Serialize};

/// A purchasable subscription plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan id sent to the payment API (e.g. "monthly_199")
    pub id: String,
    pub name: String,
    /// Price in INR
    pub price: u32,
    /// Billing period suffix ("/week", "/month", "/year")
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub features: Vec<String>,
    /// Highlighted on the pricing page
    #[serde(default)]
    pub popular: bool,
}

impl Plan {
    fn new(id: &str, name: &str, price: u32, period: &str, features: [&str; 3]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
            period: period.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            popular: false,
        }
    }

    /// Plan used by checkout when navigation did not carry one.
    pub fn checkout_default() -> Self {
        Self {
            id: "monthly_199".to_string(),
            name: "Monthly Pro".to_string(),
            price: 199,
            period: String::new(),
            features: Vec::new(),
            popular: false,
        }
    }

    /// Display price, e.g. "₹199/month".
    pub fn price_label(&self) -> String {
        format!("₹{}{}", self.price, self.period)
    }
}

/// All plans offered on the pricing page, in display order.
pub fn catalogue() -> Vec<Plan> {
    vec![
        Plan::new(
            "weekly_49",
            "Weekly Premium",
            49,
            "/week",
            ["4 Document Analyses", "500 Token Queries", "Priority Support"],
        ),
        Plan {
            popular: true,
            ..Plan::new(
                "monthly_199",
                "Monthly Pro",
                199,
                "/month",
                ["18 Document Analyses", "2,500 Token Queries", "Advanced Exports"],
            )
        },
        Plan::new(
            "yearly_2599",
            "Yearly Elite",
            2599,
            "/year",
            [
                "200 Document Analyses",
                "50,000 Token Queries",
                "Dedicated Account Manager",
            ],
        ),
        Plan::new(
            "yearly_3999",
            "Ultimate Unlimited",
            3999,
            "/year",
            [
                "Unlimited Documents",
                "50,000 Token Queries",
                "White-label Reports",
            ],
        ),
    ]
}

/// Look up a catalogue plan by id.
pub fn find_plan(id: &str) -> Option<Plan> {
    catalogue().into_iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_ids_are_unique() {
        let plans = catalogue();
        let mut ids: Vec<_> = plans.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), plans.len());
    }

    #[test]
    fn test_only_monthly_is_popular() {
        let popular: Vec<_> = catalogue().into_iter().filter(|p| p.popular).collect();
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].id, "monthly_199");
    }

    #[test]
    fn test_find_plan() {
        let plan = find_plan("yearly_2599").expect("plan exists");
        assert_eq!(plan.price_label(), "₹2599/year");
        assert!(find_plan("lifetime_1").is_none());
    }

    #[test]
    fn test_checkout_default_matches_catalogue_id() {
        let fallback = Plan::checkout_default();
        let listed = find_plan(&fallback.id).unwrap();
        assert_eq!(fallback.price, listed.price);
        assert_eq!(fallback.name, listed.name);
    }
}
