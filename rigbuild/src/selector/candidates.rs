//! Ranked candidate lists.
//!
//! A list holds every part of one category: the parts priced within the
//! category ceiling first, best value first, then the parts above the
//! ceiling from cheapest up. Index 0 is the provisional pick.

use std::cmp::Ordering;

use crate::catalog::{Category, Part};

/// Performance per price descending, then price ascending, then name.
pub fn rank_order(a: &Part, b: &Part) -> Ordering {
    b.value()
        .total_cmp(&a.value())
        .then(a.price.total_cmp(&b.price))
        .then_with(|| a.model_name.cmp(&b.model_name))
}

fn price_order(a: &Part, b: &Part) -> Ordering {
    a.price
        .total_cmp(&b.price)
        .then_with(|| a.model_name.cmp(&b.model_name))
}

#[derive(Debug, Clone)]
pub struct CandidateList<'a> {
    pub category: Category,
    pub ceiling: f64,
    parts: Vec<&'a Part>,
    eligible: usize,
}

impl<'a> CandidateList<'a> {
    pub fn new(category: Category, parts: &'a [Part], ceiling: f64) -> Self {
        let (mut eligible, mut over): (Vec<&Part>, Vec<&Part>) =
            parts.iter().partition(|p| p.price <= ceiling);
        eligible.sort_by(|a, b| rank_order(a, b));
        over.sort_by(|a, b| price_order(a, b));

        let eligible_count = eligible.len();
        eligible.extend(over);

        Self {
            category,
            ceiling,
            parts: eligible,
            eligible: eligible_count,
        }
    }

    pub fn get(&self, index: usize) -> &'a Part {
        self.parts[index]
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of parts within the ceiling.
    pub fn eligible_count(&self) -> usize {
        self.eligible
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Part)> + '_ {
        self.parts.iter().copied().enumerate()
    }

    /// First part after `from`, in list order, strictly cheaper than the part
    /// at `from`.
    pub fn next_cheaper(&self, from: usize) -> Option<usize> {
        let current = self.parts[from].price;
        (from + 1..self.parts.len()).find(|&i| self.parts[i].price < current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpu(name: &str, price: f64, score: f64) -> Part {
        Part {
            category: Category::Gpu,
            model_name: name.to_string(),
            price,
            performance_score: score,
            socket: None,
        }
    }

    #[test]
    fn test_ranking_and_ties() {
        let parts = vec![
            gpu("b", 200.0, 400.0), // 2.0
            gpu("a", 200.0, 400.0), // 2.0, same price, name first
            gpu("c", 100.0, 200.0), // 2.0, cheaper
            gpu("d", 300.0, 900.0), // 3.0
        ];
        let list = CandidateList::new(Category::Gpu, &parts, 1000.0);
        let names: Vec<_> = list.iter().map(|(_, p)| p.model_name.as_str()).collect();
        assert_eq!(names, vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn test_over_ceiling_parts_trail_by_price() {
        let parts = vec![
            gpu("cheap", 100.0, 100.0),
            gpu("big", 900.0, 5000.0),
            gpu("mid", 500.0, 2000.0),
        ];
        let list = CandidateList::new(Category::Gpu, &parts, 150.0);
        assert_eq!(list.eligible_count(), 1);
        assert_eq!(list.get(0).model_name, "cheap");
        assert_eq!(list.get(1).model_name, "mid");
        assert_eq!(list.get(2).model_name, "big");
    }

    #[test]
    fn test_nothing_within_ceiling_starts_at_cheapest() {
        let parts = vec![gpu("mid", 500.0, 2000.0), gpu("low", 300.0, 900.0)];
        let list = CandidateList::new(Category::Gpu, &parts, 50.0);
        assert_eq!(list.eligible_count(), 0);
        assert_eq!(list.get(0).model_name, "low");
        assert_eq!(list.next_cheaper(0), None);
    }

    #[test]
    fn test_next_cheaper_skips_pricier_parts() {
        let parts = vec![
            gpu("value", 300.0, 3000.0), // 10
            gpu("pricey", 400.0, 3200.0), // 8
            gpu("budget", 200.0, 1000.0), // 5
        ];
        let list = CandidateList::new(Category::Gpu, &parts, 1000.0);
        assert_eq!(list.get(0).model_name, "value");
        let next = list.next_cheaper(0).unwrap();
        assert_eq!(list.get(next).model_name, "budget");
    }
}
