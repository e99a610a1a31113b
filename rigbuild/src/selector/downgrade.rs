//! Over-budget downgrade pass.
//!
//! Each step replaces one unit with its next-ranked cheaper candidate. A unit
//! is a single category, or the CPU and motherboard together when the pair
//! must stay socket-compatible. The step taken is the one losing the least
//! priority-weighted relative performance per currency unit saved; ties go to
//! the larger saving, then to category order.

use crate::catalog::Category;
use crate::profiles::UsageProfile;
use crate::selector::candidates::CandidateList;
use crate::selector::platform::PlatformWalk;

/// Index into each category's candidate list, in [`Category::ALL`] order.
pub type Picks = [usize; 7];

#[derive(Debug, Clone)]
struct Step {
    changes: Vec<(Category, usize)>,
    saved: f64,
    cost: f64,
}

pub struct Downgrader<'s, 'l, 'a> {
    pub lists: &'s [CandidateList<'a>],
    pub walk: &'s PlatformWalk<'l, 'a>,
    pub profile: &'s UsageProfile,
}

/// Sum of the picked prices, in category order.
pub fn total_price(lists: &[CandidateList<'_>], picks: &Picks) -> f64 {
    Category::ALL
        .iter()
        .map(|c| lists[c.index()].get(picks[c.index()]).price)
        .sum()
}

impl<'s, 'l, 'a> Downgrader<'s, 'l, 'a> {
    fn step(&self, picks: &Picks, changes: Vec<(Category, usize)>) -> Step {
        let mut loss = 0.0;
        let mut saved = 0.0;
        for &(category, index) in &changes {
            let list = &self.lists[category.index()];
            let old = list.get(picks[category.index()]);
            let new = list.get(index);
            let lost = (old.performance_score - new.performance_score).max(0.0);
            loss += self.profile.priority(category) * lost / old.performance_score;
            saved += old.price - new.price;
        }
        Step {
            changes,
            saved,
            cost: loss / saved,
        }
    }

    fn steps(&self, picks: &Picks, paired: bool) -> Vec<Step> {
        let mut steps = Vec::new();
        for category in Category::ALL {
            if paired && category == Category::Motherboard {
                continue;
            }
            if paired && category == Category::Cpu {
                let current = (picks[Category::Cpu.index()], picks[Category::Motherboard.index()]);
                if let Some((cpu, board)) = self.walk.next_cheaper(current) {
                    steps.push(self.step(
                        picks,
                        vec![(Category::Cpu, cpu), (Category::Motherboard, board)],
                    ));
                }
                continue;
            }
            let list = &self.lists[category.index()];
            if let Some(next) = list.next_cheaper(picks[category.index()]) {
                steps.push(self.step(picks, vec![(category, next)]));
            }
        }
        steps
    }

    /// Downgrade until the build fits `budget` or nothing cheaper remains.
    ///
    /// With `paired` set, CPU and motherboard move together along the
    /// platform walk. Returns the number of steps taken.
    pub fn run(&self, picks: &mut Picks, budget: f64, paired: bool) -> usize {
        let mut taken = 0;
        while total_price(self.lists, picks) > budget {
            let best = self.steps(picks, paired).into_iter().min_by(|a, b| {
                a.cost
                    .total_cmp(&b.cost)
                    .then(b.saved.total_cmp(&a.saved))
            });
            let Some(step) = best else {
                break;
            };
            for &(category, index) in &step.changes {
                tracing::debug!(
                    "Downgrading {}: {} -> {}",
                    category,
                    self.lists[category.index()].get(picks[category.index()]).model_name,
                    self.lists[category.index()].get(index).model_name
                );
                picks[category.index()] = index;
            }
            taken += 1;
        }
        taken
    }
}
