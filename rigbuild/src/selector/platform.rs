//! CPU and motherboard pairing.
//!
//! Compatible pairs are walked in a fixed order: CPUs in list order, and for
//! each CPU the motherboards on its socket in list order. The first pair of
//! the walk is the best-ranked CPU with its best-ranked matching board, which
//! is the provisional pick whenever the two top candidates already agree.

use std::collections::HashMap;

use crate::selector::candidates::CandidateList;

/// Position in both candidate lists: `(cpu_index, motherboard_index)`.
pub type Pair = (usize, usize);

pub struct PlatformWalk<'l, 'a> {
    cpus: &'l CandidateList<'a>,
    boards: &'l CandidateList<'a>,
    boards_by_socket: HashMap<&'a str, Vec<usize>>,
}

impl<'l, 'a> PlatformWalk<'l, 'a> {
    pub fn new(cpus: &'l CandidateList<'a>, boards: &'l CandidateList<'a>) -> Self {
        let mut boards_by_socket: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (index, board) in boards.iter() {
            if let Some(socket) = board.socket.as_deref() {
                boards_by_socket.entry(socket).or_default().push(index);
            }
        }
        Self {
            cpus,
            boards,
            boards_by_socket,
        }
    }

    fn boards_for(&self, cpu: usize) -> &[usize] {
        self.cpus
            .get(cpu)
            .socket
            .as_deref()
            .and_then(|s| self.boards_by_socket.get(s))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pairs in walk order from `(cpu_start, board_start)` on. Only the
    /// boards of `cpu_start` itself are cut at `board_start`.
    pub fn pairs_from(&self, cpu_start: usize, board_start: usize) -> impl Iterator<Item = Pair> + '_ {
        (cpu_start..self.cpus.len()).flat_map(move |cpu| {
            let min_board = if cpu == cpu_start { board_start } else { 0 };
            self.boards_for(cpu)
                .iter()
                .copied()
                .filter(move |&board| board >= min_board)
                .map(move |board| (cpu, board))
        })
    }

    /// The first compatible pair of the walk.
    pub fn first(&self) -> Option<Pair> {
        self.pairs_from(0, 0).next()
    }

    pub fn price(&self, pair: Pair) -> f64 {
        self.cpus.get(pair.0).price + self.boards.get(pair.1).price
    }

    /// First pair after `from` whose combined price is strictly lower.
    pub fn next_cheaper(&self, from: Pair) -> Option<Pair> {
        let current = self.price(from);
        self.pairs_from(from.0, from.1 + 1)
            .find(|&pair| self.price(pair) < current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Part};

    fn part(category: Category, name: &str, price: f64, score: f64, socket: &str) -> Part {
        Part {
            category,
            model_name: name.to_string(),
            price,
            performance_score: score,
            socket: Some(socket.to_string()),
        }
    }

    #[test]
    fn test_first_pair_backtracks_to_matching_board() {
        let cpus = vec![
            part(Category::Cpu, "cpu-a", 100.0, 1000.0, "A"), // 10
            part(Category::Cpu, "cpu-b", 100.0, 500.0, "B"),  // 5
        ];
        let boards = vec![
            part(Category::Motherboard, "mb-b", 100.0, 300.0, "B"), // 3, best
            part(Category::Motherboard, "mb-a", 100.0, 100.0, "A"), // 1
        ];
        let cpu_list = CandidateList::new(Category::Cpu, &cpus, 1000.0);
        let board_list = CandidateList::new(Category::Motherboard, &boards, 1000.0);
        let walk = PlatformWalk::new(&cpu_list, &board_list);

        let (cpu, board) = walk.first().unwrap();
        assert_eq!(cpu_list.get(cpu).model_name, "cpu-a");
        assert_eq!(board_list.get(board).model_name, "mb-a");
    }

    #[test]
    fn test_first_pair_skips_cpu_without_boards() {
        let cpus = vec![
            part(Category::Cpu, "cpu-c", 100.0, 2000.0, "C"), // no board on C
            part(Category::Cpu, "cpu-a", 100.0, 1000.0, "A"),
        ];
        let boards = vec![
            part(Category::Motherboard, "mb-a1", 100.0, 300.0, "A"),
            part(Category::Motherboard, "mb-a2", 100.0, 100.0, "A"),
        ];
        let cpu_list = CandidateList::new(Category::Cpu, &cpus, 1000.0);
        let board_list = CandidateList::new(Category::Motherboard, &boards, 1000.0);
        let walk = PlatformWalk::new(&cpu_list, &board_list);

        let (cpu, board) = walk.first().unwrap();
        assert_eq!(cpu_list.get(cpu).model_name, "cpu-a");
        assert_eq!(board_list.get(board).model_name, "mb-a1");
    }

    #[test]
    fn test_pairs_from_resets_board_for_later_cpus() {
        let cpus = vec![
            part(Category::Cpu, "cpu-a", 100.0, 1000.0, "A"),
            part(Category::Cpu, "cpu-b", 100.0, 500.0, "B"),
        ];
        let boards = vec![
            part(Category::Motherboard, "mb-b", 100.0, 300.0, "B"),
            part(Category::Motherboard, "mb-a", 100.0, 100.0, "A"),
        ];
        let cpu_list = CandidateList::new(Category::Cpu, &cpus, 1000.0);
        let board_list = CandidateList::new(Category::Motherboard, &boards, 1000.0);
        let walk = PlatformWalk::new(&cpu_list, &board_list);

        // cpu-a pairs only with mb-a (index 1); cpu-b's board sits before it
        let pairs: Vec<Pair> = walk.pairs_from(0, 1).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
        assert_eq!(walk.pairs_from(1, 1).count(), 0);
    }

    #[test]
    fn test_next_cheaper_pair() {
        let cpus = vec![
            part(Category::Cpu, "cpu-a1", 300.0, 3000.0, "A"),
            part(Category::Cpu, "cpu-b1", 100.0, 900.0, "B"),
        ];
        let boards = vec![
            part(Category::Motherboard, "mb-a1", 200.0, 400.0, "A"),
            part(Category::Motherboard, "mb-b1", 50.0, 50.0, "B"),
        ];
        let cpu_list = CandidateList::new(Category::Cpu, &cpus, 1000.0);
        let board_list = CandidateList::new(Category::Motherboard, &boards, 1000.0);
        let walk = PlatformWalk::new(&cpu_list, &board_list);

        let first = walk.first().unwrap();
        assert_eq!(walk.price(first), 500.0);
        let next = walk.next_cheaper(first).unwrap();
        assert_eq!(walk.price(next), 150.0);
        assert_eq!(walk.next_cheaper(next), None);
    }

    #[test]
    fn test_no_pairs() {
        let cpus = vec![part(Category::Cpu, "cpu-a", 100.0, 1.0, "A")];
        let boards = vec![part(Category::Motherboard, "mb-b", 100.0, 1.0, "B")];
        let cpu_list = CandidateList::new(Category::Cpu, &cpus, 1000.0);
        let board_list = CandidateList::new(Category::Motherboard, &boards, 1000.0);
        assert!(PlatformWalk::new(&cpu_list, &board_list).first().is_none());
    }
}
